use std::path::PathBuf;

/// How an entry gets opened once it is picked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchHandle {
    AppId(String),        // shell:AppsFolder identifier (Start menu)
    Shortcut(PathBuf),    // .lnk file
    InstallDir(PathBuf),  // registry InstallLocation
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppEntry {
    pub name: String,
    pub handle: LaunchHandle,
}

impl AppEntry {
    pub fn new(name: impl Into<String>, handle: LaunchHandle) -> Self {
        Self {
            name: name.into(),
            handle,
        }
    }

    pub fn app_id(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self::new(name, LaunchHandle::AppId(id.into()))
    }

    pub fn shortcut(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(name, LaunchHandle::Shortcut(path.into()))
    }

    pub fn install_dir(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::new(name, LaunchHandle::InstallDir(path.into()))
    }

    /// Case-folded name; the key for dedup, ordering, denylist and filtering.
    pub fn fold_key(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn source_label(&self) -> &'static str {
        match self.handle {
            LaunchHandle::AppId(_) => "start-menu",
            LaunchHandle::Shortcut(_) => "shortcut",
            LaunchHandle::InstallDir(_) => "registry",
        }
    }
}

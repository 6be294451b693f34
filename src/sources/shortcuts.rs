use crate::model::AppEntry;
use crate::sources::{Source, SourceError};
use directories::BaseDirs;
use log::debug;
use std::env;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const PROGRAMS: &str = r"Microsoft\Windows\Start Menu\Programs";

/// `.lnk` files under the per-user and all-users Start Menu folders.
pub struct ShortcutSource {
    pub roots: Vec<PathBuf>,
    pub max_depth: usize,
}

impl Default for ShortcutSource {
    fn default() -> Self {
        let mut roots = Vec::new();
        if let Some(base_dirs) = BaseDirs::new() {
            roots.push(base_dirs.data_dir().join(PROGRAMS));
        }
        let program_data = env::var_os("ProgramData")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(r"C:\ProgramData"));
        roots.push(program_data.join(PROGRAMS));

        Self { roots, max_depth: 4 }
    }
}

impl Source for ShortcutSource {
    fn name(&self) -> &'static str {
        "shortcuts"
    }

    fn scan(&self) -> Result<Vec<AppEntry>, SourceError> {
        let mut entries = Vec::new();
        for root in &self.roots {
            if !root.is_dir() {
                debug!("Shortcut folder {:?} does not exist, skipping", root);
                continue;
            }
            debug!("Scanning shortcuts in {:?}", root);
            let walker = WalkDir::new(root)
                .max_depth(self.max_depth)
                .into_iter()
                .filter_entry(|e| !is_skipped_dir(e));
            for entry in walker.flatten() {
                if !entry.file_type().is_file() || !is_shortcut(entry.path()) {
                    continue;
                }
                if let Some(name) = shortcut_name(entry.path()) {
                    entries.push(AppEntry::shortcut(name, entry.path()));
                }
            }
        }
        Ok(entries)
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|n| n.starts_with('.') || n.eq_ignore_ascii_case("Startup"))
}

fn is_shortcut(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("lnk"))
}

/// Display name for a shortcut file, or `None` for uninstallers and docs.
pub fn shortcut_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let lower = stem.to_lowercase();
    if lower.contains("uninstall") || lower.contains("readme") {
        return None;
    }

    let name = stem.trim_end_matches(" - Shortcut").trim();
    (!name.is_empty()).then(|| name.to_string())
}

use std::env;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use log::{debug, info};
use crate::config::SearchConfig;
use crate::model::{AppEntry, LaunchHandle};

const EXPLORER: &str = "explorer.exe";
const QUERY_PLACEHOLDER: &str = "{query}";

pub fn launch_command(entry: &AppEntry) -> Command {
    let mut command = Command::new(EXPLORER);
    match &entry.handle {
        LaunchHandle::AppId(id) => command.arg(format!(r"shell:AppsFolder\{id}")),
        LaunchHandle::Shortcut(path) | LaunchHandle::InstallDir(path) => command.arg(path),
    };
    command
}

/// Fills `{query}` in the template with the form-encoded query,
/// or appends it when the template has no placeholder.
pub fn search_url(template: &str, query: &str) -> String {
    let encoded: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
    if template.contains(QUERY_PLACEHOLDER) {
        template.replace(QUERY_PLACEHOLDER, &encoded)
    } else {
        format!("{template}{encoded}")
    }
}

/// Configured browser, else the per-user Chromium install under `%LOCALAPPDATA%`.
pub fn browser_path(config: &SearchConfig) -> Option<PathBuf> {
    if let Some(browser) = &config.browser {
        return Some(browser.clone());
    }
    env::var_os("LOCALAPPDATA").map(|dir| {
        PathBuf::from(dir)
            .join("Chromium")
            .join("Application")
            .join("chrome.exe")
    })
}

pub fn search_command(config: &SearchConfig, query: &str) -> Command {
    let url = search_url(&config.url, query);
    // Without a browser path explorer hands the URL to the default browser.
    let mut command = match browser_path(config) {
        Some(browser) => Command::new(browser),
        None => Command::new(EXPLORER),
    };
    command.arg(url);
    command
}

/// Starts the process and forgets it. The session ends right after a launch,
/// so a spawn error is only logged.
pub fn detach(mut command: Command) {
    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    match command.spawn() {
        Ok(child) => debug!("Spawned {:?} (pid {})", command.get_program(), child.id()),
        Err(err) => debug!("Failed to spawn {:?}: {}", command.get_program(), err),
    }
}

pub fn launch(entry: &AppEntry) {
    info!("Launching {:?} ({})", entry.name, entry.source_label());
    detach(launch_command(entry));
}

pub fn web_search(config: &SearchConfig, query: &str) {
    info!("Searching {} for {:?}", config.engine_name, query);
    detach(search_command(config, query));
}

use crate::config::SourceConfig;
use crate::model::AppEntry;
use log::{debug, info};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("could not start {tool}: {source}")]
    Spawn {
        tool: &'static str,
        source: std::io::Error,
    },
    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("unexpected output: {0}")]
    Parse(#[from] serde_json::Error),
    #[cfg_attr(not(target_os = "windows"), allow(dead_code))]
    #[error("registry error on {key} (code {code})")]
    Registry { key: String, code: u32 },
    #[cfg_attr(target_os = "windows", allow(dead_code))]
    #[error("not supported on this platform")]
    Unsupported,
}

pub trait Source {
    fn name(&self) -> &'static str;
    fn scan(&self) -> Result<Vec<AppEntry>, SourceError>;
}

/// What one collector produced; a failure counts as an empty contribution.
pub struct SourceOutcome {
    pub source: &'static str,
    pub result: Result<Vec<AppEntry>, SourceError>,
}

impl SourceOutcome {
    pub fn entries(&self) -> &[AppEntry] {
        match &self.result {
            Ok(entries) => entries,
            Err(_) => &[],
        }
    }
}

/// Enabled collectors, highest priority first.
pub fn enabled_sources(config: &SourceConfig) -> Vec<Box<dyn Source>> {
    let mut sources: Vec<Box<dyn Source>> = Vec::new();
    if config.start_menu {
        sources.push(Box::new(start_menu::StartMenuSource));
    }
    if config.registry {
        sources.push(Box::new(registry::RegistrySource));
    }
    if config.shortcuts {
        sources.push(Box::new(shortcuts::ShortcutSource::default()));
    }
    sources
}

/// Runs every collector in order. None of them can abort the others.
pub fn collect(sources: &[Box<dyn Source>]) -> Vec<SourceOutcome> {
    sources
        .iter()
        .map(|source| {
            debug!("Collecting from {}", source.name());
            let result = source.scan();
            match &result {
                Ok(entries) => info!("{}: found {} entries", source.name(), entries.len()),
                Err(err) => info!("{}: skipped ({})", source.name(), err),
            }
            SourceOutcome {
                source: source.name(),
                result,
            }
        })
        .collect()
}

pub mod start_menu;
pub mod registry;
pub mod shortcuts;

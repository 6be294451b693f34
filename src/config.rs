use serde::Deserialize;
use std::path::PathBuf;
use directories::ProjectDirs;
use ratatui::style::Color;
use std::fs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub sources: SourceConfig,
    #[serde(default)]
    pub filter: FilterConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Deserialize, Debug, Clone)]
pub struct GeneralConfig {
    /// Floor for the number of list rows, however small the terminal is.
    #[serde(default = "default_min_visible")]
    pub min_visible: usize,
    /// Rows around the list: title, input, scroll indicators, spacing and footer.
    #[serde(default = "default_reserved_rows")]
    pub reserved_rows: usize,
    #[serde(default = "default_char_limit")]
    pub char_limit: usize,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

fn default_min_visible() -> usize { 5 }
fn default_reserved_rows() -> usize { 7 }
fn default_char_limit() -> usize { 200 }

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            min_visible: default_min_visible(),
            reserved_rows: default_reserved_rows(),
            char_limit: default_char_limit(),
            log_file: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct SourceConfig {
    #[serde(default = "default_true")]
    pub start_menu: bool,
    #[serde(default = "default_true")]
    pub registry: bool,
    #[serde(default)]
    pub shortcuts: bool,
}

fn default_true() -> bool { true }

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            start_menu: true,
            registry: true,
            shortcuts: false,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct FilterConfig {
    /// Extra ghost names, added to the built-in ones.
    #[serde(default)]
    pub denylist: Vec<String>,
    /// Regexes matched against display names.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct SearchConfig {
    #[serde(default = "default_prefix")]
    pub prefix: char,
    #[serde(default = "default_search_url")]
    pub url: String,
    #[serde(default = "default_engine_name")]
    pub engine_name: String,
    #[serde(default)]
    pub browser: Option<PathBuf>,
}

fn default_prefix() -> char { '/' }
fn default_search_url() -> String { "https://duckduckgo.com/?q={query}".to_string() }
fn default_engine_name() -> String { "DuckDuckGo".to_string() }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            url: default_search_url(),
            engine_name: default_engine_name(),
            browser: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct ThemeConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_selected")]
    pub selected: String,
    #[serde(default = "default_normal")]
    pub normal: String,
    #[serde(default = "default_dim")]
    pub dim: String,
    #[serde(default = "default_search")]
    pub search: String,
}

// ANSI palette indices.
fn default_title() -> String { "6".to_string() }
fn default_selected() -> String { "2".to_string() }
fn default_normal() -> String { "7".to_string() }
fn default_dim() -> String { "8".to_string() }
fn default_search() -> String { "5".to_string() }

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            selected: default_selected(),
            normal: default_normal(),
            dim: default_dim(),
            search: default_search(),
        }
    }
}

impl ThemeConfig {
    /// Accepts color names, `#rrggbb` and palette indices; anything else is `Reset`.
    pub fn parse_color(value: &str) -> Color {
        value.trim().parse().unwrap_or(Color::Reset)
    }
}

pub fn config_path() -> PathBuf {
    match ProjectDirs::from("org", "zap", "zap") {
        Some(dirs) => dirs.config_dir().join("config.toml"),
        None => PathBuf::from("config.toml"),
    }
}

pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();
    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
        path: path.clone(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigError::Parse { path, source })
}

pub fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

mod catalog;
mod config;
mod executor;
mod input;
mod matcher;
mod model;
mod sources;
mod state;
mod ui;

use std::fs::OpenOptions;
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use log::info;
use crate::catalog::Denylist;
use crate::config::{load_config, Config};
use crate::state::{AppState, Effect};

/// Terminal app launcher for Windows. Type to filter, enter to launch,
/// start with `/` to search the web.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {}

fn main() {
    Args::parse();
    if let Err(err) = run() {
        eprintln!("zap: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // 1. Load Config
    let config = load_config()?;
    init_logging(&config)?;

    // 2. Collect & merge apps
    let sources = sources::enabled_sources(&config.sources);
    let outcomes = sources::collect(&sources);
    let apps = catalog::merge(&outcomes, &Denylist::from_config(&config.filter));
    info!("Loaded {} apps from {} sources", apps.len(), outcomes.len());

    // 3. Run the session
    let mut state = AppState::new(apps, &config);
    match ui::terminal::run(&mut state, &config)? {
        Effect::Launch(entry) => executor::launch(&entry),
        Effect::WebSearch(query) => executor::web_search(&config.search, &query),
        Effect::Quit | Effect::None => {}
    }

    if let Some(label) = &state.last_action {
        println!("{}", format!("  → {label}").dark_grey());
    }
    Ok(())
}

/// `RUST_LOG` picks the level. With `general.log_file` set, records go to
/// that file instead of stderr so they stay off the TUI.
fn init_logging(config: &Config) -> Result<()> {
    let mut builder = env_logger::Builder::from_default_env();
    if let Some(path) = &config.general.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

use std::io;
use anyhow::{Context, Result};
use crossterm::event::{self, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use log::debug;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use crate::config::Config;
use crate::input::Edit;
use crate::state::{AppState, Effect, Event};
use crate::ui::render::{self, Styles};

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Runs the interactive session until an event ends it. The terminal is
/// restored before the effect is handed back, so launching happens outside
/// the alternate screen.
pub fn run(state: &mut AppState, config: &Config) -> Result<Effect> {
    enable_raw_mode().context("failed to enable raw mode")?;
    let _guard = TerminalGuard;
    execute!(io::stdout(), EnterAlternateScreen).context("failed to enter alt screen")?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).context("failed to init terminal")?;

    let size = terminal.size().context("failed to query terminal size")?;
    state.handle(Event::Resize { height: size.height });

    let styles = Styles::from_theme(&config.theme);
    loop {
        terminal.draw(|f| render::draw(f, state, &styles, &config.search.engine_name))?;

        let Some(event) = map_event(event::read()?) else {
            continue;
        };
        let effect = state.handle(event);
        if effect != Effect::None {
            debug!("Session ended with {:?}", effect);
            return Ok(effect);
        }
    }
}

pub fn map_event(event: event::Event) -> Option<Event> {
    match event {
        event::Event::Key(key) if key.kind != KeyEventKind::Release => map_key(key),
        event::Event::Resize(_, height) => Some(Event::Resize { height }),
        _ => None,
    }
}

pub fn map_key(key: KeyEvent) -> Option<Event> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let event = match key.code {
        KeyCode::Esc => Event::Cancel,
        KeyCode::Char('c') if ctrl => Event::Cancel,
        KeyCode::Enter => Event::Enter,
        KeyCode::Up => Event::Up,
        KeyCode::Down => Event::Down,
        KeyCode::Char('p') if ctrl => Event::Up,
        KeyCode::Char('n') if ctrl => Event::Down,
        KeyCode::PageUp => Event::PageUp,
        KeyCode::PageDown => Event::PageDown,
        KeyCode::Left => Event::Edit(Edit::Left),
        KeyCode::Right => Event::Edit(Edit::Right),
        KeyCode::Home => Event::Edit(Edit::Home),
        KeyCode::End => Event::Edit(Edit::End),
        KeyCode::Char('a') if ctrl => Event::Edit(Edit::Home),
        KeyCode::Char('e') if ctrl => Event::Edit(Edit::End),
        KeyCode::Char('w') if ctrl => Event::Edit(Edit::DeleteWordBackward),
        KeyCode::Char('u') if ctrl => Event::Edit(Edit::DeleteToStart),
        KeyCode::Backspace if ctrl => Event::Edit(Edit::DeleteWordBackward),
        KeyCode::Backspace => Event::Edit(Edit::Backspace),
        KeyCode::Delete => Event::Edit(Edit::Delete),
        KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
            Event::Edit(Edit::Insert(c))
        }
        _ => return None,
    };
    Some(event)
}

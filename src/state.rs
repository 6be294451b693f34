use crate::config::Config;
use crate::input::{Edit, TextInput};
use crate::matcher;
use crate::model::AppEntry;
use std::ops::Range;

const INITIAL_VISIBLE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browsing,
    WebSearch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Edit(Edit),
    Up,
    Down,
    PageUp,
    PageDown,
    Enter,
    Cancel,
    Resize { height: u16 },
}

/// What the session loop has to do after an event. Everything but `None` ends the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Launch(AppEntry),
    WebSearch(String),
    Quit,
}

pub struct AppState {
    pub entries: Vec<AppEntry>,
    pub filtered_indices: Vec<usize>,
    pub selected_index: usize,
    pub offset: usize,
    pub max_visible: usize,
    pub input: TextInput,
    pub mode: Mode,
    pub last_action: Option<String>,
    prefix: char,
    min_visible: usize,
    reserved_rows: usize,
}

impl AppState {
    pub fn new(entries: Vec<AppEntry>, config: &Config) -> Self {
        let filtered_indices = (0..entries.len()).collect();
        Self {
            entries,
            filtered_indices,
            selected_index: 0,
            offset: 0,
            max_visible: INITIAL_VISIBLE,
            input: TextInput::new(config.general.char_limit),
            mode: Mode::Browsing,
            last_action: None,
            prefix: config.search.prefix,
            min_visible: config.general.min_visible.max(1),
            reserved_rows: config.general.reserved_rows,
        }
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn query(&self) -> &str {
        self.input.value()
    }

    /// Query text without the web-search prefix and surrounding whitespace.
    pub fn search_text(&self) -> &str {
        let query = self.query();
        query.strip_prefix(self.prefix).unwrap_or(query).trim()
    }

    pub fn get_selected(&self) -> Option<&AppEntry> {
        self.filtered_indices
            .get(self.selected_index)
            .map(|&idx| &self.entries[idx])
    }

    /// Positions within `filtered_indices` currently on screen.
    pub fn visible_range(&self) -> Range<usize> {
        let end = (self.offset + self.max_visible).min(self.filtered_indices.len());
        self.offset.min(end)..end
    }

    pub fn handle(&mut self, event: Event) -> Effect {
        match event {
            Event::Edit(edit) => {
                if self.input.apply(edit) {
                    self.on_query_changed();
                }
                Effect::None
            }
            Event::Up => self.move_selection(-1),
            Event::Down => self.move_selection(1),
            Event::PageUp => self.move_selection(-(self.max_visible as isize)),
            Event::PageDown => self.move_selection(self.max_visible as isize),
            Event::Resize { height } => {
                self.max_visible = (height as usize)
                    .saturating_sub(self.reserved_rows)
                    .max(self.min_visible);
                self.ensure_visible();
                Effect::None
            }
            Event::Enter => self.enter(),
            Event::Cancel => Effect::Quit,
        }
    }

    fn on_query_changed(&mut self) {
        if self.query().starts_with(self.prefix) {
            self.mode = Mode::WebSearch;
            self.selected_index = 0;
            self.offset = 0;
            return;
        }

        self.filtered_indices = matcher::filter(&self.entries, self.input.value());
        if self.mode == Mode::WebSearch {
            self.mode = Mode::Browsing;
            self.selected_index = 0;
            self.offset = 0;
            return;
        }

        self.selected_index = self
            .selected_index
            .min(self.filtered_indices.len().saturating_sub(1));
        self.ensure_visible();
    }

    fn move_selection(&mut self, delta: isize) -> Effect {
        if self.mode == Mode::Browsing && !self.filtered_indices.is_empty() {
            let last = self.filtered_indices.len() - 1;
            self.selected_index = self.selected_index.saturating_add_signed(delta).min(last);
            self.ensure_visible();
        }
        Effect::None
    }

    fn ensure_visible(&mut self) {
        if self.selected_index < self.offset {
            self.offset = self.selected_index;
        } else if self.selected_index >= self.offset + self.max_visible {
            self.offset = self.selected_index + 1 - self.max_visible;
        }
    }

    fn enter(&mut self) -> Effect {
        if self.mode == Mode::WebSearch {
            let query = self.search_text().to_string();
            if query.is_empty() {
                return Effect::Quit;
            }
            self.last_action = Some(format!("Searching: {query}"));
            return Effect::WebSearch(query);
        }

        match self.get_selected().cloned() {
            Some(entry) => {
                self.last_action = Some(entry.name.clone());
                Effect::Launch(entry)
            }
            None => Effect::None,
        }
    }
}

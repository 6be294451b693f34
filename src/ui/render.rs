use ratatui::layout::Position;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use crate::config::ThemeConfig;
use crate::state::{AppState, Mode};

const PROMPT: &str = "  > ";

fn placeholder(prefix: char) -> String {
    format!("search apps · {prefix} to search web · esc to quit")
}

pub struct Styles {
    pub title: Style,
    pub selected: Style,
    pub normal: Style,
    pub dim: Style,
    pub search: Style,
    pub help: Style,
}

impl Styles {
    pub fn from_theme(theme: &ThemeConfig) -> Self {
        let dim = Style::default().fg(ThemeConfig::parse_color(&theme.dim));
        Self {
            title: Style::default()
                .fg(ThemeConfig::parse_color(&theme.title))
                .add_modifier(Modifier::BOLD),
            selected: Style::default()
                .fg(ThemeConfig::parse_color(&theme.selected))
                .add_modifier(Modifier::BOLD),
            normal: Style::default().fg(ThemeConfig::parse_color(&theme.normal)),
            dim,
            search: Style::default()
                .fg(ThemeConfig::parse_color(&theme.search))
                .add_modifier(Modifier::BOLD),
            help: dim.add_modifier(Modifier::ITALIC),
        }
    }
}

pub fn draw(frame: &mut Frame, state: &AppState, styles: &Styles, engine_name: &str) {
    let area = frame.area();
    let mut lines = vec![
        Line::from(Span::styled(" ⚡ zap ", styles.title)),
        input_line(state, styles),
        Line::default(),
    ];

    if state.mode == Mode::WebSearch {
        lines.push(Line::from(vec![
            Span::styled("  🔍 Search: ", styles.search),
            Span::styled(state.search_text(), styles.normal),
        ]));
        lines.push(Line::from(Span::styled(
            format!("  enter to search {engine_name}"),
            styles.dim,
        )));
    } else {
        lines.extend(list_lines(state, styles));
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!(
                "  {} apps · ↑↓ navigate · enter launch · {} search · esc quit",
                state.filtered_indices.len(),
                state.prefix(),
            ),
            styles.help,
        )));
    }

    frame.render_widget(Paragraph::new(lines), area);

    let before_cursor: String = state.input.value().chars().take(state.input.cursor()).collect();
    let x = area.x + (Span::raw(PROMPT).width() + Span::raw(before_cursor).width()) as u16;
    if x < area.right() && area.height > 1 {
        frame.set_cursor_position(Position::new(x, area.y + 1));
    }
}

fn input_line<'a>(state: &'a AppState, styles: &Styles) -> Line<'a> {
    let text = if state.query().is_empty() {
        Span::styled(placeholder(state.prefix()), styles.dim)
    } else {
        Span::styled(state.query(), styles.normal)
    };
    Line::from(vec![Span::raw(PROMPT), text])
}

fn list_lines<'a>(state: &'a AppState, styles: &Styles) -> Vec<Line<'a>> {
    let range = state.visible_range();
    let mut lines = Vec::with_capacity(range.len() + 2);

    if range.start > 0 {
        lines.push(Line::from(Span::styled("  ↑ more", styles.dim)));
    }
    for pos in range.clone() {
        let entry = &state.entries[state.filtered_indices[pos]];
        let line = if pos == state.selected_index {
            Span::styled(format!("  ▸ {}", entry.name), styles.selected)
        } else {
            Span::styled(format!("    {}", entry.name), styles.normal)
        };
        lines.push(Line::from(line));
    }
    if range.end < state.filtered_indices.len() {
        lines.push(Line::from(Span::styled("  ↓ more", styles.dim)));
    }
    if state.filtered_indices.is_empty() {
        lines.push(Line::from(Span::styled("  no matches", styles.dim)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::input::Edit;
    use crate::model::AppEntry;
    use crate::state::Event;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(state: &AppState, width: u16, height: u16) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let styles = Styles::from_theme(&ThemeConfig::default());
        terminal
            .draw(|f| draw(f, state, &styles, "DuckDuckGo"))
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect()
    }

    fn state(count: usize) -> AppState {
        let entries = (0..count)
            .map(|i| AppEntry::app_id(format!("App {i:02}"), format!("id{i}")))
            .collect();
        AppState::new(entries, &Config::default())
    }

    #[test]
    fn shows_placeholder_list_and_footer() {
        let mut s = state(3);
        s.handle(Event::Down);
        let lines = render(&s, 80, 12);

        assert!(lines[0].contains("zap"));
        assert!(lines[1].contains("search apps · / to search web · esc to quit"));
        assert_eq!(lines[3], "    App 00");
        assert_eq!(lines[4], "  ▸ App 01");
        assert_eq!(lines[5], "    App 02");
        assert!(lines[7].contains("3 apps"));
    }

    #[test]
    fn shows_scroll_indicators() {
        let mut s = state(20);
        s.handle(Event::Resize { height: 12 });
        for _ in 0..7 {
            s.handle(Event::Down);
        }
        let lines = render(&s, 80, 20);
        assert_eq!(lines[3], "  ↑ more");
        assert_eq!(lines[4], "    App 03");
        assert_eq!(lines[8], "  ▸ App 07");
        assert_eq!(lines[9], "  ↓ more");
    }

    #[test]
    fn shows_no_matches() {
        let mut s = state(2);
        for c in "zzz".chars() {
            s.handle(Event::Edit(Edit::Insert(c)));
        }
        let lines = render(&s, 80, 10);
        assert!(lines[1].contains("zzz"));
        assert_eq!(lines[3], "  no matches");
        assert!(lines[5].contains("0 apps"));
    }

    #[test]
    fn shows_web_search_view() {
        let mut s = state(2);
        for c in "/openai".chars() {
            s.handle(Event::Edit(Edit::Insert(c)));
        }
        let lines = render(&s, 80, 10);
        assert!(lines[3].contains("Search: openai"));
        assert_eq!(lines[4], "  enter to search DuckDuckGo");
    }

    #[test]
    fn footer_fits_when_both_indicators_show() {
        let mut s = state(30);
        s.handle(Event::Resize { height: 14 });
        for _ in 0..7 {
            s.handle(Event::Down);
        }
        let lines = render(&s, 60, 14);
        assert!(lines.iter().any(|l| l == "  ↑ more"));
        assert!(lines.iter().any(|l| l == "  ↓ more"));
        assert!(lines[13].contains("30 apps"));
        assert!(lines[13].contains("navigate"));
    }

    #[test]
    fn hints_use_configured_prefix() {
        let mut config = Config::default();
        config.search.prefix = '?';
        let s = AppState::new(vec![AppEntry::app_id("Paint", "paint")], &config);
        let lines = render(&s, 80, 10);
        assert!(lines[1].contains("search apps · ? to search web"));
        assert!(lines[5].contains("enter launch · ? search"));
        assert!(!lines[5].contains("/ search"));
    }
}

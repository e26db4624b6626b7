use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::App;
use crate::search::SearchPhase;

const HINTS: &str = "↑↓ select  Enter details  Esc clear/quit ";

/// Bottom status bar showing the active query, result count, and key hints.
pub struct StatusBar<'a> {
    pub app: &'a App,
}

impl<'a> StatusBar<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        // Background
        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_style(bg_style);
        }

        let mut spans = Vec::new();

        let search = &self.app.search;
        let (mode_str, mode_color) = match search.settled.as_deref() {
            Some(term) if !term.is_empty() => (" SEARCH ", Color::Yellow),
            _ => (" POPULAR ", Color::Blue),
        };
        spans.push(Span::styled(
            mode_str,
            Style::default()
                .bg(mode_color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(" "));

        let view_name = match search.settled.as_deref() {
            Some(term) if !term.is_empty() => format!("\"{term}\""),
            _ => "Popular movies".to_string(),
        };
        spans.push(Span::styled(view_name, bg_style));

        let (detail, detail_color) = match search.phase {
            SearchPhase::Loading => (" [loading...]".to_string(), Color::Yellow),
            SearchPhase::Results => (format!(" [{} results]", search.movies.len()), Color::Green),
            SearchPhase::Empty => (" [0 results]".to_string(), Color::White),
            SearchPhase::Error => (" [error]".to_string(), Color::Red),
        };
        spans.push(Span::styled(
            detail,
            Style::default().bg(Color::DarkGray).fg(detail_color),
        ));

        // Key hints (right-aligned, dropped when they do not fit)
        let left_width: usize = spans.iter().map(|s| s.width()).sum();
        let hints = Span::styled(HINTS, bg_style);
        let padding = (area.width as usize).saturating_sub(left_width + hints.width());
        if padding > 0 {
            spans.push(Span::styled(" ".repeat(padding), bg_style));
            spans.push(hints);
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}

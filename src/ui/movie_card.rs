use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::api::types::Movie;

/// Rows a card occupies, excluding the separator.
pub const CARD_HEIGHT: u16 = 2;

/// Renders a single movie as a two-line card.
///
/// Layout:
///   Inception
///   ★ 8.4 · en · 2010
pub struct MovieCard<'a> {
    pub movie: &'a Movie,
    pub selected: bool,
}

impl<'a> MovieCard<'a> {
    pub fn new(movie: &'a Movie) -> Self {
        Self {
            movie,
            selected: false,
        }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl Widget for MovieCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let title_style = if self.selected {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD | Modifier::REVERSED)
        } else {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        };

        let title = Line::from(Span::styled(self.movie.display_title(), title_style));
        buf.set_line(area.x, area.y, &title, area.width);

        if area.height < 2 {
            return;
        }

        let dim = Style::default().fg(Color::DarkGray);
        let language = if self.movie.original_language.is_empty() {
            "N/A"
        } else {
            self.movie.original_language.as_str()
        };
        let meta = Line::from(vec![
            Span::styled("\u{2605} ", Style::default().fg(Color::Yellow)),
            Span::styled(self.movie.rating_label(), Style::default().fg(Color::White)),
            Span::styled(" \u{00B7} ", dim),
            Span::styled(language, dim),
            Span::styled(" \u{00B7} ", dim),
            Span::styled(self.movie.year_label(), dim),
        ]);
        buf.set_line(area.x, area.y + 1, &meta, area.width);
    }
}

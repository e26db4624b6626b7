use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::api::types::Movie;

/// A dismissible centered popup with the selected movie's details.
pub struct DetailPopup<'a> {
    movie: &'a Movie,
    image_base: &'a str,
}

impl<'a> DetailPopup<'a> {
    pub fn new(movie: &'a Movie, image_base: &'a str) -> Self {
        Self { movie, image_base }
    }
}

impl Widget for DetailPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 70u16.min(area.width.saturating_sub(4));
        let height = 18u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let panel = Rect::new(x, y, width, height);

        Clear.render(panel, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.movie.display_title()))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(panel);
        block.render(panel, buf);

        // Reserve the last line of inner area for the dismiss hint
        if inner.height < 2 {
            return;
        }
        let text_area = Rect::new(inner.x, inner.y, inner.width, inner.height - 1);
        let hint_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);

        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Rating    ", label),
                Span::styled(self.movie.rating_label(), value),
            ]),
            Line::from(vec![
                Span::styled("Released  ", label),
                Span::styled(
                    self.movie.release_date.clone().unwrap_or_else(|| "N/A".into()),
                    value,
                ),
            ]),
            Line::from(vec![
                Span::styled("Language  ", label),
                Span::styled(self.movie.original_language.as_str(), value),
            ]),
        ];
        if let Some(original) = self
            .movie
            .original_title
            .as_deref()
            .filter(|t| *t != self.movie.display_title())
        {
            lines.push(Line::from(vec![
                Span::styled("Original  ", label),
                Span::styled(original, value),
            ]));
        }
        if let Some(poster) = self.movie.poster_url(self.image_base) {
            lines.push(Line::from(vec![
                Span::styled("Poster    ", label),
                Span::styled(poster, Style::default().fg(Color::Blue)),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            self.movie
                .overview
                .as_deref()
                .filter(|o| !o.is_empty())
                .unwrap_or("No overview available."),
            value,
        )));

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(text_area, buf);

        let hint = Line::from(Span::styled(
            " Press Esc or Enter to close ",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        Paragraph::new(hint).render(hint_area, buf);
    }
}

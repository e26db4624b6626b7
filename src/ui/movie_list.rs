use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};

use crate::search::{SearchPhase, SearchState};
use crate::ui::movie_card::{CARD_HEIGHT, MovieCard};

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// The main result area: spinner while loading, the error text on failure,
/// otherwise a scrollable list of movie cards.
pub struct MovieListView<'a> {
    pub title: &'a str,
    pub state: &'a SearchState,
    pub spinner_frame: usize,
}

impl<'a> MovieListView<'a> {
    pub fn new(title: &'a str, state: &'a SearchState) -> Self {
        Self {
            title,
            state,
            spinner_frame: 0,
        }
    }

    pub fn spinner_frame(mut self, frame: usize) -> Self {
        self.spinner_frame = frame;
        self
    }
}

impl Widget for MovieListView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.title))
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width < 2 || inner.height == 0 {
            return;
        }

        let text_width = (inner.width - 1) as usize;
        match self.state.phase {
            SearchPhase::Loading => {
                let spinner = SPINNER[self.spinner_frame % SPINNER.len()];
                buf.set_stringn(
                    inner.x + 1,
                    inner.y,
                    format!("{spinner} Loading..."),
                    text_width,
                    Style::default().fg(Color::Yellow),
                );
                return;
            }
            SearchPhase::Error => {
                let msg = self.state.error.as_deref().unwrap_or_default();
                buf.set_stringn(
                    inner.x + 1,
                    inner.y,
                    msg,
                    text_width,
                    Style::default().fg(Color::Red),
                );
                return;
            }
            SearchPhase::Empty => {
                buf.set_stringn(
                    inner.x + 1,
                    inner.y,
                    "No movies found",
                    text_width,
                    Style::default().fg(Color::DarkGray),
                );
                return;
            }
            SearchPhase::Results => {}
        }

        let movies = &self.state.movies;
        let content_width = inner.width.saturating_sub(1); // 1 char left margin
        let row_height = CARD_HEIGHT + 1;
        let selected = self.state.selected;
        let scroll_start = compute_scroll_start(movies.len(), row_height, selected, inner.height);

        let mut y = inner.y;
        let mut idx = scroll_start;
        while idx < movies.len() && y < inner.y + inner.height {
            let remaining = inner.y + inner.height - y;
            let card_area = Rect::new(inner.x + 1, y, content_width, CARD_HEIGHT.min(remaining));

            MovieCard::new(&movies[idx])
                .selected(idx == selected)
                .render(card_area, buf);

            y += row_height.min(remaining);

            // Draw separator line
            if idx + 1 < movies.len() && remaining > CARD_HEIGHT {
                let sep = "\u{2500}".repeat(content_width as usize);
                buf.set_string(
                    inner.x + 1,
                    y.saturating_sub(1),
                    &sep,
                    Style::default().fg(Color::DarkGray),
                );
            }

            idx += 1;
        }
    }
}

/// First row index to draw so the selected row is fully visible.
fn compute_scroll_start(count: usize, row_height: u16, selected: usize, available: u16) -> usize {
    if count == 0 {
        return 0;
    }

    let selected = selected.min(count - 1);
    let visible = (available / row_height.max(1)).max(1) as usize;
    (selected + 1).saturating_sub(visible)
}

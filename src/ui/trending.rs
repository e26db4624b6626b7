use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};

use crate::api::types::TrendingEntry;

/// Most searched terms, ranked, one row each with the top movie's poster.
pub struct TrendingPanel<'a> {
    pub entries: &'a [TrendingEntry],
}

impl<'a> TrendingPanel<'a> {
    pub fn new(entries: &'a [TrendingEntry]) -> Self {
        Self { entries }
    }

    /// Rows needed to show every entry inside the border.
    pub fn height(entries: &[TrendingEntry]) -> u16 {
        if entries.is_empty() {
            0
        } else {
            entries.len() as u16 + 2
        }
    }
}

impl Widget for TrendingPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Trending Searches ")
            .title_style(
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::DarkGray));

        let rank_style = Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD);
        let term_style = Style::default().fg(Color::White);
        let count_style = Style::default().fg(Color::DarkGray);

        let lines: Vec<Line> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let poster = match entry.poster_url.as_deref() {
                    Some(url) => Span::styled(url, Style::default().fg(Color::Blue)),
                    None => Span::styled("no poster", count_style),
                };
                Line::from(vec![
                    Span::styled(format!("{}. ", i + 1), rank_style),
                    Span::styled(entry.search_term.as_str(), term_style),
                    Span::styled(format!(" ({})  ", searches_label(entry.count)), count_style),
                    poster,
                ])
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}

fn searches_label(count: u64) -> String {
    if count == 1 {
        "1 search".to_string()
    } else {
        format!("{count} searches")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pluralizes_counts() {
        assert_eq!(searches_label(1), "1 search");
        assert_eq!(searches_label(12), "12 searches");
    }

    #[test]
    fn renders_ranked_terms() {
        let entries = vec![
            TrendingEntry {
                id: "a".into(),
                search_term: "dune".into(),
                count: 9,
                movie_id: 438631,
                poster_url: Some("https://img/d.jpg".into()),
            },
            TrendingEntry {
                id: "b".into(),
                search_term: "up".into(),
                count: 1,
                movie_id: 14160,
                poster_url: None,
            },
        ];
        let area = Rect::new(0, 0, 60, TrendingPanel::height(&entries));
        let mut buf = Buffer::empty(area);
        TrendingPanel::new(&entries).render(area, &mut buf);
        assert_eq!(area.height, 4);
        let row = |y: u16| -> String { (0..60u16).map(|x| buf[(x, y)].symbol()).collect() };
        assert!(row(1).contains("1. dune (9 searches)  https://img/d.jpg"));
        assert!(row(2).contains("2. up (1 search)  no poster"));
    }

    #[test]
    fn empty_snapshot_takes_no_rows() {
        assert_eq!(TrendingPanel::height(&[]), 0);
    }
}

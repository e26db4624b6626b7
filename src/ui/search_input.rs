use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const PLACEHOLDER: &str = "Search through thousands of movies";

/// Report the edited text for a key press through `set`.
///
/// Returns `true` when the key edits text (and `set` was called), `false`
/// when the owner should route the key elsewhere.
pub fn handle_key(current: &str, key: KeyEvent, set: impl FnOnce(String)) -> bool {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('u') if ctrl => {
            set(String::new());
            true
        }
        KeyCode::Char(_) if ctrl || key.modifiers.contains(KeyModifiers::ALT) => false,
        KeyCode::Char(c) => {
            let mut next = current.to_string();
            next.push(c);
            set(next);
            true
        }
        KeyCode::Backspace => {
            let mut next = current.to_string();
            next.pop();
            set(next);
            true
        }
        _ => false,
    }
}

/// Bordered single-line search box with a cursor at the end.
pub struct SearchInput<'a> {
    pub text: &'a str,
    pub style: Style,
}

impl<'a> SearchInput<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            style: Style::default().fg(Color::White),
        }
    }
}

impl Widget for SearchInput<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 || inner.width == 0 {
            return;
        }

        let prompt = "> ";
        let max_width = inner.width as usize;
        if self.text.is_empty() {
            let (x, _) = buf.set_stringn(inner.x, inner.y, prompt, max_width, self.style);
            buf.set_stringn(
                x,
                inner.y,
                PLACEHOLDER,
                max_width.saturating_sub(prompt.width()),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            );
            return;
        }

        let display = format!("{prompt}{}\u{2588}", self.text);
        let visible = tail_fitting(&display, max_width);
        buf.set_stringn(inner.x, inner.y, visible, max_width, self.style);
    }
}

/// The longest suffix of `s` that fits in `max_width` terminal columns.
fn tail_fitting(s: &str, max_width: usize) -> &str {
    if s.width() <= max_width {
        return s;
    }
    let mut width = 0;
    let mut start = s.len();
    for (idx, c) in s.char_indices().rev() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        start = idx;
    }
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn edit(current: &str, key: KeyEvent) -> (bool, Option<String>) {
        let mut reported = None;
        let handled = handle_key(current, key, |v| reported = Some(v));
        (handled, reported)
    }

    #[test]
    fn typing_reports_raw_value() {
        assert_eq!(
            edit("the ", press(KeyCode::Char('t'))),
            (true, Some("the t".into()))
        );
    }

    #[test]
    fn backspace_reports_shortened_value() {
        assert_eq!(edit("héé", press(KeyCode::Backspace)), (true, Some("hé".into())));
        assert_eq!(edit("", press(KeyCode::Backspace)), (true, Some(String::new())));
    }

    #[test]
    fn ctrl_u_clears() {
        let key = KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(edit("alien", key), (true, Some(String::new())));
    }

    #[test]
    fn navigation_keys_are_not_handled() {
        for code in [KeyCode::Up, KeyCode::Down, KeyCode::Enter, KeyCode::Esc] {
            assert_eq!(edit("x", press(code)), (false, None));
        }
        let ctrl_n = KeyEvent::new(KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_eq!(edit("x", ctrl_n), (false, None));
    }

    #[test]
    fn shifted_characters_are_text() {
        let key = KeyEvent::new(KeyCode::Char('A'), KeyModifiers::SHIFT);
        assert_eq!(edit("", key), (true, Some("A".into())));
    }

    fn row(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width).map(|x| buf[(x, y)].symbol()).collect()
    }

    #[test]
    fn placeholder_stays_inside_the_border() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 3));
        SearchInput::new("").render(Rect::new(0, 0, 20, 3), &mut buf);
        let line = row(&buf, 1);
        assert!(line.starts_with("│> Search"));
        assert_eq!(buf[(19, 1)].symbol(), "│");
        assert_eq!(buf[(20, 1)].symbol(), " ");
    }

    #[test]
    fn long_text_keeps_cursor_inside_the_border() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 40, 3));
        SearchInput::new("the lord of the rings").render(Rect::new(0, 0, 12, 3), &mut buf);
        assert_eq!(buf[(11, 1)].symbol(), "│");
        assert_eq!(buf[(10, 1)].symbol(), "\u{2588}");
    }

    #[test]
    fn tail_fitting_respects_wide_chars() {
        assert_eq!(tail_fitting("abc", 5), "abc");
        assert_eq!(tail_fitting("abcdef", 3), "def");
        assert_eq!(tail_fitting("ab日本", 3), "本");
    }
}

//! # Composer Component
//!
//! The message input at the bottom of the chat column.
//!
//! ## Responsibilities
//!
//! - Multi-line editing (insert, paste, delete, cursor movement)
//! - Growing with its content up to `MAX_VISIBLE_LINES`, then scrolling
//! - Emitting `Submit` for non-blank text, unless the `disabled` prop is set
//!
//! Editing stays available while disabled so a follow-up can be drafted
//! while a reply is outstanding; only submission is held back.

mod layout;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use layout::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, cursor_position, inner_width, next_char_boundary,
    offset_at_column, prev_char_boundary, visual_lines,
};

pub const PLACEHOLDER: &str = "Type a command or ask a question...";

/// High-level events emitted by the Composer
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerEvent {
    Submit(String),
    ContentChanged,
}

pub struct Composer {
    /// Text buffer (internal state)
    pub buffer: String,
    /// Submission is blocked while set (prop)
    pub disabled: bool,
    /// Whether keyboard focus is here (prop)
    pub focused: bool,
    /// Cursor as a byte offset into `buffer`
    cursor: usize,
    /// First visible visual line
    scroll_offset: u16,
    /// Inner width from the last render, used for vertical movement
    last_width: u16,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            focused: true,
            cursor: 0,
            scroll_offset: 0,
            last_width: 76,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Rows needed for the current buffer at `area_width`, borders included.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let lines = visual_lines(&self.buffer, inner_width(area_width)).len() as u16;
        lines.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    /// Move the cursor one visual line up (`-1`) or down (`1`), keeping the
    /// display column where possible.
    fn move_vertically(&mut self, direction: isize) -> bool {
        let lines = visual_lines(&self.buffer, self.last_width);
        let (row, column) = cursor_position(&self.buffer, &lines, self.cursor);
        let Some(target) = row.checked_add_signed(direction).filter(|r| *r < lines.len()) else {
            return false;
        };
        self.cursor = offset_at_column(&self.buffer, &lines[target], column);
        true
    }

    /// Scroll just enough to keep the cursor row visible.
    fn follow_cursor(&mut self, cursor_row: u16, visible: u16) {
        if cursor_row < self.scroll_offset {
            self.scroll_offset = cursor_row;
        } else if cursor_row >= self.scroll_offset + visible {
            self.scroll_offset = cursor_row + 1 - visible;
        }
    }
}

impl Component for Composer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        self.last_width = width;

        let lines = visual_lines(&self.buffer, width);
        let (row, column) = cursor_position(&self.buffer, &lines, self.cursor);
        let visible = (lines.len() as u16).clamp(1, MAX_VISIBLE_LINES);
        self.scroll_offset = self
            .scroll_offset
            .min((lines.len() as u16).saturating_sub(visible));
        self.follow_cursor(row as u16, visible);

        let (title, border) = if self.disabled {
            (
                " Waiting for reply ",
                Style::default().fg(Color::DarkGray),
            )
        } else if self.focused {
            (" Message ", Style::default().fg(Color::Green))
        } else {
            (" Message ", Style::default().fg(Color::DarkGray))
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(title)
            .padding(Padding::horizontal(1));

        let body: Vec<Line> = if self.buffer.is_empty() {
            vec![Line::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )]
        } else {
            lines
                .iter()
                .skip(self.scroll_offset as usize)
                .take(visible as usize)
                .map(|range| Line::raw(&self.buffer[range.clone()]))
                .collect()
        };
        frame.render_widget(Paragraph::new(body).block(block), area);

        if self.focused {
            // border (1) + padding (1)
            let x = area.x + 2 + column.min(width.saturating_sub(1));
            let y = area.y + 1 + (row as u16).saturating_sub(self.scroll_offset);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for Composer {
    type Event = ComposerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let changed = match event {
            TuiEvent::InputChar(c) => {
                self.insert(c.encode_utf8(&mut [0; 4]));
                true
            }
            TuiEvent::Newline => {
                self.insert("\n");
                true
            }
            TuiEvent::Paste(text) => {
                // Normalise CRLF from some terminals
                self.insert(&text.replace("\r\n", "\n").replace('\r', "\n"));
                true
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                true
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                self.buffer.drain(self.cursor..next);
                true
            }
            TuiEvent::CursorLeft if self.cursor > 0 => {
                self.cursor = prev_char_boundary(&self.buffer, self.cursor);
                true
            }
            TuiEvent::CursorRight if self.cursor < self.buffer.len() => {
                self.cursor = next_char_boundary(&self.buffer, self.cursor);
                true
            }
            TuiEvent::CursorHome => {
                let start = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
                std::mem::replace(&mut self.cursor, start) != start
            }
            TuiEvent::CursorEnd => {
                let end = self.buffer[self.cursor..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor + i);
                std::mem::replace(&mut self.cursor, end) != end
            }
            TuiEvent::CursorUp => self.move_vertically(-1),
            TuiEvent::CursorDown => self.move_vertically(1),
            TuiEvent::Submit => {
                if self.disabled || self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll_offset = 0;
                return Some(ComposerEvent::Submit(text));
            }
            _ => false,
        };
        changed.then_some(ComposerEvent::ContentChanged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_text(composer: &mut Composer, text: &str) {
        for c in text.chars() {
            composer.handle_event(&TuiEvent::InputChar(c));
        }
    }

    fn rendered(composer: &mut Composer, width: u16) -> (String, ratatui::layout::Position) {
        let height = composer.calculate_height(width);
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| composer.render(f, f.area())).unwrap();
        let text = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        let cursor = terminal.get_cursor_position().unwrap();
        (text, cursor)
    }

    #[test]
    fn test_typing_and_backspace() {
        let mut composer = Composer::new();
        assert_eq!(
            composer.handle_event(&TuiEvent::InputChar('a')),
            Some(ComposerEvent::ContentChanged)
        );
        type_text(&mut composer, "bé");
        assert_eq!(composer.buffer, "abé");
        composer.handle_event(&TuiEvent::Backspace);
        assert_eq!(composer.buffer, "ab");
        assert_eq!(composer.cursor(), 2);
    }

    #[test]
    fn test_backspace_at_start_is_ignored() {
        let mut composer = Composer::new();
        assert_eq!(composer.handle_event(&TuiEvent::Backspace), None);
    }

    #[test]
    fn test_submit_takes_buffer() {
        let mut composer = Composer::new();
        type_text(&mut composer, "hello");
        assert_eq!(
            composer.handle_event(&TuiEvent::Submit),
            Some(ComposerEvent::Submit("hello".to_string()))
        );
        assert!(composer.buffer.is_empty());
        assert_eq!(composer.cursor(), 0);
    }

    #[test]
    fn test_blank_submit_is_ignored() {
        let mut composer = Composer::new();
        type_text(&mut composer, "   ");
        composer.handle_event(&TuiEvent::Newline);
        assert_eq!(composer.handle_event(&TuiEvent::Submit), None);
        assert_eq!(composer.buffer, "   \n");
    }

    #[test]
    fn test_disabled_blocks_submit_but_not_editing() {
        let mut composer = Composer::new();
        composer.disabled = true;
        type_text(&mut composer, "draft");
        assert_eq!(composer.handle_event(&TuiEvent::Submit), None);
        assert_eq!(composer.buffer, "draft");

        composer.disabled = false;
        assert_eq!(
            composer.handle_event(&TuiEvent::Submit),
            Some(ComposerEvent::Submit("draft".to_string()))
        );
    }

    #[test]
    fn test_newline_and_paste() {
        let mut composer = Composer::new();
        type_text(&mut composer, "one");
        composer.handle_event(&TuiEvent::Newline);
        composer.handle_event(&TuiEvent::Paste("two\r\nthree".to_string()));
        assert_eq!(composer.buffer, "one\ntwo\nthree");
        assert_eq!(composer.cursor(), composer.buffer.len());
    }

    #[test]
    fn test_home_end_stay_on_logical_line() {
        let mut composer = Composer::new();
        type_text(&mut composer, "ab");
        composer.handle_event(&TuiEvent::Newline);
        type_text(&mut composer, "cd");

        composer.handle_event(&TuiEvent::CursorHome);
        assert_eq!(composer.cursor(), 3);
        assert_eq!(composer.handle_event(&TuiEvent::CursorHome), None);
        composer.handle_event(&TuiEvent::CursorEnd);
        assert_eq!(composer.cursor(), 5);
    }

    #[test]
    fn test_vertical_movement_keeps_column() {
        let mut composer = Composer::new();
        type_text(&mut composer, "abcd");
        composer.handle_event(&TuiEvent::Newline);
        type_text(&mut composer, "ef");

        composer.handle_event(&TuiEvent::CursorUp);
        assert_eq!(composer.cursor(), 2);
        assert_eq!(composer.handle_event(&TuiEvent::CursorUp), None);
        composer.handle_event(&TuiEvent::CursorDown);
        assert_eq!(composer.cursor(), 7);
    }

    #[test]
    fn test_height_grows_then_caps() {
        let mut composer = Composer::new();
        assert_eq!(composer.calculate_height(40), 1 + VERTICAL_OVERHEAD);
        for _ in 0..3 {
            composer.handle_event(&TuiEvent::Newline);
        }
        assert_eq!(composer.calculate_height(40), 4 + VERTICAL_OVERHEAD);
        for _ in 0..20 {
            composer.handle_event(&TuiEvent::Newline);
        }
        assert_eq!(
            composer.calculate_height(40),
            MAX_VISIBLE_LINES + VERTICAL_OVERHEAD
        );
    }

    #[test]
    fn test_render_placeholder_when_empty() {
        let mut composer = Composer::new();
        let (text, cursor) = rendered(&mut composer, 50);
        assert!(text.contains(PLACEHOLDER));
        assert_eq!((cursor.x, cursor.y), (2, 1));
    }

    #[test]
    fn test_render_places_cursor_after_text() {
        let mut composer = Composer::new();
        type_text(&mut composer, "hi");
        composer.handle_event(&TuiEvent::Newline);
        type_text(&mut composer, "abc");
        let (text, cursor) = rendered(&mut composer, 40);
        assert!(text.contains("hi"));
        assert!(text.contains("abc"));
        assert_eq!((cursor.x, cursor.y), (5, 2));
    }

    #[test]
    fn test_render_scrolls_to_cursor() {
        let mut composer = Composer::new();
        for i in 0..10 {
            type_text(&mut composer, &format!("line{i}"));
            composer.handle_event(&TuiEvent::Newline);
        }
        type_text(&mut composer, "last");
        let (text, cursor) = rendered(&mut composer, 40);
        assert!(text.contains("last"));
        assert!(!text.contains("line0"));
        assert_eq!(cursor.y, MAX_VISIBLE_LINES);
    }

    #[test]
    fn test_disabled_title() {
        let mut composer = Composer::new();
        composer.disabled = true;
        let (text, _) = rendered(&mut composer, 50);
        assert!(text.contains("Waiting for reply"));
    }
}

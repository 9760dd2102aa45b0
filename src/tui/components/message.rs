use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::message::{self as core_message, Role};
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Borders (1 left + 1 right) plus padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Top and bottom borders.
const VERTICAL_OVERHEAD: u16 = 2;

/// A single transcript entry: bordered block titled with the speaker and
/// the time it was created.
///
/// User text is shown verbatim. Assistant replies go through the markdown
/// renderer. The connection error entry is drawn in red so it cannot be
/// mistaken for a reply.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub message: &'a core_message::Message,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a core_message::Message) -> Self {
        Self { message }
    }

    /// Rows this message occupies at `width`, borders included.
    ///
    /// Uses the same `Paragraph` configuration as rendering so the layout
    /// cache and the drawn output never disagree.
    pub fn calculate_height(message: &core_message::Message, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        let lines = paragraph(message).line_count(content_width);
        let lines = u16::try_from(lines).unwrap_or(u16::MAX);
        lines.max(1).saturating_add(VERTICAL_OVERHEAD)
    }
}

fn accent(message: &core_message::Message) -> Color {
    if message.is_error() {
        return Color::Red;
    }
    match message.role {
        Role::User => Color::Green,
        Role::Assistant => Color::Blue,
    }
}

fn content(message: &core_message::Message) -> Text<'static> {
    if message.is_error() {
        return Text::styled(
            message.content.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        );
    }
    match message.role {
        Role::User => Text::styled(message.content.clone(), Style::default().fg(Color::Green)),
        Role::Assistant => markdown::render(message.content.trim(), Color::Blue),
    }
}

fn paragraph(message: &core_message::Message) -> Paragraph<'static> {
    Paragraph::new(content(message)).wrap(Wrap { trim: false })
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let color = accent(self.message);
        let border_style = if self.message.is_error() {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };
        let time = self.message.timestamp.format("%H:%M").to_string();

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Line::styled(
                format!(" {} ", self.message.role.label()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ))
            .title(
                Line::styled(format!(" {time} "), Style::default().fg(Color::DarkGray))
                    .right_aligned(),
            )
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner = block.inner(area);
        block.render(area, buf);
        paragraph(self.message).render(inner, buf);
    }
}

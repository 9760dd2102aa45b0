//! # Landing Page Component
//!
//! Shown in place of the message list while the transcript is empty.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph, Wrap};

use crate::tui::component::Component;

/// Suggestions shown under the greeting: (title, description).
pub const QUICK_ACTIONS: [(&str, &str); 3] = [
    ("Accelerate Research", "Summarize papers and surface key findings"),
    ("Structure Data", "Turn loose notes into tables and outlines"),
    ("Generate Concepts", "Brainstorm directions for a new idea"),
];

pub struct LandingPage {
    /// Cards are dropped when the area is too small to fit them.
    pub show_actions: bool,
}

impl Default for LandingPage {
    fn default() -> Self {
        Self { show_actions: true }
    }
}

impl Component for LandingPage {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let heading = vec![
            Line::from(Span::styled(
                "Welcome to your Workspace",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Ask a question or start a flow below.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::DarkGray),
            )),
        ];

        let card_height = 4;
        let show_cards = self.show_actions && area.height >= heading.len() as u16 + 1 + card_height;
        let [heading_area, _, cards_area] = Layout::vertical([
            Constraint::Length(heading.len() as u16),
            Constraint::Length(1),
            Constraint::Length(if show_cards { card_height } else { 0 }),
        ])
        .flex(Flex::Center)
        .areas(area);

        frame.render_widget(
            Paragraph::new(heading).alignment(Alignment::Center),
            heading_area,
        );
        if !show_cards {
            return;
        }

        let columns = Layout::horizontal([Constraint::Max(28); QUICK_ACTIONS.len()])
            .flex(Flex::Center)
            .spacing(1)
            .split(cards_area);
        for ((title, description), column) in QUICK_ACTIONS.iter().zip(columns.iter()) {
            let card = Paragraph::new(Line::from(Span::styled(
                *description,
                Style::default().fg(Color::Gray),
            )))
            .wrap(Wrap { trim: true })
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(Span::styled(
                        format!(" {title} "),
                        Style::default().fg(Color::Cyan),
                    )),
            );
            frame.render_widget(card, *column);
        }
    }
}

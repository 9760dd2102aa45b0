//! # TitleBar Component
//!
//! Single-line header: app name, the session being viewed, the status
//! message, a spinner while a request is outstanding, and a "↓ New" marker
//! when the message list has content below the viewport.
//!
//! Stateless. All fields are props set by `ui::draw_ui` each frame.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub struct TitleBar {
    /// `None` until the backend assigns an id
    pub session_id: Option<String>,
    pub status_message: String,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(session_id: Option<String>, status_message: String, is_loading: bool) -> Self {
        Self {
            session_id,
            status_message,
            is_loading,
            spinner_frame: 0,
            has_unseen_content: false,
        }
    }

    fn line(&self) -> Line<'static> {
        let dim = Style::default().fg(Color::DarkGray);
        let session = match &self.session_id {
            Some(id) => format!("session {id}"),
            None => "new session".to_string(),
        };

        let mut spans = vec![
            Span::styled(
                "Aurora",
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(" · ", dim),
            Span::styled(session, dim),
        ];
        if self.is_loading {
            let frame = SPINNER[self.spinner_frame % SPINNER.len()];
            spans.push(Span::styled(" | ", dim));
            spans.push(Span::styled(frame, Style::default().fg(Color::Cyan)));
        }
        if !self.status_message.is_empty() {
            spans.push(Span::styled(" | ", dim));
            spans.push(Span::raw(self.status_message.clone()));
        }
        if self.has_unseen_content {
            spans.push(Span::styled(" | ", dim));
            spans.push(Span::styled("↓ New", Style::default().fg(Color::Yellow)));
        }
        Line::from(spans)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.line(), area);
    }
}

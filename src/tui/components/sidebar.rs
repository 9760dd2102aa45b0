//! # Sidebar Component
//!
//! Lists the backend's session groupings and lets the user open one.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SidebarState` lives in `TuiState` and is re-synced whenever the
//!   core's `SidebarData` changes
//! - `Sidebar` is created each frame with borrowed state and props
//!
//! Sections, in display order:
//!
//! | Section  | Source     | When empty             |
//! |----------|------------|------------------------|
//! | Library  | `recent`   | "No recent flows" line |
//! | Featured | `pinned`   | hidden                 |
//! | Archived | `archived` | hidden                 |

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::backend::SidebarData;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Library,
    Featured,
    Archived,
}

impl Section {
    pub fn heading(self) -> &'static str {
        match self {
            Section::Library => "Library",
            Section::Featured => "Featured",
            Section::Archived => "Archived",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub section: Section,
    pub session_id: String,
    pub title: String,
}

/// Events emitted by the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEvent {
    Load(String),
    CreateNew,
    Clear,
    Refresh,
    /// Hand focus back to the composer
    Dismiss,
}

/// Persistent sidebar state: flattened entries plus the selection.
#[derive(Debug, Default)]
pub struct SidebarState {
    pub entries: Vec<SidebarEntry>,
    pub selected: usize,
}

impl SidebarState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild entries from a fresh snapshot. The selection follows the
    /// previously selected session if it is still listed.
    pub fn sync(&mut self, data: &SidebarData) {
        let selected_id = self.selected_id().map(str::to_string);

        let groups = [
            (Section::Library, &data.recent),
            (Section::Featured, &data.pinned),
            (Section::Archived, &data.archived),
        ];
        self.entries = groups
            .into_iter()
            .flat_map(|(section, sessions)| {
                sessions.iter().map(move |s| SidebarEntry {
                    section,
                    session_id: s.session_id.clone(),
                    title: s.title.clone(),
                })
            })
            .collect();

        self.selected = selected_id
            .and_then(|id| self.entries.iter().position(|e| e.session_id == id))
            .unwrap_or_else(|| self.selected.min(self.entries.len().saturating_sub(1)));
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.entries
            .get(self.selected)
            .map(|e| e.session_id.as_str())
    }

    /// Display lines and the row index of the selected entry.
    pub fn lines(&self, current: Option<&str>, focused: bool, width: u16) -> (Vec<Line<'static>>, Option<usize>) {
        let mut lines = Vec::new();
        let mut selected_row = None;
        let title_width = (width as usize).saturating_sub(2);

        for section in [Section::Library, Section::Featured, Section::Archived] {
            let in_section: Vec<(usize, &SidebarEntry)> = self
                .entries
                .iter()
                .enumerate()
                .filter(|(_, e)| e.section == section)
                .collect();
            if in_section.is_empty() && section != Section::Library {
                continue;
            }

            if !lines.is_empty() {
                lines.push(Line::default());
            }
            lines.push(Line::styled(
                section.heading(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            ));
            if in_section.is_empty() {
                lines.push(Line::styled(
                    "  No recent flows",
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ));
                continue;
            }

            for (index, entry) in in_section {
                let is_current = current == Some(entry.session_id.as_str());
                let is_selected = index == self.selected;
                let marker = if is_current { "● " } else { "  " };

                let mut style = if is_current {
                    Style::default().fg(Color::Cyan)
                } else {
                    Style::default().fg(Color::Gray)
                };
                if is_selected && focused {
                    style = style.add_modifier(Modifier::REVERSED | Modifier::BOLD);
                }
                if is_selected {
                    selected_row = Some(lines.len());
                }

                lines.push(Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(truncate(&entry.title, title_width), style),
                ]));
            }
        }
        (lines, selected_row)
    }
}

impl EventHandler for SidebarState {
    type Event = SidebarEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp => {
                self.selected = self.selected.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                if self.selected + 1 < self.entries.len() {
                    self.selected += 1;
                }
                None
            }
            TuiEvent::CursorHome => {
                self.selected = 0;
                None
            }
            TuiEvent::CursorEnd => {
                self.selected = self.entries.len().saturating_sub(1);
                None
            }
            TuiEvent::Submit => self
                .selected_id()
                .map(|id| SidebarEvent::Load(id.to_string())),
            TuiEvent::InputChar('n') => Some(SidebarEvent::CreateNew),
            TuiEvent::InputChar('c') => Some(SidebarEvent::Clear),
            TuiEvent::InputChar('r') => Some(SidebarEvent::Refresh),
            TuiEvent::Escape => Some(SidebarEvent::Dismiss),
            _ => None,
        }
    }
}

/// Transient render wrapper.
pub struct Sidebar<'a> {
    pub state: &'a SidebarState,
    pub current_session_id: Option<&'a str>,
    pub focused: bool,
}

impl<'a> Component for Sidebar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(" Flows ");
        if self.focused {
            block = block.title_bottom(Line::from(" n new  c clear  r refresh ").centered());
        }

        let inner = block.inner(area);
        let (lines, selected_row) = self
            .state
            .lines(self.current_session_id, self.focused, inner.width);

        // Keep the selection on screen
        let scroll = selected_row
            .map(|row| (row as u16).saturating_sub(inner.height.saturating_sub(1)))
            .unwrap_or(0);

        frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
    }
}

/// Cut `title` to `max` display columns, ending in an ellipsis when cut.
fn truncate(title: &str, max: usize) -> String {
    if title.width() <= max {
        return title.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in title.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

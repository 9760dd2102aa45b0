//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! ## Responsibilities
//!
//! - Lay out messages inside a `ScrollView`
//! - Show a "thinking" row while a request is outstanding
//! - Decide whether new content should pull the view to the bottom
//! - Cache per-message heights
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the `Transcript` (props).
//!
//! ## Follow Rule
//!
//! When the content height changes, the view jumps to the newest entry if
//! any of these hold:
//!
//! - the user had not scrolled away (`stick_to_bottom`)
//! - the previous viewport bottom was within `tolerance` rows of the
//!   previous content end
//! - a request just started (the user sent something)
//!
//! Otherwise the scroll offset is left alone so reading older messages is
//! not interrupted.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::message::{Role, Transcript};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
/// Height of the placeholder shown while waiting for a reply.
const THINKING_HEIGHT: u16 = 3;

/// Whether the bottom of the viewport is within `tolerance` rows of the
/// content end.
pub fn is_near_bottom(offset: u16, content_height: u16, viewport_height: u16, tolerance: u16) -> bool {
    let viewport_bottom = offset.saturating_add(viewport_height);
    viewport_bottom.saturating_add(tolerance) >= content_height
}

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, new content scrolls the view to the bottom
    pub stick_to_bottom: bool,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
    /// Whether content exists below the viewport
    pub has_unseen_content: bool,
    /// Canvas height from the previous frame
    last_content_height: u16,
    /// Loading flag from the previous frame
    was_loading: bool,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            viewport_height: 0,
            has_unseen_content: false,
            last_content_height: 0,
            was_loading: false,
        }
    }

    fn max_offset(&self) -> u16 {
        self.last_content_height
            .saturating_sub(self.viewport_height)
    }

    /// Clamp the scroll offset to the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage follow mode once the user scrolls back to the end.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        if self.scroll_state.offset().y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }

    /// Apply the follow rule for a frame whose canvas is `content_height`
    /// rows tall.
    fn update_follow(&mut self, content_height: u16, is_loading: bool, tolerance: u16) {
        let loading_started = is_loading && !self.was_loading;
        let changed = content_height != self.last_content_height;

        if changed || loading_started {
            let near = is_near_bottom(
                self.scroll_state.offset().y,
                self.last_content_height,
                self.viewport_height,
                tolerance,
            );
            if self.stick_to_bottom || near || loading_started {
                self.stick_to_bottom = true;
            }
        }

        self.last_content_height = content_height;
        self.was_loading = is_loading;
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a Transcript,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub scroll_tolerance: u16,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a Transcript,
        is_loading: bool,
        spinner_frame: usize,
        scroll_tolerance: u16,
    ) -> Self {
        Self {
            state,
            transcript,
            is_loading,
            spinner_frame,
            scroll_tolerance,
        }
    }

    fn render_thinking(&self, scroll_view: &mut ScrollView, area: Rect) {
        let frame = SPINNER[self.spinner_frame % SPINNER.len()];
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Blue).add_modifier(Modifier::DIM))
            .title(Line::styled(
                format!(" {} ", Role::Assistant.label()),
                Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            ));
        let body = Paragraph::new(Line::from(vec![
            Span::styled(format!(" {frame} "), Style::default().fg(Color::Cyan)),
            Span::styled(
                "Thinking...",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(block);
        scroll_view.render_widget(body, area);
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar
        let messages = self.transcript.messages();

        // 1. Layout cache
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(
            messages.len(),
            self.transcript.first_id(),
            content_width,
        );
        layout.heights.truncate(reusable);
        for message in messages.iter().skip(layout.heights.len()) {
            layout
                .heights
                .push(Message::calculate_height(message, content_width));
        }
        layout.rebuild_prefix_heights();
        layout.update_key(messages.len(), self.transcript.first_id(), content_width);

        let messages_height = layout.total_height();
        let thinking_height = if self.is_loading { THINKING_HEIGHT } else { 0 };
        let total_height = messages_height.saturating_add(thinking_height);

        // 2. Follow decision against the previous frame's geometry
        self.state
            .update_follow(total_height, self.is_loading, self.scroll_tolerance);
        self.state.viewport_height = area.height;
        if self.state.stick_to_bottom {
            // Target this frame's canvas; ScrollViewState only knows last frame's size
            self.state.scroll_state.set_offset(Position {
                x: 0,
                y: total_height.saturating_sub(area.height),
            });
        } else {
            self.state.clamp_scroll();
        }

        // 3. Render the visible window
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let scroll_offset = self.state.scroll_state.offset().y;
        let visible = self.state.layout.visible_range(scroll_offset, area.height);
        for i in visible {
            let top = self.state.layout.top_of(i);
            let height = self.state.layout.heights[i];
            scroll_view.render_widget(
                Message::new(&messages[i]),
                Rect::new(0, top, content_width, height),
            );
        }
        if self.is_loading {
            self.render_thinking(
                &mut scroll_view,
                Rect::new(0, messages_height, content_width, THINKING_HEIGHT),
            );
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

        let offset = self.state.scroll_state.offset().y;
        self.state.has_unseen_content = offset < total_height.saturating_sub(area.height);
    }
}

/// Scroll handling lives on the persistent state; the list emits nothing.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollToBottom => {
                self.stick_to_bottom = true;
                self.scroll_state.scroll_to_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached message heights.
///
/// Transcript entries never change once appended, so heights stay valid
/// as long as the width is the same and the transcript was not cleared or
/// replaced (detected through the first message id and a shrinking length).
#[derive(Default)]
pub struct LayoutCache {
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    message_count: usize,
    first_id: Option<String>,
    content_width: u16,
}

impl LayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reusable_count(&self, message_count: usize, first_id: Option<&str>, content_width: u16) -> usize {
        if self.content_width != content_width
            || self.first_id.as_deref() != first_id
            || message_count < self.message_count
        {
            return 0;
        }
        self.heights.len().min(message_count)
    }

    pub fn update_key(&mut self, message_count: usize, first_id: Option<&str>, content_width: u16) {
        self.message_count = message_count;
        self.first_id = first_id.map(str::to_string);
        self.content_width = content_width;
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Canvas row where message `index` starts.
    pub fn top_of(&self, index: usize) -> u16 {
        if index == 0 {
            0
        } else {
            self.prefix_heights[index - 1]
        }
    }

    /// Messages intersecting the viewport, padded by half a screen each way.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> std::ops::Range<usize> {
        let buffer = viewport_height / 2;
        let from = scroll_offset.saturating_sub(buffer);
        let to = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self.prefix_heights.partition_point(|&end| end <= from);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < to)
            .saturating_add(1)
            .min(self.prefix_heights.len());
        start..end.max(start)
    }
}

use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Props are plain struct fields set by the parent before each draw. The
/// `&mut self` receiver lets stateful components update caches (layout
/// heights, scroll offsets) while they render.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that turns low-level terminal events into intents.
pub trait EventHandler {
    /// The intent this component emits upward.
    type Event;

    /// Returns `Some` only when the parent has to act on the event.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}

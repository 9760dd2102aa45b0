//! # Application State
//!
//! The session view state, all in one place. No TUI types live here;
//! presentation state (scroll offsets, composer draft) is in the `tui` module.
//!
//! ```text
//! App
//! ├── current_session_id: Option<String>  // None = not yet identified
//! ├── transcript: Transcript              // append-only message log
//! ├── sidebar: SidebarData                // recent / pinned / archived
//! ├── status_message: String              // title bar text
//! └── requests: RequestTracker            // tickets, loading signal
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::backend::SidebarData;
use crate::core::message::Transcript;
use crate::core::request::RequestTracker;

pub struct App {
    pub current_session_id: Option<String>,
    pub transcript: Transcript,
    pub sidebar: SidebarData,
    pub status_message: String,
    pub requests: RequestTracker,
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl App {
    pub fn new() -> Self {
        Self {
            current_session_id: None,
            transcript: Transcript::new(),
            sidebar: SidebarData::default(),
            status_message: String::from("Welcome to Aurora!"),
            requests: RequestTracker::new(),
        }
    }

    /// True while a request belonging to the current view is outstanding.
    pub fn is_loading(&self) -> bool {
        self.requests.is_busy()
    }

    pub fn is_current_session(&self, id: &str) -> bool {
        self.current_session_id.as_deref() == Some(id)
    }
}

//! # TUI Components
//!
//! Two patterns, matching how much state a component needs:
//!
//! ### Stateless (props only)
//!
//! - `TitleBar`: header line with session id, status and spinner
//! - `Message`: one transcript entry
//! - `LandingPage`: greeting shown while the transcript is empty
//!
//! ### Persistent state + transient wrapper
//!
//! - `MessageListState` / `MessageList`: scrollable transcript
//! - `SidebarState` / `Sidebar`: session groupings
//! - `Composer`: owns its buffer; `disabled`/`focused` are props
//!
//! Props are plain fields set by `ui::draw_ui` each frame, never reads of
//! global state:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(app.current_session_id.clone(), app.status_message.clone(), app.is_loading());
//! title_bar.render(frame, area);
//! ```

pub mod composer;
pub mod landing;
pub mod message;
pub mod message_list;
pub mod sidebar;
mod title_bar;

pub use composer::{Composer, ComposerEvent};
pub use landing::LandingPage;
pub use message_list::{MessageList, MessageListState};
pub use sidebar::{Sidebar, SidebarEvent, SidebarState};
pub use title_bar::TitleBar;

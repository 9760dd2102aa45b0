//! # Backend
//!
//! Everything that talks to the remote chat service. The rest of the crate
//! only sees the [`ChatBackend`] trait and the wire types in [`types`].

pub mod client;
pub mod http;
pub mod types;

pub use client::{BackendError, ChatBackend};
pub use http::HttpBackend;
pub use types::{ChatRequest, ChatResponse, HistoryEntry, SessionSummary, SidebarData};

use std::fmt;

use async_trait::async_trait;

use super::types::{ChatRequest, ChatResponse, HistoryEntry, SidebarData};

/// Errors that can occur while talking to the chat backend.
///
/// Every call site treats these the same way (log, then ignore or show the
/// generic connection error), but the variants keep the log lines useful.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Transport failure: connection refused, DNS, timeout.
    Network(String),
    /// The backend answered with a non-success status.
    Api { status: u16, message: String },
    /// The body was not the JSON shape we expected.
    Parse(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "backend error (HTTP {status}): {message}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The four calls the client makes against the session backend.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns a short name for logging.
    fn name(&self) -> &str;

    /// `POST /new_chat`. `None` when the backend answered without an id.
    async fn create_session(&self) -> Result<Option<String>, BackendError>;

    /// `GET /get_sidebar_data`.
    async fn fetch_sidebar(&self) -> Result<SidebarData, BackendError>;

    /// `GET /get_chat_history?session_id=<id>`, in transcript order.
    async fn fetch_history(&self, session_id: &str) -> Result<Vec<HistoryEntry>, BackendError>;

    /// `POST /chat`.
    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError>;
}

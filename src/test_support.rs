//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::backend::{
    BackendError, ChatBackend, ChatRequest, ChatResponse, HistoryEntry, SidebarData,
};
use crate::core::state::App;

/// A backend that answers every call with an empty success.
pub struct NoopBackend;

#[async_trait]
impl ChatBackend for NoopBackend {
    fn name(&self) -> &str {
        "noop"
    }

    async fn create_session(&self) -> Result<Option<String>, BackendError> {
        Ok(None)
    }

    async fn fetch_sidebar(&self) -> Result<SidebarData, BackendError> {
        Ok(SidebarData::default())
    }

    async fn fetch_history(&self, _session_id: &str) -> Result<Vec<HistoryEntry>, BackendError> {
        Ok(vec![])
    }

    async fn send_message(&self, _request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        Ok(ChatResponse::default())
    }
}

/// A backend with canned answers that records what it was asked.
pub struct StubBackend {
    pub session_id: Option<String>,
    pub sidebar: SidebarData,
    pub history: Vec<HistoryEntry>,
    pub reply: Result<ChatResponse, BackendError>,
    pub sidebar_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub sent: Mutex<Vec<Option<String>>>,
}

impl Default for StubBackend {
    fn default() -> Self {
        Self {
            session_id: None,
            sidebar: SidebarData::default(),
            history: vec![],
            reply: Ok(ChatResponse::default()),
            sidebar_calls: AtomicUsize::new(0),
            history_calls: AtomicUsize::new(0),
            sent: Mutex::new(vec![]),
        }
    }
}

impl StubBackend {
    pub fn sidebar_calls(&self) -> usize {
        self.sidebar_calls.load(Ordering::SeqCst)
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }

    /// Session ids of every `send_message` call, in order.
    pub fn sent(&self) -> Vec<Option<String>> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }

    async fn create_session(&self) -> Result<Option<String>, BackendError> {
        Ok(self.session_id.clone())
    }

    async fn fetch_sidebar(&self) -> Result<SidebarData, BackendError> {
        self.sidebar_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.sidebar.clone())
    }

    async fn fetch_history(&self, _session_id: &str) -> Result<Vec<HistoryEntry>, BackendError> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.history.clone())
    }

    async fn send_message(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        self.sent.lock().unwrap().push(request.session_id.clone());
        self.reply.clone()
    }
}

/// Creates a fresh App for reducer tests.
pub fn test_app() -> App {
    App::new()
}

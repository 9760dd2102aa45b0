//! # Effect Driver
//!
//! Turns the reducer's [`Effect`]s into backend calls and their results
//! back into [`Action`]s. The TUI spawns [`perform`] per effect and feeds
//! the results through its channel; [`SessionController`] runs the same loop
//! inline, which makes whole user flows testable against a mock server.

use std::sync::Arc;

use futures::future::join_all;
use log::debug;

use crate::backend::ChatBackend;
use crate::core::action::{Action, Effect, update};
use crate::core::state::App;

/// Perform one effect against the backend. Returns the completion action,
/// or `None` for effects that have no backend call.
pub async fn perform(backend: &dyn ChatBackend, effect: Effect) -> Option<Action> {
    match effect {
        Effect::FetchSidebar(request) => Some(Action::SidebarLoaded {
            request,
            result: backend.fetch_sidebar().await,
        }),
        Effect::CreateSession(ticket) => Some(Action::SessionCreated {
            ticket,
            result: backend.create_session().await,
        }),
        Effect::FetchHistory { ticket, session_id } => Some(Action::HistoryLoaded {
            ticket,
            result: backend.fetch_history(&session_id).await,
        }),
        Effect::SendMessage { ticket, request } => Some(Action::ReplyReceived {
            ticket,
            result: backend.send_message(&request).await,
        }),
        Effect::Quit => None,
    }
}

/// Owns the view state and drives each operation to completion.
///
/// Each method applies its action, performs the resulting effects
/// concurrently, and keeps reconciling until no effects remain.
pub struct SessionController {
    app: App,
    backend: Arc<dyn ChatBackend>,
}

impl SessionController {
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            app: App::new(),
            backend,
        }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    /// Apply an action and settle every effect it causes. Returns `true`
    /// if a quit was requested along the way.
    pub async fn dispatch(&mut self, action: Action) -> bool {
        let mut quit = false;
        let mut pending = update(&mut self.app, action);

        while !pending.is_empty() {
            let (quits, calls): (Vec<Effect>, Vec<Effect>) = pending
                .drain(..)
                .partition(|effect| matches!(effect, Effect::Quit));
            quit |= !quits.is_empty();

            debug!("Performing {} effects", calls.len());
            let backend = self.backend.as_ref();
            let completions = join_all(calls.into_iter().map(|effect| perform(backend, effect))).await;

            for action in completions.into_iter().flatten() {
                pending.extend(update(&mut self.app, action));
            }
        }
        quit
    }

    pub async fn refresh_sidebar(&mut self) {
        self.dispatch(Action::RefreshSidebar).await;
    }

    pub async fn start_new_session(&mut self) {
        self.dispatch(Action::NewSession).await;
    }

    pub async fn load_session(&mut self, id: impl Into<String>) {
        self.dispatch(Action::LoadSession(id.into())).await;
    }

    pub async fn send_message(&mut self, text: impl Into<String>) {
        self.dispatch(Action::Submit(text.into())).await;
    }

    pub async fn clear_view(&mut self) {
        self.dispatch(Action::ClearView).await;
    }
}

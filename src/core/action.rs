//! # Actions
//!
//! Everything that can happen in Aurora becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! Backend answers? That's `Action::ReplyReceived { ticket, result }`.
//!
//! The `update()` function applies an action to the state and returns the
//! effects (backend calls) the adapter must perform. No I/O happens here;
//! each effect comes back later as another action.
//!
//! ```text
//! State + Action  →  update()  →  New State + Vec<Effect>
//!                                          │
//!                  adapter performs effect ┘→ completion Action → update()
//! ```
//!
//! Local changes are applied before the backend is asked (optimistic), and
//! completions are reconciled only if their ticket is still current (see
//! `core::request`).

use log::{debug, info, warn};

use crate::backend::{BackendError, ChatRequest, ChatResponse, HistoryEntry, SidebarData};
use crate::core::message::{Message, Role};
use crate::core::request::{RequestId, Ticket};
use crate::core::state::App;

#[derive(Debug)]
pub enum Action {
    /// Re-fetch the sidebar groupings.
    RefreshSidebar,
    SidebarLoaded {
        request: RequestId,
        result: Result<SidebarData, BackendError>,
    },
    /// Start a fresh session.
    NewSession,
    SessionCreated {
        ticket: Ticket,
        result: Result<Option<String>, BackendError>,
    },
    /// Switch the view to an existing session.
    LoadSession(String),
    HistoryLoaded {
        ticket: Ticket,
        result: Result<Vec<HistoryEntry>, BackendError>,
    },
    /// Send the user's text.
    Submit(String),
    ReplyReceived {
        ticket: Ticket,
        result: Result<ChatResponse, BackendError>,
    },
    /// Empty the message log locally.
    ClearView,
    Quit,
}

/// Work for the adapter. Each variant maps to one backend call, except `Quit`.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    FetchSidebar(RequestId),
    CreateSession(Ticket),
    FetchHistory { ticket: Ticket, session_id: String },
    SendMessage { ticket: Ticket, request: ChatRequest },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Vec<Effect> {
    match action {
        Action::RefreshSidebar => vec![fetch_sidebar(app)],

        Action::SidebarLoaded { request, result } => {
            match result {
                Ok(data) => {
                    if app.requests.accept_sidebar(request) {
                        debug!("Sidebar updated: {} sessions", data.len());
                        app.sidebar = data;
                    } else {
                        debug!("Discarding stale sidebar snapshot {:?}", request);
                    }
                }
                Err(e) => warn!("Sidebar fetch failed: {}", e),
            }
            vec![]
        }

        Action::NewSession => {
            app.requests.supersede();
            app.transcript.clear();
            app.status_message = "Starting new session...".to_string();
            vec![Effect::CreateSession(app.requests.begin())]
        }

        Action::SessionCreated { ticket, result } => {
            if !app.requests.finish(ticket) {
                debug!("Discarding superseded session creation {:?}", ticket.id);
                return vec![];
            }
            match result {
                Ok(id) => {
                    let id = id.filter(|id| !id.is_empty());
                    info!("New session: {:?}", id);
                    app.current_session_id = id;
                    app.status_message = "New session".to_string();
                    vec![fetch_sidebar(app)]
                }
                Err(e) => {
                    // The log is already empty; the next send lets the
                    // backend assign an id instead.
                    warn!("Session creation failed: {}", e);
                    app.current_session_id = None;
                    app.status_message.clear();
                    vec![]
                }
            }
        }

        Action::LoadSession(id) => {
            if app.is_current_session(&id) {
                return vec![];
            }
            info!("Loading session {}", id);
            app.requests.supersede();
            app.transcript.clear();
            app.current_session_id = Some(id.clone());
            app.status_message = "Loading session...".to_string();
            let ticket = app.requests.begin();
            vec![
                Effect::FetchHistory {
                    ticket,
                    session_id: id,
                },
                fetch_sidebar(app),
            ]
        }

        Action::HistoryLoaded { ticket, result } => {
            if !app.requests.finish(ticket) {
                debug!("Discarding superseded history {:?}", ticket.id);
                return vec![];
            }
            match result {
                Ok(entries) => {
                    let total = entries.len();
                    let messages: Vec<Message> = entries
                        .into_iter()
                        .enumerate()
                        .filter_map(|(index, entry)| {
                            Role::from_wire(&entry.role)
                                .map(|role| Message::from_history(index, role, entry.content))
                        })
                        .collect();
                    if messages.len() < total {
                        debug!(
                            "Skipped {} history entries with unsupported roles",
                            total - messages.len()
                        );
                    }
                    app.status_message = format!("Loaded {} messages", messages.len());
                    app.transcript.replace(messages);
                }
                Err(e) => {
                    warn!("History fetch failed: {}", e);
                    app.status_message.clear();
                }
            }
            vec![]
        }

        Action::Submit(text) => {
            if text.trim().is_empty() {
                return vec![];
            }
            app.transcript.push(Message::user(text.clone()));
            app.status_message = "Thinking...".to_string();
            let ticket = app.requests.begin();
            vec![Effect::SendMessage {
                ticket,
                request: ChatRequest {
                    message: text,
                    session_id: app.current_session_id.clone(),
                },
            }]
        }

        Action::ReplyReceived { ticket, result } => {
            if !app.requests.finish(ticket) {
                debug!("Discarding reply for a view that is gone {:?}", ticket.id);
                // The backend still recorded the exchange.
                return match result {
                    Ok(_) => vec![fetch_sidebar(app)],
                    Err(_) => vec![],
                };
            }
            match result {
                Ok(response) => {
                    if let Some(reply) = response.reply.filter(|r| !r.is_empty()) {
                        app.transcript.push(Message::assistant(reply));
                    }
                    if let Some(id) = response.session_id.filter(|id| !id.is_empty())
                        && !app.is_current_session(&id)
                    {
                        info!("Backend assigned session {}", id);
                        app.current_session_id = Some(id);
                    }
                    app.status_message.clear();
                    vec![fetch_sidebar(app)]
                }
                Err(e) => {
                    warn!("Send failed: {}", e);
                    app.transcript.push(Message::connection_error());
                    app.status_message.clear();
                    vec![]
                }
            }
        }

        Action::ClearView => {
            app.transcript.clear();
            app.status_message = "View cleared".to_string();
            vec![]
        }

        Action::Quit => vec![Effect::Quit],
    }
}

fn fetch_sidebar(app: &mut App) -> Effect {
    Effect::FetchSidebar(app.requests.begin_sidebar())
}

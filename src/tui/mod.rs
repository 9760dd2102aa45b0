//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into `core::Action` values.
//!
//! Effects returned by the reducer are each spawned as a tokio task; the
//! task sends its completion action back over an `mpsc` channel that the
//! event loop drains between frames. The reducer's request tickets decide
//! whether a completion still applies, so the loop never has to cancel or
//! order tasks itself.
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinners move.
//! - **Idle**: waits up to 250ms for input and redraws only when
//!   something arrived.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::backend::{ChatBackend, HttpBackend};
use crate::controller::perform;
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    Composer, ComposerEvent, MessageListState, SidebarEvent, SidebarState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which pane receives editing and navigation keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Composer,
    Sidebar,
}

/// TUI-specific presentation state (not part of core view state)
pub struct TuiState {
    pub message_list: MessageListState,
    pub composer: Composer,
    pub sidebar: SidebarState,
    pub focus: Focus,
    pub show_sidebar: bool,
    pub sidebar_width: u16,
    pub scroll_tolerance: u16,
}

impl TuiState {
    pub fn new(show_sidebar: bool, sidebar_width: u16, scroll_tolerance: u16) -> Self {
        Self {
            message_list: MessageListState::new(),
            composer: Composer::new(),
            sidebar: SidebarState::new(),
            focus: Focus::Composer, // User expects to type immediately
            show_sidebar,
            sidebar_width,
            scroll_tolerance,
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        Self::new(
            config.show_sidebar,
            config.sidebar_width,
            config.scroll_tolerance,
        )
    }

    pub fn toggle_sidebar(&mut self) {
        self.show_sidebar = !self.show_sidebar;
        if !self.show_sidebar {
            self.focus = Focus::Composer;
        }
    }

    /// Tab: alternate panes. Opens the sidebar if it was hidden.
    pub fn switch_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Composer => {
                self.show_sidebar = true;
                Focus::Sidebar
            }
            Focus::Sidebar => Focus::Composer,
        };
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter arrive as a distinct key;
        // terminals without it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let backend: Arc<dyn ChatBackend> = Arc::new(HttpBackend::new(
        config.base_url.clone(),
        config.request_timeout,
    ));
    info!("Using {} backend at {}", backend.name(), config.base_url);

    let mut app = App::new();
    let mut tui = TuiState::from_config(&config);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = match TerminalModeGuard::new() {
        Ok(guard) => Some(guard),
        Err(e) => {
            warn!("Failed to enable terminal modes: {}", e);
            None
        }
    };

    // Completions from backend tasks
    let (tx, rx) = mpsc::channel();

    let mut should_quit = dispatch(&mut app, &mut tui, Action::RefreshSidebar, &backend, &tx);

    let start_time = Instant::now();
    let mut needs_redraw = true;

    while !should_quit {
        let animating = app.is_loading();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(250)
        };

        // First event + everything already queued, before the next draw
        let first_event = poll_event_timeout(timeout);
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            needs_redraw = true;
            if handle_event(&mut app, &mut tui, event, &backend, &tx) {
                should_quit = true;
                break;
            }
        }

        while !should_quit && let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            should_quit = dispatch(&mut app, &mut tui, action, &backend, &tx);
        }
    }

    info!("Aurora shutting down");
    ratatui::restore();
    Ok(())
}

/// Route one terminal event. Returns `true` when the app should quit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    backend: &Arc<dyn ChatBackend>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    // Keep the prop current for events arriving between frames
    tui.composer.disabled = app.is_loading();

    let action = match event {
        TuiEvent::Resize => None,
        TuiEvent::ForceQuit => Some(Action::Quit),
        TuiEvent::NewSession => Some(Action::NewSession),
        TuiEvent::ClearView => Some(Action::ClearView),
        TuiEvent::RefreshSidebar => Some(Action::RefreshSidebar),
        TuiEvent::ToggleSidebar => {
            tui.toggle_sidebar();
            None
        }
        TuiEvent::SwitchFocus => {
            tui.switch_focus();
            None
        }
        TuiEvent::ScrollUp
        | TuiEvent::ScrollDown
        | TuiEvent::ScrollPageUp
        | TuiEvent::ScrollPageDown
        | TuiEvent::ScrollToBottom => {
            tui.message_list.handle_event(&event);
            None
        }
        _ => match tui.focus {
            Focus::Sidebar => match tui.sidebar.handle_event(&event) {
                None => None,
                Some(SidebarEvent::Load(id)) => {
                    tui.focus = Focus::Composer;
                    Some(Action::LoadSession(id))
                }
                Some(SidebarEvent::CreateNew) => {
                    tui.focus = Focus::Composer;
                    Some(Action::NewSession)
                }
                Some(SidebarEvent::Clear) => Some(Action::ClearView),
                Some(SidebarEvent::Refresh) => Some(Action::RefreshSidebar),
                Some(SidebarEvent::Dismiss) => {
                    tui.focus = Focus::Composer;
                    None
                }
            },
            Focus::Composer => match tui.composer.handle_event(&event) {
                Some(ComposerEvent::Submit(text)) => Some(Action::Submit(text)),
                Some(ComposerEvent::ContentChanged) | None => None,
            },
        },
    };

    action.is_some_and(|action| dispatch(app, tui, action, backend, tx))
}

/// Apply an action, spawn its backend effects, and keep the presentation
/// state in step. Returns `true` if the reducer asked to quit.
fn dispatch(
    app: &mut App,
    tui: &mut TuiState,
    action: Action,
    backend: &Arc<dyn ChatBackend>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    let generation = app.requests.generation();
    let effects = update(app, action);

    // New view: drop scroll position and cached layout
    if app.requests.generation() != generation || app.transcript.is_empty() {
        tui.message_list = MessageListState::new();
    }
    tui.sidebar.sync(&app.sidebar);

    let mut quit = false;
    for effect in effects {
        if effect == Effect::Quit {
            quit = true;
        } else {
            spawn_effect(effect, backend.clone(), tx.clone());
        }
    }
    quit
}

fn spawn_effect(effect: Effect, backend: Arc<dyn ChatBackend>, tx: mpsc::Sender<Action>) {
    debug!("Spawning effect: {:?}", effect);
    tokio::spawn(async move {
        if let Some(action) = perform(backend.as_ref(), effect).await
            && tx.send(action).is_err()
        {
            warn!("Failed to deliver backend completion: receiver dropped");
        }
    });
}

//! # Core Application Logic
//!
//! The session view controller, with no knowledge of any UI technology or
//! transport. State lives in [`state`], every change goes through
//! [`action::update`], and backend work leaves the core as an [`action::Effect`].
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • App (view state)     │
//!                    │  • Action (intents and  │
//!                    │    completions)         │
//!                    │  • update() → Effects   │
//!                    │                         │
//!                    │  No I/O. No UI. Pure.   │
//!                    └───────────┬─────────────┘
//!                                │
//!                ┌───────────────┴───────────────┐
//!                ▼                               ▼
//!         ┌────────────┐                  ┌────────────┐
//!         │    TUI     │                  │  Headless  │
//!         │  Adapter   │                  │ Controller │
//!         │ (ratatui)  │                  │  (tests)   │
//!         └────────────┘                  └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all view state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`message`]: Messages and the append-only transcript
//! - [`request`]: Request tickets that order backend completions
//! - [`config`]: Layered configuration

pub mod action;
pub mod config;
pub mod message;
pub mod request;
pub mod state;

//! Policy Keeper - terminal client for a household insurance-policy manager
//!
//! The crate talks to an existing backend REST API and presents its pages
//! (dashboard, family members, policies, issue matching, AI assistant chat and
//! API configuration) in a terminal UI. The structured part is the AI assistant:
//!
//! - Listing, creating and selecting conversations
//! - Sending messages with an optimistic pending row, keeping the draft on failure
//! - Discarding stale responses with request tickets
//!
//! State changes go through [`state::AppState::update`], which returns the API
//! calls to perform as [`state::Command`]s; the TUI executes them on a tokio
//! runtime and feeds the outcomes back as [`state::Msg`]s.
//!
//! # Example
//!
//! ```
//! use policy_keeper::state::{AppState, Command};
//!
//! let mut state = AppState::default();
//! let commands = state.start("chat");
//! assert_eq!(commands[0], Command::CheckHealth);
//! assert!(matches!(commands[1], Command::FetchConfigStatus { .. }));
//! ```

pub mod api;
pub mod chat;
pub mod cli;
pub mod clipboard;
pub mod logging;
pub mod models;
pub mod router;
pub mod settings;
pub mod state;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use api::{ApiClient, ApiError};
pub use chat::ConversationStore;
pub use models::{Conversation, ConversationId, Message, Role};
pub use router::{Page, Router};
pub use state::{AppState, Command, Msg};

//! Conversation flow: the cached conversation list, the current selection, the
//! displayed message panel and the composer.

pub mod filter;
pub mod store;

pub use filter::filter_conversations;
pub use store::{
    ConversationStore, CreateOutcome, DEFAULT_CONVERSATION_TITLE, ListStatus, Outgoing,
    PanelStatus, SendOutcome,
};

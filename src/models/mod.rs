//! Data models exchanged with the policy backend.
//!
//! - [`Conversation`] - Conversation summary shown in the chat sidebar
//! - [`Message`] - One turn of a conversation, authored by the user or the assistant
//! - [`MessagesPage`] - A conversation together with its full message list
//! - [`ApiConfig`] / [`ConfigStatus`] - AI provider configuration stored by the backend
//!
//! Timestamps and conversation ids are tolerant of the shapes the backend emits;
//! see the `deserializers` module.

pub mod config;
pub mod conversation;
pub mod deserializers;

pub use config::{ApiConfig, ConfigStatus};
pub use conversation::{
    Conversation, ConversationId, Message, MessagesPage, NewConversation, NewMessage, Role,
};

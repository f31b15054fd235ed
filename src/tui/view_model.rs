//! Typed display rows for the chat page.
//!
//! Rendering never formats server data directly: conversations and messages are
//! first turned into the view types below, with terminal control sequences stripped
//! and timestamps resolved against a fixed `now`. The renderer only lays them out.

use chrono::{DateTime, Utc};
use ratatui::text::Span;

use super::timestamps::format_timestamp_at;
use crate::chat::Outgoing;
use crate::models::{Conversation, ConversationId, Message, Role};
use crate::utils::{sanitize_server_text, single_line};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub role: Role,
    pub avatar: &'static str,
    pub author: &'static str,
    pub lines: Vec<String>,
    pub time: String,
    /// Sent but not yet confirmed by the server
    pub pending: bool,
}

impl MessageView {
    fn new(role: Role, content: &str, time: String, pending: bool) -> Self {
        let (avatar, author) = match role {
            Role::User => ("👤", "You"),
            Role::Assistant => ("🤖", "AI Assistant"),
        };
        let lines = sanitize_server_text(content).split('\n').map(str::to_string).collect();
        Self { role, avatar, author, lines, time, pending }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationItem {
    pub id: ConversationId,
    pub title: String,
    pub time: String,
    pub active: bool,
}

/// Message rows for the panel, followed by the outgoing message if there is one
pub fn message_views(
    messages: &[Message],
    outgoing: Option<&Outgoing>,
    now: &DateTime<Utc>,
) -> Vec<MessageView> {
    let mut views: Vec<MessageView> = messages
        .iter()
        .map(|m| {
            MessageView::new(m.role, &m.content, format_timestamp_at(&m.created_at, now), false)
        })
        .collect();

    if let Some(outgoing) = outgoing {
        let time = if outgoing.delivered { "just now" } else { "sending..." };
        views.push(MessageView::new(
            Role::User,
            &outgoing.content,
            time.to_string(),
            !outgoing.delivered,
        ));
    }
    views
}

pub fn conversation_items(
    conversations: &[&Conversation],
    selected: Option<&ConversationId>,
    now: &DateTime<Utc>,
) -> Vec<ConversationItem> {
    conversations
        .iter()
        .map(|c| ConversationItem {
            id: c.id.clone(),
            title: single_line(&c.title),
            time: format_timestamp_at(&c.updated_at, now),
            active: selected == Some(&c.id),
        })
        .collect()
}

/// First visible row so that the bottom of the content is in view
pub fn scroll_offset(total_lines: usize, viewport: u16) -> u16 {
    let offset = total_lines.saturating_sub(usize::from(viewport));
    u16::try_from(offset).unwrap_or(u16::MAX)
}

/// Greedy word wrap by display width. Words wider than the line are split.
pub fn wrap_line(line: &str, width: u16) -> Vec<String> {
    let width = usize::from(width.max(1));
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for word in line.split(' ') {
        let word_width = display_width(word);
        let needed = if current.is_empty() { word_width } else { current_width + 1 + word_width };

        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_width = needed;
            continue;
        }

        if !current.is_empty() {
            rows.push(std::mem::take(&mut current));
            current_width = 0;
        }

        if word_width <= width {
            current.push_str(word);
            current_width = word_width;
            continue;
        }

        for ch in word.chars() {
            let ch_width = display_width(ch.encode_utf8(&mut [0; 4]));
            if current_width + ch_width > width && !current.is_empty() {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    rows.push(current);
    rows
}

fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

//! In-memory conversation store.
//!
//! Every fetch the store starts is stamped with a [`Ticket`]. Responses come back
//! through the matching `finish_*` method and are applied only when their ticket is
//! still the current one, so a slow response for a conversation the user has already
//! left can never overwrite the panel of the conversation now selected.

use tracing::debug;

use crate::api::ApiError;
use crate::models::{Conversation, ConversationId, Message, MessagesPage};
use crate::state::{Command, Ticket, TicketCounter};

pub const DEFAULT_CONVERSATION_TITLE: &str = "New conversation";

/// Longest draft accepted by the composer
const MAX_DRAFT_CHARS: usize = 8000;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PanelStatus {
    /// Nothing selected yet
    #[default]
    Welcome,
    Loading,
    Ready,
    Failed(String),
}

/// A message the user sent that is not yet part of the loaded message list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outgoing {
    pub conversation_id: ConversationId,
    pub content: String,
    /// Accepted by the server; waiting for the message list refresh
    pub delivered: bool,
    ticket: Ticket,
}

#[derive(Debug)]
pub enum CreateOutcome {
    Stale,
    /// Created and selected; the command loads its messages
    Created(Command),
    Failed(ApiError),
}

#[derive(Debug)]
pub enum SendOutcome {
    Stale,
    /// Accepted; carries the message reload when the conversation is still selected
    Delivered(Option<Command>),
    Failed(ApiError),
}

#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: Vec<Conversation>,
    list_status: ListStatus,
    list_ticket: Option<Ticket>,
    create_ticket: Option<Ticket>,
    selected: Option<ConversationId>,
    messages_ticket: Option<Ticket>,
    panel: PanelStatus,
    title: Option<String>,
    messages: Vec<Message>,
    draft: String,
    outgoing: Option<Outgoing>,
    tickets: TicketCounter,
}

impl ConversationStore {
    /// Forget everything; requests still in flight become stale
    pub fn reset(&mut self) {
        let tickets = std::mem::take(&mut self.tickets);
        *self = Self { tickets, ..Self::default() };
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn list_status(&self) -> &ListStatus {
        &self.list_status
    }

    pub fn selected(&self) -> Option<&ConversationId> {
        self.selected.as_ref()
    }

    pub fn panel(&self) -> &PanelStatus {
        &self.panel
    }

    /// Title shown in the chat header
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn is_creating(&self) -> bool {
        self.create_ticket.is_some()
    }

    pub fn is_sending(&self) -> bool {
        self.outgoing.as_ref().is_some_and(|o| !o.delivered)
    }

    /// The outgoing message to show below the loaded ones, if it belongs to the
    /// selected conversation
    pub fn outgoing(&self) -> Option<&Outgoing> {
        self.outgoing.as_ref().filter(|o| Some(&o.conversation_id) == self.selected.as_ref())
    }

    pub fn composer_visible(&self) -> bool {
        self.selected.is_some()
    }

    pub fn can_send(&self) -> bool {
        self.selected.is_some() && !self.is_sending() && !self.draft.trim().is_empty()
    }

    pub fn push_char(&mut self, c: char) {
        if self.is_sending() || (c.is_control() && c != '\n') {
            return;
        }
        if self.draft.chars().count() < MAX_DRAFT_CHARS {
            self.draft.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if !self.is_sending() {
            self.draft.pop();
        }
    }

    pub fn set_draft(&mut self, draft: impl Into<String>) {
        if !self.is_sending() {
            self.draft = draft.into();
        }
    }

    /// Start (or restart) the conversation list fetch
    pub fn begin_list(&mut self) -> Command {
        let ticket = self.tickets.issue();
        self.list_ticket = Some(ticket);
        self.list_status = ListStatus::Loading;
        Command::ListConversations { ticket }
    }

    /// Returns false for a stale response
    pub fn finish_list(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<Conversation>, ApiError>,
    ) -> bool {
        if self.list_ticket != Some(ticket) {
            debug!(ticket = ticket.value(), "dropping stale conversation list");
            return false;
        }
        self.list_ticket = None;

        match result {
            Ok(conversations) => {
                self.conversations = conversations;
                self.list_status = ListStatus::Ready;
            }
            Err(e) => self.list_status = ListStatus::Failed(e.user_message()),
        }
        true
    }

    /// `None` while another creation is in flight
    pub fn begin_create(&mut self, title: &str) -> Option<Command> {
        if self.is_creating() {
            return None;
        }
        let ticket = self.tickets.issue();
        self.create_ticket = Some(ticket);
        Some(Command::CreateConversation { ticket, title: title.to_string() })
    }

    pub fn finish_create(
        &mut self,
        ticket: Ticket,
        result: Result<Conversation, ApiError>,
    ) -> CreateOutcome {
        if self.create_ticket != Some(ticket) {
            debug!(ticket = ticket.value(), "dropping stale conversation creation");
            return CreateOutcome::Stale;
        }
        self.create_ticket = None;

        match result {
            Ok(conversation) => {
                let id = conversation.id.clone();
                self.conversations.retain(|c| c.id != id);
                self.conversations.insert(0, conversation);
                if matches!(self.list_status, ListStatus::Failed(_) | ListStatus::Idle) {
                    self.list_status = ListStatus::Ready;
                }
                CreateOutcome::Created(self.select(id))
            }
            Err(e) => CreateOutcome::Failed(e),
        }
    }

    /// Make `id` current and fetch its messages. Any fetch issued for an earlier
    /// selection becomes stale.
    pub fn select(&mut self, id: ConversationId) -> Command {
        if self.outgoing.as_ref().is_some_and(|o| o.delivered) {
            self.outgoing = None;
        }
        self.title = self.conversations.iter().find(|c| c.id == id).map(|c| c.title.clone());
        self.messages.clear();
        self.panel = PanelStatus::Loading;
        self.selected = Some(id.clone());
        self.load_messages(id)
    }

    /// Re-issue the message fetch for the current selection
    pub fn reload_messages(&mut self) -> Option<Command> {
        let id = self.selected.clone()?;
        Some(self.select(id))
    }

    fn load_messages(&mut self, conversation_id: ConversationId) -> Command {
        let ticket = self.tickets.issue();
        self.messages_ticket = Some(ticket);
        Command::LoadMessages { ticket, conversation_id }
    }

    /// Returns false for a stale response
    pub fn finish_messages(&mut self, ticket: Ticket, result: Result<MessagesPage, ApiError>) -> bool {
        if self.messages_ticket != Some(ticket) {
            debug!(ticket = ticket.value(), "dropping stale message list");
            return false;
        }
        self.messages_ticket = None;

        match result {
            Ok(page) => {
                if let Some(cached) =
                    self.conversations.iter_mut().find(|c| c.id == page.conversation.id)
                {
                    cached.title = page.conversation.title.clone();
                    cached.updated_at = page.conversation.updated_at;
                }
                self.title = Some(page.conversation.title);
                self.messages = page.messages;
                self.panel = PanelStatus::Ready;
                if self.outgoing.as_ref().is_some_and(|o| o.delivered) {
                    self.outgoing = None;
                }
            }
            Err(e) => self.panel = PanelStatus::Failed(e.user_message()),
        }
        true
    }

    /// Post the draft to the selected conversation. `None` (no request) for a blank
    /// draft, a missing selection or a send already in flight.
    pub fn begin_send(&mut self) -> Option<Command> {
        if self.is_sending() {
            return None;
        }
        let content = self.draft.trim();
        if content.is_empty() {
            return None;
        }
        let conversation_id = self.selected.clone()?;
        let content = content.to_string();

        let ticket = self.tickets.issue();
        self.outgoing = Some(Outgoing {
            conversation_id: conversation_id.clone(),
            content: content.clone(),
            delivered: false,
            ticket,
        });
        Some(Command::SendMessage { ticket, conversation_id, content })
    }

    /// The draft is cleared only once the server accepted the message
    pub fn finish_send(&mut self, ticket: Ticket, result: Result<(), ApiError>) -> SendOutcome {
        let Some(outgoing) = self.outgoing.take_if(|o| o.ticket == ticket && !o.delivered) else {
            debug!(ticket = ticket.value(), "dropping stale send result");
            return SendOutcome::Stale;
        };

        match result {
            Ok(()) => {
                self.draft.clear();
                if self.selected.as_ref() != Some(&outgoing.conversation_id) {
                    return SendOutcome::Delivered(None);
                }
                let reload = self.load_messages(outgoing.conversation_id.clone());
                self.outgoing = Some(Outgoing { delivered: true, ..outgoing });
                SendOutcome::Delivered(Some(reload))
            }
            Err(e) => SendOutcome::Failed(e),
        }
    }
}

//! Application state and its reducer.
//!
//! All UI state lives in one [`AppState`] value owned by the event loop. Inputs,
//! both user intents and request outcomes, arrive as [`Msg`] values; applying one
//! with [`AppState::update`] mutates the state and returns the [`Command`]s (API
//! calls) to execute next. Nothing here performs I/O, which keeps the whole flow
//! testable without a server or a terminal.

pub mod config_form;
pub mod dashboard;
pub mod notifications;
pub mod ticket;

use std::time::Duration;

use tracing::{debug, info, warn};

pub use config_form::{ConfigField, ConfigForm, FormError};
pub use dashboard::{Dashboard, QuickAction, QuickActionEffect};
pub use notifications::{Notification, NotificationKind, Notifier};
pub use ticket::{Ticket, TicketCounter};

use crate::api::ApiError;
use crate::chat::{ConversationStore, CreateOutcome, DEFAULT_CONVERSATION_TITLE, SendOutcome};
use crate::models::{ApiConfig, ConfigStatus, Conversation, ConversationId, MessagesPage};
use crate::router::{Page, Router};

/// Side effects requested by the reducer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    CheckHealth,
    FetchConfigStatus { ticket: Ticket },
    SaveConfig { ticket: Ticket, config: ApiConfig },
    ListConversations { ticket: Ticket },
    CreateConversation { ticket: Ticket, title: String },
    LoadMessages { ticket: Ticket, conversation_id: ConversationId },
    SendMessage { ticket: Ticket, conversation_id: ConversationId, content: String },
}

/// Inputs to the reducer
#[derive(Debug)]
pub enum Msg {
    /// Navigate by page identifier; unknown ids show the not-found view
    Navigate(String),
    Open(Page),
    CreateConversation,
    SelectConversation(ConversationId),
    ReloadConversations,
    ReloadMessages,
    SendMessage,
    SaveConfig,
    ActivateQuickAction,
    Notify(String, NotificationKind),
    DismissNotification,

    HealthChecked(Result<(), ApiError>),
    ConfigStatusLoaded { ticket: Ticket, result: Result<ConfigStatus, ApiError> },
    ConfigSaved { ticket: Ticket, result: Result<(), ApiError> },
    ConversationsLoaded { ticket: Ticket, result: Result<Vec<Conversation>, ApiError> },
    ConversationCreated { ticket: Ticket, result: Result<Conversation, ApiError> },
    MessagesLoaded { ticket: Ticket, result: Result<MessagesPage, ApiError> },
    MessageSent { ticket: Ticket, result: Result<(), ApiError> },
    /// A request task died without reporting an outcome
    TaskFailed,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub router: Router,
    pub chat: ConversationStore,
    pub config_form: ConfigForm,
    pub dashboard: Dashboard,
    pub notifications: Notifier,
}

impl AppState {
    pub fn new(notification_duration: Duration) -> Self {
        Self { notifications: Notifier::new(notification_duration), ..Self::default() }
    }

    /// Commands to run at startup: the liveness probe and the first navigation
    pub fn start(&mut self, start_page: &str) -> Vec<Command> {
        let mut commands = vec![Command::CheckHealth];
        commands.extend(self.update(Msg::Navigate(start_page.to_string())));
        commands
    }

    pub fn update(&mut self, msg: Msg) -> Vec<Command> {
        match msg {
            Msg::Navigate(page_id) => match self.router.navigate(&page_id) {
                Some((page, ticket)) => self.resolve(page, ticket),
                None => vec![],
            },
            Msg::Open(page) => {
                let ticket = self.router.open(page);
                self.resolve(page, ticket)
            }
            Msg::CreateConversation if self.on_chat() => {
                self.chat.begin_create(DEFAULT_CONVERSATION_TITLE).into_iter().collect()
            }
            Msg::SelectConversation(id) if self.on_chat() => vec![self.chat.select(id)],
            Msg::ReloadConversations if self.on_chat() => vec![self.chat.begin_list()],
            Msg::ReloadMessages if self.on_chat() => {
                self.chat.reload_messages().into_iter().collect()
            }
            Msg::SendMessage if self.on_chat() => self.chat.begin_send().into_iter().collect(),
            Msg::SaveConfig if self.router.is_ready(Page::ApiConfig) => {
                match self.config_form.begin_save() {
                    Ok(command) => command.into_iter().collect(),
                    Err(e) => {
                        self.notifications.notify(e.to_string(), e.kind());
                        vec![]
                    }
                }
            }
            Msg::ActivateQuickAction if self.router.is_ready(Page::Dashboard) => {
                match self.dashboard.selected().effect() {
                    QuickActionEffect::Open(page) => self.update(Msg::Open(page)),
                    QuickActionEffect::Notify(text, kind) => {
                        self.notifications.notify(text, kind);
                        vec![]
                    }
                }
            }
            Msg::Notify(text, kind) => {
                self.notifications.notify(text, kind);
                vec![]
            }
            Msg::DismissNotification => {
                self.notifications.dismiss();
                vec![]
            }

            Msg::HealthChecked(result) => {
                match result {
                    Ok(()) => info!("server connection ok"),
                    Err(e) => {
                        warn!(error = %e, "server health check failed");
                        self.notifications.notify(
                            "Server connection problem; some features may be unavailable",
                            NotificationKind::Warning,
                        );
                    }
                }
                vec![]
            }
            Msg::ConfigStatusLoaded { ticket, result } => self.config_status_loaded(ticket, result),
            Msg::ConfigSaved { ticket, result } => {
                if !self.config_form.finish_save(ticket) {
                    debug!(ticket = ticket.value(), "dropping stale config save result");
                    return vec![];
                }
                match result {
                    Ok(()) => {
                        self.notifications
                            .notify("API configuration saved", NotificationKind::Success);
                        // Only move on to chat if the user is still on the form
                        if self.router.is_ready(Page::ApiConfig) {
                            self.update(Msg::Open(Page::Chat))
                        } else {
                            vec![]
                        }
                    }
                    Err(e) => {
                        self.notifications.notify(
                            format!("Failed to save configuration: {}", e.user_message()),
                            NotificationKind::Error,
                        );
                        vec![]
                    }
                }
            }
            Msg::ConversationsLoaded { ticket, result } => {
                self.chat.finish_list(ticket, result);
                vec![]
            }
            Msg::ConversationCreated { ticket, result } => {
                match self.chat.finish_create(ticket, result) {
                    CreateOutcome::Stale => vec![],
                    CreateOutcome::Created(load) => {
                        self.notifications
                            .notify("New conversation created", NotificationKind::Success);
                        vec![load]
                    }
                    CreateOutcome::Failed(e) => {
                        warn!(error = %e, "failed to create conversation");
                        self.notifications
                            .notify("Failed to create conversation", NotificationKind::Error);
                        vec![]
                    }
                }
            }
            Msg::MessagesLoaded { ticket, result } => {
                self.chat.finish_messages(ticket, result);
                vec![]
            }
            Msg::MessageSent { ticket, result } => match self.chat.finish_send(ticket, result) {
                SendOutcome::Stale => vec![],
                SendOutcome::Delivered(reload) => reload.into_iter().collect(),
                SendOutcome::Failed(e) => {
                    warn!(error = %e, "failed to send message");
                    self.notifications.notify("Failed to send message", NotificationKind::Error);
                    vec![]
                }
            },
            Msg::TaskFailed => {
                self.notifications.notify(
                    "Network request failed, check your connection",
                    NotificationKind::Error,
                );
                vec![]
            }

            // Page-scoped intents arriving while another page is shown
            msg => {
                debug!(?msg, "ignoring message for inactive page");
                vec![]
            }
        }
    }

    fn on_chat(&self) -> bool {
        self.router.is_ready(Page::Chat)
    }

    fn resolve(&mut self, page: Page, ticket: Ticket) -> Vec<Command> {
        match page {
            // The chat page needs the AI configuration before it can render
            Page::Chat => vec![Command::FetchConfigStatus { ticket }],
            Page::ApiConfig => {
                self.config_form.reset();
                self.router.finish(ticket, page);
                vec![]
            }
            Page::Dashboard => {
                self.dashboard.reset();
                self.router.finish(ticket, page);
                vec![]
            }
            Page::Members | Page::Policies | Page::Matching => {
                self.router.finish(ticket, page);
                vec![]
            }
        }
    }

    fn config_status_loaded(
        &mut self,
        ticket: Ticket,
        result: Result<ConfigStatus, ApiError>,
    ) -> Vec<Command> {
        let configured = match result {
            Ok(status) => status.is_configured,
            Err(e) => {
                warn!(error = %e, "failed to check api configuration");
                false
            }
        };

        if configured {
            if !self.router.finish(ticket, Page::Chat) {
                debug!(ticket = ticket.value(), "dropping stale config status");
                return vec![];
            }
            self.chat.reset();
            vec![self.chat.begin_list()]
        } else {
            if !self.router.finish(ticket, Page::ApiConfig) {
                debug!(ticket = ticket.value(), "dropping stale config status");
                return vec![];
            }
            self.config_form.reset();
            vec![]
        }
    }
}

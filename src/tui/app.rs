//! TUI application shell around [`AppState`].
//!
//! The [`App`] owns the reducer state plus the purely visual bits that the reducer
//! does not care about: which chat pane has focus, the sidebar cursor, and the
//! sidebar title filter. It:
//!
//! - maps keyboard [`Action`]s to reducer [`Msg`]s depending on the active page
//! - applies request outcomes arriving from the [`Dispatcher`]
//! - expires notifications and redraws only when something changed
//!
//! Every handler returns the [`Command`]s to dispatch instead of dispatching them
//! itself, so the key handling is testable without a runtime or terminal.

use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::{DateTime, Utc};
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::sync::mpsc::UnboundedReceiver;

use super::dispatch::Dispatcher;
use super::events::{Action, poll_event};
use super::rendering::{RenderState, render_ui};
use crate::chat::{ListStatus, PanelStatus, filter_conversations};
use crate::clipboard::{copy_to_clipboard, latest_reply};
use crate::models::{Conversation, ConversationId};
use crate::router::{Page, PageView};
use crate::state::{AppState, Command, Msg, NotificationKind};

/// Longest sidebar filter query accepted
const MAX_FILTER_CHARS: usize = 256;
/// Redraw at least this often so spinners animate
const REDRAW_INTERVAL: Duration = Duration::from_millis(100);

/// Which chat pane receives keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChatFocus {
    #[default]
    Sidebar,
    Composer,
}

pub struct App {
    state: AppState,
    chat_focus: ChatFocus,
    sidebar_cursor: usize,
    filter_query: String,
    filter_editing: bool,
    should_quit: bool,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
    last_draw_time: Instant,
    started_at: Instant,
}

impl App {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            chat_focus: ChatFocus::Sidebar,
            sidebar_cursor: 0,
            filter_query: String::new(),
            filter_editing: false,
            should_quit: false,
            needs_redraw: true,
            last_draw_time: Instant::now(),
            started_at: Instant::now(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn chat_focus(&self) -> ChatFocus {
        self.chat_focus
    }

    pub fn sidebar_cursor(&self) -> usize {
        self.sidebar_cursor
    }

    pub fn filter_query(&self) -> &str {
        &self.filter_query
    }

    /// Startup commands: health check plus the first navigation
    pub fn start(&mut self, start_page: &str) -> Vec<Command> {
        self.state.start(start_page)
    }

    pub fn run<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        dispatcher: &Dispatcher,
        inbox: &mut UnboundedReceiver<Msg>,
    ) -> Result<()> {
        while !self.should_quit {
            if self.state.notifications.expire(Instant::now()) {
                self.needs_redraw = true;
            }

            while let Ok(msg) = inbox.try_recv() {
                for command in self.handle_msg(msg) {
                    dispatcher.dispatch(command);
                }
            }

            let now = Instant::now();
            if self.needs_redraw || now.duration_since(self.last_draw_time) >= REDRAW_INTERVAL {
                let visible = self.visible_conversations();
                let tick = (now.duration_since(self.started_at).as_millis() / 100) as u64;
                let render_state = self.render_state(&visible, Utc::now(), tick);
                terminal.draw(|f| render_ui(f, &render_state))?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(50))?;
            for command in self.handle_action(action) {
                dispatcher.dispatch(command);
            }
        }

        Ok(())
    }

    /// Apply a request outcome (or any other message) to the state
    pub fn handle_msg(&mut self, msg: Msg) -> Vec<Command> {
        let was_selected = self.state.chat.selected().cloned();
        let commands = self.state.update(msg);
        self.follow_selection(was_selected);
        self.clamp_cursor();
        self.needs_redraw = true;
        commands
    }

    /// Handle a user action (extracted for testing)
    pub fn handle_action(&mut self, action: Action) -> Vec<Command> {
        if action != Action::None {
            self.needs_redraw = true;
        }

        match action {
            Action::Quit => {
                self.should_quit = true;
                vec![]
            }
            Action::Back => self.back(),
            Action::GoTo(page) => self.open(page),
            Action::MoveUp => self.move_vertical(-1),
            Action::MoveDown => self.move_vertical(1),
            Action::FocusNext => self.cycle_focus(true),
            Action::FocusPrev => self.cycle_focus(false),
            Action::Submit => self.submit(),
            Action::InsertNewline => {
                if self.composer_active() {
                    self.state.chat.push_char('\n');
                }
                vec![]
            }
            Action::NewConversation if self.on_page(Page::Chat) => {
                self.handle_msg(Msg::CreateConversation)
            }
            Action::Retry if self.on_page(Page::Chat) => self.retry(),
            Action::ToggleFilter if self.on_page(Page::Chat) => {
                self.filter_editing = !self.filter_editing;
                if self.filter_editing {
                    self.chat_focus = ChatFocus::Sidebar;
                }
                vec![]
            }
            Action::CopyReply if self.on_page(Page::Chat) => {
                self.copy_latest_reply();
                vec![]
            }
            Action::DismissNotification => self.handle_msg(Msg::DismissNotification),
            Action::Input(c) => {
                self.input(Some(c));
                vec![]
            }
            Action::DeleteChar => {
                self.input(None);
                vec![]
            }
            Action::Resize => vec![],
            Action::None => vec![],
            // Chat shortcuts outside the chat page
            _ => vec![],
        }
    }

    /// Borrowed snapshot for one frame; `tick` drives spinner animation
    pub fn render_state<'a>(
        &'a self,
        conversations: &'a [&'a Conversation],
        now: DateTime<Utc>,
        tick: u64,
    ) -> RenderState<'a> {
        RenderState {
            state: &self.state,
            chat_focus: self.chat_focus,
            sidebar_cursor: self.sidebar_cursor,
            filter_query: &self.filter_query,
            filter_editing: self.filter_editing,
            conversations,
            now,
            tick,
        }
    }

    /// Sidebar rows after applying the title filter
    pub fn visible_conversations(&self) -> Vec<&Conversation> {
        filter_conversations(self.state.chat.conversations(), &self.filter_query)
    }

    fn ready_page(&self) -> Option<Page> {
        match self.state.router.view() {
            PageView::Ready(page) => Some(*page),
            _ => None,
        }
    }

    fn on_page(&self, page: Page) -> bool {
        self.ready_page() == Some(page)
    }

    fn composer_active(&self) -> bool {
        self.on_page(Page::Chat)
            && self.chat_focus == ChatFocus::Composer
            && self.state.chat.composer_visible()
            && !self.filter_editing
    }

    fn open(&mut self, page: Page) -> Vec<Command> {
        if page == Page::Chat {
            self.chat_focus = ChatFocus::Sidebar;
            self.sidebar_cursor = 0;
            self.clear_filter();
        }
        self.handle_msg(Msg::Open(page))
    }

    fn back(&mut self) -> Vec<Command> {
        if self.filter_editing || !self.filter_query.is_empty() {
            self.clear_filter();
            return vec![];
        }
        if self.on_page(Page::Dashboard) {
            self.should_quit = true;
            return vec![];
        }
        self.open(Page::Dashboard)
    }

    fn clear_filter(&mut self) {
        self.filter_query.clear();
        self.filter_editing = false;
        self.clamp_cursor();
    }

    fn move_vertical(&mut self, delta: isize) -> Vec<Command> {
        match self.ready_page() {
            Some(Page::Dashboard) => self.state.dashboard.move_cursor(delta),
            Some(Page::ApiConfig) if delta < 0 => self.state.config_form.focus_prev(),
            Some(Page::ApiConfig) => self.state.config_form.focus_next(),
            Some(Page::Chat) if self.chat_focus == ChatFocus::Sidebar => {
                let total = self.visible_conversations().len();
                self.move_sidebar_cursor(delta, total);
            }
            _ => {}
        }
        vec![]
    }

    fn move_sidebar_cursor(&mut self, delta: isize, total: usize) {
        if total == 0 {
            self.sidebar_cursor = 0;
            return;
        }
        let new_idx = (self.sidebar_cursor as isize + delta).max(0) as usize;
        self.sidebar_cursor = new_idx.min(total - 1);
    }

    fn cycle_focus(&mut self, forward: bool) -> Vec<Command> {
        match self.ready_page() {
            Some(Page::ApiConfig) if forward => self.state.config_form.focus_next(),
            Some(Page::ApiConfig) => self.state.config_form.focus_prev(),
            Some(Page::Chat) => {
                self.filter_editing = false;
                self.chat_focus = match self.chat_focus {
                    ChatFocus::Sidebar if self.state.chat.composer_visible() => {
                        ChatFocus::Composer
                    }
                    _ => ChatFocus::Sidebar,
                };
            }
            _ => {}
        }
        vec![]
    }

    fn submit(&mut self) -> Vec<Command> {
        if let PageView::NotFound(_) = self.state.router.view() {
            return self.open(Page::Dashboard);
        }

        match self.ready_page() {
            Some(Page::Dashboard) => self.handle_msg(Msg::ActivateQuickAction),
            Some(Page::ApiConfig) => self.handle_msg(Msg::SaveConfig),
            Some(Page::Chat) if self.filter_editing => {
                self.filter_editing = false;
                vec![]
            }
            Some(Page::Chat) if self.chat_focus == ChatFocus::Composer => {
                self.handle_msg(Msg::SendMessage)
            }
            Some(Page::Chat) => {
                let Some(id) =
                    self.visible_conversations().get(self.sidebar_cursor).map(|c| c.id.clone())
                else {
                    return vec![];
                };
                let commands = self.handle_msg(Msg::SelectConversation(id));
                self.chat_focus = ChatFocus::Composer;
                commands
            }
            _ => vec![],
        }
    }

    fn retry(&mut self) -> Vec<Command> {
        if matches!(self.state.chat.list_status(), ListStatus::Failed(_)) {
            self.handle_msg(Msg::ReloadConversations)
        } else if matches!(self.state.chat.panel(), PanelStatus::Failed(_)) {
            self.handle_msg(Msg::ReloadMessages)
        } else {
            vec![]
        }
    }

    /// Route a typed character (`None` for backspace) to the focused text field
    fn input(&mut self, c: Option<char>) {
        match self.ready_page() {
            Some(Page::Chat) if self.filter_editing => {
                match c {
                    Some(c) if self.filter_query.chars().count() < MAX_FILTER_CHARS => {
                        self.filter_query.push(c)
                    }
                    Some(_) => {}
                    None => {
                        self.filter_query.pop();
                    }
                }
                self.sidebar_cursor = 0;
            }
            Some(Page::Chat) if self.composer_active() => match c {
                Some(c) => self.state.chat.push_char(c),
                None => self.state.chat.pop_char(),
            },
            Some(Page::ApiConfig) => match c {
                Some(c) => self.state.config_form.push_char(c),
                None => self.state.config_form.pop_char(),
            },
            _ => {}
        }
    }

    fn copy_latest_reply(&mut self) {
        let Some(reply) = latest_reply(self.state.chat.messages()) else {
            self.state.notifications.notify("No assistant reply to copy", NotificationKind::Info);
            return;
        };
        match copy_to_clipboard(reply) {
            Ok(()) => {
                self.state.notifications.notify("Copied to clipboard", NotificationKind::Success)
            }
            Err(e) => self
                .state
                .notifications
                .notify(format!("Clipboard error: {}", e), NotificationKind::Error),
        }
    }

    /// Keep the sidebar cursor on the selected conversation when the selection
    /// changes underneath it (e.g. a freshly created conversation)
    fn follow_selection(&mut self, was_selected: Option<ConversationId>) {
        let Some(selected) = self.state.chat.selected().cloned() else {
            return;
        };
        if was_selected.as_ref() == Some(&selected) {
            return;
        }
        let mut position = self.visible_conversations().iter().position(|c| c.id == selected);
        if position.is_none() && !self.filter_query.is_empty() {
            self.clear_filter();
            position = self.visible_conversations().iter().position(|c| c.id == selected);
        }
        if let Some(position) = position {
            self.sidebar_cursor = position;
        }
    }

    fn clamp_cursor(&mut self) {
        let total = self.visible_conversations().len();
        self.sidebar_cursor = self.sidebar_cursor.min(total.saturating_sub(1));
    }
}

//! Interactive terminal UI
mod app;
mod dispatch;
mod events;
mod layout;
mod rendering;
mod terminal;
mod timestamps;
mod view_model;

use anyhow::Result;
pub use app::{App, ChatFocus};
pub use dispatch::Dispatcher;
pub use events::Action;
pub use timestamps::{format_timestamp, format_timestamp_at};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tracing::info;
pub use view_model::{
    ConversationItem, MessageView, conversation_items, message_views, wrap_line,
};

pub use self::terminal::ui_thread_panic_hook;
use self::terminal::{TerminalManager, install_panic_hook};
use crate::settings::Settings;
use crate::state::AppState;

/// Run the interactive TUI until the user quits
pub fn run_interactive(settings: &Settings, runtime: Handle) -> Result<()> {
    let client = settings.api_client()?;
    let (tx, mut inbox) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(runtime, client, tx);

    let mut app = App::new(AppState::new(settings.notification_duration));
    info!(server = %settings.server_url, page = %settings.start_page, "starting ui");

    install_panic_hook();
    let mut manager = TerminalManager::new()?;
    for command in app.start(&settings.start_page) {
        dispatcher.dispatch(command);
    }

    let result = app.run(manager.terminal_mut(), &dispatcher, &mut inbox);
    manager.restore()?;
    info!("ui closed");
    result
}

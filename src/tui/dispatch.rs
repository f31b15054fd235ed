use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error};

use crate::api::ApiClient;
use crate::state::{Command, Msg};

/// Runs reducer commands as tasks on the tokio runtime and posts their outcome
/// back to the UI thread.
pub struct Dispatcher {
    handle: Handle,
    client: ApiClient,
    tx: UnboundedSender<Msg>,
}

impl Dispatcher {
    pub fn new(handle: Handle, client: ApiClient, tx: UnboundedSender<Msg>) -> Self {
        Self { handle, client, tx }
    }

    pub fn dispatch(&self, command: Command) {
        debug!(?command, "dispatching");
        let client = self.client.clone();
        let tx = self.tx.clone();

        self.handle.spawn(async move {
            let msg = match AssertUnwindSafe(execute(client, command)).catch_unwind().await {
                Ok(msg) => msg,
                Err(_) => {
                    error!("request task panicked");
                    Msg::TaskFailed
                }
            };
            // Receiver is gone once the UI has quit
            let _ = tx.send(msg);
        });
    }
}

async fn execute(client: ApiClient, command: Command) -> Msg {
    match command {
        Command::CheckHealth => Msg::HealthChecked(client.health().await.map(|_| ())),
        Command::FetchConfigStatus { ticket } => {
            Msg::ConfigStatusLoaded { ticket, result: client.config_status().await }
        }
        Command::SaveConfig { ticket, config } => {
            Msg::ConfigSaved { ticket, result: client.save_config(&config).await }
        }
        Command::ListConversations { ticket } => {
            Msg::ConversationsLoaded { ticket, result: client.list_conversations().await }
        }
        Command::CreateConversation { ticket, title } => {
            Msg::ConversationCreated { ticket, result: client.create_conversation(&title).await }
        }
        Command::LoadMessages { ticket, conversation_id } => Msg::MessagesLoaded {
            ticket,
            result: client.conversation_messages(&conversation_id).await,
        },
        Command::SendMessage { ticket, conversation_id, content } => Msg::MessageSent {
            ticket,
            result: client.send_message(&conversation_id, &content).await,
        },
    }
}

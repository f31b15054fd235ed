/// Chat and routing flow tests at the reducer level, plus one end-to-end run of
/// the dispatcher against the mock backend
mod common;

use std::time::Duration;

use chrono::{TimeZone, Utc};
use common::{MockServerBuilder, conversation_json, message_json};
use policy_keeper::api::{ApiClient, ApiError};
use policy_keeper::chat::{ListStatus, PanelStatus};
use policy_keeper::models::{ConfigStatus, Conversation, ConversationId, Message, MessagesPage, Role};
use policy_keeper::router::{Page, PageView};
use policy_keeper::state::{AppState, Command, Msg, NotificationKind, Ticket};
use policy_keeper::tui::Dispatcher;
use serde_json::json;
use tokio::sync::mpsc;
use url::Url;

fn conversation(id: &str, title: &str) -> Conversation {
    Conversation {
        id: ConversationId::from(id),
        title: title.to_string(),
        updated_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
}

fn message(role: Role, content: &str) -> Message {
    Message {
        role,
        content: content.to_string(),
        created_at: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
    }
}

fn page(id: &str, title: &str, messages: Vec<Message>) -> MessagesPage {
    MessagesPage { conversation: conversation(id, title), messages }
}

fn server_error() -> ApiError {
    ApiError::Status { status: 500, message: None }
}

fn single(commands: Vec<Command>) -> Command {
    assert_eq!(commands.len(), 1, "expected exactly one command: {commands:?}");
    commands.into_iter().next().unwrap()
}

fn ticket(command: &Command) -> Ticket {
    match command {
        Command::FetchConfigStatus { ticket }
        | Command::SaveConfig { ticket, .. }
        | Command::ListConversations { ticket }
        | Command::CreateConversation { ticket, .. }
        | Command::LoadMessages { ticket, .. }
        | Command::SendMessage { ticket, .. } => *ticket,
        Command::CheckHealth => panic!("health check has no ticket"),
    }
}

/// State on a ready chat page with the given conversations listed
fn chat_state(conversations: Vec<Conversation>) -> AppState {
    let mut state = AppState::default();
    let status = single(state.update(Msg::Navigate("chat".to_string())));
    let list = single(state.update(Msg::ConfigStatusLoaded {
        ticket: ticket(&status),
        result: Ok(ConfigStatus { is_configured: true }),
    }));
    state.update(Msg::ConversationsLoaded { ticket: ticket(&list), result: Ok(conversations) });
    state
}

#[test]
fn test_select_updates_selection_title_and_messages() {
    let mut state = chat_state(vec![conversation("a", "Home"), conversation("b", "Car")]);

    let load = single(state.update(Msg::SelectConversation(ConversationId::from("b"))));
    assert_eq!(state.chat.selected(), Some(&ConversationId::from("b")));
    assert_eq!(state.chat.panel(), &PanelStatus::Loading);
    assert_eq!(state.chat.title(), Some("Car"));

    state.update(Msg::MessagesLoaded {
        ticket: ticket(&load),
        result: Ok(page("b", "Car accident", vec![message(Role::User, "hit a pole")])),
    });
    assert_eq!(state.chat.panel(), &PanelStatus::Ready);
    assert_eq!(state.chat.title(), Some("Car accident"));
    assert_eq!(state.chat.messages()[0].content, "hit a pole");
}

#[test]
fn test_whitespace_message_is_noop() {
    let mut state = chat_state(vec![conversation("a", "Home")]);
    state.update(Msg::SelectConversation(ConversationId::from("a")));

    state.chat.set_draft("  \n\t ");
    assert!(state.update(Msg::SendMessage).is_empty());
    assert!(!state.chat.is_sending());
}

#[test]
fn test_send_without_selection_is_noop() {
    let mut state = chat_state(vec![conversation("a", "Home")]);
    state.chat.set_draft("hello");
    assert!(state.update(Msg::SendMessage).is_empty());
}

#[test]
fn test_create_prepends_and_selects() {
    let mut state = chat_state(vec![conversation("a", "Home"), conversation("b", "Car")]);

    let create = single(state.update(Msg::CreateConversation));
    assert!(matches!(&create, Command::CreateConversation { title, .. } if title == "New conversation"));

    let load = single(state.update(Msg::ConversationCreated {
        ticket: ticket(&create),
        result: Ok(conversation("c", "New conversation")),
    }));
    assert!(matches!(load, Command::LoadMessages { ref conversation_id, .. } if conversation_id.as_str() == "c"));

    let ids: Vec<&str> = state.chat.conversations().iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
    assert_eq!(state.chat.selected(), Some(&ConversationId::from("c")));

    let note = state.notifications.current().unwrap();
    assert_eq!(note.text, "New conversation created");
    assert_eq!(note.kind, NotificationKind::Success);
}

#[test]
fn test_second_create_while_in_flight_is_ignored() {
    let mut state = chat_state(vec![]);
    assert_eq!(state.update(Msg::CreateConversation).len(), 1);
    assert!(state.update(Msg::CreateConversation).is_empty());
}

#[test]
fn test_failed_create_notifies() {
    let mut state = chat_state(vec![conversation("a", "Home")]);
    let create = single(state.update(Msg::CreateConversation));

    let commands = state
        .update(Msg::ConversationCreated { ticket: ticket(&create), result: Err(server_error()) });
    assert!(commands.is_empty());
    assert_eq!(state.chat.conversations().len(), 1);
    assert_eq!(state.notifications.current().unwrap().text, "Failed to create conversation");
}

#[test]
fn test_failed_list_retry_reissues_fetch() {
    let mut state = AppState::default();
    let status = single(state.update(Msg::Navigate("chat".to_string())));
    let list = single(state.update(Msg::ConfigStatusLoaded {
        ticket: ticket(&status),
        result: Ok(ConfigStatus { is_configured: true }),
    }));
    state.update(Msg::ConversationsLoaded { ticket: ticket(&list), result: Err(server_error()) });
    assert!(matches!(state.chat.list_status(), ListStatus::Failed(_)));

    let retry = single(state.update(Msg::ReloadConversations));
    assert!(matches!(retry, Command::ListConversations { .. }));
    assert_eq!(state.chat.list_status(), &ListStatus::Loading);

    state.update(Msg::ConversationsLoaded {
        ticket: ticket(&retry),
        result: Ok(vec![conversation("a", "Home")]),
    });
    assert_eq!(state.chat.list_status(), &ListStatus::Ready);
    assert_eq!(state.chat.conversations().len(), 1);
}

#[test]
fn test_latest_selection_wins() {
    let mut state = chat_state(vec![conversation("a", "Home"), conversation("b", "Car")]);

    let load_a = single(state.update(Msg::SelectConversation(ConversationId::from("a"))));
    let load_b = single(state.update(Msg::SelectConversation(ConversationId::from("b"))));

    state.update(Msg::MessagesLoaded {
        ticket: ticket(&load_b),
        result: Ok(page("b", "Car", vec![message(Role::User, "from b")])),
    });
    // A's response arrives late
    state.update(Msg::MessagesLoaded {
        ticket: ticket(&load_a),
        result: Ok(page("a", "Home", vec![message(Role::User, "from a")])),
    });

    assert_eq!(state.chat.selected(), Some(&ConversationId::from("b")));
    assert_eq!(state.chat.title(), Some("Car"));
    assert_eq!(state.chat.messages()[0].content, "from b");
}

#[test]
fn test_failed_send_keeps_draft() {
    let mut state = chat_state(vec![conversation("a", "Home")]);
    state.update(Msg::SelectConversation(ConversationId::from("a")));
    state.chat.set_draft("Does my policy cover theft?");

    let send = single(state.update(Msg::SendMessage));
    assert!(state.chat.is_sending());

    let commands =
        state.update(Msg::MessageSent { ticket: ticket(&send), result: Err(server_error()) });
    assert!(commands.is_empty());
    assert!(!state.chat.is_sending());
    assert_eq!(state.chat.draft(), "Does my policy cover theft?");
    assert_eq!(state.notifications.current().unwrap().text, "Failed to send message");
}

#[test]
fn test_successful_send_clears_draft_and_reloads() {
    let mut state = chat_state(vec![conversation("a", "Home")]);
    state.update(Msg::SelectConversation(ConversationId::from("a")));
    state.chat.set_draft("  Does my policy cover theft?  ");

    let send = single(state.update(Msg::SendMessage));
    assert!(matches!(&send, Command::SendMessage { content, .. } if content == "Does my policy cover theft?"));

    let reload = single(state.update(Msg::MessageSent { ticket: ticket(&send), result: Ok(()) }));
    assert!(matches!(reload, Command::LoadMessages { .. }));
    assert_eq!(state.chat.draft(), "");
    // Pending row stays visible until the refresh lands
    assert!(state.chat.outgoing().is_some());

    state.update(Msg::MessagesLoaded {
        ticket: ticket(&reload),
        result: Ok(page(
            "a",
            "Home",
            vec![
                message(Role::User, "Does my policy cover theft?"),
                message(Role::Assistant, "Yes, up to the contents limit."),
            ],
        )),
    });
    assert!(state.chat.outgoing().is_none());
    assert_eq!(state.chat.messages().len(), 2);
}

#[test]
fn test_superseded_config_status_is_discarded() {
    let mut state = AppState::default();
    let status = single(state.update(Msg::Navigate("chat".to_string())));
    state.update(Msg::Navigate("policies".to_string()));

    let commands = state.update(Msg::ConfigStatusLoaded {
        ticket: ticket(&status),
        result: Ok(ConfigStatus { is_configured: true }),
    });
    assert!(commands.is_empty());
    assert_eq!(state.router.view(), &PageView::Ready(Page::Policies));
}

#[test]
fn test_config_status_failure_shows_config_page() {
    let mut state = AppState::default();
    let status = single(state.update(Msg::Navigate("chat".to_string())));
    state.update(Msg::ConfigStatusLoaded { ticket: ticket(&status), result: Err(server_error()) });

    assert_eq!(state.router.view(), &PageView::Ready(Page::ApiConfig));
    assert_eq!(state.router.active_nav(), Some(Page::Chat));
}

#[test]
fn test_unknown_page_not_found() {
    let mut state = AppState::default();
    assert!(state.update(Msg::Navigate("claims".to_string())).is_empty());
    assert_eq!(state.router.view(), &PageView::NotFound("claims".to_string()));
    assert_eq!(state.router.active_nav(), None);
}

/// Dispatch commands and apply their outcomes until nothing is in flight
fn drive(
    state: &mut AppState,
    commands: Vec<Command>,
    dispatcher: &Dispatcher,
    inbox: &mut mpsc::UnboundedReceiver<Msg>,
    runtime: &tokio::runtime::Runtime,
) {
    let mut in_flight = 0;
    for command in commands {
        dispatcher.dispatch(command);
        in_flight += 1;
    }
    while in_flight > 0 {
        let msg = runtime
            .block_on(async { tokio::time::timeout(Duration::from_secs(10), inbox.recv()).await })
            .expect("timed out waiting for a request outcome")
            .expect("dispatcher channel closed");
        in_flight -= 1;
        for command in state.update(msg) {
            dispatcher.dispatch(command);
            in_flight += 1;
        }
    }
}

#[test]
fn test_end_to_end_chat_against_mock_backend() {
    let first_page = json!({
        "conversation": conversation_json("7", "Flood damage"),
        "messages": [message_json("user", "Is flood covered?"), message_json("assistant", "Only with the add-on.")],
    });
    let second_page = json!({
        "conversation": conversation_json("7", "Flood damage"),
        "messages": [
            message_json("user", "Is flood covered?"),
            message_json("assistant", "Only with the add-on."),
            message_json("user", "How do I add it?"),
            message_json("assistant", "Call your insurer."),
        ],
    });
    let server = MockServerBuilder::new()
        .route("GET", "/health", 200, json!({ "status": "ok" }))
        .data("GET", "/api/config/status", json!({ "is_configured": true }))
        .data("GET", "/api/chat/conversations", json!([conversation_json("7", "Flood damage")]))
        .data("GET", "/api/chat/conversations/7/messages", first_page)
        .data("GET", "/api/chat/conversations/7/messages", second_page)
        .route("POST", "/api/chat/conversations/7/messages", 200, json!({ "data": null }))
        .start();

    let runtime = tokio::runtime::Runtime::new().unwrap();
    let client =
        ApiClient::new(Url::parse(server.url()).unwrap(), "/api", Duration::from_secs(5)).unwrap();
    let (tx, mut inbox) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(runtime.handle().clone(), client, tx);
    let mut state = AppState::default();

    let commands = state.start("chat");
    drive(&mut state, commands, &dispatcher, &mut inbox, &runtime);
    assert_eq!(state.router.view(), &PageView::Ready(Page::Chat));
    assert_eq!(state.chat.conversations().len(), 1);
    assert!(state.notifications.current().is_none());

    let commands = state.update(Msg::SelectConversation(ConversationId::from("7")));
    drive(&mut state, commands, &dispatcher, &mut inbox, &runtime);
    assert_eq!(state.chat.messages().len(), 2);

    state.chat.set_draft("How do I add it?");
    let commands = state.update(Msg::SendMessage);
    drive(&mut state, commands, &dispatcher, &mut inbox, &runtime);

    assert_eq!(state.chat.draft(), "");
    assert_eq!(state.chat.messages().len(), 4);
    assert_eq!(state.chat.messages()[3].content, "Call your insurer.");

    let sent = server.requests_to("POST", "/api/chat/conversations/7/messages");
    assert_eq!(sent[0].json(), json!({ "content": "How do I add it?" }));
}

#[test]
fn test_end_to_end_unreachable_server_warns() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let client =
        ApiClient::new(Url::parse("http://127.0.0.1:1").unwrap(), "/api", Duration::from_secs(2))
            .unwrap();
    let (tx, mut inbox) = mpsc::unbounded_channel();
    let dispatcher = Dispatcher::new(runtime.handle().clone(), client, tx);
    let mut state = AppState::default();

    let commands = state.start("chat");
    drive(&mut state, commands, &dispatcher, &mut inbox, &runtime);

    // Config status failed too, so the configuration page is shown
    assert_eq!(state.router.view(), &PageView::Ready(Page::ApiConfig));
    let note = state.notifications.current().unwrap();
    assert_eq!(note.kind, NotificationKind::Warning);
    assert_eq!(note.text, "Server connection problem; some features may be unavailable");
}

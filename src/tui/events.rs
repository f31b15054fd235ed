use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::router::Page;

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    Back,
    GoTo(Page),
    MoveUp,
    MoveDown,
    FocusNext,
    FocusPrev,
    Submit,
    InsertNewline,
    NewConversation,
    Retry,
    ToggleFilter,
    CopyReply,
    DismissNotification,
    Input(char),
    DeleteChar,
    Resize,
    None,
}

/// Poll for terminal events and convert to actions
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if !event::poll(timeout)? {
        return Ok(Action::None);
    }
    match event::read()? {
        Event::Key(key) if key.kind != KeyEventKind::Release => Ok(key_to_action(key)),
        Event::Resize(..) => Ok(Action::Resize),
        _ => Ok(Action::None),
    }
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Esc, _) => Action::Back,

        // Page tabs
        (KeyCode::F(1), _) => Action::GoTo(Page::Dashboard),
        (KeyCode::F(2), _) => Action::GoTo(Page::Members),
        (KeyCode::F(3), _) => Action::GoTo(Page::Policies),
        (KeyCode::F(4), _) => Action::GoTo(Page::Matching),
        (KeyCode::F(5), _) => Action::GoTo(Page::Chat),
        (KeyCode::Char('s'), KeyModifiers::CONTROL) => Action::GoTo(Page::ApiConfig),

        (KeyCode::Up, _) => Action::MoveUp,
        (KeyCode::Down, _) => Action::MoveDown,
        (KeyCode::Tab, _) => Action::FocusNext,
        (KeyCode::BackTab, _) => Action::FocusPrev,

        (KeyCode::Enter, KeyModifiers::ALT) => Action::InsertNewline,
        (KeyCode::Enter, _) => Action::Submit,
        (KeyCode::Char('n'), KeyModifiers::CONTROL) => Action::NewConversation,
        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Action::Retry,
        (KeyCode::Char('f'), KeyModifiers::CONTROL) => Action::ToggleFilter,
        (KeyCode::Char('y'), KeyModifiers::CONTROL) => Action::CopyReply,
        (KeyCode::Char('x'), KeyModifiers::CONTROL) => Action::DismissNotification,

        // Text input
        (KeyCode::Char(c), KeyModifiers::NONE) | (KeyCode::Char(c), KeyModifiers::SHIFT) => {
            Action::Input(c)
        }
        (KeyCode::Backspace, _) => Action::DeleteChar,

        _ => Action::None,
    }
}

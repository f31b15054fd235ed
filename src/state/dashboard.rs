use super::notifications::NotificationKind;
use crate::router::Page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuickAction {
    ManageMembers,
    ManagePolicies,
    AddMember,
    AddPolicy,
}

/// What activating a quick action does
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuickActionEffect {
    Open(Page),
    Notify(&'static str, NotificationKind),
}

impl QuickAction {
    pub const ALL: [QuickAction; 4] = [
        QuickAction::ManageMembers,
        QuickAction::ManagePolicies,
        QuickAction::AddMember,
        QuickAction::AddPolicy,
    ];

    pub fn icon(self) -> &'static str {
        match self {
            QuickAction::ManageMembers => "👥",
            QuickAction::ManagePolicies => "📋",
            QuickAction::AddMember => "➕",
            QuickAction::AddPolicy => "📝",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            QuickAction::ManageMembers => "Manage family members",
            QuickAction::ManagePolicies => "Manage policies",
            QuickAction::AddMember => "Add member",
            QuickAction::AddPolicy => "Add policy",
        }
    }

    pub fn effect(self) -> QuickActionEffect {
        match self {
            QuickAction::ManageMembers => QuickActionEffect::Open(Page::Members),
            QuickAction::ManagePolicies => QuickActionEffect::Open(Page::Policies),
            QuickAction::AddMember => QuickActionEffect::Notify(
                "Adding members is under development",
                NotificationKind::Info,
            ),
            QuickAction::AddPolicy => QuickActionEffect::Notify(
                "Adding policies is under development",
                NotificationKind::Info,
            ),
        }
    }
}

/// Dashboard cursor over the quick actions
#[derive(Debug, Default)]
pub struct Dashboard {
    cursor: usize,
}

impl Dashboard {
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let last = QuickAction::ALL.len() as isize - 1;
        self.cursor = (self.cursor as isize + delta).clamp(0, last) as usize;
    }

    pub fn selected(&self) -> QuickAction {
        QuickAction::ALL[self.cursor]
    }
}

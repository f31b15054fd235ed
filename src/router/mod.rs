//! Page routing: one active page at a time.
//!
//! [`Router::navigate`] resolves a page identifier. Unknown identifiers land on a
//! not-found view; known ones enter a loading state that is completed by
//! [`Router::finish`] with the ticket handed out at navigation time. Pages that need
//! a server round trip (the chat page checks the AI configuration first) finish later,
//! and a late finish for a navigation that has since been superseded is ignored.

use crate::state::{Ticket, TicketCounter};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Page {
    Dashboard,
    Members,
    Policies,
    Matching,
    Chat,
    ApiConfig,
}

impl Page {
    /// Pages shown in the navigation bar, in order
    pub const NAV: [Page; 5] =
        [Page::Dashboard, Page::Members, Page::Policies, Page::Matching, Page::Chat];

    pub fn from_id(id: &str) -> Option<Page> {
        match id.trim().to_ascii_lowercase().as_str() {
            "dashboard" => Some(Page::Dashboard),
            "members" => Some(Page::Members),
            "policies" => Some(Page::Policies),
            "matching" => Some(Page::Matching),
            "chat" => Some(Page::Chat),
            "api-config" => Some(Page::ApiConfig),
            _ => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Page::Dashboard => "dashboard",
            Page::Members => "members",
            Page::Policies => "policies",
            Page::Matching => "matching",
            Page::Chat => "chat",
            Page::ApiConfig => "api-config",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Page::Dashboard => "Dashboard",
            Page::Members => "Family Members",
            Page::Policies => "Policies",
            Page::Matching => "Issue Matching",
            Page::Chat => "AI Assistant",
            Page::ApiConfig => "API Configuration",
        }
    }

    /// Navigation tab highlighted while this page is shown
    pub fn nav_tab(self) -> Page {
        match self {
            Page::ApiConfig => Page::Chat,
            page => page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView {
    Loading(Page),
    Ready(Page),
    NotFound(String),
}

#[derive(Debug)]
pub struct Router {
    view: PageView,
    ticket: Option<Ticket>,
    tickets: TicketCounter,
}

impl Router {
    pub fn new() -> Self {
        Self {
            view: PageView::Loading(Page::Dashboard),
            ticket: None,
            tickets: TicketCounter::default(),
        }
    }

    pub fn view(&self) -> &PageView {
        &self.view
    }

    /// Resolve a page identifier; `None` means the not-found view is now shown
    pub fn navigate(&mut self, page_id: &str) -> Option<(Page, Ticket)> {
        match Page::from_id(page_id) {
            Some(page) => Some((page, self.open(page))),
            None => {
                tracing::debug!(page_id, "unknown page");
                self.ticket = None;
                self.view = PageView::NotFound(page_id.to_string());
                None
            }
        }
    }

    /// Start loading a known page
    pub fn open(&mut self, page: Page) -> Ticket {
        let ticket = self.tickets.issue();
        self.ticket = Some(ticket);
        self.view = PageView::Loading(page);
        ticket
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.ticket == Some(ticket) && matches!(self.view, PageView::Loading(_))
    }

    /// Complete a navigation. `page` may differ from the requested one (redirect).
    /// Returns false when the navigation has been superseded.
    pub fn finish(&mut self, ticket: Ticket, page: Page) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.view = PageView::Ready(page);
        true
    }

    pub fn is_ready(&self, page: Page) -> bool {
        self.view == PageView::Ready(page)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.view, PageView::Loading(_))
    }

    pub fn active_nav(&self) -> Option<Page> {
        match &self.view {
            PageView::Loading(page) | PageView::Ready(page) => Some(page.nav_tab()),
            PageView::NotFound(_) => None,
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

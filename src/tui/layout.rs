use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Tallest the composer grows before its content scrolls
pub const MAX_COMPOSER_LINES: u16 = 6;

/// Page frame: navigation tabs, page content, status bar
pub struct AppLayout {
    pub nav_area: Rect,
    pub content_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Navigation tabs
                Constraint::Min(3),    // Page content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        Self { nav_area: chunks[0], content_area: chunks[1], status_area: chunks[2] }
    }
}

/// Chat page: conversation sidebar on the left (30%), conversation on the right
pub struct ChatLayout {
    pub sidebar_area: Rect,
    pub header_area: Rect,
    pub messages_area: Rect,
    pub composer_area: Rect,
}

impl ChatLayout {
    /// `composer_lines` is the draft's line count; zero hides the composer
    pub fn new(area: Rect, composer_lines: u16) -> Self {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
            .split(area);

        // Composer border adds two rows
        let composer_height =
            if composer_lines == 0 { 0 } else { composer_lines.min(MAX_COMPOSER_LINES) + 2 };

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(3),
                Constraint::Length(composer_height),
            ])
            .split(columns[1]);

        Self {
            sidebar_area: columns[0],
            header_area: rows[0],
            messages_area: rows[1],
            composer_area: rows[2],
        }
    }
}

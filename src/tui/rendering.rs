use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph, Wrap};

use super::app::ChatFocus;
use super::layout::{AppLayout, ChatLayout, MAX_COMPOSER_LINES};
use super::view_model::{MessageView, conversation_items, message_views, scroll_offset, wrap_line};
use crate::chat::{ListStatus, PanelStatus};
use crate::models::{Conversation, Role};
use crate::router::{Page, PageView};
use crate::state::{AppState, ConfigField, NotificationKind, QuickAction};
use crate::utils::single_line;

const EMERALD: Color = Color::Rgb(16, 185, 129);
const MUTED: Color = Color::Rgb(113, 113, 122);
const RED: Color = Color::Rgb(239, 68, 68);
const AMBER: Color = Color::Rgb(245, 158, 11);
const BLUE: Color = Color::Rgb(59, 130, 246);
const TEXT: Color = Color::Rgb(250, 250, 250);
const STATUS_BG: Color = Color::Rgb(24, 24, 27);

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Everything needed to draw one frame
pub struct RenderState<'a> {
    pub state: &'a AppState,
    pub chat_focus: ChatFocus,
    pub sidebar_cursor: usize,
    pub filter_query: &'a str,
    pub filter_editing: bool,
    /// Sidebar rows after filtering
    pub conversations: &'a [&'a Conversation],
    pub now: DateTime<Utc>,
    pub tick: u64,
}

impl RenderState<'_> {
    fn spinner(&self) -> &'static str {
        SPINNER[(self.tick % SPINNER.len() as u64) as usize]
    }
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, rs: &RenderState) {
    let layout = AppLayout::new(frame.area());

    render_nav(frame, layout.nav_area, rs.state.router.active_nav());
    match rs.state.router.view() {
        PageView::Loading(page) => render_loading(frame, layout.content_area, rs, page.title()),
        PageView::NotFound(page_id) => render_not_found(frame, layout.content_area, page_id),
        PageView::Ready(Page::Dashboard) => render_dashboard(frame, layout.content_area, rs.state),
        PageView::Ready(Page::Chat) => render_chat(frame, layout.content_area, rs),
        PageView::Ready(Page::ApiConfig) => render_api_config(frame, layout.content_area, rs.state),
        PageView::Ready(page) => render_placeholder(frame, layout.content_area, *page),
    }
    render_status_bar(frame, layout.status_area, rs);
}

fn render_nav(frame: &mut Frame, area: Rect, active: Option<Page>) {
    let mut spans = vec![Span::styled(" 🛡 Policy Keeper ", Style::default().fg(EMERALD))];
    for (idx, page) in Page::NAV.iter().enumerate() {
        let label = format!(" F{} {} ", idx + 1, page.title());
        let style = if active == Some(*page) {
            Style::default().fg(TEXT).bg(EMERALD).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(MUTED)
        };
        spans.push(Span::styled(label, style));
    }
    let nav = Paragraph::new(Line::from(spans)).style(Style::default().bg(STATUS_BG));
    frame.render_widget(nav, area);
}

fn bordered(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED))
        .title(format!(" {} ", title))
}

fn centered_text(lines: Vec<Line<'static>>, area: Rect) -> (Paragraph<'static>, Rect) {
    let height = (lines.len() as u16).min(area.height);
    let top = area.y + area.height.saturating_sub(height) / 2;
    let rect = Rect::new(area.x, top, area.width, height);
    (Paragraph::new(Text::from(lines)).alignment(Alignment::Center), rect)
}

fn render_centered(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let (paragraph, rect) = centered_text(lines, area);
    frame.render_widget(paragraph, rect);
}

fn render_loading(frame: &mut Frame, area: Rect, rs: &RenderState, title: &str) {
    render_centered(
        frame,
        area,
        vec![Line::styled(
            format!("{} Loading {}...", rs.spinner(), title),
            Style::default().fg(MUTED),
        )],
    );
}

fn render_not_found(frame: &mut Frame, area: Rect, page_id: &str) {
    render_centered(
        frame,
        area,
        vec![
            Line::styled(
                format!("Page not found: {}", single_line(page_id)),
                Style::default().fg(RED).add_modifier(Modifier::BOLD),
            ),
            Line::from(""),
            Line::styled("Press Enter to return to the dashboard", Style::default().fg(MUTED)),
        ],
    );
}

fn render_dashboard(frame: &mut Frame, area: Rect, state: &AppState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(4), Constraint::Min(3)])
        .split(area);

    let header = Paragraph::new(vec![
        Line::styled(
            "🏠 Household Insurance Manager",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Line::styled(
            "Keep track of your family's policies and ask the AI assistant about coverage.",
            Style::default().fg(MUTED),
        ),
    ]);
    frame.render_widget(header, rows[0]);

    // Counts are not served by the backend yet
    let stats = [
        ("👥", "Family members"),
        ("📋", "Policies"),
        ("⚠️", "Expiring soon"),
        ("🎯", "Matches today"),
    ];
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[1]);
    for ((icon, label), card) in stats.iter().zip(cards.iter()) {
        let body = Paragraph::new(vec![
            Line::from(format!("{} -", icon)),
            Line::styled(*label, Style::default().fg(MUTED)),
        ])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(MUTED)));
        frame.render_widget(body, *card);
    }

    let items: Vec<ListItem> = QuickAction::ALL
        .iter()
        .enumerate()
        .map(|(idx, action)| {
            let style = if idx == state.dashboard.cursor() {
                Style::default().fg(TEXT).bg(EMERALD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(MUTED)
            };
            ListItem::new(format!(" {} {}", action.icon(), action.label())).style(style)
        })
        .collect();
    frame.render_widget(List::new(items).block(bordered("Quick actions")), rows[2]);
}

fn render_placeholder(frame: &mut Frame, area: Rect, page: Page) {
    let (icon, description) = match page {
        Page::Members => (
            "👥",
            "Manage your family members and the policies that cover each of them.",
        ),
        Page::Policies => {
            ("📋", "Manage every policy in the household and review their details.")
        }
        _ => ("🔍", "Describe a problem and find the policies that may cover it."),
    };

    let block = bordered(page.title());
    let inner = block.inner(area);
    frame.render_widget(block, area);
    render_centered(
        frame,
        inner,
        vec![
            Line::styled(
                format!("{} {}", icon, page.title()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::styled(description, Style::default().fg(MUTED)),
            Line::from(""),
            Line::styled("🚧 This feature is under development", Style::default().fg(AMBER)),
        ],
    );
}

fn render_chat(frame: &mut Frame, area: Rect, rs: &RenderState) {
    let chat = &rs.state.chat;
    let composer_lines = if chat.composer_visible() {
        chat.draft().split('\n').count().max(1) as u16
    } else {
        0
    };
    let layout = ChatLayout::new(area, composer_lines);

    render_sidebar(frame, layout.sidebar_area, rs);
    render_chat_header(frame, layout.header_area, rs);
    render_messages(frame, layout.messages_area, rs);
    if composer_lines > 0 {
        render_composer(frame, layout.composer_area, rs);
    }
}

fn render_sidebar(frame: &mut Frame, area: Rect, rs: &RenderState) {
    let chat = &rs.state.chat;
    let focused = rs.chat_focus == ChatFocus::Sidebar;

    let title = if rs.filter_editing || !rs.filter_query.is_empty() {
        let caret = if rs.filter_editing { "_" } else { "" };
        format!(" Conversations / {}{} ", single_line(rs.filter_query), caret)
    } else {
        " Conversations ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { EMERALD } else { MUTED }))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let muted = Style::default().fg(MUTED);
    match chat.list_status() {
        ListStatus::Loading if chat.conversations().is_empty() => {
            let loading = Line::styled(format!("{} Loading...", rs.spinner()), muted);
            render_centered(frame, inner, vec![loading]);
            return;
        }
        ListStatus::Failed(message) => {
            render_centered(
                frame,
                inner,
                vec![
                    Line::styled(format!("Failed to load: {}", message), Style::default().fg(RED)),
                    Line::styled("Press Ctrl+R to retry", muted),
                ],
            );
            return;
        }
        _ => {}
    }

    if chat.conversations().is_empty() {
        render_centered(
            frame,
            inner,
            vec![
                Line::from("No conversations yet"),
                Line::styled("Press Ctrl+N to start chatting", muted),
            ],
        );
        return;
    }
    if rs.conversations.is_empty() {
        render_centered(frame, inner, vec![Line::styled("No matching conversations", muted)]);
        return;
    }

    let items: Vec<ListItem> = conversation_items(rs.conversations, chat.selected(), &rs.now)
        .into_iter()
        .enumerate()
        .map(|(idx, item)| {
            let marker = if item.active { "● " } else { "  " };
            let style = if idx == rs.sidebar_cursor && focused {
                Style::default().fg(TEXT).bg(EMERALD).add_modifier(Modifier::BOLD)
            } else if item.active {
                Style::default().fg(EMERALD).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(TEXT)
            };
            ListItem::new(vec![
                Line::from(format!("{}{}", marker, item.title)),
                Line::styled(format!("  {}", item.time), muted),
            ])
            .style(style)
        })
        .collect();

    // Keep the cursor row in view: each item is two rows high
    let per_page = usize::from(inner.height / 2).max(1);
    let skip = rs.sidebar_cursor.saturating_sub(per_page - 1);
    let items: Vec<ListItem> = items.into_iter().skip(skip).collect();
    frame.render_widget(List::new(items), inner);
}

fn render_chat_header(frame: &mut Frame, area: Rect, rs: &RenderState) {
    let chat = &rs.state.chat;
    let title = chat.title().map(single_line).unwrap_or_else(|| "AI Assistant".to_string());
    let hint = if chat.is_creating() {
        format!("{} Creating conversation...", rs.spinner())
    } else {
        "Ctrl+N new conversation | Ctrl+Y copy last reply".to_string()
    };
    let header = Paragraph::new(vec![
        Line::styled(format!("🤖 {}", title), Style::default().add_modifier(Modifier::BOLD)),
        Line::styled(hint, Style::default().fg(MUTED)),
    ])
    .block(Block::default().borders(Borders::BOTTOM).border_style(Style::default().fg(MUTED)));
    frame.render_widget(header, area);
}

fn render_messages(frame: &mut Frame, area: Rect, rs: &RenderState) {
    let chat = &rs.state.chat;
    let muted = Style::default().fg(MUTED);

    match chat.panel() {
        PanelStatus::Welcome => render_centered(
            frame,
            area,
            vec![
                Line::from("🤖"),
                Line::styled(
                    "Welcome to the AI insurance assistant",
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Line::styled("Select a conversation or press Ctrl+N to start a new one", muted),
            ],
        ),
        PanelStatus::Loading => render_centered(
            frame,
            area,
            vec![Line::styled(format!("{} Loading messages...", rs.spinner()), muted)],
        ),
        PanelStatus::Failed(message) => render_centered(
            frame,
            area,
            vec![
                Line::styled(
                    format!("Failed to load messages: {}", message),
                    Style::default().fg(RED),
                ),
                Line::styled("Press Ctrl+R to retry", muted),
            ],
        ),
        PanelStatus::Ready => {
            let views = message_views(chat.messages(), chat.outgoing(), &rs.now);
            if views.is_empty() {
                render_centered(
                    frame,
                    area,
                    vec![Line::from("💬"), Line::styled("Start with your first message!", muted)],
                );
                return;
            }
            let width = area.width.saturating_sub(2).max(1);
            let lines: Vec<Line> =
                views.iter().flat_map(|view| message_lines(view, width)).collect();
            let offset = scroll_offset(lines.len(), area.height);
            frame.render_widget(Paragraph::new(Text::from(lines)).scroll((offset, 0)), area);
        }
    }
}

fn message_lines(view: &MessageView, width: u16) -> Vec<Line<'static>> {
    let accent = match view.role {
        Role::User => EMERALD,
        Role::Assistant => BLUE,
    };
    let body_style = if view.pending {
        Style::default().fg(MUTED).add_modifier(Modifier::ITALIC)
    } else {
        Style::default()
    };

    let mut lines = vec![Line::from(vec![
        Span::raw(format!("{} ", view.avatar)),
        Span::styled(view.author, Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        Span::styled(format!(" · {}", view.time), Style::default().fg(MUTED)),
    ])];
    for line in &view.lines {
        for row in wrap_line(line, width) {
            lines.push(Line::styled(format!("  {}", row), body_style));
        }
    }
    lines.push(Line::from(""));
    lines
}

fn render_composer(frame: &mut Frame, area: Rect, rs: &RenderState) {
    let chat = &rs.state.chat;
    let focused = rs.chat_focus == ChatFocus::Composer && !rs.filter_editing;

    let title = if chat.is_sending() {
        format!(" {} Sending... ", rs.spinner())
    } else if chat.can_send() {
        " Message (Enter to send, Alt+Enter for newline) ".to_string()
    } else {
        " Message ".to_string()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if focused { EMERALD } else { MUTED }))
        .title(title);
    let inner = block.inner(area);

    let text = if chat.draft().is_empty() {
        Text::styled("Type your question about your policies...", Style::default().fg(MUTED))
    } else {
        Text::from(chat.draft().to_string())
    };
    let draft_lines = chat.draft().split('\n').count() as u16;
    let offset = draft_lines.saturating_sub(MAX_COMPOSER_LINES);
    let style = if chat.is_sending() { Style::default().fg(MUTED) } else { Style::default() };
    frame.render_widget(Paragraph::new(text).style(style).block(block).scroll((offset, 0)), area);

    if focused && !chat.is_sending() {
        let last = chat.draft().rsplit('\n').next().unwrap_or("");
        let x = inner.x + (Span::raw(last).width() as u16).min(inner.width.saturating_sub(1));
        let y = inner.y + draft_lines.saturating_sub(1).min(inner.height.saturating_sub(1));
        frame.set_cursor_position(Position::new(x, y));
    }
}

fn render_api_config(frame: &mut Frame, area: Rect, state: &AppState) {
    let form = &state.config_form;
    let block = bordered("⚙ API Configuration");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut constraints = vec![Constraint::Length(2)];
    constraints.extend(ConfigField::ALL.iter().map(|_| Constraint::Length(3)));
    constraints.push(Constraint::Min(1));
    let rows =
        Layout::default().direction(Direction::Vertical).constraints(constraints).split(inner);

    frame.render_widget(
        Paragraph::new("Configure the AI service the assistant uses. Fields marked * are required.")
            .style(Style::default().fg(MUTED))
            .wrap(Wrap { trim: true }),
        rows[0],
    );

    for (idx, field) in ConfigField::ALL.iter().enumerate() {
        let focused = form.focused() == *field;
        let label = format!(" {} ", field.label());
        let value = form.value(*field);
        let text = if value.is_empty() {
            Span::styled(field.hint(), Style::default().fg(MUTED))
        } else if field.is_secret() {
            Span::raw("•".repeat(value.chars().count()))
        } else {
            Span::raw(value.to_string())
        };
        let widget = Paragraph::new(Line::from(text)).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(if focused { EMERALD } else { MUTED }))
                .title(label),
        );
        frame.render_widget(widget, rows[idx + 1]);
    }

    let footer = if form.is_saving() {
        Line::styled("Saving configuration...", Style::default().fg(AMBER))
    } else {
        Line::styled("Tab/Up/Down: move | Enter: save | Esc: back", Style::default().fg(MUTED))
    };
    frame.render_widget(Paragraph::new(footer), rows[ConfigField::ALL.len() + 1]);
}

fn render_status_bar(frame: &mut Frame, area: Rect, rs: &RenderState) {
    let (text, style) = match rs.state.notifications.current() {
        Some(notification) => {
            let (icon, color) = match notification.kind {
                NotificationKind::Success => ("✓", EMERALD),
                NotificationKind::Error => ("✗", RED),
                NotificationKind::Warning => ("!", AMBER),
                NotificationKind::Info => ("i", BLUE),
            };
            (
                format!(" {} {} | Ctrl+X: dismiss ", icon, notification.text),
                Style::default().fg(color).bg(STATUS_BG).add_modifier(Modifier::BOLD),
            )
        }
        None => (format!(" {} ", key_hints(rs)), Style::default().fg(TEXT).bg(STATUS_BG)),
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn key_hints(rs: &RenderState) -> &'static str {
    match rs.state.router.view() {
        PageView::Ready(Page::Chat) if rs.filter_editing => {
            "Type to filter | Enter: done | Esc: clear"
        }
        PageView::Ready(Page::Chat) => match rs.chat_focus {
            ChatFocus::Sidebar => {
                "Up/Down: move | Enter: open | Tab: composer | Ctrl+F: filter | Ctrl+R: retry"
            }
            ChatFocus::Composer => "Enter: send | Alt+Enter: newline | Tab: sidebar | Esc: back",
        },
        PageView::Ready(Page::Dashboard) => {
            "F1-F5: pages | Up/Down: move | Enter: open | Ctrl+S: API config | Esc: quit"
        }
        PageView::NotFound(_) => "Enter: dashboard | Ctrl+C: quit",
        _ => "F1-F5: pages | Ctrl+S: API config | Esc: back | Ctrl+C: quit",
    }
}

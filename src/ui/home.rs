//! Home view: the inbox of the active mailbox.
//!
//! Holds the message list the fetcher last reported plus whatever message
//! the user currently has open.

use crate::events::MailboxState;
use crate::i18n::Translator;
use crate::message::{MessageBody, MessageSummary};
use chrono::{DateTime, Utc};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Margin, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

/// State for the home view.
#[derive(Debug)]
pub struct HomeState {
    /// Latest inbox snapshot from the fetch worker.
    messages: Vec<MessageSummary>,

    /// Cursor within the message list.
    list_state: ListState,

    /// Where the list was last drawn, for mapping clicks to rows.
    list_area: Option<Rect>,

    /// The message whose full body is currently shown, if any.
    open: Option<MessageBody>,

    /// Lines scrolled off the top of the open message.
    open_scroll: u16,

    /// Last displayable worker message, shown on the status line.
    status: Option<String>,

    /// Current phase of the mailbox lifecycle.
    mailbox_state: MailboxState,
}

impl HomeState {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            list_state: ListState::default(),
            list_area: None,
            open: None,
            open_scroll: 0,
            status: None,
            mailbox_state: MailboxState::Provisioning,
        }
    }

    pub fn messages(&self) -> &[MessageSummary] {
        &self.messages
    }

    pub fn selected(&self) -> Option<&MessageSummary> {
        self.list_state.selected().and_then(|i| self.messages.get(i))
    }

    pub fn select_next(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let last = self.messages.len() - 1;
        let next = match self.list_state.selected() {
            Some(i) => (i + 1).min(last),
            None => 0,
        };
        self.list_state.select(Some(next));
    }

    pub fn select_previous(&mut self) {
        if self.messages.is_empty() {
            return;
        }
        let next = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
        self.list_state.select(Some(next));
    }

    /// Moves the cursor to the list row under the given screen position.
    /// Returns false when the position is not on a message row.
    pub fn select_at(&mut self, column: u16, row: u16) -> bool {
        let Some(area) = self.list_area else {
            return false;
        };
        let inner = area.inner(Margin::new(1, 1));
        if !inner.contains(Position::new(column, row)) {
            return false;
        }
        let index = (row - inner.y) as usize + self.list_state.offset();
        if index >= self.messages.len() {
            return false;
        }
        self.list_state.select(Some(index));
        true
    }

    /// Replaces the inbox with a fresh snapshot, keeping the cursor in range.
    pub fn replace_messages(&mut self, messages: Vec<MessageSummary>) {
        self.messages = messages;
        if let Some(selected) = self.list_state.selected() {
            if selected >= self.messages.len() {
                self.list_state.select(self.messages.len().checked_sub(1));
            }
        }
    }

    /// Clears everything tied to the previous mailbox after a switch.
    pub fn reset_inbox(&mut self) {
        self.messages.clear();
        self.list_state.select(None);
        self.open = None;
        self.open_scroll = 0;
    }

    pub fn open_message(&self) -> Option<&MessageBody> {
        self.open.as_ref()
    }

    pub fn show_message(&mut self, body: MessageBody) {
        self.open = Some(body);
        self.open_scroll = 0;
    }

    /// Closes the open message. Returns false when none was open.
    pub fn close_message(&mut self) -> bool {
        self.open_scroll = 0;
        self.open.take().is_some()
    }

    /// Scrolls the open message, stopping at the top.
    pub fn scroll_open(&mut self, delta: i16) {
        self.open_scroll = self.open_scroll.saturating_add_signed(delta);
    }

    pub fn set_status(&mut self, status: String) {
        self.status = Some(status);
    }

    pub fn mailbox_state(&self) -> MailboxState {
        self.mailbox_state
    }

    pub fn set_mailbox_state(&mut self, state: MailboxState) {
        self.mailbox_state = state;
    }

    fn status_line(&self) -> String {
        match &self.status {
            Some(status) => format!("{} | {}", self.mailbox_state, status),
            None => self.mailbox_state.to_string(),
        }
    }
}

/// Renders the message list and the status line beneath it.
pub fn render_home(f: &mut Frame, area: Rect, home: &mut HomeState, t: &Translator) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Fill(1), Constraint::Length(1)])
        .split(area);

    home.list_area = Some(rows[0]);

    let block = Block::default()
        .title(format!("{} ({})", t.t("inbox.title", "Inbox"), home.messages.len()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);

    if home.messages.is_empty() {
        let empty = Paragraph::new(t.t(
            "inbox.empty",
            "No messages yet. Mail sent to your address shows up here.",
        ))
        .style(Style::default().fg(Color::DarkGray))
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(empty, rows[0]);
    } else {
        let items: Vec<ListItem> = home
            .messages
            .iter()
            .map(|m| ListItem::new(m.listing_line()))
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(
                Style::default()
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("> ");
        f.render_stateful_widget(list, rows[0], &mut home.list_state);
    }

    let status = Paragraph::new(home.status_line()).style(Style::default().fg(Color::DarkGray));
    f.render_widget(status, rows[1]);
}

/// Draws the open message over the inbox, if one is open.
pub fn render_open_message(f: &mut Frame, home: &HomeState, t: &Translator) {
    let Some(body) = home.open_message() else {
        return;
    };

    let area = popup_area(f.area(), 70, 70);
    let label_style = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(format!("{}: ", t.t("inbox.from", "From")), label_style),
            Span::raw(body.from.as_str()),
        ]),
        Line::from(vec![
            Span::styled(format!("{}: ", t.t("inbox.received", "Received")), label_style),
            Span::raw(format_received(body.received_at)),
        ]),
        Line::default(),
    ];
    lines.extend(body.text.lines().map(Line::from));

    let block = Block::default()
        .title(body.subject.as_str())
        .title_bottom(Line::from(format!("[Esc] {}", t.t("inbox.close", "Close"))).right_aligned())
        .borders(Borders::ALL)
        .border_type(BorderType::Thick);

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((home.open_scroll, 0))
            .block(block),
        area,
    );
}

fn format_received(received_at: i64) -> String {
    match DateTime::<Utc>::from_timestamp(received_at, 0) {
        Some(time) => time.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => received_at.to_string(),
    }
}

/// Centered rect covering the given percentages of the frame.
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str) -> MessageSummary {
        MessageSummary {
            id: id.to_string(),
            from: "sender@example.com".to_string(),
            subject: format!("subject {}", id),
            received_at: 0,
        }
    }

    #[test]
    fn cursor_stays_in_range_when_list_shrinks() {
        let mut home = HomeState::new();
        home.replace_messages(vec![summary("a"), summary("b"), summary("c")]);
        home.select_next();
        home.select_next();
        home.select_next();
        assert_eq!(home.selected().map(|m| m.id.as_str()), Some("c"));

        home.replace_messages(vec![summary("a")]);
        assert_eq!(home.selected().map(|m| m.id.as_str()), Some("a"));

        home.replace_messages(Vec::new());
        assert!(home.selected().is_none());
    }

    #[test]
    fn selection_does_not_move_past_the_ends() {
        let mut home = HomeState::new();
        home.replace_messages(vec![summary("a"), summary("b")]);

        home.select_previous();
        assert_eq!(home.selected().map(|m| m.id.as_str()), Some("a"));
        home.select_previous();
        assert_eq!(home.selected().map(|m| m.id.as_str()), Some("a"));

        home.select_next();
        home.select_next();
        assert_eq!(home.selected().map(|m| m.id.as_str()), Some("b"));
    }

    #[test]
    fn reset_clears_messages_and_open_message() {
        let mut home = HomeState::new();
        home.replace_messages(vec![summary("a")]);
        home.select_next();
        home.show_message(MessageBody {
            id: "a".to_string(),
            from: "sender@example.com".to_string(),
            subject: "subject".to_string(),
            received_at: 0,
            text: String::new(),
        });

        home.reset_inbox();
        assert!(home.messages().is_empty());
        assert!(home.selected().is_none());
        assert!(home.open_message().is_none());
    }

    #[test]
    fn close_message_reports_whether_one_was_open() {
        let mut home = HomeState::new();
        assert!(!home.close_message());

        home.show_message(MessageBody {
            id: "a".to_string(),
            from: "sender@example.com".to_string(),
            subject: "subject".to_string(),
            received_at: 0,
            text: String::new(),
        });
        assert!(home.close_message());
        assert!(!home.close_message());
    }

    #[test]
    fn open_message_scroll_stops_at_the_top_and_resets_on_open() {
        let mut home = HomeState::new();
        home.show_message(MessageBody {
            id: "a".to_string(),
            from: "sender@example.com".to_string(),
            subject: "subject".to_string(),
            received_at: 0,
            text: "line\n".repeat(50),
        });

        home.scroll_open(-1);
        assert_eq!(home.open_scroll, 0);

        home.scroll_open(3);
        home.scroll_open(3);
        assert_eq!(home.open_scroll, 6);
        home.scroll_open(-10);
        assert_eq!(home.open_scroll, 0);

        home.scroll_open(4);
        home.show_message(MessageBody {
            id: "b".to_string(),
            from: "sender@example.com".to_string(),
            subject: "other".to_string(),
            received_at: 0,
            text: String::new(),
        });
        assert_eq!(home.open_scroll, 0);
    }

    #[test]
    fn status_line_includes_lifecycle_state() {
        let mut home = HomeState::new();
        assert_eq!(home.status_line(), "Provisioning");

        home.set_mailbox_state(MailboxState::Watching);
        home.set_status("Inbox refreshed, 2 message(s)".to_string());
        assert_eq!(home.status_line(), "Watching | Inbox refreshed, 2 message(s)");
    }
}

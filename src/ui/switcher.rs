//! Saved-mailbox switcher.
//!
//! Every mailbox the client has provisioned is kept in storage under the
//! `savedMailboxes` key. The switcher prunes expired entries on each read,
//! shows a switch button once more than one address is still alive, and
//! drops a menu over the home view to jump between them.

use crate::clock::Clock;
use crate::consts::cli_consts::SAVED_MAILBOXES_KEY;
use crate::i18n::Translator;
use crate::mailbox::{self, Mailbox};
use crate::storage::KeyValueStore;
use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::{Alignment, Margin, Position, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
};
use std::sync::Arc;

/// Whether the dropdown menu is showing.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum DropdownState {
    Open,
    Closed,
}

/// What the switcher did with an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitcherResponse {
    /// The event was aimed at the switcher and fully handled.
    Consumed,
    /// The event was not for the switcher. A click outside an open menu
    /// closes it but still reports `Ignored`, so the click keeps working
    /// on whatever it landed on.
    Ignored,
    /// The user picked this mailbox from the menu.
    Switched(Mailbox),
}

pub struct MailboxSwitcher {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,

    /// Saved mailboxes that have not expired, oldest first.
    saved: Vec<Mailbox>,

    dropdown: DropdownState,

    /// Cursor within the open menu.
    list_state: ListState,

    /// Where the switch button was last drawn.
    button_area: Option<Rect>,

    /// Where the open menu was last drawn, borders included.
    menu_area: Option<Rect>,
}

impl MailboxSwitcher {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        let mut switcher = Self {
            store,
            clock,
            saved: Vec::new(),
            dropdown: DropdownState::Closed,
            list_state: ListState::default(),
            button_area: None,
            menu_area: None,
        };
        switcher.reload();
        switcher
    }

    /// Re-reads the saved list from storage, dropping expired entries.
    pub fn reload(&mut self) {
        self.saved = self.load_saved();
        self.after_list_change();
    }

    /// Upserts the mailbox into the stored list and persists the result.
    ///
    /// The list is re-read first so entries written by other runs survive,
    /// and expired ones fall out of storage for good.
    pub fn record_current(&mut self, current: &Mailbox) {
        let mut list = self.load_saved();
        mailbox::upsert(&mut list, current.clone());
        match mailbox::encode_list(&list) {
            Ok(raw) => {
                if let Err(e) = self.store.set(SAVED_MAILBOXES_KEY, &raw) {
                    log::warn!("Failed to persist saved mailboxes: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize saved mailboxes: {}", e),
        }
        self.saved = list;
        self.after_list_change();
    }

    fn load_saved(&self) -> Vec<Mailbox> {
        let raw = match self.store.get(SAVED_MAILBOXES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                log::warn!("Could not read saved mailboxes: {}", e);
                return Vec::new();
            }
        };
        let list = match mailbox::decode_list(&raw) {
            Ok(list) => list,
            Err(e) => {
                log::warn!("Ignoring corrupt saved mailboxes: {}", e);
                Vec::new()
            }
        };
        mailbox::prune_expired(list, self.clock.now())
    }

    fn after_list_change(&mut self) {
        if !self.is_visible() {
            self.close();
        }
        if let Some(selected) = self.list_state.selected() {
            if selected >= self.saved.len() {
                self.list_state.select(self.saved.len().checked_sub(1));
            }
        }
    }

    pub fn saved(&self) -> &[Mailbox] {
        &self.saved
    }

    /// The switcher only exists once there is something to switch between.
    pub fn is_visible(&self) -> bool {
        self.saved.len() > 1
    }

    pub fn is_open(&self) -> bool {
        self.dropdown == DropdownState::Open
    }

    pub fn close(&mut self) {
        self.dropdown = DropdownState::Closed;
    }

    pub fn toggle(&mut self) {
        self.dropdown = match self.dropdown {
            DropdownState::Open => DropdownState::Closed,
            DropdownState::Closed => DropdownState::Open,
        };
        if self.is_open() && self.list_state.selected().is_none() {
            self.list_state.select(Some(0));
        }
    }

    /// Routes a mouse event. Only left-button presses matter; everything
    /// else passes through untouched.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent) -> SwitcherResponse {
        if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
            return SwitcherResponse::Ignored;
        }
        if !self.is_visible() {
            return SwitcherResponse::Ignored;
        }

        let position = Position::new(mouse.column, mouse.row);
        if self.button_area.is_some_and(|r| r.contains(position)) {
            self.toggle();
            return SwitcherResponse::Consumed;
        }
        if !self.is_open() {
            return SwitcherResponse::Ignored;
        }

        if let Some(menu) = self.menu_area {
            if menu.contains(position) {
                if let Some(index) = self.item_index_at(menu, position) {
                    self.close();
                    return SwitcherResponse::Switched(self.saved[index].clone());
                }
                // A click on the menu chrome stays in the menu.
                return SwitcherResponse::Consumed;
            }
        }

        // A click anywhere else closes the menu without claiming the click.
        self.close();
        SwitcherResponse::Ignored
    }

    /// Keyboard handling while the menu is open. Closed menus ignore keys
    /// so they reach the rest of the app.
    pub fn handle_key(&mut self, code: KeyCode) -> SwitcherResponse {
        if !self.is_open() {
            return SwitcherResponse::Ignored;
        }
        match code {
            KeyCode::Esc => {
                self.close();
                SwitcherResponse::Consumed
            }
            KeyCode::Up | KeyCode::Char('k') => {
                let next = self.list_state.selected().map_or(0, |i| i.saturating_sub(1));
                self.list_state.select(Some(next));
                SwitcherResponse::Consumed
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let last = self.saved.len().saturating_sub(1);
                let next = self.list_state.selected().map_or(0, |i| (i + 1).min(last));
                self.list_state.select(Some(next));
                SwitcherResponse::Consumed
            }
            KeyCode::Enter => match self.list_state.selected().and_then(|i| self.saved.get(i)) {
                Some(mailbox) => {
                    let mailbox = mailbox.clone();
                    self.close();
                    SwitcherResponse::Switched(mailbox)
                }
                None => SwitcherResponse::Consumed,
            },
            _ => SwitcherResponse::Ignored,
        }
    }

    fn item_index_at(&self, menu: Rect, position: Position) -> Option<usize> {
        let inner = menu.inner(Margin::new(1, 1));
        if !inner.contains(position) {
            return None;
        }
        let index = (position.y - inner.y) as usize + self.list_state.offset();
        (index < self.saved.len()).then_some(index)
    }

    /// Draws the switch button and remembers where it is for mouse routing.
    /// Draws nothing while there is at most one saved mailbox.
    pub fn render_button(&mut self, f: &mut Frame, area: Rect, t: &Translator) {
        if !self.is_visible() {
            self.clear_areas();
            return;
        }
        self.button_area = Some(area);

        let label = format!("[S] {} ({})", t.t("mailbox.switch", "Switch mailbox"), self.saved.len());
        let button = Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Cyan))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            );
        f.render_widget(button, area);
    }

    /// Draws the dropdown below the button, over whatever is underneath.
    pub fn render_dropdown(
        &mut self,
        f: &mut Frame,
        active: Option<&str>,
        domain: &str,
        t: &Translator,
    ) {
        if !self.is_open() || !self.is_visible() {
            self.menu_area = None;
            return;
        }
        let Some(button) = self.button_area else {
            self.menu_area = None;
            return;
        };

        let frame_area = f.area();
        let widest = self
            .saved
            .iter()
            .map(|m| m.address.len() + domain.len() + 1)
            .max()
            .unwrap_or(0) as u16;
        let width = (widest + 4).max(button.width).min(frame_area.width);
        let available = frame_area.bottom().saturating_sub(button.bottom());
        let height = (self.saved.len() as u16 + 2).min(available);
        let x = button.right().saturating_sub(width).max(frame_area.x);
        let menu = Rect::new(x, button.bottom(), width, height);
        self.menu_area = Some(menu);

        let items: Vec<ListItem> = self
            .saved
            .iter()
            .map(|m| {
                let style = if Some(m.address.as_str()) == active {
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                ListItem::new(format!("{}@{}", m.address, domain)).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(t.t("mailbox.savedMailboxes", "Saved mailboxes"))
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded),
            )
            .highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        f.render_widget(Clear, menu);
        f.render_stateful_widget(list, menu, &mut self.list_state);
    }

    /// Forgets the drawn areas so stale rects stop catching clicks, e.g.
    /// after navigating away from the home view.
    pub fn clear_areas(&mut self) {
        self.button_area = None;
        self.menu_area = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::i18n::{Locale, Translator};
    use crate::storage::MemoryStore;
    use crossterm::event::KeyModifiers;
    use ratatui::{Terminal, backend::TestBackend};

    const NOW: i64 = 1_000;

    fn entry(address: &str, expires_at: i64) -> String {
        format!(r#"{{"address":"{}","expiresAt":{}}}"#, address, expires_at)
    }

    fn stored_pair() -> String {
        format!("[{},{}]", entry("abc", 5_000), entry("xyz", 9_000))
    }

    fn switcher_with(store: Arc<MemoryStore>) -> MailboxSwitcher {
        MailboxSwitcher::new(store, Arc::new(FixedClock::new(NOW)))
    }

    fn click(column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    /// Renders button and dropdown on a fixed frame so the cached areas are
    /// populated for mouse tests.
    fn draw(switcher: &mut MailboxSwitcher, active: Option<&str>) {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let t = Translator::new(Locale::En);
        terminal
            .draw(|f| {
                let button = Rect::new(58, 0, 22, 3);
                switcher.render_button(f, button, &t);
                switcher.render_dropdown(f, active, "driftmail.app", &t);
            })
            .unwrap();
    }

    #[test]
    fn load_drops_expired_entries() {
        let raw = format!("[{},{}]", entry("abc", 500), entry("xyz", 9_000));
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, &raw));
        let switcher = switcher_with(store);

        let saved: Vec<&str> = switcher.saved().iter().map(|m| m.address.as_str()).collect();
        assert_eq!(saved, vec!["xyz"]);
    }

    #[test]
    fn corrupt_storage_degrades_to_empty_list() {
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, "{nope"));
        let switcher = switcher_with(store);
        assert!(switcher.saved().is_empty());
    }

    #[test]
    fn record_current_replaces_matching_address_in_place() {
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, &stored_pair()));
        let mut switcher = switcher_with(store.clone());

        switcher.record_current(&Mailbox::new("abc", 7_777));

        assert_eq!(switcher.saved().len(), 2);
        assert_eq!(switcher.saved()[0].address, "abc");
        assert_eq!(switcher.saved()[0].expires_at, 7_777);

        let written = store.get(SAVED_MAILBOXES_KEY).unwrap().unwrap();
        assert!(written.contains("7777"));
    }

    #[test]
    fn record_current_appends_unknown_address() {
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, &stored_pair()));
        let mut switcher = switcher_with(store);

        switcher.record_current(&Mailbox::new("fresh", 8_000));

        let saved: Vec<&str> = switcher.saved().iter().map(|m| m.address.as_str()).collect();
        assert_eq!(saved, vec!["abc", "xyz", "fresh"]);
    }

    #[test]
    fn record_current_writes_expired_entries_out_of_storage() {
        let raw = format!("[{},{}]", entry("old", 500), entry("abc", 5_000));
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, &raw));
        let mut switcher = switcher_with(store.clone());

        switcher.record_current(&Mailbox::new("fresh", 8_000));

        let written = store.get(SAVED_MAILBOXES_KEY).unwrap().unwrap();
        assert!(!written.contains("old"));
        assert!(written.contains("abc"));
        assert!(written.contains("fresh"));
    }

    #[test]
    fn refreshing_the_last_survivor_keeps_the_switcher_hidden() {
        let raw = format!("[{},{}]", entry("abc", 990), entry("xyz", NOW + 3_600));
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, &raw));
        let mut switcher = switcher_with(store.clone());

        let saved: Vec<&str> = switcher.saved().iter().map(|m| m.address.as_str()).collect();
        assert_eq!(saved, vec!["xyz"]);

        switcher.record_current(&Mailbox::new("xyz", NOW + 7_200));

        assert_eq!(switcher.saved().len(), 1);
        assert_eq!(switcher.saved()[0].expires_at, NOW + 7_200);
        assert!(!switcher.is_visible());

        draw(&mut switcher, Some("xyz"));
        assert!(switcher.button_area.is_none());

        let written = store.get(SAVED_MAILBOXES_KEY).unwrap().unwrap();
        assert!(!written.contains("abc"));
    }

    #[test]
    fn hidden_until_there_are_two_mailboxes() {
        let store = Arc::new(MemoryStore::with_entry(
            SAVED_MAILBOXES_KEY,
            &format!("[{}]", entry("abc", 5_000)),
        ));
        let mut switcher = switcher_with(store);
        assert!(!switcher.is_visible());

        draw(&mut switcher, None);
        assert!(switcher.button_area.is_none());

        switcher.record_current(&Mailbox::new("xyz", 9_000));
        assert!(switcher.is_visible());

        draw(&mut switcher, None);
        assert!(switcher.button_area.is_some());
    }

    #[test]
    fn button_click_toggles_the_menu() {
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, &stored_pair()));
        let mut switcher = switcher_with(store);
        draw(&mut switcher, None);

        let button = switcher.button_area.unwrap();
        let response = switcher.handle_mouse(&click(button.x + 1, button.y + 1));
        assert_eq!(response, SwitcherResponse::Consumed);
        assert!(switcher.is_open());

        let response = switcher.handle_mouse(&click(button.x + 1, button.y + 1));
        assert_eq!(response, SwitcherResponse::Consumed);
        assert!(!switcher.is_open());
    }

    #[test]
    fn menu_item_click_switches_and_closes() {
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, &stored_pair()));
        let mut switcher = switcher_with(store);
        switcher.toggle();
        draw(&mut switcher, Some("abc"));

        let menu = switcher.menu_area.unwrap();
        // Second row inside the borders is the second entry.
        let response = switcher.handle_mouse(&click(menu.x + 2, menu.y + 2));
        match response {
            SwitcherResponse::Switched(mailbox) => assert_eq!(mailbox.address, "xyz"),
            other => panic!("expected a switch, got {:?}", other),
        }
        assert!(!switcher.is_open());
    }

    #[test]
    fn menu_chrome_click_is_consumed_without_closing() {
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, &stored_pair()));
        let mut switcher = switcher_with(store);
        switcher.toggle();
        draw(&mut switcher, None);

        let menu = switcher.menu_area.unwrap();
        // The top border row holds no entry.
        let response = switcher.handle_mouse(&click(menu.x + 2, menu.y));
        assert_eq!(response, SwitcherResponse::Consumed);
        assert!(switcher.is_open());
    }

    #[test]
    fn outside_click_closes_but_is_not_consumed() {
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, &stored_pair()));
        let mut switcher = switcher_with(store);
        switcher.toggle();
        draw(&mut switcher, None);
        assert!(switcher.is_open());

        let response = switcher.handle_mouse(&click(0, 20));
        assert_eq!(response, SwitcherResponse::Ignored);
        assert!(!switcher.is_open());
    }

    #[test]
    fn closed_menu_leaves_keys_alone() {
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, &stored_pair()));
        let mut switcher = switcher_with(store);
        assert_eq!(switcher.handle_key(KeyCode::Enter), SwitcherResponse::Ignored);
    }

    #[test]
    fn keyboard_selection_switches_mailboxes() {
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, &stored_pair()));
        let mut switcher = switcher_with(store);
        switcher.toggle();

        assert_eq!(switcher.handle_key(KeyCode::Down), SwitcherResponse::Consumed);
        match switcher.handle_key(KeyCode::Enter) {
            SwitcherResponse::Switched(mailbox) => assert_eq!(mailbox.address, "xyz"),
            other => panic!("expected a switch, got {:?}", other),
        }
        assert!(!switcher.is_open());
    }

    #[test]
    fn dropdown_lists_full_addresses() {
        let store = Arc::new(MemoryStore::with_entry(SAVED_MAILBOXES_KEY, &stored_pair()));
        let mut switcher = switcher_with(store);
        switcher.toggle();

        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        let t = Translator::new(Locale::En);
        terminal
            .draw(|f| {
                switcher.render_button(f, Rect::new(58, 0, 22, 3), &t);
                switcher.render_dropdown(f, Some("xyz"), "driftmail.app", &t);
            })
            .unwrap();

        let rendered = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect::<String>();
        assert!(rendered.contains("abc@driftmail.app"));
        assert!(rendered.contains("xyz@driftmail.app"));
    }
}

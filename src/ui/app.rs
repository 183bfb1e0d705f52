//! Main application state and UI loop
//!
//! Contains the App struct and main UI event handling logic

use crate::environment::Environment;
use crate::events::{Event as WorkerEvent, EventPayload, MailboxState};
use crate::i18n::{Locale, Translator};
use crate::mailbox::Mailbox;
use crate::route::Route;
use crate::session::MailboxSession;
use crate::ui::footer::Footer;
use crate::ui::header;
use crate::ui::home::{self, HomeState};
use crate::ui::pages;
use crate::ui::switcher::{MailboxSwitcher, SwitcherResponse};
use crate::workers::inbox::InboxCommand;
use crate::workers::provisioner::ProvisionerCommand;
use chrono::Datelike;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::{Frame, Terminal, backend::Backend};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};

/// UI configuration data grouped by concern
#[derive(Debug, Clone)]
pub struct UIConfig {
    pub environment: Environment,
    pub mail_domain: String,
    pub locale: Locale,
    pub initial_route: Route,
}

impl UIConfig {
    pub fn new(
        environment: Environment,
        mail_domain: String,
        locale: Locale,
        initial_route: Route,
    ) -> Self {
        Self {
            environment,
            mail_domain,
            locale,
            initial_route,
        }
    }
}

/// Application state
pub struct App {
    /// Current-mailbox state with persistence.
    state: MailboxSession,

    /// Receives events from worker threads.
    event_receiver: mpsc::Receiver<WorkerEvent>,

    /// Sends provisioning requests to the provisioner worker.
    command_sender: mpsc::Sender<ProvisionerCommand>,

    /// Sends inbox requests such as opening a message.
    inbox_sender: mpsc::Sender<InboxCommand>,

    /// Publishes the mailbox the inbox fetcher should watch.
    active_mailbox: watch::Sender<Option<Mailbox>>,

    /// Broadcasts shutdown signal to worker threads.
    shutdown_sender: broadcast::Sender<()>,

    /// The environment in which the application is running.
    environment: Environment,

    /// Domain appended to local parts for display.
    mail_domain: String,

    /// Locale-aware string lookup for all rendered text.
    translator: Translator,

    /// The view currently being displayed.
    route: Route,

    /// State of the home view.
    home: HomeState,

    /// Saved-mailbox switcher overlaying the home view.
    switcher: MailboxSwitcher,

    /// Footer with the navigation links.
    footer: Footer,
}

impl App {
    /// Creates a new instance of the application.
    pub fn new(
        state: MailboxSession,
        event_receiver: mpsc::Receiver<WorkerEvent>,
        command_sender: mpsc::Sender<ProvisionerCommand>,
        inbox_sender: mpsc::Sender<InboxCommand>,
        active_mailbox: watch::Sender<Option<Mailbox>>,
        shutdown_sender: broadcast::Sender<()>,
        ui_config: UIConfig,
    ) -> Self {
        let mut switcher = MailboxSwitcher::new(state.store_handle(), state.clock_handle());
        let mut home = HomeState::new();

        // A restored mailbox is already live: record it in the saved list
        // and skip the provisioning phase.
        if let Some(current) = state.current() {
            switcher.record_current(current);
            home.set_mailbox_state(MailboxState::Watching);
        }

        Self {
            state,
            event_receiver,
            command_sender,
            inbox_sender,
            active_mailbox,
            shutdown_sender,
            environment: ui_config.environment,
            mail_domain: ui_config.mail_domain,
            translator: Translator::new(ui_config.locale),
            route: ui_config.initial_route,
            home,
            switcher,
            footer: Footer::new(),
        }
    }

    pub(crate) fn environment(&self) -> Environment {
        self.environment
    }

    pub(crate) fn mail_domain(&self) -> &str {
        &self.mail_domain
    }

    pub(crate) fn translator(&self) -> &Translator {
        &self.translator
    }

    pub(crate) fn session(&self) -> &MailboxSession {
        &self.state
    }

    /// Applies one worker event to the UI state.
    fn handle_worker_event(&mut self, event: WorkerEvent) {
        if let Some(state) = event.mailbox_state {
            self.home.set_mailbox_state(state);
        }
        if event.should_display() {
            self.home.set_status(event.to_string());
        }
        match event.payload {
            Some(EventPayload::MailboxReady(mailbox)) => self.adopt_mailbox(mailbox),
            Some(EventPayload::Messages(messages)) => self.home.replace_messages(messages),
            Some(EventPayload::MessageOpened(body)) => self.home.show_message(body),
            None => {}
        }
    }

    /// Makes the mailbox current everywhere: session state, the fetch
    /// worker, and the saved list.
    fn adopt_mailbox(&mut self, mailbox: Mailbox) {
        self.state.adopt(mailbox.clone());
        let _ = self.active_mailbox.send(Some(mailbox.clone()));
        self.switcher.record_current(&mailbox);
        self.home.reset_inbox();
        self.home.set_mailbox_state(MailboxState::Watching);
    }

    /// Switches to a mailbox the user picked from the switcher.
    fn switch_to(&mut self, mailbox: Mailbox) {
        self.home.set_status(format!(
            "Switched to {}@{}",
            mailbox.address, self.mail_domain
        ));
        self.adopt_mailbox(mailbox);
    }

    fn request_new_mailbox(&mut self) {
        let command = ProvisionerCommand::Provision { address: None };
        match self.command_sender.try_send(command) {
            Ok(()) => self
                .home
                .set_status("Requesting a fresh mailbox...".to_string()),
            Err(_) => self
                .home
                .set_status("Provisioner is busy, try again shortly".to_string()),
        }
    }

    fn open_selected_message(&mut self) {
        let Some((id, subject)) = self
            .home
            .selected()
            .map(|m| (m.id.clone(), m.subject.clone()))
        else {
            return;
        };
        let command = InboxCommand::Open { message_id: id };
        if self.inbox_sender.try_send(command).is_ok() {
            self.home.set_status(format!("Opening \"{}\"...", subject));
        }
    }

    /// Closes the topmost overlay. Returns false when nothing was open,
    /// in which case Esc falls through to quitting.
    fn dismiss_top_layer(&mut self) -> bool {
        self.home.close_message()
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('1') => self.route = Route::Home,
            KeyCode::Char('2') => self.route = Route::PrivacyPolicy,
            KeyCode::Char('3') => self.route = Route::Terms,
            KeyCode::Char('4') => self.route = Route::About,
            KeyCode::Char('s') => {
                if self.route == Route::Home && self.switcher.is_visible() {
                    self.switcher.toggle();
                }
            }
            KeyCode::Char('n') => self.request_new_mailbox(),
            KeyCode::Down | KeyCode::Char('j') => {
                if self.route == Route::Home {
                    if self.home.open_message().is_some() {
                        self.home.scroll_open(1);
                    } else {
                        self.home.select_next();
                    }
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.route == Route::Home {
                    if self.home.open_message().is_some() {
                        self.home.scroll_open(-1);
                    } else {
                        self.home.select_previous();
                    }
                }
            }
            KeyCode::Enter => {
                if self.route == Route::Home {
                    self.open_selected_message();
                }
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: &MouseEvent) {
        // The switcher sees home-view clicks first. An outside click that
        // merely closes its menu reports Ignored and falls through, so the
        // click still reaches the footer links below.
        if self.route == Route::Home {
            match self.switcher.handle_mouse(mouse) {
                SwitcherResponse::Switched(mailbox) => {
                    self.switch_to(mailbox);
                    return;
                }
                SwitcherResponse::Consumed => return,
                SwitcherResponse::Ignored => {}
            }
        }
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(route) = self.footer.route_at(mouse.column, mouse.row) {
                    self.route = route;
                } else if self.route == Route::Home {
                    self.home.select_at(mouse.column, mouse.row);
                }
            }
            MouseEventKind::ScrollDown => {
                if self.route == Route::Home {
                    if self.home.open_message().is_some() {
                        self.home.scroll_open(1);
                    } else {
                        self.home.select_next();
                    }
                }
            }
            MouseEventKind::ScrollUp => {
                if self.route == Route::Home {
                    if self.home.open_message().is_some() {
                        self.home.scroll_open(-1);
                    } else {
                        self.home.select_previous();
                    }
                }
            }
            _ => {}
        }
    }
}

/// Runs the application UI in a loop, handling events and rendering the current view.
pub async fn run<B: Backend>(terminal: &mut Terminal<B>, mut app: App) -> std::io::Result<()> {
    // UI event loop
    loop {
        // Apply all incoming worker events before drawing
        while let Ok(event) = app.event_receiver.try_recv() {
            app.handle_worker_event(event);
        }

        terminal.draw(|f| render(f, &mut app))?;

        // Poll for input events
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    // Skip events that are not KeyEventKind::Press
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }

                    // An open switcher menu reads keys first
                    match app.switcher.handle_key(key.code) {
                        SwitcherResponse::Switched(mailbox) => {
                            app.switch_to(mailbox);
                            continue;
                        }
                        SwitcherResponse::Consumed => continue,
                        SwitcherResponse::Ignored => {}
                    }

                    // Handle exit events
                    match key.code {
                        KeyCode::Char('q') => {
                            // Send shutdown signal to workers
                            let _ = app.shutdown_sender.send(());
                            return Ok(());
                        }
                        KeyCode::Esc => {
                            if !app.dismiss_top_layer() {
                                let _ = app.shutdown_sender.send(());
                                return Ok(());
                            }
                        }
                        code => app.handle_key(code),
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(&mouse),
                _ => {}
            }
        }
    }
}

/// Renders the current view: header, routed content, footer, then overlays.
fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Length(2),
        ])
        .split(f.area());

    if app.route == Route::Home && app.switcher.is_visible() {
        let header_columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Fill(1), Constraint::Length(24)])
            .split(chunks[0]);
        header::render_header(f, header_columns[0], app);
        app.switcher
            .render_button(f, header_columns[1], &app.translator);
    } else {
        header::render_header(f, chunks[0], app);
        app.switcher.clear_areas();
    }

    match app.route.clone() {
        Route::Home => home::render_home(f, chunks[1], &mut app.home, &app.translator),
        Route::PrivacyPolicy => pages::render_privacy_policy(f, chunks[1], &app.translator),
        Route::Terms => pages::render_terms(f, chunks[1], &app.translator),
        Route::About => pages::render_about(f, chunks[1], &app.translator),
        Route::NotFound(path) => pages::render_not_found(f, chunks[1], &path, &app.translator),
    }

    let year = year_of(app.state.now());
    app.footer.render(f, chunks[2], &app.translator, year);

    // Overlays draw last so they sit on top of the home view
    if app.route == Route::Home {
        home::render_open_message(f, &app.home, &app.translator);
        let active = app.state.current().map(|m| m.address.clone());
        app.switcher
            .render_dropdown(f, active.as_deref(), &app.mail_domain, &app.translator);
    }
}

fn year_of(now: i64) -> i32 {
    chrono::DateTime::from_timestamp(now, 0).map_or(1970, |time| time.year())
}

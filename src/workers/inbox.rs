//! Inbox polling with retry backoff

use super::core::EventSender;
use crate::api::MailboxApi;
use crate::clock::Clock;
use crate::consts::cli_consts::inbox_polling;
use crate::events::{Event, EventType, MailboxState};
use crate::logging::{LogLevel, classify_fetch_error};
use crate::mailbox::Mailbox;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};

/// Requests handled by the inbox fetcher between polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboxCommand {
    /// Fetch the full body of one message of the active mailbox.
    Open { message_id: String },
}

/// Polls the active mailbox for mail and reports snapshots as events.
///
/// The active mailbox arrives over a watch channel so a switch takes effect
/// on the next cycle. Failed fetches back off exponentially up to a ceiling;
/// a successful fetch resets the backoff.
pub struct InboxFetcher {
    api: Arc<dyn MailboxApi>,
    clock: Arc<dyn Clock>,
    event_sender: EventSender,
    /// Message IDs already reported for the current mailbox.
    seen: HashSet<String>,
    /// Cleared on mailbox switch so mail predating the session is not
    /// announced as new.
    primed: bool,
    backoff: Duration,
    expiry_announced: bool,
}

impl InboxFetcher {
    pub fn new(api: Arc<dyn MailboxApi>, clock: Arc<dyn Clock>, event_sender: EventSender) -> Self {
        Self {
            api,
            clock,
            event_sender,
            seen: HashSet::new(),
            primed: false,
            backoff: inbox_polling::initial_backoff(),
            expiry_announced: false,
        }
    }

    /// Polls until shutdown or the watch channel closes.
    pub async fn run(
        mut self,
        mut active: watch::Receiver<Option<Mailbox>>,
        mut commands: mpsc::Receiver<InboxCommand>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        let mut delay = Duration::ZERO;
        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                changed = active.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let mailbox = active.borrow_and_update().clone();
                    self.adopt_mailbox(mailbox).await;
                    // Poll the new mailbox right away
                    delay = Duration::ZERO;
                }
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    let mailbox = active.borrow().clone();
                    self.handle_command(command, mailbox.as_ref()).await;
                }
                _ = tokio::time::sleep(delay) => {
                    let mailbox = active.borrow().clone();
                    delay = match mailbox {
                        Some(mailbox) if !mailbox.is_expired(self.clock.now()) => {
                            if self.poll_once(&mailbox).await {
                                self.backoff = inbox_polling::initial_backoff();
                                inbox_polling::poll_interval()
                            } else {
                                self.bump_backoff()
                            }
                        }
                        Some(mailbox) => {
                            self.announce_expiry(&mailbox).await;
                            inbox_polling::poll_interval()
                        }
                        None => inbox_polling::poll_interval(),
                    };
                }
            }
        }
    }

    async fn adopt_mailbox(&mut self, mailbox: Option<Mailbox>) {
        self.seen.clear();
        self.primed = false;
        self.expiry_announced = false;
        self.backoff = inbox_polling::initial_backoff();
        if let Some(mailbox) = mailbox {
            self.event_sender
                .send_event(Event::state_change(
                    MailboxState::Watching,
                    format!("Watching {} for mail", mailbox.address),
                ))
                .await;
        }
    }

    /// Fetches the mailbox once. Returns false when the fetch failed.
    async fn poll_once(&mut self, mailbox: &Mailbox) -> bool {
        match self.api.fetch_messages(mailbox).await {
            Ok(messages) => {
                if self.primed {
                    for summary in messages.iter().filter(|m| !self.seen.contains(&m.id)) {
                        self.event_sender
                            .send_inbox_event(
                                format!("New mail: {}", summary.listing_line()),
                                EventType::Success,
                                LogLevel::Info,
                            )
                            .await;
                    }
                }
                self.seen = messages.iter().map(|m| m.id.clone()).collect();
                self.primed = true;

                let count = messages.len();
                self.event_sender
                    .send_event(Event::messages_fetched(
                        messages,
                        format!("Inbox refreshed, {} message(s)", count),
                    ))
                    .await;
                true
            }
            Err(e) => {
                let log_level = classify_fetch_error(&e);
                self.event_sender
                    .send_inbox_event(
                        format!("Failed to fetch inbox: {}", e),
                        EventType::Error,
                        log_level,
                    )
                    .await;
                false
            }
        }
    }

    async fn handle_command(&mut self, command: InboxCommand, mailbox: Option<&Mailbox>) {
        match command {
            InboxCommand::Open { message_id } => self.open_message(&message_id, mailbox).await,
        }
    }

    /// Fetches one full message body and reports it as an event payload.
    async fn open_message(&mut self, message_id: &str, mailbox: Option<&Mailbox>) {
        let Some(mailbox) = mailbox else {
            self.event_sender
                .send_inbox_event(
                    "No active mailbox to open mail from".to_string(),
                    EventType::Waiting,
                    LogLevel::Debug,
                )
                .await;
            return;
        };
        match self.api.fetch_message(mailbox, message_id).await {
            Ok(body) => {
                let subject = body.subject.clone();
                self.event_sender
                    .send_event(Event::message_opened(
                        body,
                        format!("Opened message: {}", subject),
                    ))
                    .await;
            }
            Err(e) => {
                let log_level = classify_fetch_error(&e);
                self.event_sender
                    .send_inbox_event(
                        format!("Failed to open message: {}", e),
                        EventType::Error,
                        log_level,
                    )
                    .await;
            }
        }
    }

    async fn announce_expiry(&mut self, mailbox: &Mailbox) {
        if self.expiry_announced {
            return;
        }
        self.expiry_announced = true;
        self.event_sender
            .send_inbox_event(
                format!("Mailbox {} expired", mailbox.address),
                EventType::Waiting,
                LogLevel::Warn,
            )
            .await;
    }

    /// Current retry delay; doubles for next time up to the ceiling.
    fn bump_backoff(&mut self) -> Duration {
        let delay = self.backoff;
        self.backoff = (self.backoff * 2).min(inbox_polling::max_backoff());
        delay
    }
}

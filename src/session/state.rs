//! Active-mailbox state shared by the TUI and headless modes.
//!
//! The mailbox that was active when the client last ran is persisted under
//! its own storage key, so a restart inside the validity window resumes the
//! same address instead of provisioning a fresh one.

use crate::clock::Clock;
use crate::consts::cli_consts::CURRENT_MAILBOX_KEY;
use crate::mailbox::Mailbox;
use crate::storage::KeyValueStore;
use std::sync::Arc;

pub struct MailboxSession {
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    current: Option<Mailbox>,
}

impl MailboxSession {
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            current: None,
        }
    }

    pub fn current(&self) -> Option<&Mailbox> {
        self.current.as_ref()
    }

    /// Current time from the injected clock.
    pub fn now(&self) -> i64 {
        self.clock.now()
    }

    pub(crate) fn store_handle(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    pub(crate) fn clock_handle(&self) -> Arc<dyn Clock> {
        self.clock.clone()
    }

    /// Restores the persisted mailbox if it has not expired yet.
    ///
    /// Unreadable or corrupt records are logged and treated as absent; they
    /// never abort startup.
    pub fn restore(&mut self) -> Option<&Mailbox> {
        let raw = match self.store.get(CURRENT_MAILBOX_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Could not read persisted mailbox: {}", e);
                return None;
            }
        };
        match serde_json::from_str::<Mailbox>(&raw) {
            Ok(mailbox) if !mailbox.is_expired(self.clock.now()) => {
                self.current = Some(mailbox);
                self.current.as_ref()
            }
            Ok(_) => None,
            Err(e) => {
                log::warn!("Ignoring corrupt persisted mailbox: {}", e);
                None
            }
        }
    }

    /// Adopts a mailbox as current and persists it for the next run.
    ///
    /// Persistence failures are logged and swallowed; the in-memory session
    /// keeps working either way.
    pub fn adopt(&mut self, mailbox: Mailbox) {
        match serde_json::to_string(&mailbox) {
            Ok(raw) => {
                if let Err(e) = self.store.set(CURRENT_MAILBOX_KEY, &raw) {
                    log::warn!("Failed to persist current mailbox: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize current mailbox: {}", e),
        }
        self.current = Some(mailbox);
    }
}

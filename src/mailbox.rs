//! Mailbox records and the saved-mailbox list.
//!
//! A mailbox is a temporary address plus its expiry timestamp. The client
//! remembers every mailbox the user has activated in an ordered list so the
//! switcher can offer them again; expired records are dropped on every read
//! and every write of that list.

use serde::{Deserialize, Serialize};

/// A temporary mailbox handed out by the backend.
///
/// `address` is the local part only; the display domain is supplied
/// separately. Fields this client does not understand are carried through
/// load/store untouched so records written by other frontends survive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mailbox {
    pub address: String,
    /// Seconds since the Unix epoch after which the record is stale.
    pub expires_at: i64,
    /// Backend access credential; opaque to the UI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Mailbox {
    pub fn new(address: impl Into<String>, expires_at: i64) -> Self {
        Self {
            address: address.into(),
            expires_at,
            token: None,
            extra: serde_json::Map::new(),
        }
    }

    /// A record is valid strictly before its expiry instant.
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at <= now
    }

    /// Seconds of validity left, clamped to zero.
    pub fn remaining_secs(&self, now: i64) -> i64 {
        (self.expires_at - now).max(0)
    }
}

/// Drops records whose expiry has passed, preserving order.
pub fn prune_expired(mailboxes: Vec<Mailbox>, now: i64) -> Vec<Mailbox> {
    mailboxes.into_iter().filter(|m| !m.is_expired(now)).collect()
}

/// Insert-or-update keyed by `address`: an existing record is replaced in
/// place (position and length unchanged), a new one is appended.
pub fn upsert(mailboxes: &mut Vec<Mailbox>, mailbox: Mailbox) {
    match mailboxes.iter_mut().find(|m| m.address == mailbox.address) {
        Some(existing) => *existing = mailbox,
        None => mailboxes.push(mailbox),
    }
}

/// Parses the stored saved-mailbox document.
pub fn decode_list(raw: &str) -> Result<Vec<Mailbox>, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Serializes the saved-mailbox document for storage.
pub fn encode_list(mailboxes: &[Mailbox]) -> Result<String, serde_json::Error> {
    serde_json::to_string(mailboxes)
}

//! Event System
//!
//! Types and implementations for worker events and logging

use crate::logging::{LogLevel, should_log_with_env};
use crate::mailbox::Mailbox;
use crate::message::{MessageBody, MessageSummary};
use chrono::Local;
use std::fmt::Display;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Worker {
    /// Worker that provisions mailboxes from the service.
    Provisioner,
    /// Worker that polls the active mailbox for new messages.
    InboxFetcher,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum EventType {
    Success,
    Error,
    Refresh,
    Waiting,
    StateChange,
}

/// Represents the current state of the mailbox lifecycle
#[derive(Debug, Copy, Clone, Eq, PartialEq, strum::Display)]
pub enum MailboxState {
    /// Requesting a mailbox from the service
    Provisioning,
    /// Polling the active mailbox for mail (idle state)
    Watching,
}

/// Data carried by an event for the UI to consume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventPayload {
    /// A mailbox finished provisioning and is ready to use.
    MailboxReady(Mailbox),
    /// A fresh snapshot of the active mailbox's message list.
    Messages(Vec<MessageSummary>),
    /// The full body of a message the user asked to read.
    MessageOpened(MessageBody),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub worker: Worker,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
    /// Optional state information for state change events
    pub mailbox_state: Option<MailboxState>,
    /// Optional data attached to the event
    pub payload: Option<EventPayload>,
}

impl Event {
    fn new(worker: Worker, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            worker,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
            mailbox_state: None,
            payload: None,
        }
    }

    pub fn state_change(state: MailboxState, msg: String) -> Self {
        Self {
            mailbox_state: Some(state),
            ..Self::new(
                Worker::Provisioner,
                msg,
                EventType::StateChange,
                LogLevel::Info,
            )
        }
    }

    pub fn provisioner_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Worker::Provisioner, msg, event_type, log_level)
    }

    pub fn inbox_with_level(msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self::new(Worker::InboxFetcher, msg, event_type, log_level)
    }

    /// A provisioned mailbox, attached so the UI can adopt it.
    pub fn mailbox_ready(mailbox: Mailbox, msg: String) -> Self {
        Self {
            payload: Some(EventPayload::MailboxReady(mailbox)),
            ..Self::new(Worker::Provisioner, msg, EventType::Success, LogLevel::Info)
        }
    }

    /// A message-list snapshot, attached so the UI can replace its inbox.
    pub fn messages_fetched(messages: Vec<MessageSummary>, msg: String) -> Self {
        Self {
            payload: Some(EventPayload::Messages(messages)),
            ..Self::new(Worker::InboxFetcher, msg, EventType::Refresh, LogLevel::Debug)
        }
    }

    /// A full message body, attached so the UI can show the open message.
    pub fn message_opened(body: MessageBody, msg: String) -> Self {
        Self {
            payload: Some(EventPayload::MessageOpened(body)),
            ..Self::new(Worker::InboxFetcher, msg, EventType::Success, LogLevel::Info)
        }
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        // StateChange events should be handled separately (not displayed in logs)
        if self.event_type == EventType::StateChange {
            return false;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}] {}", self.event_type, self.timestamp, self.msg)
    }
}

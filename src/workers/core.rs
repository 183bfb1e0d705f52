//! Core worker utilities and traits

use crate::environment::Environment;
use crate::events::{Event, EventType};
use crate::logging::LogLevel;
use tokio::sync::mpsc;

/// Common event sending utilities for workers
#[derive(Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Send a generic event
    pub async fn send_event(&self, event: Event) {
        let _ = self.sender.send(event).await;
    }

    pub async fn send_provisioner_event(
        &self,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        let _ = self
            .sender
            .send(Event::provisioner_with_level(message, event_type, log_level))
            .await;
    }

    pub async fn send_inbox_event(
        &self,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        let _ = self
            .sender
            .send(Event::inbox_with_level(message, event_type, log_level))
            .await;
    }
}

/// Worker configuration shared across all worker types
#[derive(Clone)]
pub struct WorkerConfig {
    pub environment: Environment,
    /// Domain appended to local parts in user-facing messages.
    pub mail_domain: String,
}

impl WorkerConfig {
    pub fn new(environment: Environment, mail_domain: String) -> Self {
        Self {
            environment,
            mail_domain,
        }
    }
}

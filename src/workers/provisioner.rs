//! Mailbox provisioning worker

use super::core::{EventSender, WorkerConfig};
use crate::api::MailboxApi;
use crate::events::{Event, EventType, MailboxState};
use crate::logging::classify_fetch_error;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Requests handled by the provisioner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProvisionerCommand {
    /// Provision a mailbox, optionally reserving a specific local part.
    Provision { address: Option<String> },
}

/// Provisions mailboxes on demand and reports the result as events.
pub struct Provisioner {
    api: Arc<dyn MailboxApi>,
    event_sender: EventSender,
    config: WorkerConfig,
}

impl Provisioner {
    pub fn new(api: Arc<dyn MailboxApi>, event_sender: EventSender, config: WorkerConfig) -> Self {
        Self {
            api,
            event_sender,
            config,
        }
    }

    /// Serves provisioning commands until shutdown or the command channel closes.
    pub async fn run(
        self,
        mut commands: mpsc::Receiver<ProvisionerCommand>,
        mut shutdown: broadcast::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.recv() => break,
                command = commands.recv() => match command {
                    Some(ProvisionerCommand::Provision { address }) => {
                        self.provision(address.as_deref()).await;
                    }
                    None => break,
                },
            }
        }
    }

    async fn provision(&self, address: Option<&str>) {
        self.event_sender
            .send_event(Event::state_change(
                MailboxState::Provisioning,
                "Requesting a mailbox...".to_string(),
            ))
            .await;

        match self.api.create_mailbox(address).await {
            Ok(mailbox) => {
                let msg = format!(
                    "Mailbox {}@{} ready",
                    mailbox.address, self.config.mail_domain
                );
                self.event_sender
                    .send_event(Event::mailbox_ready(mailbox, msg))
                    .await;
            }
            Err(e) => {
                let log_level = classify_fetch_error(&e);
                self.event_sender
                    .send_provisioner_event(
                        format!("Failed to provision mailbox: {}", e),
                        EventType::Error,
                        log_level,
                    )
                    .await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMailboxApi;
    use crate::api::error::ApiError;
    use crate::events::EventPayload;
    use crate::logging::LogLevel;
    use crate::mailbox::Mailbox;

    fn harness(api: MockMailboxApi) -> (Provisioner, mpsc::Receiver<Event>) {
        let (event_tx, event_rx) = mpsc::channel(16);
        let config = WorkerConfig::new(crate::environment::Environment::Local, "test.local".into());
        let provisioner = Provisioner::new(Arc::new(api), EventSender::new(event_tx), config);
        (provisioner, event_rx)
    }

    #[tokio::test]
    /// A successful provision emits a state change followed by the mailbox payload.
    async fn provision_reports_ready_mailbox() {
        let mut api = MockMailboxApi::new();
        api.expect_create_mailbox()
            .withf(|address| address.is_none())
            .returning(|_| Ok(Mailbox::new("falcon", 9_999)));

        let (provisioner, mut events) = harness(api);
        provisioner.provision(None).await;

        let first = events.recv().await.unwrap();
        assert_eq!(first.event_type, EventType::StateChange);
        assert_eq!(first.mailbox_state, Some(MailboxState::Provisioning));

        let second = events.recv().await.unwrap();
        assert_eq!(second.event_type, EventType::Success);
        match second.payload {
            Some(EventPayload::MailboxReady(mailbox)) => assert_eq!(mailbox.address, "falcon"),
            other => panic!("expected mailbox payload, got {:?}", other),
        }
        assert!(second.msg.contains("falcon@test.local"));
    }

    #[tokio::test]
    /// Requested local parts are forwarded to the service.
    async fn provision_passes_requested_address() {
        let mut api = MockMailboxApi::new();
        api.expect_create_mailbox()
            .withf(|address| *address == Some("wanted"))
            .returning(|_| Ok(Mailbox::new("wanted", 9_999)));

        let (provisioner, mut events) = harness(api);
        provisioner.provision(Some("wanted")).await;

        let _ = events.recv().await.unwrap();
        let second = events.recv().await.unwrap();
        assert_eq!(second.event_type, EventType::Success);
    }

    #[tokio::test]
    /// Failures surface as error events instead of panics.
    async fn provision_failure_emits_error_event() {
        let mut api = MockMailboxApi::new();
        api.expect_create_mailbox().returning(|_| {
            Err(ApiError::Http {
                status: 503,
                message: "unavailable".to_string(),
            })
        });

        let (provisioner, mut events) = harness(api);
        provisioner.provision(None).await;

        let _ = events.recv().await.unwrap();
        let second = events.recv().await.unwrap();
        assert_eq!(second.event_type, EventType::Error);
        assert_eq!(second.log_level, LogLevel::Warn);
        assert!(second.payload.is_none());
    }
}

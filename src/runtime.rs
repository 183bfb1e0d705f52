//! Simplified runtime for coordinating the background workers

use crate::api::MailboxApi;
use crate::clock::Clock;
use crate::events::Event;
use crate::mailbox::Mailbox;
use crate::workers::core::{EventSender, WorkerConfig};
use crate::workers::inbox::{InboxCommand, InboxFetcher};
use crate::workers::provisioner::{Provisioner, ProvisionerCommand};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

/// Channels the UI uses to drive the workers.
pub struct WorkerHandles {
    /// Receives events from worker threads.
    pub event_receiver: mpsc::Receiver<Event>,
    /// Sends provisioning requests.
    pub command_sender: mpsc::Sender<ProvisionerCommand>,
    /// Sends inbox requests such as opening a message.
    pub inbox_sender: mpsc::Sender<InboxCommand>,
    /// Publishes the mailbox the inbox fetcher should watch.
    pub active_mailbox: watch::Sender<Option<Mailbox>>,
    pub join_handles: Vec<JoinHandle<()>>,
}

/// Start the provisioner and inbox fetcher workers
pub async fn start_workers(
    api: Arc<dyn MailboxApi>,
    clock: Arc<dyn Clock>,
    config: WorkerConfig,
    shutdown: broadcast::Receiver<()>,
) -> WorkerHandles {
    let (event_sender, event_receiver) =
        mpsc::channel::<Event>(crate::consts::cli_consts::EVENT_QUEUE_SIZE);
    let (command_sender, command_receiver) = mpsc::channel::<ProvisionerCommand>(8);
    let (inbox_sender, inbox_receiver) = mpsc::channel::<InboxCommand>(8);
    let (active_mailbox, active_receiver) = watch::channel::<Option<Mailbox>>(None);

    let mut join_handles = Vec::new();

    let provisioner = Provisioner::new(api.clone(), EventSender::new(event_sender.clone()), config);
    let provisioner_shutdown = shutdown.resubscribe();
    join_handles.push(tokio::spawn(async move {
        provisioner.run(command_receiver, provisioner_shutdown).await;
    }));

    let fetcher = InboxFetcher::new(api, clock, EventSender::new(event_sender));
    join_handles.push(tokio::spawn(async move {
        fetcher.run(active_receiver, inbox_receiver, shutdown).await;
    }));

    WorkerHandles {
        event_receiver,
        command_sender,
        inbox_sender,
        active_mailbox,
        join_handles,
    }
}

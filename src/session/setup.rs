//! Session setup and initialization

use super::state::MailboxSession;
use crate::api::{ApiClient, MailboxApi};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::environment::Environment;
use crate::events::Event;
use crate::mailbox::Mailbox;
use crate::runtime::start_workers;
use crate::storage::{FileStore, KeyValueStore};
use crate::workers::core::WorkerConfig;
use crate::workers::inbox::InboxCommand;
use crate::workers::provisioner::ProvisionerCommand;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;

/// Session data for both TUI and headless modes
pub struct SessionData {
    /// Event receiver for worker events
    pub event_receiver: mpsc::Receiver<Event>,
    /// Sends provisioning requests to the provisioner worker
    pub command_sender: mpsc::Sender<ProvisionerCommand>,
    /// Sends inbox requests such as opening a message
    pub inbox_sender: mpsc::Sender<InboxCommand>,
    /// Publishes the mailbox the inbox fetcher should watch
    pub active_mailbox: watch::Sender<Option<Mailbox>>,
    /// Join handles for worker tasks
    pub join_handles: Vec<JoinHandle<()>>,
    /// Shutdown sender to stop all workers
    pub shutdown_sender: broadcast::Sender<()>,
    /// Current-mailbox state with persistence
    pub state: MailboxSession,
    /// The environment this session talks to
    pub environment: Environment,
    /// Resolved configuration
    pub config: Config,
    /// Domain appended to local parts for display
    pub mail_domain: String,
}

/// Sets up a client session
///
/// This function handles all the common setup required for both TUI and headless modes:
/// 1. Opens the state store and API client
/// 2. Sets up shutdown channel and starts workers
/// 3. Restores the persisted mailbox, or requests a new one
/// 4. Returns session data for mode-specific handling
///
/// # Arguments
/// * `config` - Resolved configuration
/// * `env` - Environment to connect to
/// * `requested_address` - Optional local part to reserve when provisioning
///
/// # Returns
/// * `Ok(SessionData)` - Successfully set up session
/// * `Err` - Session setup failed
pub async fn setup_session(
    config: Config,
    env: Environment,
    requested_address: Option<String>,
) -> Result<SessionData, Box<dyn Error>> {
    let mail_domain = config.mail_domain(env);

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(crate::config::state_dir()?));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let api: Arc<dyn MailboxApi> = Arc::new(ApiClient::new(env, config.api_url(env)));

    // Create shutdown channel - only one shutdown signal needed
    let (shutdown_sender, _) = broadcast::channel(1);

    let worker_config = WorkerConfig::new(env, mail_domain.clone());
    let handles = start_workers(
        api,
        clock.clone(),
        worker_config,
        shutdown_sender.subscribe(),
    )
    .await;

    let mut state = MailboxSession::new(store, clock);

    // Resume the previous mailbox when it is still valid, otherwise ask the
    // provisioner for a fresh one.
    if state.restore().is_some() {
        let _ = handles.active_mailbox.send(state.current().cloned());
    } else {
        handles
            .command_sender
            .send(ProvisionerCommand::Provision {
                address: requested_address,
            })
            .await?;
    }

    Ok(SessionData {
        event_receiver: handles.event_receiver,
        command_sender: handles.command_sender,
        inbox_sender: handles.inbox_sender,
        active_mailbox: handles.active_mailbox,
        join_handles: handles.join_handles,
        shutdown_sender,
        state,
        environment: env,
        config,
        mail_domain,
    })
}

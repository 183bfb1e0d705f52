// Copyright (c) 2025 Driftmail. All rights reserved.

mod address;
mod api;
mod cli_messages;
mod clock;
mod config;
mod consts;
mod environment;
mod events;
mod i18n;
mod logging;
mod mailbox;
mod message;
mod route;
mod runtime;
mod session;
mod storage;
mod ui;
mod workers;

use crate::api::{ApiClient, MailboxApi};
use crate::clock::{Clock, SystemClock};
use crate::config::{Config, get_config_path};
use crate::consts::cli_consts::{CURRENT_MAILBOX_KEY, SAVED_MAILBOXES_KEY};
use crate::environment::Environment;
use crate::route::Route;
use crate::session::{MailboxSession, run_headless_mode, run_tui_mode, setup_session};
use crate::storage::{FileStore, KeyValueStore};
use clap::{Parser, Subcommand};
use std::error::Error;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line arguments
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the mail client
    Start {
        /// Run without the TUI, printing mailbox events to stdout.
        #[arg(long)]
        headless: bool,

        /// View to open first, as a path such as "/privacy-policy".
        #[arg(long, value_name = "PATH")]
        route: Option<String>,

        /// Local part to request when provisioning, e.g. "falcon".
        #[arg(long, value_name = "ADDRESS")]
        address: Option<String>,
    },
    /// Provision a fresh mailbox and make it the current one
    New {
        /// Local part to request. A random address is assigned when omitted.
        #[arg(long, value_name = "ADDRESS")]
        address: Option<String>,
    },
    /// Print the current mailbox address
    Address,
    /// Clear the persisted mailbox state
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let environment_str = std::env::var("DRIFTMAIL_ENVIRONMENT").unwrap_or_default();
    let environment = environment_str
        .parse::<Environment>()
        .unwrap_or(Environment::default());

    let args = Args::parse();
    match args.command {
        Command::Start {
            headless,
            route,
            address,
        } => {
            validate_requested_address(address.as_deref())?;
            let config = load_config()?;
            let session = setup_session(config, environment, address).await?;
            if headless {
                run_headless_mode(session).await
            } else {
                let initial_route = route.as_deref().map_or(Route::Home, Route::from_path);
                run_tui_mode(session, initial_route).await
            }
        }
        Command::New { address } => {
            validate_requested_address(address.as_deref())?;
            let config = load_config()?;
            new_mailbox(config, environment, address.as_deref()).await
        }
        Command::Address => {
            let config = load_config()?;
            show_address(&config, environment)
        }
        Command::Reset => reset_state(),
    }
}

fn load_config() -> Result<Config, Box<dyn Error>> {
    let config_path = get_config_path()?;
    Ok(Config::load_or_default(&config_path))
}

/// Rejects local parts the service would refuse, before any network call.
fn validate_requested_address(address: Option<&str>) -> Result<(), Box<dyn Error>> {
    let Some(address) = address else {
        return Ok(());
    };
    if address::is_valid_local_part(address) {
        return Ok(());
    }
    Err(Box::from(format!(
        "Invalid mailbox address: {}. Use 3 to 30 lowercase letters, digits, '.', '_' or '-', starting and ending with a letter or digit.",
        address
    )))
}

/// Provisions a mailbox without starting a session and persists it as
/// current, so the next `start` resumes it.
async fn new_mailbox(
    config: Config,
    env: Environment,
    address: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    print_cmd_info!(
        "Provisioning",
        "Requesting a mailbox in environment: {}",
        env
    );
    let client = ApiClient::new(env, config.api_url(env));
    let mailbox = client.create_mailbox(address).await?;

    let minutes = mailbox.remaining_secs(SystemClock.now()) / 60;
    print_cmd_success!(
        "Mailbox ready",
        "{}@{} (about {} minutes left)",
        mailbox.address,
        config.mail_domain(env),
        minutes
    );

    let mut session = MailboxSession::new(
        Arc::new(FileStore::new(config::state_dir()?)),
        Arc::new(SystemClock),
    );
    session.adopt(mailbox);
    Ok(())
}

/// Prints the persisted mailbox, if one is still valid.
fn show_address(config: &Config, env: Environment) -> Result<(), Box<dyn Error>> {
    let mut session = MailboxSession::new(
        Arc::new(FileStore::new(config::state_dir()?)),
        Arc::new(SystemClock),
    );
    match session.restore() {
        Some(mailbox) => {
            println!("{}@{}", mailbox.address, config.mail_domain(env));
            let minutes = mailbox.remaining_secs(SystemClock.now()) / 60;
            print_cmd_info!("Expiry", "about {} minutes left", minutes);
            Ok(())
        }
        None => {
            print_cmd_warn!(
                "No mailbox",
                "Nothing provisioned yet. Run `driftmail new` or `driftmail start`."
            );
            Ok(())
        }
    }
}

/// Clears the current-mailbox record and the saved list.
fn reset_state() -> Result<(), Box<dyn Error>> {
    let store = FileStore::new(config::state_dir()?);
    store.remove(CURRENT_MAILBOX_KEY)?;
    store.remove(SAVED_MAILBOXES_KEY)?;
    print_cmd_success!("Reset", "Cleared the persisted mailbox state.");
    Ok(())
}

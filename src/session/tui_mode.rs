//! TUI mode execution

use super::{
    SessionData,
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::route::Route;
use crate::ui;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{error::Error, io};

/// Runs the application in TUI mode
///
/// This function handles:
/// 1. Terminal setup and cleanup
/// 2. UI application initialization and execution
/// 3. Proper shutdown handling
///
/// # Arguments
/// * `session` - Session data from setup
/// * `initial_route` - View to open first, e.g. from a `--route` deep link
///
/// # Returns
/// * `Ok(())` - TUI mode completed successfully
/// * `Err` - TUI mode failed
pub async fn run_tui_mode(
    session: SessionData,
    initial_route: Route,
) -> Result<(), Box<dyn Error>> {
    // Print session start message
    print_session_starting("TUI", session.state.current().map(|m| m.address.as_str()));

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Initialize the terminal with Crossterm backend
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create the application and run it
    let join_handles = session.join_handles;
    let shutdown_sender = session.shutdown_sender.clone();
    let ui_config = ui::UIConfig::new(
        session.environment,
        session.mail_domain,
        session.config.locale(),
        initial_route,
    );

    let app = ui::App::new(
        session.state,
        session.event_receiver,
        session.command_sender,
        session.inbox_sender,
        session.active_mailbox,
        shutdown_sender,
        ui_config,
    );

    let result = ui::run(&mut terminal, app).await;

    // Clean up the terminal after running the application
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Handle the result
    result?;

    // Wait for workers to finish
    print_session_shutdown();
    for handle in join_handles {
        let _ = handle.await;
    }
    print_session_exit_success();

    Ok(())
}

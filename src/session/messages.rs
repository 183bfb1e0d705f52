//! Session lifecycle messages printed around the TUI and headless runs.

// ANSI Color Codes for session messages
const COLOR_INFO: &str = "\x1b[1;36m"; // Bold Cyan
const COLOR_SUCCESS: &str = "\x1b[1;32m"; // Bold Green
const COLOR_RESET: &str = "\x1b[0m";

fn print_info(msg: &str) {
    println!("{}[INFO]{} {}", COLOR_INFO, COLOR_RESET, msg);
}

fn print_success(msg: &str) {
    println!("{}[SUCCESS]{} {}", COLOR_SUCCESS, COLOR_RESET, msg);
}

/// Announces the mode and, when one was restored, the mailbox it resumes.
pub fn print_session_starting(mode: &str, address: Option<&str>) {
    match address {
        Some(address) => print_info(&format!(
            "Starting {} mode with mailbox: {}",
            mode, address
        )),
        None => print_info(&format!(
            "Starting {} mode, provisioning a mailbox...",
            mode
        )),
    }
}

/// Print session shutdown message
pub fn print_session_shutdown() {
    print_info("Shutting down...");
}

/// Print session exit message
pub fn print_session_exit_success() {
    print_success("Driftmail exited successfully");
}

// Module declarations
mod app;
mod footer;
mod header;
mod home;
mod pages;
mod switcher;
// Re-exports for external use
pub use app::{App, UIConfig, run};

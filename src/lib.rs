// cntrl library - telemetry and control for the desktop agent

// Re-export error types
pub mod error;
pub use error::{CntrlError, Result};

// Module declarations
pub mod commands;
pub mod core;
pub mod platform;
pub mod ui;

// Re-export commonly used types
pub use core::config::Config;
pub use core::Agent;

// Initialize logging. RUST_LOG still wins over the default level.
pub fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

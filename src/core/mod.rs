// Core business logic module

pub mod agent;
pub mod config;
pub mod control;
pub mod telemetry;

// Re-export commonly used items
pub use agent::Agent;
pub use config::Config;
pub use telemetry::Telemetry;

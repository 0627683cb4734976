// UI and formatting module

pub mod formatters;
pub mod system_formatters;

// Re-export commonly used items for cleaner imports
pub use formatters::{format_bytes, format_cpu_time, format_percent, format_uptime};

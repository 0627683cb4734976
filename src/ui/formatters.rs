use colored::*;
use humansize::{format_size, BINARY};

/// Format a byte count in binary units (KiB, MiB, GiB).
pub fn format_bytes(bytes: u64) -> String {
    format_size(bytes, BINARY)
}

/// Format seconds since boot as `3d 4h 12m`.
pub fn format_uptime(seconds: u64) -> String {
    let days = seconds / 86_400;
    let hours = (seconds % 86_400) / 3_600;
    let minutes = (seconds % 3_600) / 60;

    if days > 0 {
        format!("{}d {}h {}m", days, hours, minutes)
    } else if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

/// Percentage colored by pressure: green below 60, yellow below 85, red above.
pub fn format_percent(value: f64) -> ColoredString {
    let text = format!("{:.1}%", value);
    if value >= 85.0 {
        text.red()
    } else if value >= 60.0 {
        text.yellow()
    } else {
        text.green()
    }
}

/// Format accumulated CPU seconds as `1h 02m 03s`, `2m 05s` or `4.2s`.
pub fn format_cpu_time(seconds: f64) -> String {
    if seconds < 60.0 {
        return format!("{:.1}s", seconds);
    }
    let total = seconds as u64;
    let (h, m, s) = (total / 3600, (total % 3600) / 60, total % 60);
    if h > 0 {
        format!("{}h {:02}m {:02}s", h, m, s)
    } else {
        format!("{}m {:02}s", m, s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(59), "0m");
        assert_eq!(format_uptime(3 * 3600 + 5 * 60), "3h 5m");
        assert_eq!(format_uptime(2 * 86_400 + 3600), "2d 1h 0m");
    }

    #[test]
    fn test_format_cpu_time() {
        assert_eq!(format_cpu_time(4.31), "4.3s");
        assert_eq!(format_cpu_time(125.0), "2m 05s");
        assert_eq!(format_cpu_time(3723.0), "1h 02m 03s");
    }
}

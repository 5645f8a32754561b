use chrono::{DateTime, Utc};

/// Format a creation timestamp like `May 1, 2024`.
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%b %-d, %Y").to_string()
}

/// Format a byte count as `X.Y MB` above one mebibyte, else as whole `KB`.
pub fn format_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes > MIB {
        format!("{:.1} MB", bytes as f64 / MIB as f64)
    } else {
        format!("{} KB", (bytes as f64 / 1024.0).round() as u64)
    }
}

/// Format seconds as `M:SS`. Negative and non-finite inputs render as `0:00`.
pub fn format_time(seconds: f64) -> String {
    let secs = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    format!("{}:{:02}", secs / 60, secs % 60)
}

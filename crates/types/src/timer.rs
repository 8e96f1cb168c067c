//! Countdown display helpers

/// Format whole seconds as `M:SS` (minutes are not wrapped into hours)
pub fn format_clock(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}", minutes, seconds)
}

/// Convert a duration item's minute value to seconds
pub fn minutes_to_seconds(minutes: u32) -> u64 {
    u64::from(minutes) * 60
}

//! Clock string formatting for the time indicator and timeline labels

/// Format a millisecond timestamp as `MM:SS`, `HH:MM:SS` when an hour is
/// reached, with an optional `:CC` centisecond suffix
///
/// Negative values are prefixed with a sign (rubber-band overshoot can
/// momentarily report a negative indicator position).
pub fn format_timer(ms: i64, include_centis: bool) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let abs_ms = ms.unsigned_abs();

    let hours = abs_ms / 3_600_000;
    let minutes = (abs_ms % 3_600_000) / 60_000;
    let seconds = (abs_ms % 60_000) / 1000;
    let centis = (((abs_ms % 1000) as f64 / 10.0).round() as u64).min(99);

    let mut parts: Vec<u64> = Vec::with_capacity(4);
    if hours > 0 {
        parts.push(hours);
    }
    parts.push(minutes);
    parts.push(seconds);
    if include_centis {
        parts.push(centis);
    }

    let joined = parts
        .iter()
        .map(|part| format!("{:02}", part))
        .collect::<Vec<_>>()
        .join(":");
    format!("{}{}", sign, joined)
}

/// Format a second count as `MM:SS`
pub fn format_seconds(seconds: u64) -> String {
    let minutes = (seconds % 3600) / 60;
    let remaining = seconds % 60;
    format!("{:02}:{:02}", minutes, remaining)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timer_basic() {
        assert_eq!(format_timer(0, false), "00:00");
        assert_eq!(format_timer(65_000, false), "01:05");
        assert_eq!(format_timer(119_900, false), "01:59");
    }

    #[test]
    fn test_format_timer_includes_hours_only_when_reached() {
        assert_eq!(format_timer(3_600_000, false), "01:00:00");
        assert_eq!(format_timer(3_599_000, false), "59:59");
    }

    #[test]
    fn test_format_timer_centiseconds() {
        assert_eq!(format_timer(1_234, true), "00:01:23");
        // Rounding never spills into a fourth digit pair
        assert_eq!(format_timer(59_999, true), "00:59:99");
    }

    #[test]
    fn test_format_timer_negative() {
        assert_eq!(format_timer(-61_000, false), "-01:01");
    }

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0), "00:00");
        assert_eq!(format_seconds(90), "01:30");
        assert_eq!(format_seconds(3725), "02:05");
    }
}

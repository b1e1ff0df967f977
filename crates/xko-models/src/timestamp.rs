//! Timestamp formatting for reports and clip overlays.

/// Format seconds as `MM:SS`, or `HH:MM:SS` once the value reaches an hour.
///
/// Fractional seconds are truncated. Negative and non-finite input is treated as zero.
///
/// # Examples
/// ```
/// use xko_models::timestamp::format_clock;
/// assert_eq!(format_clock(75.9), "01:15");
/// assert_eq!(format_clock(3725.0), "01:02:05");
/// ```
pub fn format_clock(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{:02}:{:02}", minutes, secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock_minutes() {
        assert_eq!(format_clock(0.0), "00:00");
        assert_eq!(format_clock(59.99), "00:59");
        assert_eq!(format_clock(90.0), "01:30");
    }

    #[test]
    fn test_format_clock_hours() {
        assert_eq!(format_clock(3600.0), "01:00:00");
        assert_eq!(format_clock(3661.5), "01:01:01");
    }

    #[test]
    fn test_format_clock_invalid_input() {
        assert_eq!(format_clock(-4.0), "00:00");
        assert_eq!(format_clock(f64::NAN), "00:00");
    }
}

//! Time formatting helpers

/// Format a number of seconds as MM:SS
pub fn format_time(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_minutes_and_seconds() {
        assert_eq!(format_time(0), "00:00");
        assert_eq!(format_time(5), "00:05");
        assert_eq!(format_time(360), "06:00");
        assert_eq!(format_time(725), "12:05");
        assert_eq!(format_time(1200), "20:00");
    }
}

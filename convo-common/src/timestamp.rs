//! Transcript timestamp parsing
//!
//! Transcript lines are optionally prefixed `HH:MM:SS `. Replay pacing is
//! derived from the difference between consecutive parsed timestamps.

use chrono::NaiveTime;
use std::time::Duration;

/// Parse a leading `HH:MM:SS` timestamp, if present.
pub fn leading_timestamp(line: &str) -> Option<NaiveTime> {
    let head = line.get(0..8)?;
    NaiveTime::parse_from_str(head, "%H:%M:%S").ok()
}

/// Scaled replay delay between two consecutive timestamps.
///
/// Negative or zero deltas (out-of-order or identical timestamps) produce no
/// delay.
pub fn scaled_delay(prev: NaiveTime, current: NaiveTime, scale_factor: f64) -> Duration {
    let delta_ms = (current - prev).num_milliseconds() as f64;
    let scaled_ms = delta_ms * scale_factor;
    if scaled_ms > 0.0 {
        Duration::from_millis(scaled_ms as u64)
    } else {
        Duration::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn parses_leading_timestamp() {
        assert_eq!(
            leading_timestamp("00:00:05 I am unhappy with fees"),
            Some(time(0, 0, 5))
        );
        assert_eq!(leading_timestamp("12:34:56"), Some(time(12, 34, 56)));
    }

    #[test]
    fn untimed_lines_have_no_timestamp() {
        assert_eq!(leading_timestamp("Hello there"), None);
        assert_eq!(leading_timestamp(""), None);
        assert_eq!(leading_timestamp("12:34"), None);
        assert_eq!(leading_timestamp("99:99:99 nope"), None);
    }

    #[test]
    fn delay_scales_with_factor() {
        let d = scaled_delay(time(0, 0, 0), time(0, 0, 5), 0.1);
        assert_eq!(d, Duration::from_millis(500));

        let d = scaled_delay(time(0, 0, 0), time(0, 0, 5), 1.0);
        assert_eq!(d, Duration::from_secs(5));
    }

    #[test]
    fn non_positive_delta_yields_zero_delay() {
        assert_eq!(scaled_delay(time(0, 0, 5), time(0, 0, 5), 1.0), Duration::ZERO);
        assert_eq!(scaled_delay(time(0, 0, 9), time(0, 0, 5), 1.0), Duration::ZERO);
        assert_eq!(scaled_delay(time(0, 0, 0), time(0, 0, 5), 0.0), Duration::ZERO);
    }
}

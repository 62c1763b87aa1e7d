//! Relative timestamps for the Updated column.

use std::time::Duration;

use chrono::{DateTime, Utc};

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;
const DAY: u64 = 24 * HOUR;

/// `5m ago`, `3h ago`, `2days ago`; a calendar date past a month.
pub fn ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = u64::try_from((now - then).num_seconds()).unwrap_or(0);
    if secs < MINUTE {
        return "just now".into();
    }
    if secs >= 30 * DAY {
        return then.format("%Y-%m-%d").to_string();
    }

    // Keep only the largest unit
    let unit = if secs < HOUR {
        MINUTE
    } else if secs < DAY {
        HOUR
    } else {
        DAY
    };
    let rounded = Duration::from_secs(secs - secs % unit);
    format!("{} ago", humantime::format_duration(rounded))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{TimeDelta, TimeZone};
    use pretty_assertions::assert_eq;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn rounds_down_to_largest_unit() {
        assert_eq!(ago(now() - TimeDelta::seconds(90), now()), "1m ago");
        assert_eq!(ago(now() - TimeDelta::minutes(185), now()), "3h ago");
        assert_eq!(ago(now() - TimeDelta::hours(50), now()), "2days ago");
    }

    #[test]
    fn recent_and_future_are_just_now() {
        assert_eq!(ago(now() - TimeDelta::seconds(5), now()), "just now");
        assert_eq!(ago(now() + TimeDelta::hours(1), now()), "just now");
    }

    #[test]
    fn old_items_show_a_date() {
        assert_eq!(ago(now() - TimeDelta::days(45), now()), "2024-04-26");
    }
}

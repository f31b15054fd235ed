use chrono::{DateTime, Datelike, Utc};

/// Tiered timestamp display relative to now:
/// - under a week: "just now", "12m ago", "2h ago", "3d ago"
/// - older: "Jan 15", or "Dec 3, 2024" outside the current year
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp_at(timestamp, &Utc::now())
}

pub fn format_timestamp_at(timestamp: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(*timestamp);

    if elapsed.num_days() < 7 {
        // Clock skew can put server timestamps slightly in the future
        format_relative(elapsed.num_seconds().max(0))
    } else if timestamp.year() == now.year() {
        timestamp.format("%b %-d").to_string()
    } else {
        timestamp.format("%b %-d, %Y").to_string()
    }
}

fn format_relative(seconds: i64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h ago", hours)
    } else if minutes > 0 {
        format!("{}m ago", minutes)
    } else {
        "just now".to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_just_now() {
        assert_eq!(format_timestamp_at(&(now() - Duration::seconds(59)), &now()), "just now");
    }

    #[test]
    fn test_future_timestamp_is_just_now() {
        assert_eq!(format_timestamp_at(&(now() + Duration::minutes(2)), &now()), "just now");
    }

    #[test]
    fn test_minutes_hours_days() {
        assert_eq!(format_timestamp_at(&(now() - Duration::minutes(45)), &now()), "45m ago");
        assert_eq!(format_timestamp_at(&(now() - Duration::hours(3)), &now()), "3h ago");
        assert_eq!(format_timestamp_at(&(now() - Duration::days(6)), &now()), "6d ago");
    }

    #[test]
    fn test_absolute_same_year() {
        let ts = Utc.with_ymd_and_hms(2025, 1, 5, 8, 0, 0).unwrap();
        assert_eq!(format_timestamp_at(&ts, &now()), "Jan 5");
    }

    #[test]
    fn test_absolute_previous_year() {
        let ts = Utc.with_ymd_and_hms(2024, 12, 3, 8, 0, 0).unwrap();
        assert_eq!(format_timestamp_at(&ts, &now()), "Dec 3, 2024");
    }

    #[test]
    fn test_format_timestamp_uses_current_time() {
        assert_eq!(format_timestamp(&(Utc::now() - Duration::hours(2))), "2h ago");
    }
}

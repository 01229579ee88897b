//! Parsing of upstream "updated" labels into absolute times.
//!
//! Labels come in Indonesian (`2 jam lalu`, `kemarin`), English
//! (`3 hours ago`, `an hour ago`) or as absolute dates. The parsed value is only
//! used to order merged listings, so anything unrecognised yields `None`.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use regex::Regex;
use std::sync::LazyLock;

/// An optional amount, then a whole unit word. Units are listed longest first
/// so `minggu` is never read as `min` and `sec` is never read as `se` + `c`.
static AMOUNT_UNIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(\d+|an?|se)?\s*(detik|menit|jam|hari|minggu|bulan|tahun|second|sec|minute|min|hour|hr|day|week|month|mo|year|[mhdwy])s?\b",
    )
    .unwrap()
});

/// Resolve `label` against `now`.
pub fn parse_relative(label: &str, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    let label = label.trim();
    if label.is_empty() {
        return None;
    }

    if let Ok(at) = DateTime::parse_from_rfc3339(label) {
        return Some(at.with_timezone(&Utc));
    }
    if let Some(date) = label.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()) {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    let lower = label.to_lowercase();
    if lower.contains("baru saja") || lower.contains("just now") {
        return Some(now);
    }
    if lower.contains("kemarin") || lower.contains("yesterday") {
        return now.checked_sub_signed(Duration::days(1));
    }

    let caps = AMOUNT_UNIT.captures(&lower)?;
    let amount: i32 = match caps.get(1).map(|m| m.as_str()) {
        Some("a" | "an" | "se") => 1,
        Some(digits) => digits.parse().ok()?,
        // A bare unit ("sec ago") only counts as one when the label is relative.
        None if lower.contains("ago") || lower.contains("lalu") => 1,
        None => return None,
    };
    let unit = unit_duration(&caps[2])?;
    now.checked_sub_signed(unit.checked_mul(amount)?)
}

fn unit_duration(unit: &str) -> Option<Duration> {
    let duration = match unit {
        "detik" | "second" | "sec" => Duration::seconds(1),
        "menit" | "minute" | "min" | "m" => Duration::minutes(1),
        "jam" | "hour" | "hr" | "h" => Duration::hours(1),
        "hari" | "day" | "d" => Duration::days(1),
        "minggu" | "week" | "w" => Duration::weeks(1),
        "bulan" | "month" | "mo" => Duration::days(30),
        "tahun" | "year" | "y" => Duration::days(365),
        _ => return None,
    };
    Some(duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-10T12:00:00Z").unwrap().with_timezone(&Utc)
    }

    fn ago(label: &str) -> Option<Duration> {
        parse_relative(label, now()).map(|at| now() - at)
    }

    #[test]
    fn test_indonesian_markers() {
        assert_eq!(ago("30 detik lalu"), Some(Duration::seconds(30)));
        assert_eq!(ago("5 menit lalu"), Some(Duration::minutes(5)));
        assert_eq!(ago("2 jam lalu"), Some(Duration::hours(2)));
        assert_eq!(ago("3 hari lalu"), Some(Duration::days(3)));
        assert_eq!(ago("1 minggu lalu"), Some(Duration::weeks(1)));
        assert_eq!(ago("2 bulan lalu"), Some(Duration::days(60)));
        assert_eq!(ago("1 tahun lalu"), Some(Duration::days(365)));
        assert_eq!(ago("sejam lalu"), Some(Duration::hours(1)));
        assert_eq!(ago("seminggu yang lalu"), Some(Duration::weeks(1)));
    }

    #[test]
    fn test_english_markers() {
        assert_eq!(ago("45 seconds ago"), Some(Duration::seconds(45)));
        assert_eq!(ago("10 mins ago"), Some(Duration::minutes(10)));
        assert_eq!(ago("an hour ago"), Some(Duration::hours(1)));
        assert_eq!(ago("a day ago"), Some(Duration::days(1)));
        assert_eq!(ago("2 weeks ago"), Some(Duration::weeks(2)));
        assert_eq!(ago("Updated 4 Hours Ago"), Some(Duration::hours(4)));
        assert_eq!(ago("12h ago"), Some(Duration::hours(12)));
        assert_eq!(ago("3 mo ago"), Some(Duration::days(90)));
    }

    #[test]
    fn test_bare_unit_needs_relative_marker() {
        assert_eq!(ago("sec ago"), Some(Duration::seconds(1)));
        assert_eq!(ago("30 sec ago"), Some(Duration::seconds(30)));
        assert_eq!(ago("hour ago"), Some(Duration::hours(1)));
        assert_eq!(ago("hari ini"), None);
        assert_eq!(ago("a moment ago"), None);
    }

    #[test]
    fn test_yesterday_and_now() {
        assert_eq!(ago("Kemarin"), Some(Duration::days(1)));
        assert_eq!(ago("yesterday"), Some(Duration::days(1)));
        assert_eq!(ago("baru saja"), Some(Duration::zero()));
    }

    #[test]
    fn test_absolute_dates() {
        let at = parse_relative("2025-03-01T08:30:00Z", now()).unwrap();
        assert_eq!(at.to_rfc3339(), "2025-03-01T08:30:00+00:00");

        let at = parse_relative("2025-02-28", now()).unwrap();
        assert_eq!(at.to_rfc3339(), "2025-02-28T00:00:00+00:00");

        let at = parse_relative("2025-02-28 14:00:00", now()).unwrap();
        assert_eq!(at.to_rfc3339(), "2025-02-28T00:00:00+00:00");
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(parse_relative("", now()), None);
        assert_eq!(parse_relative("Update Chapter", now()), None);
        assert_eq!(parse_relative("lama sekali", now()), None);
        assert_eq!(parse_relative("5 fortnights ago", now()), None);
    }
}

use chrono::{DateTime, Duration, Utc};
use regex::Regex;

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// Abbreviates a count for display: `1500` -> `1.5K`, `2500000` -> `2.5M`.
///
/// Accepts the decimal strings the API sends as well as plain numbers. Only
/// the leading integer is read, so `"1500 views"` formats like `1500`;
/// input without one formats as `"0"`. Halves round up.
pub fn format_count<T: ToString>(count: T) -> String {
    let value = match parse_leading_integer(&count.to_string()) {
        Some(value) => value,
        None => return "0".to_string(),
    };

    if value >= BILLION {
        abbreviate(value, BILLION, 'B')
    } else if value >= MILLION {
        abbreviate(value, MILLION, 'M')
    } else if value >= THOUSAND {
        abbreviate(value, THOUSAND, 'K')
    } else if value == 0.0 {
        "0".to_string()
    } else {
        format!("{:.0}", value)
    }
}

fn abbreviate(value: f64, unit: f64, suffix: char) -> String {
    format!("{:.1}{}", (value / unit * 10.0).round() / 10.0, suffix)
}

/// Any number of digits, so counts beyond `u64` still format.
fn parse_leading_integer(text: &str) -> Option<f64> {
    let regex = Regex::new(r"^\s*([+-]?\d+)").expect("count pattern is valid");
    let digits = regex.captures(text)?.get(1)?.as_str();

    digits.parse::<f64>().ok()
}

/// Formats an ISO-8601 `PT#H#M#S` duration as `MM:SS`, or `H:MM:SS` when
/// there is an hour component.
pub fn format_duration(duration: &str) -> String {
    let regex =
        Regex::new(r"PT(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?").expect("duration pattern is valid");
    let captures = regex.captures(duration);
    let part = |index: usize| {
        captures
            .as_ref()
            .and_then(|cap| cap.get(index))
            .map_or("", |m| m.as_str())
    };

    let (hours, minutes, seconds) = (part(1), part(2), part(3));

    let mut result = String::new();
    if !hours.is_empty() {
        result.push_str(hours);
        result.push(':');
    }
    result.push_str(&format!("{:0>2}:{:0>2}", minutes, seconds));

    result
}

/// Age of a publication relative to `now`, in its largest whole unit:
/// `3 days ago`, `1 hour ago`, `12 minutes ago`, `0 seconds ago`.
/// Timestamps in the future count as just published.
pub fn format_time_ago(published_at: &DateTime<Utc>, now: &DateTime<Utc>) -> String {
    let age = (*now - *published_at).max(Duration::zero());

    let days = age.num_days();
    let hours = age.num_hours();
    let minutes = age.num_minutes();
    let seconds = age.num_seconds();

    if days > 0 {
        ago(days, "day")
    } else if hours > 0 {
        ago(hours, "hour")
    } else if minutes > 0 {
        ago(minutes, "minute")
    } else {
        ago(seconds, "second")
    }
}

fn ago(amount: i64, unit: &str) -> String {
    let plural = if amount == 1 { "" } else { "s" };
    format!("{} {}{} ago", amount, unit, plural)
}

/// Long US-style date, e.g. `January 5, 2024`.
pub fn format_published_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn counts_below_a_thousand_are_unchanged() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count("42"), "42");
    }

    #[test]
    fn counts_are_abbreviated_with_one_decimal() {
        assert_eq!(format_count(1500), "1.5K");
        assert_eq!(format_count(2_500_000), "2.5M");
        assert_eq!(format_count(1_200_000_000), "1.2B");
        assert_eq!(format_count("1000"), "1.0K");
    }

    #[test]
    fn count_strings_are_read_like_integers() {
        assert_eq!(format_count("2500000"), "2.5M");
        assert_eq!(format_count(" 1500 views"), "1.5K");
        assert_eq!(format_count(1500.9), "1.5K");
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(format_count(1250), "1.3K");
        assert_eq!(format_count(2_250_000), "2.3M");
        assert_eq!(format_count(1_050_000_000), "1.1B");
    }

    #[test]
    fn counts_beyond_signed_range_still_format() {
        assert_eq!(format_count(u64::MAX), "18446744073.7B");
        assert_eq!(format_count("99999999999999999999"), "100000000000.0B");
    }

    #[test]
    fn non_numeric_count_formats_as_zero() {
        assert_eq!(format_count("not a number"), "0");
        assert_eq!(format_count(""), "0");
    }

    #[test]
    fn durations_without_hours() {
        assert_eq!(format_duration("PT5M30S"), "05:30");
        assert_eq!(format_duration("PT45S"), "00:45");
        assert_eq!(format_duration("PT12M"), "12:00");
    }

    #[test]
    fn durations_with_hours_keep_hours_unpadded() {
        assert_eq!(format_duration("PT1H2M3S"), "1:02:03");
        assert_eq!(format_duration("PT10H"), "10:00:00");
    }

    #[test]
    fn unparseable_duration_is_zero() {
        assert_eq!(format_duration("P1D"), "00:00");
    }

    #[test]
    fn time_ago_uses_largest_whole_unit() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

        assert_eq!(format_time_ago(&(now - Duration::days(3)), &now), "3 days ago");
        assert_eq!(
            format_time_ago(&(now - Duration::hours(25)), &now),
            "1 day ago"
        );
        assert_eq!(
            format_time_ago(&(now - Duration::minutes(150)), &now),
            "2 hours ago"
        );
        assert_eq!(
            format_time_ago(&(now - Duration::seconds(61)), &now),
            "1 minute ago"
        );
        assert_eq!(
            format_time_ago(&(now - Duration::seconds(59)), &now),
            "59 seconds ago"
        );
    }

    #[test]
    fn time_ago_pluralizes_seconds() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

        assert_eq!(format_time_ago(&(now - Duration::seconds(1)), &now), "1 second ago");
        assert_eq!(format_time_ago(&now, &now), "0 seconds ago");
        assert_eq!(
            format_time_ago(&(now + Duration::minutes(5)), &now),
            "0 seconds ago"
        );
    }

    #[test]
    fn published_date_is_long_form() {
        let date = Utc.with_ymd_and_hms(2024, 1, 5, 18, 30, 0).unwrap();
        assert_eq!(format_published_date(&date), "January 5, 2024");
    }
}

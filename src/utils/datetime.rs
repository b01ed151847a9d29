use jiff::Timestamp;
use jiff::civil::DateTime;
use jiff::tz::TimeZone;

/// Parse an API timestamp. Accepts RFC 3339 (`2024-05-01T10:00:00.000000Z`)
/// and offset-less `2024-05-01 10:00:00`, which the API emits in UTC.
pub fn parse_timestamp(raw: &str) -> Option<Timestamp> {
    let raw = raw.trim();
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Some(ts);
    }

    let civil: DateTime = raw.replacen(' ', "T", 1).parse().ok()?;
    civil.to_zoned(TimeZone::UTC).ok().map(|z| z.timestamp())
}

/// Format a timestamp relative to `now` as "2d ago", "3h ago", "15m ago",
/// or "just now".
pub fn format_relative(ts: Timestamp, now: Timestamp) -> String {
    let now_secs = now.as_second();
    let ts = ts.as_second();

    // Future timestamps (clock skew) read as just now
    if now_secs <= ts {
        return "just now".to_string();
    }

    let delta = now_secs - ts;
    let days = delta / 86_400;
    if days > 0 {
        return format!("{}d ago", days);
    }

    let hours = delta / 3_600;
    if hours > 0 {
        return format!("{}h ago", hours);
    }

    let minutes = delta / 60;
    if minutes > 0 {
        return format!("{}m ago", minutes);
    }

    "just now".to_string()
}

/// Relative form of a raw API timestamp, or the raw text when unparseable.
pub fn format_timestamp(raw: &str) -> String {
    match parse_timestamp(raw) {
        Some(ts) => format_relative(ts, Timestamp::now()),
        None => raw.to_string(),
    }
}

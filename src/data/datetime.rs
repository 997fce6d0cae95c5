use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use serde::{Deserialize, Deserializer};

/// Naive formats tried after RFC 3339. Values without an offset are taken as UTC.
pub const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_ONLY_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Parse a timestamp as the backend exports it, e.g. `2026-02-10T22:26:28.987Z`.
/// Falls back to naive date/time formats (UTC), then to bare dates at midnight.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in DATE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.and_utc());
        }
    }

    for fmt in DATE_ONLY_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
            return Some(d.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}

/// Convert a spreadsheet serial date (days since 1899-12-30) to UTC.
pub fn from_excel_serial(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let millis = (serial * 86_400_000.0).round() as i64;
    Some((epoch + TimeDelta::try_milliseconds(millis)?).and_utc())
}

/// Human-readable form; milliseconds only when present.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    if ts.timestamp_subsec_millis() == 0 {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
    }
}

/// Serde helper for optional timestamp fields. Strings go through
/// `parse_timestamp`; unparseable or non-string values become `None`.
pub fn deserialize_opt<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(s)) => {
            let parsed = parse_timestamp(&s);
            if parsed.is_none() {
                tracing::debug!("Ignoring unparseable timestamp {s:?}");
            }
            parsed
        }
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn rfc3339_with_offset_is_normalized_to_utc() {
        let ts = parse_timestamp("2026-02-10T22:26:28.987-03:00").unwrap();
        assert_eq!(ts.day(), 11);
        assert_eq!(ts.hour(), 1);
        assert_eq!(ts.timestamp_subsec_millis(), 987);
    }

    #[test]
    fn naive_formats_are_utc() {
        let ts = parse_timestamp("2025-06-01 08:30:00").unwrap();
        assert_eq!(format_timestamp(&ts), "2025-06-01 08:30:00");
        let ts = parse_timestamp("2025-06-01T08:30:00.250").unwrap();
        assert_eq!(format_timestamp(&ts), "2025-06-01 08:30:00.250");
    }

    #[test]
    fn bare_dates_land_on_midnight() {
        let ts = parse_timestamp("15/03/2025").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day(), ts.hour()), (2025, 3, 15, 0));
    }

    #[test]
    fn garbage_is_none() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn excel_serial_dates() {
        // 45658.5 is 2025-01-01 12:00.
        let ts = from_excel_serial(45658.5).unwrap();
        assert_eq!(format_timestamp(&ts), "2025-01-01 12:00:00");
    }
}

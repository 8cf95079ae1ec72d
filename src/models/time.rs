use std::fmt;
use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized time: {0:?}")]
pub struct ParseError(pub String);

/// Shop-local wall-clock time, always rendered as `HH:mm:ss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalTime(NaiveTime);

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?:^|[^0-9])([0-9]{1,2}):([0-9]{2})(?::([0-9]{2}))?(?:[^0-9]|$)")
            .expect("time pattern is valid")
    })
}

impl CanonicalTime {
    pub fn from_hms(hour: u32, minute: u32, second: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, second).map(Self)
    }

    /// Accepts `H:mm`, `HH:mm`, `HH:mm:ss` or any string carrying one of
    /// those, such as an ISO datetime. Seconds default to `00`.
    pub fn parse(raw: &str) -> Result<Self, ParseError> {
        let caps = time_pattern()
            .captures(raw.trim())
            .ok_or_else(|| ParseError(raw.to_string()))?;

        let field = |i: usize| -> u32 {
            caps.get(i)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        };

        Self::from_hms(field(1), field(2), field(3)).ok_or_else(|| ParseError(raw.to_string()))
    }

    /// `parse` with failure folded into "unknown time".
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        Self::parse(raw).ok()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn minutes_since_midnight(&self) -> i64 {
        i64::from(self.0.num_seconds_from_midnight() / 60)
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl fmt::Display for CanonicalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

impl std::str::FromStr for CanonicalTime {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CanonicalTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CanonicalTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Two raw time strings are the same time when their canonical forms match.
/// Unparseable strings only match each other verbatim.
pub fn same_time(a: &str, b: &str) -> bool {
    match (CanonicalTime::parse_lenient(a), CanonicalTime::parse_lenient(b)) {
        (Some(x), Some(y)) => x == y,
        (None, None) => a.trim() == b.trim(),
        _ => false,
    }
}

pub fn to_display_12h(t: &CanonicalTime) -> String {
    let hour = t.hour();
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let hour12 = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{hour12}:{:02} {suffix}", t.minute())
}

pub fn to_display_range(start: &CanonicalTime, end: Option<&CanonicalTime>) -> String {
    match end {
        Some(end) => format!("{} - {}", to_display_12h(start), to_display_12h(end)),
        None => to_display_12h(start),
    }
}

/// Accepts `YYYY-MM-DD` or anything starting with it (ISO datetimes).
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

const WEEKDAYS_ES: [&str; 7] = [
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
    "Domingo",
];

const MONTHS_ES: [&str; 12] = [
    "Enero",
    "Febrero",
    "Marzo",
    "Abril",
    "Mayo",
    "Junio",
    "Julio",
    "Agosto",
    "Septiembre",
    "Octubre",
    "Noviembre",
    "Diciembre",
];

fn weekday_es(day: Weekday) -> &'static str {
    WEEKDAYS_ES[day.num_days_from_monday() as usize]
}

/// `"Lunes, 10 de Marzo de 2025"`. The calendar day is pinned to 12:00 UTC
/// so no offset can move it across midnight.
pub fn to_display_long_date(date: &NaiveDate) -> String {
    let noon = date
        .and_hms_opt(12, 0, 0)
        .map(|dt| dt.and_utc())
        .map(|dt| dt.date_naive())
        .unwrap_or(*date);

    format!(
        "{}, {} de {} de {}",
        weekday_es(noon.weekday()),
        noon.day(),
        MONTHS_ES[noon.month0() as usize],
        noon.year()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> CanonicalTime {
        CanonicalTime::parse(s).unwrap()
    }

    #[test]
    fn test_parse_bare_and_padded() {
        assert_eq!(t("9:05").to_string(), "09:05:00");
        assert_eq!(t("09:05").to_string(), "09:05:00");
        assert_eq!(t("23:59:59").to_string(), "23:59:59");
        assert_eq!(t(" 14:30 ").to_string(), "14:30:00");
    }

    #[test]
    fn test_parse_iso_datetime() {
        assert_eq!(t("2025-03-10T09:00:00Z").to_string(), "09:00:00");
        assert_eq!(t("2025-03-10T16:45:30+02:00").to_string(), "16:45:30");
        assert_eq!(t("2025-03-10 7:15").to_string(), "07:15:00");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(CanonicalTime::parse("").is_err());
        assert!(CanonicalTime::parse("mañana").is_err());
        assert!(CanonicalTime::parse("25:00").is_err());
        assert!(CanonicalTime::parse("12:60").is_err());
        assert!(CanonicalTime::parse("123:45").is_err());
        assert_eq!(CanonicalTime::parse_lenient("n/a"), None);
    }

    #[test]
    fn test_canonical_form_is_stable() {
        for raw in ["9:00", "09:00:00", "2025-01-01T18:20:00", "0:00", "12:00"] {
            let once = t(raw);
            let twice = t(&once.to_string());
            assert_eq!(once, twice, "{raw}");
        }
    }

    #[test]
    fn test_same_time() {
        assert!(same_time("09:00", "09:00:00"));
        assert!(same_time("9:00", "2025-03-10T09:00:00"));
        assert!(!same_time("09:00", "09:30"));
        assert!(!same_time("09:00", "later"));
    }

    #[test]
    fn test_display_12h() {
        assert_eq!(to_display_12h(&t("00:05")), "12:05 AM");
        assert_eq!(to_display_12h(&t("09:00")), "9:00 AM");
        assert_eq!(to_display_12h(&t("12:00")), "12:00 PM");
        assert_eq!(to_display_12h(&t("15:30")), "3:30 PM");
    }

    #[test]
    fn test_display_range() {
        assert_eq!(
            to_display_range(&t("09:00"), Some(&t("09:30"))),
            "9:00 AM - 9:30 AM"
        );
        assert_eq!(to_display_range(&t("13:00"), None), "1:00 PM");
    }

    #[test]
    fn test_display_long_date() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(to_display_long_date(&date), "Lunes, 10 de Marzo de 2025");
        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(to_display_long_date(&date), "Martes, 31 de Diciembre de 2024");
    }

    #[test]
    fn test_parse_calendar_date() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 10);
        assert_eq!(parse_calendar_date("2025-03-10"), expected);
        assert_eq!(parse_calendar_date("2025-03-10T09:00:00Z"), expected);
        assert_eq!(parse_calendar_date("10/03/2025"), None);
        assert_eq!(parse_calendar_date(""), None);
    }

    #[test]
    fn test_serde_uses_canonical_string() {
        let json = serde_json::to_string(&t("9:00")).unwrap();
        assert_eq!(json, "\"09:00:00\"");
        let back: CanonicalTime = serde_json::from_str("\"2025-03-10T09:00:00\"").unwrap();
        assert_eq!(back, t("09:00"));
    }
}

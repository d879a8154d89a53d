//! FILENAME: records/src/date_resolver.rs
//! PURPOSE: Locates the single effective calendar date of a record.
//! CONTEXT: A record may carry its date in several fields and in several
//! textual representations. Candidates are tried in their configured
//! priority order, first match wins. Timestamps are converted into the
//! report's local zone with real calendar/DST rules before truncation,
//! because a timestamp near midnight lands on a different day locally
//! than in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::value::{FieldValue, Record};

/// Timestamp layouts carrying an explicit offset (after RFC 3339 fails).
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%z",
];

/// Timestamp layouts without an offset. These are read as UTC, the remote
/// store's default.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d-%m-%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
];

/// Calendar-date layouts. A date-only value is already a local calendar
/// date and is never shifted between zones.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y"];

/// A calendar date chosen for a record, plus the field it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResolvedDate {
    pub date: NaiveDate,
    pub field: String,
}

/// Outcome of resolving one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Resolved(ResolvedDate),
    /// No candidate held a parseable value. Not an error: the record is
    /// simply left out of dated reports.
    Undated,
}

impl Resolution {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Resolution::Resolved(r) => Some(r.date),
            Resolution::Undated => None,
        }
    }

    pub fn is_undated(&self) -> bool {
        matches!(self, Resolution::Undated)
    }
}

/// A successfully parsed date value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParsedDateValue {
    /// An absolute instant (offset given, or UTC assumed).
    Instant(DateTime<Utc>),
    /// A bare calendar date.
    CalendarDate(NaiveDate),
}

impl ParsedDateValue {
    /// The calendar date this value falls on in `zone`.
    pub fn local_date(&self, zone: Tz) -> NaiveDate {
        match self {
            ParsedDateValue::Instant(instant) => instant.with_timezone(&zone).date_naive(),
            ParsedDateValue::CalendarDate(date) => *date,
        }
    }
}

/// Parses one raw date string. Returns `None` when no accepted layout matches.
pub fn parse_date_value(raw: &str) -> Option<ParsedDateValue> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(ParsedDateValue::Instant(dt.with_timezone(&Utc)));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(ParsedDateValue::Instant(dt.with_timezone(&Utc)));
        }
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ParsedDateValue::Instant(naive.and_utc()));
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(ParsedDateValue::CalendarDate(date));
        }
    }

    None
}

/// Resolves record dates against one local time zone.
#[derive(Debug, Clone, Copy)]
pub struct DateResolver {
    zone: Tz,
}

impl DateResolver {
    pub fn new(zone: Tz) -> Self {
        DateResolver { zone }
    }

    pub fn zone(&self) -> Tz {
        self.zone
    }

    /// Tries `candidates` in order and returns the first date found.
    /// A candidate that is absent, empty or malformed is skipped; later
    /// candidates are never consulted once one has produced a date.
    pub fn resolve<S: AsRef<str>>(&self, record: &Record, candidates: &[S]) -> Resolution {
        for candidate in candidates {
            let field = candidate.as_ref();

            let value = match record.get(field) {
                Some(v) if !v.is_empty() => v,
                _ => {
                    debug!(target: "DATE", "record {} field {} empty, next candidate", record.id(), field);
                    continue;
                }
            };

            let raw = match value {
                FieldValue::Text(s) => s.as_str(),
                other => {
                    warn!(
                        target: "DATE",
                        "record {} field {} holds a {} value, not a date; next candidate",
                        record.id(),
                        field,
                        other.kind()
                    );
                    continue;
                }
            };

            match parse_date_value(raw) {
                Some(parsed) => {
                    return Resolution::Resolved(ResolvedDate {
                        date: parsed.local_date(self.zone),
                        field: field.to_string(),
                    });
                }
                None => {
                    warn!(
                        target: "DATE",
                        "record {} field {} has unparseable date {:?}; next candidate",
                        record.id(),
                        field,
                        raw
                    );
                }
            }
        }

        Resolution::Undated
    }

    /// True when the record resolves to exactly `date`.
    pub fn matches<S: AsRef<str>>(&self, record: &Record, candidates: &[S], date: NaiveDate) -> bool {
        self.resolve(record, candidates).date() == Some(date)
    }
}

/// Free-function form of [`DateResolver::resolve`].
pub fn resolve_date<S: AsRef<str>>(record: &Record, candidates: &[S], zone: Tz) -> Resolution {
    DateResolver::new(zone).resolve(record, candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::{Bogota, New_York};
    use chrono_tz::UTC;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_accepted_layouts() {
        assert!(matches!(parse_date_value("2024-01-01T02:00:00Z"), Some(ParsedDateValue::Instant(_))));
        assert!(matches!(parse_date_value("2024-01-01T02:00:00-05:00"), Some(ParsedDateValue::Instant(_))));
        assert!(matches!(parse_date_value("2024-01-01T02:00:00.123Z"), Some(ParsedDateValue::Instant(_))));
        assert!(matches!(parse_date_value("2024-01-01T02:00:00"), Some(ParsedDateValue::Instant(_))));
        assert!(matches!(parse_date_value("2024-01-01 02:00"), Some(ParsedDateValue::Instant(_))));
        assert_eq!(parse_date_value("2024-03-01"), Some(ParsedDateValue::CalendarDate(ymd(2024, 3, 1))));
        assert_eq!(parse_date_value("01/03/2024"), Some(ParsedDateValue::CalendarDate(ymd(2024, 3, 1))));
        assert_eq!(parse_date_value("01-03-2024"), Some(ParsedDateValue::CalendarDate(ymd(2024, 3, 1))));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_date_value(""), None);
        assert_eq!(parse_date_value("not a date"), None);
        assert_eq!(parse_date_value("31/02/2024"), None);
        assert_eq!(parse_date_value("2024-13-01T00:00:00Z"), None);
    }

    #[test]
    fn test_naive_timestamp_is_utc() {
        let parsed = parse_date_value("2024-01-01T02:00:00").unwrap();
        assert_eq!(parsed.local_date(UTC), ymd(2024, 1, 1));
        assert_eq!(parsed.local_date(Bogota), ymd(2023, 12, 31));
    }

    #[test]
    fn test_utc_minus_five_shifts_to_previous_day() {
        let record = Record::new().with("Created", "2024-01-01T02:00:00Z");
        let resolved = resolve_date(&record, &["Created"], Bogota);
        assert_eq!(
            resolved,
            Resolution::Resolved(ResolvedDate {
                date: ymd(2023, 12, 31),
                field: "Created".to_string(),
            })
        );
    }

    #[test]
    fn test_dst_rules_are_applied() {
        // New York is UTC-4 in July and UTC-5 in January.
        let resolver = DateResolver::new(New_York);
        let summer = Record::new().with("Created", "2024-07-01T03:30:00Z");
        let winter = Record::new().with("Created", "2024-01-01T04:30:00Z");
        assert_eq!(resolver.resolve(&summer, &["Created"]).date(), Some(ymd(2024, 6, 30)));
        assert_eq!(resolver.resolve(&winter, &["Created"]).date(), Some(ymd(2023, 12, 31)));

        let summer_late = Record::new().with("Created", "2024-07-01T04:30:00Z");
        assert_eq!(resolver.resolve(&summer_late, &["Created"]).date(), Some(ymd(2024, 7, 1)));
    }

    #[test]
    fn test_first_candidate_wins() {
        let record = Record::new()
            .with("A", "2024-03-01T12:00:00Z")
            .with("B", "2024-05-20T12:00:00Z");
        let resolved = resolve_date(&record, &["A", "B"], UTC);
        assert_eq!(resolved.date(), Some(ymd(2024, 3, 1)));

        let reversed = resolve_date(&record, &["B", "A"], UTC);
        assert_eq!(reversed.date(), Some(ymd(2024, 5, 20)));
    }

    #[test]
    fn test_malformed_candidate_falls_through() {
        let record = Record::new()
            .with("A", "garbage")
            .with("B", "2024-03-02T12:00:00Z");
        match resolve_date(&record, &["A", "B"], UTC) {
            Resolution::Resolved(r) => {
                assert_eq!(r.date, ymd(2024, 3, 2));
                assert_eq!(r.field, "B");
            }
            Resolution::Undated => panic!("expected a date from B"),
        }
    }

    #[test]
    fn test_non_text_and_empty_candidates_skip() {
        let record = Record::new()
            .with("A", 45000.0)
            .with("B", "")
            .with("C", "02/03/2024");
        let resolved = resolve_date(&record, &["Missing", "A", "B", "C"], UTC);
        assert_eq!(resolved.date(), Some(ymd(2024, 3, 2)));
    }

    #[test]
    fn test_undated_when_nothing_parses() {
        let record = Record::new().with("A", "soon").with("B", FieldValue::Null);
        assert!(resolve_date(&record, &["A", "B"], UTC).is_undated());
        assert!(resolve_date(&Record::new(), &["A"], UTC).is_undated());
        let none: [&str; 0] = [];
        assert!(resolve_date(&record, &none, UTC).is_undated());
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let record = Record::new()
            .with("Modified", "2024-03-01T23:59:59-05:00")
            .with("Created", "bad");
        let resolver = DateResolver::new(Bogota);
        let first = resolver.resolve(&record, &["Created", "Modified"]);
        for _ in 0..10 {
            assert_eq!(resolver.resolve(&record, &["Created", "Modified"]), first);
        }
        assert_eq!(first.date(), Some(ymd(2024, 3, 1)));
    }

    #[test]
    fn test_date_only_is_never_shifted() {
        let record = Record::new().with("Created", "2024-03-01");
        assert!(DateResolver::new(Bogota).matches(&record, &["Created"], ymd(2024, 3, 1)));
        assert!(DateResolver::new(chrono_tz::Asia::Tokyo).matches(&record, &["Created"], ymd(2024, 3, 1)));
    }
}

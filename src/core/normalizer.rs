use crate::domain::model::Record;
use crate::domain::value::Value;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use regex::Regex;
use std::sync::LazyLock;

pub const IDENTITY_FIELD: &str = "_id";
pub const DATE_MARKER: &str = "$date";

static ISO_DATETIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:\d{2})$")
        .expect("ISO-8601 pattern is valid")
});

/// Counters collected while normalizing a batch of records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeStats {
    pub ids_removed: usize,
    pub dates_converted: usize,
    /// `$date` markers left untouched because their value did not parse.
    pub unparsable_dates: usize,
}

/// Strips identity fields and rewrites date-like values in place.
///
/// Does nothing unless `remove_id_field` is set.
pub fn normalize(records: &mut [Record], remove_id_field: bool) -> NormalizeStats {
    let mut stats = NormalizeStats::default();
    if !remove_id_field {
        return stats;
    }

    for record in records.iter_mut() {
        if record.remove(IDENTITY_FIELD).is_some() {
            stats.ids_removed += 1;
        }
        normalize_dates(record, &mut stats);
    }

    if stats.ids_removed > 0 || stats.dates_converted > 0 {
        tracing::debug!(
            "Normalized {} records: removed {} identity fields, converted {} dates",
            records.len(),
            stats.ids_removed,
            stats.dates_converted
        );
    }
    stats
}

// Sequences are not descended into; only nested documents are.
fn normalize_dates(doc: &mut Record, stats: &mut NormalizeStats) {
    for (key, value) in doc.data.iter_mut() {
        let converted = match value {
            Value::Document(inner) => match inner.get(DATE_MARKER) {
                Some(Value::String(raw)) => {
                    let parsed = parse_timestamp(raw);
                    if parsed.is_none() {
                        tracing::warn!("Failed to parse date string '{}' in field '{}'", raw, key);
                        stats.unparsable_dates += 1;
                    }
                    parsed
                }
                Some(_) => None,
                None => {
                    normalize_dates(inner, stats);
                    None
                }
            },
            Value::String(s) if is_iso_datetime(s.as_str()) => parse_timestamp(s.as_str()),
            _ => None,
        };

        if let Some(dt) = converted {
            *value = Value::DateTime(dt);
            stats.dates_converted += 1;
        }
    }
}

pub fn is_iso_datetime(s: &str) -> bool {
    ISO_DATETIME.is_match(s)
}

/// Parses a timestamp, trying in order: RFC 3339 (any fractional precision),
/// `YYYY-MM-DDTHH:MM:SS.000Z`, and a bare `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.3fZ") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

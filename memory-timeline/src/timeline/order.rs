//! Date ordering and reconciliation of the local timeline.
//!
//! The collection is kept newest-first. Dates are compared as calendar
//! instants, never as strings, so `2025-06-05` and `2025-06-05T09:30:00Z`
//! land where they belong relative to each other.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use memory_timeline_types::MemoryRecord;
use std::cmp::Reverse;

/// Result of merging an updated record into the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    Replaced,
    /// No element carried the id; the collection is untouched
    NotFound,
}

/// Parse a record date into a UTC instant.
///
/// Bare dates and offset-less date-times are read as UTC. Returns `None` for
/// anything else.
pub fn date_key(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|n| n.and_utc());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|n| n.and_utc())
}

/// Stable sort, newest first. Unparseable dates go last in their original order.
pub fn sort_by_date_desc(records: &mut [MemoryRecord]) {
    records.sort_by_cached_key(|r| {
        let key = date_key(&r.date);
        (key.is_none(), Reverse(key))
    });
}

/// Put a freshly created record in front and restore the order.
///
/// A record whose id is already present replaces that element instead, so ids
/// stay unique.
pub fn insert_created(records: &mut Vec<MemoryRecord>, record: MemoryRecord) {
    match records.iter().position(|r| r.id == record.id) {
        Some(idx) => records[idx] = record,
        None => records.insert(0, record),
    }
    sort_by_date_desc(records);
}

/// Replace the element whose id is `id` with `record` and restore the order.
pub fn replace_updated(
    records: &mut [MemoryRecord],
    id: &str,
    record: MemoryRecord,
) -> ReplaceOutcome {
    let Some(idx) = records.iter().position(|r| r.id == id) else {
        return ReplaceOutcome::NotFound;
    };
    records[idx] = record;
    sort_by_date_desc(records);
    ReplaceOutcome::Replaced
}

#[cfg(test)]
pub(crate) fn record(id: &str, date: &str) -> MemoryRecord {
    MemoryRecord {
        id: id.to_string(),
        date: date.to_string(),
        title: format!("title {}", id),
        photo: String::new(),
        note: format!("note {}", id),
        created_at: None,
    }
}

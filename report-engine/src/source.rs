//! FILENAME: report-engine/src/source.rs
//! Record sources - the seam to the remote list store.
//!
//! The core only asks for "records around this date, with these fields".
//! Transport, auth and paging live behind `RecordSource`.

use chrono::NaiveDate;
use log::{debug, info};
use records::Record;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::SourceError;

// ============================================================================
// DATE WINDOW
// ============================================================================

/// Inclusive calendar-date range a fetch is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    /// One day either side of `date`, wide enough for any UTC offset.
    /// The date resolver does the exact filtering afterwards.
    pub fn around(date: NaiveDate) -> Self {
        DateWindow {
            start: date.pred_opt().unwrap_or(date),
            end: date.succ_opt().unwrap_or(date),
        }
    }

    pub fn single(date: NaiveDate) -> Self {
        DateWindow {
            start: date,
            end: date,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

// ============================================================================
// RECORD SOURCE
// ============================================================================

pub trait RecordSource {
    /// Returns candidate records for `window`, each exposing at least the
    /// requested fields it holds. Records outside the window may be
    /// returned; callers filter by resolved date.
    fn fetch(&mut self, window: &DateWindow, fields: &[String]) -> Result<Vec<Record>, SourceError>;
}

impl<S: RecordSource + ?Sized> RecordSource for &mut S {
    fn fetch(&mut self, window: &DateWindow, fields: &[String]) -> Result<Vec<Record>, SourceError> {
        (**self).fetch(window, fields)
    }
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn fetch(&mut self, window: &DateWindow, fields: &[String]) -> Result<Vec<Record>, SourceError> {
        (**self).fetch(window, fields)
    }
}

// ============================================================================
// MEMOIZED SOURCE
// ============================================================================

type CacheKey = (DateWindow, Vec<String>);

/// Remembers every `(window, fields)` answer for the lifetime of the value.
///
/// There is no eviction and no freshness check: once a window has been
/// fetched, later changes in the upstream store are invisible until
/// `clear()` is called. Failed fetches are not remembered.
pub struct MemoizedSource<S> {
    inner: S,
    cache: FxHashMap<CacheKey, Vec<Record>>,
}

impl<S: RecordSource> MemoizedSource<S> {
    pub fn new(inner: S) -> Self {
        MemoizedSource {
            inner,
            cache: FxHashMap::default(),
        }
    }

    /// Drops every cached answer.
    pub fn clear(&mut self) {
        info!(target: "SOURCE", "memo cache cleared ({} entries)", self.cache.len());
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: RecordSource> RecordSource for MemoizedSource<S> {
    fn fetch(&mut self, window: &DateWindow, fields: &[String]) -> Result<Vec<Record>, SourceError> {
        let key = (*window, fields.to_vec());

        if let Some(records) = self.cache.get(&key) {
            debug!(
                target: "SOURCE",
                "memo hit for {}..{} ({} records)",
                window.start,
                window.end,
                records.len()
            );
            return Ok(records.clone());
        }

        let records = self.inner.fetch(window, fields)?;
        debug!(
            target: "SOURCE",
            "memo miss for {}..{}, cached {} records",
            window.start,
            window.end,
            records.len()
        );
        self.cache.insert(key, records.clone());
        Ok(records)
    }
}

// ============================================================================
// IN-MEMORY SOURCE
// ============================================================================

/// Vector-backed source. Like the list store it ignores the window and
/// returns every record, trimmed to the requested fields.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<Record>,
    fetch_count: usize,
    failure: Option<String>,
}

impl InMemorySource {
    pub fn new(records: Vec<Record>) -> Self {
        InMemorySource {
            records,
            fetch_count: 0,
            failure: None,
        }
    }

    /// A source whose every fetch fails with `message`.
    pub fn failing(message: impl Into<String>) -> Self {
        InMemorySource {
            records: Vec::new(),
            fetch_count: 0,
            failure: Some(message.into()),
        }
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Number of `fetch` calls received, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetch_count
    }
}

impl RecordSource for InMemorySource {
    fn fetch(&mut self, window: &DateWindow, fields: &[String]) -> Result<Vec<Record>, SourceError> {
        self.fetch_count += 1;

        if let Some(message) = &self.failure {
            return Err(SourceError::new(message.clone()));
        }

        debug!(
            target: "SOURCE",
            "in-memory fetch {}..{}: {} records, {} fields",
            window.start,
            window.end,
            self.records.len(),
            fields.len()
        );

        if fields.is_empty() {
            return Ok(self.records.clone());
        }
        Ok(self.records.iter().map(|r| r.select(fields)).collect())
    }
}

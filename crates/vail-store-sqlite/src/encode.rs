//! Encoding and decoding helpers between Rust domain types and the plain
//! representations stored in SQLite columns.
//!
//! Latest-value and user timestamps are stored as RFC 3339 strings. History
//! capture instants are stored as integer Unix milliseconds so range scans
//! and exact-instant lookups compare integers.

use chrono::{DateTime, Utc};
use vail_core::stat::LatestRecord;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Capture instants ────────────────────────────────────────────────────────

pub fn encode_millis(dt: DateTime<Utc>) -> i64 { dt.timestamp_millis() }

pub fn decode_millis(ms: i64) -> Result<DateTime<Utc>> {
  DateTime::from_timestamp_millis(ms)
    .ok_or_else(|| Error::DateParse(format!("capture instant out of range: {ms}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw columns read directly from a `stats` row.
pub struct RawLatestRecord {
  pub user_id:    String,
  pub code:       String,
  pub value:      f64,
  pub updated_at: String,
}

impl RawLatestRecord {
  pub fn into_record(self) -> Result<LatestRecord> {
    Ok(LatestRecord {
      updated_at: decode_dt(&self.updated_at)?,
      user_id:    self.user_id,
      code:       self.code,
      value:      self.value,
    })
  }
}

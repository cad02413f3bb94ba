//! The flat stat-code model shared by the write and read paths.

use std::collections::{HashMap, hash_map};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A raw measurement as reported upstream. May carry a fractional component.
pub type StatValue = f64;

// ─── UserSnapshot ────────────────────────────────────────────────────────────

/// Every stat code reported for one user, either by a single upstream fetch or
/// at a single historical instant.
///
/// Keys are unique; iteration order is unspecified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserSnapshot(HashMap<String, StatValue>);

impl UserSnapshot {
  pub fn new() -> Self { Self::default() }

  /// Set `code` to `value`, returning the previous value if there was one.
  pub fn insert(
    &mut self,
    code: impl Into<String>,
    value: StatValue,
  ) -> Option<StatValue> {
    self.0.insert(code.into(), value)
  }

  /// The value for `code`, or zero when the code was not reported.
  pub fn get(&self, code: &str) -> StatValue {
    self.0.get(code).copied().unwrap_or(0.0)
  }

  pub fn contains(&self, code: &str) -> bool { self.0.contains_key(code) }

  pub fn codes(&self) -> impl Iterator<Item = &str> {
    self.0.keys().map(String::as_str)
  }

  pub fn iter(&self) -> impl Iterator<Item = (&str, StatValue)> {
    self.0.iter().map(|(code, value)| (code.as_str(), *value))
  }

  pub fn len(&self) -> usize { self.0.len() }

  pub fn is_empty(&self) -> bool { self.0.is_empty() }
}

impl<K: Into<String>> FromIterator<(K, StatValue)> for UserSnapshot {
  fn from_iter<I: IntoIterator<Item = (K, StatValue)>>(iter: I) -> Self {
    Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
  }
}

impl IntoIterator for UserSnapshot {
  type Item = (String, StatValue);
  type IntoIter = hash_map::IntoIter<String, StatValue>;

  fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

// ─── Stored rows ─────────────────────────────────────────────────────────────

/// One currently-known code for a user in the latest-value store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestRecord {
  pub user_id:    String,
  pub code:       String,
  pub value:      StatValue,
  /// The fetch instant of the reconciliation that last wrote this row.
  pub updated_at: DateTime<Utc>,
}

/// One append-only row of the historical log. Rows sharing `captured_at`
/// form a single historical instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRow {
  pub user_id:     String,
  pub code:        String,
  pub value:       StatValue,
  pub captured_at: DateTime<Utc>,
}

impl HistoryRow {
  /// Explode a snapshot into the rows of one historical instant.
  pub fn from_snapshot(
    user_id: &str,
    snapshot: &UserSnapshot,
    captured_at: DateTime<Utc>,
  ) -> Vec<Self> {
    snapshot
      .iter()
      .map(|(code, value)| Self {
        user_id: user_id.to_owned(),
        code: code.to_owned(),
        value,
        captured_at,
      })
      .collect()
  }
}

/// Render an instant as fractional Unix seconds, the wire format for
/// timestamps in responses and query parameters.
pub fn unix_seconds(at: DateTime<Utc>) -> f64 {
  at.timestamp_millis() as f64 / 1000.0
}

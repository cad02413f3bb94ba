//! Windowed range queries over the historical log.
//!
//! A query selects the distinct capture instants of one user inside
//! `[before, after]` (both bounds inclusive), most recent first, and rebuilds
//! each instant's full snapshot through the projection schema.
//!
//! Instants are stored with millisecond precision. To page backward, re-issue
//! the query with `after` set to the oldest timestamp of the previous page
//! minus `0.001`.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::{
  Error, Result,
  projection::ProjectedSnapshot,
  schema::ProjectionSchema,
  stat::unix_seconds,
  store::{HistoryStore, LatestStore},
};

pub const DEFAULT_LIMIT: u32 = 100;
pub const MAX_LIMIT: u32 = 100;

// ─── Parameters ──────────────────────────────────────────────────────────────

/// Unvalidated query-string parameters. Timestamps are Unix seconds and may
/// be fractional.
#[derive(Debug, Clone, Default)]
pub struct RangeParams {
  /// Lower bound of the window. Defaults to the Unix epoch.
  pub before: Option<String>,
  /// Upper bound of the window. Defaults to now.
  pub after:  Option<String>,
  /// Maximum number of instants to return. Defaults to 100.
  pub limit:  Option<String>,
}

/// A validated window and result bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeQuery {
  pub before: DateTime<Utc>,
  pub after:  DateTime<Utc>,
  pub limit:  u32,
}

/// Collect from raw query pairs. A repeated key keeps its first value;
/// unrecognised keys are ignored.
impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for RangeParams {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(pairs: I) -> Self {
    let mut params = Self::default();
    for (key, value) in pairs {
      let slot = match key.as_ref() {
        "before" => &mut params.before,
        "after" => &mut params.after,
        "limit" => &mut params.limit,
        _ => continue,
      };
      if slot.is_none() {
        *slot = Some(value.into());
      }
    }
    params
  }
}

impl RangeParams {
  pub fn validate(&self) -> Result<RangeQuery> { self.validate_at(Utc::now()) }

  /// Validate with `now` standing in for an omitted `after`.
  pub fn validate_at(&self, now: DateTime<Utc>) -> Result<RangeQuery> {
    let before = match &self.before {
      Some(raw) => parse_instant("before", raw)?,
      None => DateTime::UNIX_EPOCH,
    };
    let after = match &self.after {
      Some(raw) => parse_instant("after", raw)?,
      None => now,
    };

    if before > after {
      return Err(Error::invalid(
        "before",
        "before was later than after. Did you swap them around?",
      ));
    }

    let limit = match &self.limit {
      Some(raw) => parse_limit(raw)?,
      None => DEFAULT_LIMIT,
    };

    Ok(RangeQuery { before, after, limit })
  }
}

fn parse_instant(field: &'static str, raw: &str) -> Result<DateTime<Utc>> {
  let seconds: f64 = raw.trim().parse().map_err(|e| {
    Error::invalid(field, format!("failed to parse the {field} parameter: {e}"))
  })?;
  if !seconds.is_finite() {
    return Err(Error::invalid(field, format!("the {field} parameter must be finite")));
  }

  DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64).ok_or_else(|| {
    Error::invalid(field, format!("the {field} parameter is out of range"))
  })
}

fn parse_limit(raw: &str) -> Result<u32> {
  let limit: i64 = raw.trim().parse().map_err(|e| {
    Error::invalid("limit", format!("failed to parse the limit parameter: {e}"))
  })?;
  if limit <= 0 {
    return Err(Error::invalid("limit", "the limit parameter must be more than 0"));
  }
  if limit > i64::from(MAX_LIMIT) {
    return Err(Error::invalid(
      "limit",
      format!("the limit parameter must not be more than {MAX_LIMIT}"),
    ));
  }
  Ok(limit as u32)
}

// ─── Results ─────────────────────────────────────────────────────────────────

/// One historical instant, projected. Serialises as the projected fields plus
/// a numeric `timestamp` in Unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimedSnapshot {
  #[serde(serialize_with = "serialize_unix_seconds")]
  pub timestamp: DateTime<Utc>,
  #[serde(flatten)]
  pub stats:     ProjectedSnapshot,
}

fn serialize_unix_seconds<S: Serializer>(
  at: &DateTime<Utc>,
  serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
  serializer.serialize_f64(unix_seconds(*at))
}

// ─── Engine ──────────────────────────────────────────────────────────────────

/// Read-only query engine over both stores.
pub struct TimeseriesEngine<'a, L, H> {
  latest:   &'a L,
  history:  &'a H,
  schema:   &'a ProjectionSchema,
  deadline: Option<Duration>,
}

impl<'a, L, H> TimeseriesEngine<'a, L, H>
where
  L: LatestStore,
  H: HistoryStore,
{
  pub fn new(latest: &'a L, history: &'a H, schema: &'a ProjectionSchema) -> Self {
    Self { latest, history, schema, deadline: None }
  }

  /// Abandon queries that run longer than `deadline`.
  pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
    self.deadline = deadline;
    self
  }

  /// Run `range` for `user_id`.
  ///
  /// Returns [`Error::NotFound`] when the user was never reconciled and has
  /// no history, rather than an empty list. On deadline expiry the whole
  /// query is dropped and [`Error::DeadlineExceeded`] returned.
  pub async fn query(
    &self,
    user_id: &str,
    range: &RangeQuery,
  ) -> Result<Vec<TimedSnapshot>> {
    let work = self.run(user_id, range);
    match self.deadline {
      Some(deadline) => tokio::time::timeout(deadline, work)
        .await
        .map_err(|_| Error::DeadlineExceeded(deadline))?,
      None => work.await,
    }
  }

  async fn run(&self, user_id: &str, range: &RangeQuery) -> Result<Vec<TimedSnapshot>> {
    if !self.is_known(user_id).await? {
      return Err(Error::NotFound(user_id.to_owned()));
    }

    let instants = self
      .history
      .capture_instants(user_id, range.before, range.after, range.limit)
      .await
      .map_err(Error::storage)?;
    debug!(user_id, instants = instants.len(), "selected capture instants");

    let mut items = Vec::with_capacity(instants.len());
    for timestamp in instants {
      let snapshot = self
        .history
        .snapshot_at(user_id, timestamp)
        .await
        .map_err(Error::storage)?;
      items.push(TimedSnapshot { timestamp, stats: self.schema.project(&snapshot) });
    }
    Ok(items)
  }

  async fn is_known(&self, user_id: &str) -> Result<bool> {
    if self.latest.user_exists(user_id).await.map_err(Error::storage)? {
      return Ok(true);
    }
    self.history.has_history(user_id).await.map_err(Error::storage)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params(before: Option<&str>, after: Option<&str>, limit: Option<&str>) -> RangeParams {
    RangeParams {
      before: before.map(str::to_owned),
      after:  after.map(str::to_owned),
      limit:  limit.map(str::to_owned),
    }
  }

  fn field_of(err: Error) -> &'static str {
    match err {
      Error::InvalidParameter { field, .. } => field,
      other => panic!("expected InvalidParameter, got {other:?}"),
    }
  }

  #[test]
  fn defaults_span_epoch_to_now() {
    let now = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let q = params(None, None, None).validate_at(now).unwrap();
    assert_eq!(q.before, DateTime::UNIX_EPOCH);
    assert_eq!(q.after, now);
    assert_eq!(q.limit, DEFAULT_LIMIT);
  }

  #[test]
  fn parses_fractional_seconds() {
    let q = params(Some("10.5"), Some("1700000000.25"), Some("7"))
      .validate()
      .unwrap();
    assert_eq!(q.before.timestamp_millis(), 10_500);
    assert_eq!(q.after.timestamp_millis(), 1_700_000_000_250);
    assert_eq!(q.limit, 7);
  }

  #[test]
  fn unparsable_timestamps_name_their_field() {
    assert_eq!(field_of(params(Some("yesterday"), None, None).validate().unwrap_err()), "before");
    assert_eq!(field_of(params(None, Some("soon"), None).validate().unwrap_err()), "after");
    assert_eq!(field_of(params(None, Some("inf"), None).validate().unwrap_err()), "after");
  }

  #[test]
  fn before_later_than_after_is_rejected() {
    let err = params(Some("200"), Some("100"), None).validate().unwrap_err();
    assert_eq!(field_of(err), "before");
  }

  #[test]
  fn equal_bounds_are_allowed() {
    let q = params(Some("100"), Some("100"), None).validate().unwrap();
    assert_eq!(q.before, q.after);
  }

  #[test]
  fn repeated_keys_keep_the_first_value() {
    let p: RangeParams =
      [("limit", "1"), ("limit", "2"), ("after", "50"), ("sort", "asc")].into_iter().collect();
    assert_eq!(p.limit.as_deref(), Some("1"));
    assert_eq!(p.after.as_deref(), Some("50"));
    assert_eq!(p.before, None);
  }

  #[test]
  fn limit_bounds_are_enforced() {
    for bad in ["0", "-3", "101", "ten", "1.5"] {
      let err = params(None, None, Some(bad)).validate().unwrap_err();
      assert_eq!(field_of(err), "limit", "{bad}");
    }
    assert_eq!(params(None, None, Some("1")).validate().unwrap().limit, 1);
    assert_eq!(params(None, None, Some("100")).validate().unwrap().limit, 100);
  }
}

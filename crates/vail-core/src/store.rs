//! Storage and upstream abstractions.
//!
//! Backends (e.g. `vail-store-sqlite`) implement [`LatestStore`] and
//! [`HistoryStore`]; the upstream client implements [`StatsSource`]. Higher
//! layers depend on these traits, not on any concrete backend.
//!
//! All methods return `Send` futures so the traits can be used in
//! multi-threaded async runtimes (e.g. tokio with `axum`).

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::stat::{HistoryRow, LatestRecord, UserSnapshot};

/// Outcome of one committed reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reconciliation {
  pub user_id:       String,
  pub reconciled_at: DateTime<Utc>,
  /// Number of codes written (inserted or overwritten).
  pub upserted:      usize,
  /// Codes that were stored before but absent from the new snapshot.
  pub retired:       Vec<String>,
}

// ─── Latest values ───────────────────────────────────────────────────────────

/// Durable `(user, code) → (value, updated_at)` store.
///
/// The reconciler is its only writer.
pub trait LatestStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Make the stored code set for `user_id` equal to `snapshot`, as one
  /// atomic commit: upsert every pair with `updated_at = at`, then delete
  /// every stored code absent from `snapshot`. Also marks the user as
  /// tracked.
  ///
  /// On error nothing is committed.
  fn replace_user_stats<'a>(
    &'a self,
    user_id: &'a str,
    snapshot: &'a UserSnapshot,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<Reconciliation, Self::Error>> + Send + 'a;

  /// All currently-stored rows for `user_id`, ordered by code.
  fn latest_stats<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Vec<LatestRecord>, Self::Error>> + Send + 'a;

  /// Whether `user_id` has ever been reconciled.
  fn user_exists<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;
}

// ─── Historical log ──────────────────────────────────────────────────────────

/// Append-only time-series log of full snapshots.
///
/// Only the external history writer calls [`HistoryStore::append_history`];
/// the query engine only reads.
pub trait HistoryStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  fn append_history<'a>(
    &'a self,
    rows: &'a [HistoryRow],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Whether any row was ever captured for `user_id`.
  fn has_history<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + 'a;

  /// Distinct capture instants in `[lower, upper]` (both inclusive), most
  /// recent first, at most `limit` of them.
  fn capture_instants<'a>(
    &'a self,
    user_id: &'a str,
    lower: DateTime<Utc>,
    upper: DateTime<Utc>,
    limit: u32,
  ) -> impl Future<Output = Result<Vec<DateTime<Utc>>, Self::Error>> + Send + 'a;

  /// Every `(code, value)` row captured for `user_id` at exactly `at`.
  fn snapshot_at<'a>(
    &'a self,
    user_id: &'a str,
    at: DateTime<Utc>,
  ) -> impl Future<Output = Result<UserSnapshot, Self::Error>> + Send + 'a;
}

// ─── Upstream ────────────────────────────────────────────────────────────────

/// The upstream provider's per-user stats endpoint.
pub trait StatsSource: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Fetch every stat for `user_id`. `Ok(None)` means the provider does not
  /// know the user.
  fn fetch<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Option<UserSnapshot>, Self::Error>> + Send + 'a;
}

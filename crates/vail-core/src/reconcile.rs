//! Snapshot reconciliation: folding a fresh upstream fetch into the
//! latest-value store.

use chrono::Utc;
use tracing::{info, warn};

use crate::{
  Error, Result,
  stat::UserSnapshot,
  store::{LatestStore, Reconciliation, StatsSource},
};

/// A successful refresh: the snapshot as fetched, and what reconciling it
/// changed.
#[derive(Debug, Clone)]
pub struct Refreshed {
  pub snapshot:       UserSnapshot,
  pub reconciliation: Reconciliation,
}

/// Sole writer of [`LatestStore`] rows.
pub struct Reconciler<'s, S> {
  store: &'s S,
}

impl<'s, S: LatestStore> Reconciler<'s, S> {
  pub fn new(store: &'s S) -> Self { Self { store } }

  /// Replace the stored code set for `user_id` with `snapshot`, stamped with
  /// the current instant.
  ///
  /// The backend commits the upserts and the deletes of vanished codes as one
  /// unit. On failure nothing is written; the next successful fetch repairs
  /// the state through the same diff.
  pub async fn reconcile(
    &self,
    user_id: &str,
    snapshot: &UserSnapshot,
  ) -> Result<Reconciliation> {
    let at = Utc::now();
    let outcome = self
      .store
      .replace_user_stats(user_id, snapshot, at)
      .await
      .map_err(|e| {
        warn!(user_id, error = %e, "reconciliation aborted");
        Error::storage(e)
      })?;

    info!(
      user_id,
      upserted = outcome.upserted,
      retired = outcome.retired.len(),
      "reconciled stats"
    );
    Ok(outcome)
  }

  /// Fetch `user_id` from `source` and reconcile the result.
  ///
  /// An upstream "not found" yields [`Error::NotFound`] without touching the
  /// store.
  pub async fn refresh<F: StatsSource>(
    &self,
    source: &F,
    user_id: &str,
  ) -> Result<Refreshed> {
    let snapshot = source
      .fetch(user_id)
      .await
      .map_err(|e| Error::Upstream(Box::new(e)))?
      .ok_or_else(|| Error::NotFound(user_id.to_owned()))?;

    let reconciliation = self.reconcile(user_id, &snapshot).await?;
    Ok(Refreshed { snapshot, reconciliation })
  }
}

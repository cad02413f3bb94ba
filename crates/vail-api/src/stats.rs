//! Handler for `GET /v2/users/:user_id/stats`.
//!
//! Fetches the user from upstream, reconciles the result into the
//! latest-value store, and returns the projected snapshot. An upstream miss
//! returns 404 and leaves the store untouched.

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use vail_core::{
  projection::ProjectedSnapshot,
  reconcile::Reconciler,
  stat::unix_seconds,
  store::{HistoryStore, LatestStore, StatsSource},
};

use crate::{AppState, error::ApiError};

/// Body of a successful live-stats response.
#[derive(Debug, Serialize)]
pub struct LiveStats {
  pub stats:       ProjectedSnapshot,
  #[serde(serialize_with = "as_unix_seconds")]
  pub captured_at: DateTime<Utc>,
}

fn as_unix_seconds<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
  s.serialize_f64(unix_seconds(*at))
}

/// `GET /v2/users/:user_id/stats`
pub async fn get_one<S, F>(
  State(state): State<AppState<S, F>>,
  Path(user_id): Path<String>,
) -> Result<Json<LiveStats>, ApiError>
where
  S: LatestStore + HistoryStore,
  F: StatsSource,
{
  let refreshed = Reconciler::new(&*state.store)
    .refresh(&*state.source, &user_id)
    .await?;

  Ok(Json(LiveStats {
    stats:       state.schema.project(&refreshed.snapshot),
    captured_at: refreshed.reconciliation.reconciled_at,
  }))
}

//! Handler for `GET /v2/users/:user_id/stats/timeseries`.
//!
//! | Param    | Default | Notes |
//! |----------|---------|-------|
//! | `before` | `0`     | Lower bound, Unix seconds, inclusive |
//! | `after`  | now     | Upper bound, Unix seconds, inclusive |
//! | `limit`  | `100`   | `1..=100` instants, most recent first |
//!
//! A repeated parameter keeps its first value.

use axum::{
  Json,
  extract::{Path, Query, State, rejection::QueryRejection},
};
use serde::Serialize;
use vail_core::{
  store::{HistoryStore, LatestStore, StatsSource},
  timeseries::{RangeParams, TimedSnapshot, TimeseriesEngine},
};

use crate::{AppState, error::ApiError};

#[derive(Debug, Serialize)]
pub struct TimeseriesPage {
  pub items: Vec<TimedSnapshot>,
}

/// `GET /v2/users/:user_id/stats/timeseries[?before=...][&after=...][&limit=...]`
pub async fn list<S, F>(
  State(state): State<AppState<S, F>>,
  Path(user_id): Path<String>,
  query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<TimeseriesPage>, ApiError>
where
  S: LatestStore + HistoryStore,
  F: StatsSource,
{
  let Query(pairs) = query.map_err(|rejection| ApiError::InvalidParameter {
    field:  "query",
    detail: rejection.body_text(),
  })?;
  let range = pairs.into_iter().collect::<RangeParams>().validate()?;

  let items = TimeseriesEngine::new(&*state.store, &*state.store, &state.schema)
    .with_deadline(state.query_deadline)
    .query(&user_id, &range)
    .await
    .map_err(|e| match e {
      vail_core::Error::NotFound(_) => {
        ApiError::NotFound("user not found/not scraped yet.".into())
      }
      other => other.into(),
    })?;

  Ok(Json(TimeseriesPage { items }))
}

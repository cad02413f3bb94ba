//! JSON REST API for Vail stats.
//!
//! Exposes an axum [`Router`] backed by any store implementing both
//! [`LatestStore`] and [`HistoryStore`], and any upstream [`StatsSource`].
//! CORS, throttling, and TLS are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", vail_api::api_router(state))
//! ```

pub mod error;
pub mod stats;
pub mod timeseries;

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use vail_core::{
  schema::ProjectionSchema,
  store::{HistoryStore, LatestStore, StatsSource},
};

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct AppState<S, F> {
  pub store:          Arc<S>,
  pub source:         Arc<F>,
  /// Built once at startup from the full code catalog.
  pub schema:         Arc<ProjectionSchema>,
  /// Upper bound on a single timeseries query; `None` disables it.
  pub query_deadline: Option<Duration>,
}

impl<S, F> Clone for AppState<S, F> {
  fn clone(&self) -> Self {
    Self {
      store:          Arc::clone(&self.store),
      source:         Arc::clone(&self.source),
      schema:         Arc::clone(&self.schema),
      query_deadline: self.query_deadline,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S, F>(state: AppState<S, F>) -> Router<()>
where
  S: LatestStore + HistoryStore + 'static,
  F: StatsSource + 'static,
{
  Router::new()
    .route("/v2/users/{user_id}/stats", get(stats::get_one::<S, F>))
    .route("/v2/users/{user_id}/stats/timeseries", get(timeseries::list::<S, F>))
    .with_state(state)
}

#[cfg(test)]
mod tests;

//! Vail stats server: configuration, upstream client, and app assembly.
//!
//! The binary in `main.rs` wires these together; they live in a library so
//! the assembled router can be exercised in tests.

pub mod upstream;

use std::{path::PathBuf, time::Duration};

use axum::Router;
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use vail_api::{AppState, api_router};
use vail_core::store::{HistoryStore, LatestStore, StatsSource};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `VAIL_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                  String,
  pub port:                  u16,
  pub store_path:            PathBuf,
  /// Base URL of the upstream stats provider, e.g. `https://stats.example`.
  pub upstream_base_url:     String,
  #[serde(default = "default_upstream_timeout_secs")]
  pub upstream_timeout_secs: u64,
  /// Per-query timeseries deadline. `0` disables it.
  #[serde(default = "default_query_deadline_ms")]
  pub query_deadline_ms:     u64,
}

fn default_upstream_timeout_secs() -> u64 { 10 }
fn default_query_deadline_ms() -> u64 { 5_000 }

impl ServerConfig {
  pub fn upstream_timeout(&self) -> Duration {
    Duration::from_secs(self.upstream_timeout_secs)
  }

  pub fn query_deadline(&self) -> Option<Duration> {
    (self.query_deadline_ms > 0).then(|| Duration::from_millis(self.query_deadline_ms))
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Mount the API under `/api` with request tracing.
pub fn app<S, F>(state: AppState<S, F>) -> Router
where
  S: LatestStore + HistoryStore + 'static,
  F: StatsSource + 'static,
{
  Router::new()
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

//! Error types for `vail-core`.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Unknown to the upstream provider, or never reconciled and absent from
  /// the historical log.
  #[error("user not found: {0}")]
  NotFound(String),

  /// Malformed or out-of-range query input, naming the offending field.
  #[error("invalid {field} parameter: {detail}")]
  InvalidParameter { field: &'static str, detail: String },

  /// Backend unavailable or commit failure. Nothing was written.
  #[error("storage error: {0}")]
  StorageTransient(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The stat-code namespace cannot be turned into a projection schema.
  #[error("malformed stat code namespace: {0}")]
  SchemaConfiguration(String),

  #[error("query abandoned after exceeding its {0:?} deadline")]
  DeadlineExceeded(Duration),

  #[error("upstream fetch failed: {0}")]
  Upstream(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn invalid(field: &'static str, detail: impl Into<String>) -> Self {
    Self::InvalidParameter { field, detail: detail.into() }
  }

  pub(crate) fn storage<E>(err: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::StorageTransient(Box::new(err))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! HTTP client for the upstream stats provider.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use tracing::debug;
use vail_core::{stat::UserSnapshot, store::StatsSource};

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
  #[error("upstream request failed: {0}")]
  Request(#[from] reqwest::Error),
}

/// [`StatsSource`] backed by `GET {base_url}/users/{user_id}/stats`.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpStatsSource {
  client:   Client,
  base_url: String,
}

impl HttpStatsSource {
  pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
    let client = Client::builder().timeout(timeout).build()?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, user_id: &str) -> String {
    format!("{}/users/{user_id}/stats", self.base_url.trim_end_matches('/'))
  }
}

impl StatsSource for HttpStatsSource {
  type Error = UpstreamError;

  fn fetch<'a>(
    &'a self,
    user_id: &'a str,
  ) -> impl Future<Output = Result<Option<UserSnapshot>, UpstreamError>> + Send + 'a {
    async move {
      let resp = self.client.get(self.url(user_id)).send().await?;
      if resp.status() == StatusCode::NOT_FOUND {
        debug!(user_id, "upstream does not know user");
        return Ok(None);
      }

      let snapshot: UserSnapshot = resp.error_for_status()?.json().await?;
      debug!(user_id, codes = snapshot.len(), "fetched upstream stats");
      Ok(Some(snapshot))
    }
  }
}

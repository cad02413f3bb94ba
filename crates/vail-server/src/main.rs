//! vail-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite store, builds the projection schema from the code catalog, and
//! serves the stats API over HTTP.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use vail_api::AppState;
use vail_core::{catalog::KNOWN_CODES, schema::ProjectionSchema};
use vail_server::{ServerConfig, upstream::HttpStatsSource};
use vail_store_sqlite::SqliteStore;

#[derive(Parser)]
#[command(author, version, about = "Vail stats server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("VAIL"))
    .build()
    .context("failed to read config file")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;

  // A malformed catalog is fatal.
  let schema = ProjectionSchema::build(KNOWN_CODES.iter().copied())
    .context("failed to build projection schema")?;
  tracing::info!(
    weapons = schema.weapon_types().len(),
    maps = schema.map_names().len(),
    "built projection schema"
  );

  let store_path = expand_tilde(&server_cfg.store_path);
  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let source = HttpStatsSource::new(
    server_cfg.upstream_base_url.clone(),
    server_cfg.upstream_timeout(),
  )
  .context("failed to build upstream client")?;

  let state = AppState {
    store:          Arc::new(store),
    source:         Arc::new(source),
    schema:         Arc::new(schema),
    query_deadline: server_cfg.query_deadline(),
  };

  let app = vail_server::app(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

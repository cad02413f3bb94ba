//! [`SqliteStore`]: the SQLite implementation of [`LatestStore`] and
//! [`HistoryStore`].

use std::{collections::HashSet, path::Path};

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;
use vail_core::{
  stat::{HistoryRow, LatestRecord, UserSnapshot},
  store::{HistoryStore, LatestStore, Reconciliation},
};

use crate::{
  Result,
  encode::{RawLatestRecord, decode_millis, encode_dt, encode_millis},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Vail stats store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. Every call
/// runs as one closure on the connection's thread, so a reconciliation's
/// transaction is never interleaved with another statement.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    debug!("store schema ready");
    Ok(())
  }
}

// ─── LatestStore impl ────────────────────────────────────────────────────────

impl LatestStore for SqliteStore {
  type Error = crate::Error;

  async fn replace_user_stats(
    &self,
    user_id: &str,
    snapshot: &UserSnapshot,
    at: DateTime<Utc>,
  ) -> Result<Reconciliation> {
    let user_id_str = user_id.to_owned();
    let at_str      = encode_dt(at);
    let rows: Vec<(String, f64)> = snapshot
      .iter()
      .map(|(code, value)| (code.to_owned(), value))
      .collect();

    let retired: Vec<String> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let retired = {
          let mut upsert = tx.prepare(
            "INSERT INTO stats (user_id, code, value, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (user_id, code)
             DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
          )?;
          for (code, value) in &rows {
            upsert.execute(rusqlite::params![user_id_str, code, value, at_str])?;
          }

          let fresh: HashSet<&str> = rows.iter().map(|(code, _)| code.as_str()).collect();
          let mut stored = tx.prepare("SELECT code FROM stats WHERE user_id = ?1")?;
          let retired: Vec<String> = stored
            .query_map(rusqlite::params![user_id_str], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<_>>>()?
            .into_iter()
            .filter(|code| !fresh.contains(code.as_str()))
            .collect();

          let mut delete =
            tx.prepare("DELETE FROM stats WHERE user_id = ?1 AND code = ?2")?;
          for code in &retired {
            delete.execute(rusqlite::params![user_id_str, code])?;
          }

          tx.execute(
            "INSERT INTO users (user_id, first_seen_at, last_reconciled_at)
             VALUES (?1, ?2, ?2)
             ON CONFLICT (user_id)
             DO UPDATE SET last_reconciled_at = excluded.last_reconciled_at",
            rusqlite::params![user_id_str, at_str],
          )?;
          retired
        };
        tx.commit()?;
        Ok(retired)
      })
      .await?;
    debug!(
      user_id,
      upserted = snapshot.len(),
      retired = retired.len(),
      "committed stats replacement"
    );

    Ok(Reconciliation {
      user_id: user_id.to_owned(),
      reconciled_at: at,
      upserted: snapshot.len(),
      retired,
    })
  }

  async fn latest_stats(&self, user_id: &str) -> Result<Vec<LatestRecord>> {
    let user_id_str = user_id.to_owned();

    let raws: Vec<RawLatestRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT user_id, code, value, updated_at
           FROM stats
           WHERE user_id = ?1
           ORDER BY code",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str], |row| {
            Ok(RawLatestRecord {
              user_id:    row.get(0)?,
              code:       row.get(1)?,
              value:      row.get(2)?,
              updated_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLatestRecord::into_record).collect()
  }

  async fn user_exists(&self, user_id: &str) -> Result<bool> {
    let user_id_str = user_id.to_owned();

    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM users WHERE user_id = ?1",
              rusqlite::params![user_id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }
}

// ─── HistoryStore impl ───────────────────────────────────────────────────────

impl HistoryStore for SqliteStore {
  type Error = crate::Error;

  async fn append_history(&self, rows: &[HistoryRow]) -> Result<()> {
    let encoded: Vec<(String, String, f64, i64)> = rows
      .iter()
      .map(|r| (r.user_id.clone(), r.code.clone(), r.value, encode_millis(r.captured_at)))
      .collect();

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut insert = tx.prepare(
            "INSERT INTO user_stats (user_id, code, value, captured_at)
             VALUES (?1, ?2, ?3, ?4)",
          )?;
          for (user_id, code, value, captured_at) in &encoded {
            insert.execute(rusqlite::params![user_id, code, value, captured_at])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;
    debug!(rows = rows.len(), "appended history rows");
    Ok(())
  }

  async fn has_history(&self, user_id: &str) -> Result<bool> {
    let user_id_str = user_id.to_owned();

    let exists = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM user_stats WHERE user_id = ?1 LIMIT 1",
              rusqlite::params![user_id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  async fn capture_instants(
    &self,
    user_id: &str,
    lower: DateTime<Utc>,
    upper: DateTime<Utc>,
    limit: u32,
  ) -> Result<Vec<DateTime<Utc>>> {
    let user_id_str = user_id.to_owned();
    let lower_ms    = encode_millis(lower);
    let upper_ms    = encode_millis(upper);

    let instants: Vec<i64> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT captured_at
           FROM user_stats
           WHERE user_id = ?1
             AND captured_at BETWEEN ?2 AND ?3
           ORDER BY captured_at DESC
           LIMIT ?4",
        )?;
        let rows = stmt
          .query_map(
            rusqlite::params![user_id_str, lower_ms, upper_ms, limit],
            |row| row.get::<_, i64>(0),
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    instants.into_iter().map(decode_millis).collect()
  }

  async fn snapshot_at(&self, user_id: &str, at: DateTime<Utc>) -> Result<UserSnapshot> {
    let user_id_str = user_id.to_owned();
    let at_ms       = encode_millis(at);

    let rows: Vec<(String, f64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT code, value FROM user_stats WHERE user_id = ?1 AND captured_at = ?2",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_id_str, at_ms], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows.into_iter().collect())
  }
}

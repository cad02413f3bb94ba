//! SQL schema for the Vail SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per user that has been reconciled at least once.
CREATE TABLE IF NOT EXISTS users (
    user_id            TEXT PRIMARY KEY,
    first_seen_at      TEXT NOT NULL,   -- RFC 3339 UTC
    last_reconciled_at TEXT NOT NULL    -- RFC 3339 UTC
);

-- Latest known value per (user, code). Written only by reconciliation, which
-- replaces a user's whole code set in one transaction.
CREATE TABLE IF NOT EXISTS stats (
    user_id    TEXT NOT NULL,
    code       TEXT NOT NULL,
    value      REAL NOT NULL,
    updated_at TEXT NOT NULL,           -- RFC 3339 UTC; the fetch instant
    PRIMARY KEY (user_id, code)
);

-- Historical log. Strictly append-only: no UPDATE or DELETE is ever issued.
-- Rows sharing captured_at form one historical instant.
CREATE TABLE IF NOT EXISTS user_stats (
    user_id     TEXT NOT NULL,
    code        TEXT NOT NULL,
    value       REAL NOT NULL,
    captured_at INTEGER NOT NULL,       -- Unix milliseconds
    PRIMARY KEY (user_id, captured_at, code)
);

PRAGMA user_version = 1;
";

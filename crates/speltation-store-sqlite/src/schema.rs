//! SQL schema for the slot database.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per named slot. The client only ever uses one key.
CREATE TABLE IF NOT EXISTS slots (
    key         TEXT PRIMARY KEY,
    value_json  TEXT NOT NULL,
    written_at  TEXT NOT NULL   -- RFC 3339 UTC
);

PRAGMA user_version = 1;
";

//! SQL schema for the Giggle token store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- One row per (origin, slot). A missing row is an empty slot.
CREATE TABLE IF NOT EXISTS token_slots (
    scope       TEXT NOT NULL,   -- API origin the token was issued by
    slot        TEXT NOT NULL,   -- 'token' | 'refreshToken'
    value       TEXT NOT NULL,
    updated_at  TEXT NOT NULL,   -- ISO 8601 UTC
    PRIMARY KEY (scope, slot)
);

PRAGMA user_version = 1;
";

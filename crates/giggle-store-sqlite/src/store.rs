//! [`SqliteTokenStore`] — the SQLite implementation of [`TokenStore`].

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::OptionalExtension as _;

use giggle_core::store::{Slot, TokenStore};

use crate::{Error, Result, schema::SCHEMA};

// ─── Store ───────────────────────────────────────────────────────────────────

/// Durable token slots backed by a single SQLite file.
///
/// Every store is bound to a `scope` (the API origin). Slots written under one
/// scope are invisible under another, so sessions for different servers never
/// mix even when they share a file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteTokenStore {
  conn:  tokio_rusqlite::Connection,
  scope: String,
}

impl SqliteTokenStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  /// Missing parent directories are created.
  pub async fn open(
    path: impl AsRef<Path>,
    scope: impl Into<String>,
  ) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      std::fs::create_dir_all(parent)?;
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn, scope.into()).await
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory(scope: impl Into<String>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn, scope.into()).await
  }

  async fn init(conn: tokio_rusqlite::Connection, scope: String) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, scope })
  }

  pub fn scope(&self) -> &str { &self.scope }
}

// ─── TokenStore impl ─────────────────────────────────────────────────────────

impl TokenStore for SqliteTokenStore {
  type Error = Error;

  async fn get(&self, slot: Slot) -> Result<Option<String>> {
    let scope = self.scope.clone();
    let key = slot.key();

    let value = self
      .conn
      .call(move |conn| {
        let value: Option<String> = conn
          .query_row(
            "SELECT value FROM token_slots WHERE scope = ?1 AND slot = ?2",
            rusqlite::params![scope, key],
            |r| r.get(0),
          )
          .optional()?;
        Ok(value)
      })
      .await?;
    Ok(value)
  }

  async fn set(&self, slot: Slot, value: String) -> Result<()> {
    let scope = self.scope.clone();
    let key = slot.key();
    let updated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO token_slots (scope, slot, value, updated_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (scope, slot)
           DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
          rusqlite::params![scope, key, value, updated_at],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn remove(&self, slot: Slot) -> Result<()> {
    let scope = self.scope.clone();
    let key = slot.key();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "DELETE FROM token_slots WHERE scope = ?1 AND slot = ?2",
          rusqlite::params![scope, key],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

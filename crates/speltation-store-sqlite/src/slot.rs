//! [`SqliteSlot`]: the SQLite implementation of [`SessionSlot`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use speltation_core::{
  slot::{SESSION_KEY, SessionSlot},
  user::User,
};

use crate::{Error, Result, schema::SCHEMA};

/// A durable session slot stored in a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteSlot {
  pub(crate) conn: tokio_rusqlite::Connection,
  key:             String,
}

impl SqliteSlot {
  /// Open (or create) the database at `path`, creating parent directories
  /// as needed, and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await?;
    }
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory slot for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self {
      conn,
      key: SESSION_KEY.to_owned(),
    })
  }

  /// Use `key` instead of the default session key.
  pub fn with_key(mut self, key: impl Into<String>) -> Self {
    self.key = key.into();
    self
  }

  async fn read_raw(&self) -> Result<Option<String>> {
    let key = self.key.clone();
    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value_json FROM slots WHERE key = ?1",
              rusqlite::params![key],
              |r| r.get::<_, String>(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }
}

impl SessionSlot for SqliteSlot {
  type Error = Error;

  async fn load(&self) -> Result<Option<User>> {
    let Some(raw) = self.read_raw().await? else {
      return Ok(None);
    };
    Ok(Some(serde_json::from_str(&raw)?))
  }

  async fn save(&self, user: &User) -> Result<()> {
    let key = self.key.clone();
    let value = serde_json::to_string(user)?;
    let at = Utc::now().to_rfc3339();
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO slots (key, value_json, written_at) VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE SET value_json = excluded.value_json,
                                          written_at = excluded.written_at",
          rusqlite::params![key, value, at],
        )?;
        Ok(())
      })
      .await?;
    tracing::debug!(key = %self.key, user_id = user.id, "session slot written");
    Ok(())
  }

  async fn clear(&self) -> Result<()> {
    let key = self.key.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM slots WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
      })
      .await?;
    tracing::debug!(key = %self.key, "session slot cleared");
    Ok(())
  }
}

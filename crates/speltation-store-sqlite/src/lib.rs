//! SQLite backend for the Speltation session slot.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime.

mod schema;
mod slot;

pub mod error;

pub use error::{Error, Result};
pub use slot::SqliteSlot;

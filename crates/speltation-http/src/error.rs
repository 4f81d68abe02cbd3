//! Errors raised while constructing an [`HttpRemote`](crate::HttpRemote).
//!
//! Request-time failures use [`speltation_core::Error`] instead.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
  #[error("{0} endpoint URL is empty")]
  MissingUrl(&'static str),

  #[error("failed to build HTTP client: {0}")]
  Client(#[from] reqwest::Error),
}

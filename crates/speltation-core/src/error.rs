//! Error taxonomy shared by every Speltation crate.
//!
//! Transports and storage backends convert their own errors into [`Error`]
//! so the presentation layer only ever reports one kind of failure.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field was missing; caught before any request was issued.
  #[error("{0}")]
  ValidationFailed(String),

  /// The action needs a signed-in user and there is none.
  #[error("sign in to {0}")]
  AuthenticationRequired(&'static str),

  /// The endpoint answered with a non-success status.
  #[error("{message}")]
  RequestFailed { status: u16, message: String },

  /// The request never produced a response (refused, reset, timed out).
  #[error("connection problem: {0}")]
  Connectivity(String),

  /// A success response whose body did not have the expected shape.
  #[error("unexpected response: {0}")]
  Decode(String),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification of a [`Error::RequestFailed`] by status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
  /// 401: unknown user, wrong password or wrong current password.
  InvalidCredentials,
  /// 409: the username is already taken.
  Conflict,
  /// 400: the endpoint refused the payload.
  Invalid,
  Other,
}

impl Error {
  /// Generic message used when a failed response carries no `error` field.
  pub const GENERIC_FAILURE: &'static str = "request failed";

  pub fn rejection(&self) -> Option<Rejection> {
    match self {
      Self::RequestFailed { status, .. } => Some(match status {
        401 => Rejection::InvalidCredentials,
        409 => Rejection::Conflict,
        400 => Rejection::Invalid,
        _ => Rejection::Other,
      }),
      _ => None,
    }
  }

  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Storage(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

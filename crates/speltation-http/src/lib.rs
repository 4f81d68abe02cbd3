//! HTTP transport for the Speltation client.
//!
//! [`HttpRemote`] implements [`speltation_core::remote::NewsRemote`] over the
//! three JSON endpoints (auth, news, users). Each method issues exactly one
//! request; failures are mapped onto [`speltation_core::Error`].

mod client;
mod wire;

pub mod error;

pub use client::{HttpRemote, RemoteConfig};
pub use error::BuildError;

#[cfg(test)]
mod tests;

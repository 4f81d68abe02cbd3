//! Core types and command handlers for the Speltation news client.
//!
//! No HTTP or database code lives here. The remote endpoints and the durable
//! session slot are reached through the [`remote::NewsRemote`] and
//! [`slot::SessionSlot`] traits; transports and storage backends live in
//! their own crates.

// Impls use native `async fn`; the traits spell out the `Send` bounds.
#![allow(async_fn_in_trait)]

pub mod article;
pub mod badge;
pub mod error;
pub mod filter;
pub mod remote;
pub mod session;
pub mod slot;
pub mod user;
pub mod view;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

pub use error::{Error, Rejection, Result};

//! The durable slot holding the signed-in user across restarts.

use std::{
  future::Future,
  sync::{
    Mutex, PoisonError,
    atomic::{AtomicUsize, Ordering},
  },
};

use crate::user::User;

/// Fixed key under which backends store the session user.
pub const SESSION_KEY: &str = "speltation.user";

/// A single named persisted value: the serialized current user.
pub trait SessionSlot: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read the stored user, if any.
  fn load(&self) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Overwrite the stored user.
  fn save<'a>(
    &'a self,
    user: &'a User,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Remove the stored user. Clearing an empty slot is not an error.
  fn clear(&self) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// In-process slot. Nothing survives the process; used with `--ephemeral`
/// and in tests.
#[derive(Debug, Default)]
pub struct MemorySlot {
  user:   Mutex<Option<User>>,
  writes: AtomicUsize,
}

impl MemorySlot {
  pub fn with_user(user: User) -> Self {
    Self {
      user:   Mutex::new(Some(user)),
      writes: AtomicUsize::new(0),
    }
  }

  /// How many times `save` or `clear` has been called.
  pub fn writes(&self) -> usize { self.writes.load(Ordering::SeqCst) }

  pub fn current(&self) -> Option<User> {
    self.user.lock().unwrap_or_else(PoisonError::into_inner).clone()
  }
}

impl SessionSlot for MemorySlot {
  type Error = std::convert::Infallible;

  async fn load(&self) -> Result<Option<User>, Self::Error> { Ok(self.current()) }

  async fn save(&self, user: &User) -> Result<(), Self::Error> {
    self.writes.fetch_add(1, Ordering::SeqCst);
    *self.user.lock().unwrap_or_else(PoisonError::into_inner) = Some(user.clone());
    Ok(())
  }

  async fn clear(&self) -> Result<(), Self::Error> {
    self.writes.fetch_add(1, Ordering::SeqCst);
    *self.user.lock().unwrap_or_else(PoisonError::into_inner) = None;
    Ok(())
  }
}

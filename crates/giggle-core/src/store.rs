//! The `TokenStore` trait and an in-memory implementation.
//!
//! Durable storage is a secondary copy of the session: two string slots that
//! survive process restarts. The trait is implemented by storage backends
//! (e.g. `giggle-store-sqlite`); the [`SessionManager`](crate::SessionManager)
//! depends only on this abstraction.

use std::{
  collections::HashMap,
  convert::Infallible,
  future::Future,
  sync::{Arc, Mutex, PoisonError},
};

// ─── Slots ───────────────────────────────────────────────────────────────────

/// A named slot in durable storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
  AccessToken,
  RefreshToken,
}

impl Slot {
  pub const ALL: [Slot; 2] = [Slot::AccessToken, Slot::RefreshToken];

  /// The storage key for this slot.
  pub fn key(self) -> &'static str {
    match self {
      Self::AccessToken => "token",
      Self::RefreshToken => "refreshToken",
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a persistent, string-keyed token store.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes.
pub trait TokenStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Read a slot. Returns `None` if it is empty.
  fn get(
    &self,
    slot: Slot,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + '_;

  /// Write a slot, replacing any previous value.
  fn set(
    &self,
    slot: Slot,
    value: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// Empty a slot. Removing an empty slot is not an error.
  fn remove(
    &self,
    slot: Slot,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

// ─── In-memory store ─────────────────────────────────────────────────────────

/// A [`TokenStore`] that lives only as long as the process.
///
/// Cloning is cheap and clones share the same slots, so a clone handed to a
/// second [`SessionManager`](crate::SessionManager) behaves like the same
/// storage seen after a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryTokenStore {
  slots: Arc<Mutex<HashMap<Slot, String>>>,
}

impl MemoryTokenStore {
  pub fn new() -> Self { Self::default() }

  pub fn is_empty(&self) -> bool {
    self.slots.lock().unwrap_or_else(PoisonError::into_inner).is_empty()
  }

  /// Synchronous read, for inspecting the store outside an async context.
  pub fn peek(&self, slot: Slot) -> Option<String> {
    self
      .slots
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .get(&slot)
      .cloned()
  }
}

impl TokenStore for MemoryTokenStore {
  type Error = Infallible;

  async fn get(&self, slot: Slot) -> Result<Option<String>, Infallible> {
    Ok(self.peek(slot))
  }

  async fn set(&self, slot: Slot, value: String) -> Result<(), Infallible> {
    self
      .slots
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .insert(slot, value);
    Ok(())
  }

  async fn remove(&self, slot: Slot) -> Result<(), Infallible> {
    self
      .slots
      .lock()
      .unwrap_or_else(PoisonError::into_inner)
      .remove(&slot);
    Ok(())
  }
}

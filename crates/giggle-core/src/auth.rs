//! The `AuthService` trait: the external authentication collaborator.
//!
//! Implemented over HTTP by `giggle-client`. The session manager treats the
//! service as opaque: it neither validates credentials nor interprets the
//! service's error messages.

use std::{fmt, future::Future};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Request / response types ────────────────────────────────────────────────

/// Input to [`AuthService::login`].
#[derive(Clone, Serialize)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

/// Input to [`AuthService::register`].
#[derive(Clone, Serialize)]
pub struct Registration {
  pub username: String,
  pub email:    String,
  pub password: String,
}

/// The tokens returned by a successful credential exchange.
#[derive(Clone, Deserialize)]
pub struct TokenPair {
  pub access:  String,
  pub refresh: String,
}

impl fmt::Debug for Credentials {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Credentials")
      .field("username", &self.username)
      .finish_non_exhaustive()
  }
}

impl fmt::Debug for Registration {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Registration")
      .field("username", &self.username)
      .field("email", &self.email)
      .finish_non_exhaustive()
  }
}

impl fmt::Debug for TokenPair {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("TokenPair").finish_non_exhaustive()
  }
}

// ─── Errors ──────────────────────────────────────────────────────────────────

/// A failure reported by (or while reaching) the authentication service.
#[derive(Debug, Error)]
pub enum AuthError {
  /// The service answered with an error status. `detail` is the service's
  /// own message, kept verbatim for display.
  #[error("{detail}")]
  Rejected { status: u16, detail: String },

  /// The service could not be reached, or its response could not be read.
  #[error("auth service unavailable: {0}")]
  Transport(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl AuthError {
  pub fn transport<E>(error: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Transport(Box::new(error))
  }

  /// The service's message, if it sent one.
  pub fn detail(&self) -> Option<&str> {
    match self {
      Self::Rejected { detail, .. } => Some(detail),
      Self::Transport(_) => None,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Credential exchange and account creation.
pub trait AuthService: Send + Sync {
  /// Exchange a username and password for an access/refresh token pair.
  fn login<'a>(
    &'a self,
    credentials: &'a Credentials,
  ) -> impl Future<Output = Result<TokenPair, AuthError>> + Send + 'a;

  /// Create an account. Does not return a session; callers log in
  /// separately.
  fn register<'a>(
    &'a self,
    registration: &'a Registration,
  ) -> impl Future<Output = Result<(), AuthError>> + Send + 'a;
}

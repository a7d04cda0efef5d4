//! Error type for `giggle-client`.

use thiserror::Error;

/// Errors raised while constructing an [`HttpAuthService`](crate::HttpAuthService).
///
/// Failures of individual requests are reported as
/// [`giggle_core::auth::AuthError`].
#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid base URL {url:?}: {reason}")]
  InvalidBaseUrl { url: String, reason: String },

  #[error("failed to build HTTP client: {0}")]
  Build(#[from] reqwest::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

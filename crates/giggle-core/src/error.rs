//! Error types for `giggle-core`.

use thiserror::Error;

use crate::auth::AuthError;

/// Why a compact bearer token could not be read.
#[derive(Debug, Error)]
pub enum TokenError {
  #[error("expected 3 dot-separated segments, found {0}")]
  SegmentCount(usize),

  #[error("payload is not base64url: {0}")]
  Base64(#[from] base64::DecodeError),

  #[error("invalid claims: {0}")]
  Claims(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum Error {
  /// The authentication service refused the request or could not be reached.
  #[error(transparent)]
  Auth(#[from] AuthError),

  #[error("malformed session token: {0}")]
  MalformedToken(#[from] TokenError),

  #[error("session token expired (exp = {0})")]
  ExpiredToken(f64),

  #[error("token store error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn storage<E>(error: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Storage(Box::new(error))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

//! Identity and session types, and claims decoding for bearer tokens.
//!
//! The access token is a three-segment compact token (`header.payload.sig`)
//! issued by the authentication service. Only the payload is read; the
//! signature is the issuer's concern and is never verified here.

use std::fmt;

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, TokenError};

// ─── Identity ────────────────────────────────────────────────────────────────

/// The authenticated principal, derived entirely from access-token claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
  pub id:       u64,
  pub username: String,
  pub email:    String,
}

// ─── Claims ──────────────────────────────────────────────────────────────────

/// The subset of access-token claims the client relies on.
///
/// Deserialisation checks that every claim is present and has the expected
/// JSON type; anything else in the payload is ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
  /// Expiry, in seconds since the Unix epoch. Issuers may send a fractional
  /// value.
  pub exp:      f64,
  pub user_id:  u64,
  pub username: String,
  pub email:    String,
}

impl Claims {
  /// Whether the token has expired as of `now`.
  ///
  /// `exp` is in seconds; the comparison is made in milliseconds.
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    self.exp * 1000.0 <= now.timestamp_millis() as f64
  }

  /// `None` when `exp` lies outside the range chrono can represent.
  pub fn expires_at(&self) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis((self.exp * 1000.0) as i64)
  }

  pub fn into_identity(self) -> Identity {
    Identity {
      id:       self.user_id,
      username: self.username,
      email:    self.email,
    }
  }
}

/// Read the claims out of a compact token without verifying its signature.
pub fn decode_claims(token: &str) -> Result<Claims, TokenError> {
  let segments: Vec<&str> = token.split('.').collect();
  if segments.len() != 3 {
    return Err(TokenError::SegmentCount(segments.len()));
  }

  // Some issuers keep the base64 padding.
  let payload = URL_SAFE_NO_PAD.decode(segments[1].trim_end_matches('='))?;
  Ok(serde_json::from_slice(&payload)?)
}

// ─── Session ─────────────────────────────────────────────────────────────────

/// A live, unexpired session: both tokens plus the identity they carry.
///
/// There is no partially-populated session. The only constructor,
/// [`Session::from_tokens`], refuses malformed and expired access tokens.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
  access_token:  String,
  refresh_token: Option<String>,
  identity:      Identity,
  expires_at:    Option<DateTime<Utc>>,
}

impl Session {
  /// Build a session from an access token (and optional refresh token),
  /// checking expiry against `now`.
  pub fn from_tokens(
    access_token: String,
    refresh_token: Option<String>,
    now: DateTime<Utc>,
  ) -> Result<Self> {
    let claims = decode_claims(&access_token)?;
    if claims.is_expired(now) {
      return Err(Error::ExpiredToken(claims.exp));
    }
    Ok(Self {
      access_token,
      refresh_token,
      expires_at: claims.expires_at(),
      identity: claims.into_identity(),
    })
  }

  pub fn access_token(&self) -> &str { &self.access_token }

  /// The refresh token, if one was issued or persisted. It is kept but never
  /// exchanged.
  pub fn refresh_token(&self) -> Option<&str> { self.refresh_token.as_deref() }

  pub fn identity(&self) -> &Identity { &self.identity }

  pub fn expires_at(&self) -> Option<DateTime<Utc>> { self.expires_at }
}

// Tokens are bearer credentials; keep them out of logs.
impl fmt::Debug for Session {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Session")
      .field("access_token", &"<redacted>")
      .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
      .field("identity", &self.identity)
      .field("expires_at", &self.expires_at)
      .finish()
  }
}

// ─── AuthState ───────────────────────────────────────────────────────────────

/// What consumers observe about the current user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AuthState {
  /// The persisted session has not been examined yet.
  #[default]
  Loading,
  Unauthenticated,
  Authenticated(Session),
}

impl AuthState {
  pub fn is_loading(&self) -> bool { matches!(self, Self::Loading) }

  pub fn is_authenticated(&self) -> bool {
    matches!(self, Self::Authenticated(_))
  }

  pub fn session(&self) -> Option<&Session> {
    match self {
      Self::Authenticated(session) => Some(session),
      _ => None,
    }
  }

  pub fn identity(&self) -> Option<&Identity> {
    self.session().map(Session::identity)
  }
}

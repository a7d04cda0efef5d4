//! [`HttpAuthService`] — the authentication API over HTTP.

use giggle_core::auth::{
  AuthError, AuthService, Credentials, Registration, TokenPair,
};
use reqwest::{Client, Response, Url};
use serde::Serialize;
use tracing::{debug, warn};

use crate::{Error, Result, detail};

/// Async HTTP client for the authentication endpoints.
///
/// No request timeout is applied and nothing is retried; failures go straight
/// back to the caller.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
  client:   Client,
  base_url: String,
}

impl HttpAuthService {
  /// `base_url` is the API root, e.g. `http://localhost:8000/api`.
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let base_url = base_url.into();
    let parsed = Url::parse(&base_url).map_err(|e| Error::InvalidBaseUrl {
      url:    base_url.clone(),
      reason: e.to_string(),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
      return Err(Error::InvalidBaseUrl {
        url:    base_url,
        reason: format!("unsupported scheme {:?}", parsed.scheme()),
      });
    }

    let client = Client::builder().build()?;
    Ok(Self {
      client,
      base_url: base_url.trim_end_matches('/').to_owned(),
    })
  }

  pub fn base_url(&self) -> &str { &self.base_url }

  fn url(&self, path: &str) -> String { format!("{}{}", self.base_url, path) }

  /// POST a JSON body, turning non-2xx responses into
  /// [`AuthError::Rejected`].
  async fn post<B: Serialize + ?Sized>(
    &self,
    path: &str,
    body: &B,
  ) -> Result<Response, AuthError> {
    let url = self.url(path);
    debug!(%url, "POST");

    let resp = self
      .client
      .post(&url)
      .json(body)
      .send()
      .await
      .map_err(|e| {
        warn!(%url, error = %e, "auth request failed");
        AuthError::transport(e)
      })?;

    if resp.status().is_success() {
      Ok(resp)
    } else {
      Err(rejection(resp).await)
    }
  }
}

async fn rejection(resp: Response) -> AuthError {
  let status = resp.status();
  let body: Option<serde_json::Value> = resp.json().await.ok();
  let detail = body.as_ref().and_then(detail::extract).unwrap_or_else(|| {
    status
      .canonical_reason()
      .map_or_else(|| format!("HTTP {}", status.as_u16()), str::to_owned)
  });
  debug!(status = status.as_u16(), %detail, "auth request rejected");
  AuthError::Rejected {
    status: status.as_u16(),
    detail,
  }
}

impl AuthService for HttpAuthService {
  /// `POST /auth/login/`
  async fn login(
    &self,
    credentials: &Credentials,
  ) -> Result<TokenPair, AuthError> {
    self
      .post("/auth/login/", credentials)
      .await?
      .json()
      .await
      .map_err(AuthError::transport)
  }

  /// `POST /auth/register/`
  async fn register(
    &self,
    registration: &Registration,
  ) -> Result<(), AuthError> {
    self.post("/auth/register/", registration).await?;
    Ok(())
  }
}

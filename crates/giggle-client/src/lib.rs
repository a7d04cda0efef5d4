//! HTTP client for the Giggle authentication API.
//!
//! [`HttpAuthService`] implements [`giggle_core::auth::AuthService`] against
//! the REST endpoints `POST /auth/login/` and `POST /auth/register/`.

mod detail;
mod service;

pub mod error;

pub use error::{Error, Result};
pub use service::HttpAuthService;

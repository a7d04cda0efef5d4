//! Core types and trait definitions for the Giggle session lifecycle.
//!
//! This crate is deliberately free of HTTP and database dependencies. The
//! authentication service and durable token storage are abstracted behind
//! [`auth::AuthService`] and [`store::TokenStore`]; concrete backends live in
//! `giggle-client` and `giggle-store-sqlite`.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod auth;
pub mod clock;
pub mod error;
pub mod manager;
pub mod session;
pub mod store;

pub use error::{Error, Result, TokenError};
pub use manager::SessionManager;

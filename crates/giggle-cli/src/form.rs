//! Client-side validation for the login and registration prompts.
//!
//! The session manager forwards whatever it is given; catching empty fields
//! and mismatched passwords is the form's job.

use thiserror::Error;

pub const MIN_PASSWORD_LEN: usize = 8;

pub const LOGIN_FAILED: &str = "Login failed. Please try again.";
pub const REGISTRATION_FAILED: &str = "Registration failed. Please try again.";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
  #[error("Please fill in all fields")]
  MissingFields,

  #[error("Passwords do not match")]
  PasswordMismatch,

  #[error("Password must be at least 8 characters long")]
  PasswordTooShort,
}

#[derive(Debug, Clone)]
pub struct LoginForm {
  pub username: String,
  pub password: String,
}

impl LoginForm {
  pub fn validate(&self) -> Result<(), FormError> {
    if self.username.is_empty() || self.password.is_empty() {
      return Err(FormError::MissingFields);
    }
    Ok(())
  }
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
  pub username:         String,
  pub email:            String,
  pub password:         String,
  pub confirm_password: String,
}

impl RegisterForm {
  pub fn validate(&self) -> Result<(), FormError> {
    if [&self.username, &self.email, &self.password, &self.confirm_password]
      .iter()
      .any(|field| field.is_empty())
    {
      return Err(FormError::MissingFields);
    }
    if self.password != self.confirm_password {
      return Err(FormError::PasswordMismatch);
    }
    if self.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(FormError::PasswordTooShort);
    }
    Ok(())
  }
}

/// The message to show for a failed login or registration: the service's own
/// message when it sent one, otherwise `fallback`.
pub fn failure_message(error: &giggle_core::Error, fallback: &str) -> String {
  match error {
    giggle_core::Error::Auth(auth) => auth.detail().unwrap_or(fallback).to_owned(),
    _ => fallback.to_owned(),
  }
}

//! Extraction of a human-readable message from an error response body.
//!
//! The API reports failures either as `{"detail": "..."}` or, for validation
//! failures, as a map of field name to a list of messages
//! (`{"username": ["A user with that username already exists."]}`).

use serde_json::Value;

/// Fields whose messages are shown when there is no `detail`, in order.
const FIELDS: [&str; 3] = ["username", "email", "password"];

pub(crate) fn extract(body: &Value) -> Option<String> {
  if let Some(detail) = body.get("detail").and_then(Value::as_str) {
    return Some(detail.to_owned());
  }
  FIELDS.iter().find_map(|field| match body.get(field)? {
    Value::String(s) => Some(s.clone()),
    Value::Array(messages) => messages.first()?.as_str().map(str::to_owned),
    _ => None,
  })
}

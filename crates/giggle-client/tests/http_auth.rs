//! End-to-end tests for `HttpAuthService` against an in-process axum server.

use std::sync::{Arc, Mutex};

use axum::{
  Json, Router,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::post,
};
use giggle_client::HttpAuthService;
use giggle_core::{
  Error, SessionManager,
  auth::{AuthError, AuthService, Credentials, Registration},
  store::{MemoryTokenStore, Slot},
};
use serde_json::{Value, json};

// {"exp":9999999999,"user_id":7,"username":"alice","email":"a@example.com"}
const ALICE_ACCESS: &str = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9.\
  eyJleHAiOjk5OTk5OTk5OTksInVzZXJfaWQiOjcsInVzZXJuYW1lIjoiYWxpY2UiLCJlbWFpbCI6ImFAZXhhbXBsZS5jb20ifQ.\
  c2lnbmF0dXJl";

// ─── Fake server ─────────────────────────────────────────────────────────────

/// Requests received by the fake server, for assertions.
type Seen = Arc<Mutex<Vec<(String, Value)>>>;

async fn login(
  State(seen): State<Seen>,
  Json(body): Json<Value>,
) -> Response {
  seen.lock().unwrap().push(("login".into(), body.clone()));
  if body["username"] == "alice" && body["password"] == "correct horse" {
    Json(json!({"access": ALICE_ACCESS, "refresh": "refresh-7"}))
      .into_response()
  } else {
    (
      StatusCode::UNAUTHORIZED,
      Json(json!({
        "detail": "No active account found with the given credentials",
      })),
    )
      .into_response()
  }
}

async fn register(
  State(seen): State<Seen>,
  Json(body): Json<Value>,
) -> Response {
  seen.lock().unwrap().push(("register".into(), body.clone()));
  match body["username"].as_str() {
    Some("alice") if body["email"] == "a@example.com" => {
      (StatusCode::CREATED, Json(json!({"id": 7, "username": "alice"})))
        .into_response()
    }
    Some("taken") => (
      StatusCode::BAD_REQUEST,
      Json(json!({
        "username": ["A user with that username already exists."],
      })),
    )
      .into_response(),
    _ => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
  }
}

/// Serve the fake API on an ephemeral port; returns the API base URL.
async fn spawn() -> (String, Seen) {
  let seen = Seen::default();
  let app = Router::new()
    .route("/api/auth/login/", post(login))
    .route("/api/auth/register/", post(register))
    .with_state(seen.clone());

  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  (format!("http://{addr}/api"), seen)
}

fn credentials(username: &str, password: &str) -> Credentials {
  Credentials {
    username: username.into(),
    password: password.into(),
  }
}

// ─── AuthService ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn login_returns_token_pair() {
  let (url, seen) = spawn().await;
  let svc = HttpAuthService::new(url).unwrap();

  let tokens = svc.login(&credentials("alice", "correct horse")).await.unwrap();

  assert_eq!(tokens.access, ALICE_ACCESS);
  assert_eq!(tokens.refresh, "refresh-7");
  let seen = seen.lock().unwrap();
  assert_eq!(seen.len(), 1);
  assert_eq!(
    seen[0].1,
    json!({"username": "alice", "password": "correct horse"})
  );
}

#[tokio::test]
async fn login_rejection_carries_detail() {
  let (url, _) = spawn().await;
  let svc = HttpAuthService::new(url).unwrap();

  let err = svc.login(&credentials("alice", "nope")).await.unwrap_err();

  match err {
    AuthError::Rejected { status, detail } => {
      assert_eq!(status, 401);
      assert_eq!(detail, "No active account found with the given credentials");
    }
    other => panic!("unexpected error: {other:?}"),
  }
}

#[tokio::test]
async fn register_sends_all_fields() {
  let (url, seen) = spawn().await;
  let svc = HttpAuthService::new(url).unwrap();

  svc
    .register(&Registration {
      username: "alice".into(),
      email:    "a@example.com".into(),
      password: "correct horse".into(),
    })
    .await
    .unwrap();

  assert_eq!(
    seen.lock().unwrap()[0].1,
    json!({
      "username": "alice",
      "email": "a@example.com",
      "password": "correct horse",
    })
  );
}

#[tokio::test]
async fn register_field_error_is_surfaced() {
  let (url, _) = spawn().await;
  let svc = HttpAuthService::new(url).unwrap();

  let err = svc
    .register(&Registration {
      username: "taken".into(),
      email:    "t@example.com".into(),
      password: "whatever1".into(),
    })
    .await
    .unwrap_err();

  assert_eq!(err.detail(), Some("A user with that username already exists."));
}

#[tokio::test]
async fn non_json_error_falls_back_to_status_reason() {
  let (url, _) = spawn().await;
  let svc = HttpAuthService::new(url).unwrap();

  let err = svc
    .register(&Registration {
      username: "someone".into(),
      email:    "s@example.com".into(),
      password: "whatever1".into(),
    })
    .await
    .unwrap_err();

  assert!(matches!(
    err,
    AuthError::Rejected { status: 500, ref detail } if detail == "Internal Server Error"
  ));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
  // Bind and immediately drop a listener to get a port nobody serves.
  let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let svc = HttpAuthService::new(format!("http://{addr}/api")).unwrap();
  let err = svc.login(&credentials("alice", "pw")).await.unwrap_err();

  assert!(matches!(err, AuthError::Transport(_)));
  assert_eq!(err.detail(), None);
}

// ─── Through the SessionManager ──────────────────────────────────────────────

#[tokio::test]
async fn register_then_login_over_http() {
  let (url, seen) = spawn().await;
  let store = MemoryTokenStore::new();
  let manager =
    SessionManager::new(store.clone(), HttpAuthService::new(url).unwrap());
  manager.restore().await;

  let identity = manager
    .register("alice", "a@example.com", "correct horse")
    .await
    .unwrap()
    .unwrap();

  assert_eq!(identity.id, 7);
  assert_eq!(identity.username, "alice");
  assert_eq!(identity.email, "a@example.com");
  assert_eq!(store.peek(Slot::AccessToken).as_deref(), Some(ALICE_ACCESS));
  assert_eq!(store.peek(Slot::RefreshToken).as_deref(), Some("refresh-7"));

  let calls: Vec<String> =
    seen.lock().unwrap().iter().map(|(c, _)| c.clone()).collect();
  assert_eq!(calls, ["register", "login"]);
}

#[tokio::test]
async fn rejected_registration_skips_login() {
  let (url, seen) = spawn().await;
  let manager = SessionManager::new(
    MemoryTokenStore::new(),
    HttpAuthService::new(url).unwrap(),
  );

  let err = manager
    .register("taken", "t@example.com", "whatever1")
    .await
    .unwrap_err();

  assert!(matches!(err, Error::Auth(AuthError::Rejected { status: 400, .. })));
  assert!(!manager.is_authenticated());
  assert_eq!(seen.lock().unwrap().len(), 1);
}

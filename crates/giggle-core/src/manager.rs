//! [`SessionManager`] — the single owner of "who is logged in".
//!
//! The in-memory [`AuthState`] is the source of truth. Durable storage holds a
//! copy of the tokens so the session survives restarts; [`restore`] reads that
//! copy back once at startup.
//!
//! ```text
//! Loading ──restore: valid token──────────▶ Authenticated
//!    └────restore: none/expired/malformed─▶ Unauthenticated
//! Unauthenticated ──login/register──▶ Authenticated
//! Authenticated   ──logout──────────▶ Unauthenticated
//! ```
//!
//! Concurrent `login` calls are not coordinated; whichever finishes last
//! determines the state.
//!
//! [`restore`]: SessionManager::restore

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
  Error, Result,
  auth::{AuthService, Credentials, Registration, TokenPair},
  clock::{Clock, SystemClock},
  session::{AuthState, Identity, Session},
  store::{Slot, TokenStore},
};

pub struct SessionManager<S, A, C = SystemClock> {
  store: S,
  auth:  A,
  clock: C,
  state: watch::Sender<AuthState>,
}

impl<S, A> SessionManager<S, A>
where
  S: TokenStore,
  A: AuthService,
{
  /// Create a manager in the [`AuthState::Loading`] state, using the system
  /// clock.
  pub fn new(store: S, auth: A) -> Self {
    Self::with_clock(store, auth, SystemClock)
  }
}

impl<S, A, C> SessionManager<S, A, C>
where
  S: TokenStore,
  A: AuthService,
  C: Clock,
{
  pub fn with_clock(store: S, auth: A, clock: C) -> Self {
    let (state, _) = watch::channel(AuthState::Loading);
    Self {
      store,
      auth,
      clock,
      state,
    }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn auth(&self) -> &A { &self.auth }

  // ── Lifecycle ─────────────────────────────────────────────────────────────

  /// Re-establish the session from durable storage.
  ///
  /// Never fails. A missing, unreadable, malformed or expired token all end in
  /// [`AuthState::Unauthenticated`]; malformed and expired tokens are also
  /// erased from storage.
  pub async fn restore(&self) {
    let access = match self.store.get(Slot::AccessToken).await {
      Ok(Some(token)) => token,
      Ok(None) => {
        debug!("no persisted session");
        self.publish(AuthState::Unauthenticated);
        return;
      }
      Err(error) => {
        warn!(%error, "could not read persisted session");
        self.publish(AuthState::Unauthenticated);
        return;
      }
    };

    let refresh = self
      .store
      .get(Slot::RefreshToken)
      .await
      .unwrap_or_else(|error| {
        warn!(%error, "could not read persisted refresh token");
        None
      });

    match Session::from_tokens(access, refresh, self.clock.now()) {
      Ok(session) => {
        info!(
          user_id = session.identity().id,
          username = %session.identity().username,
          "restored session"
        );
        self.publish(AuthState::Authenticated(session));
      }
      Err(error) => {
        warn!(%error, "discarding persisted session");
        self.clear_storage().await;
        self.publish(AuthState::Unauthenticated);
      }
    }
  }

  /// Exchange credentials with the authentication service and start a new
  /// session, replacing any existing one.
  ///
  /// Returns the new identity, or `None` if the service issued a token that
  /// cannot be used (malformed or already expired); that case is treated as a
  /// logout rather than an error. A storage failure is returned as
  /// [`Error::Storage`] after both slots are erased and the state is
  /// `Unauthenticated`.
  pub async fn login(
    &self,
    username: &str,
    password: &str,
  ) -> Result<Option<Identity>> {
    let credentials = Credentials {
      username: username.to_owned(),
      password: password.to_owned(),
    };
    let tokens = self.auth.login(&credentials).await?;
    self.establish(tokens).await
  }

  /// Create an account, then log in with the same username and password.
  pub async fn register(
    &self,
    username: &str,
    email: &str,
    password: &str,
  ) -> Result<Option<Identity>> {
    let registration = Registration {
      username: username.to_owned(),
      email:    email.to_owned(),
      password: password.to_owned(),
    };
    self.auth.register(&registration).await?;
    info!(%username, "registered account");
    self.login(username, password).await
  }

  /// End the session. In-memory state is cleared before storage is touched;
  /// storage failures are logged and otherwise ignored.
  pub async fn logout(&self) {
    let was_authenticated = self.is_authenticated();
    self.publish(AuthState::Unauthenticated);
    self.clear_storage().await;
    if was_authenticated {
      info!("logged out");
    }
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// A snapshot of the current state.
  pub fn state(&self) -> AuthState { self.state.borrow().clone() }

  pub fn current_identity(&self) -> Option<Identity> {
    self.state.borrow().identity().cloned()
  }

  pub fn is_authenticated(&self) -> bool {
    self.state.borrow().is_authenticated()
  }

  /// `true` until [`restore`](Self::restore) has finished.
  pub fn is_loading(&self) -> bool { self.state.borrow().is_loading() }

  /// The bearer token to attach to authenticated API requests.
  pub fn access_token(&self) -> Option<String> {
    self
      .state
      .borrow()
      .session()
      .map(|s| s.access_token().to_owned())
  }

  /// Observe state transitions.
  pub fn subscribe(&self) -> watch::Receiver<AuthState> {
    self.state.subscribe()
  }

  // ── Internals ─────────────────────────────────────────────────────────────

  async fn establish(&self, tokens: TokenPair) -> Result<Option<Identity>> {
    let TokenPair { access, refresh } = tokens;

    let session =
      match Session::from_tokens(access, Some(refresh), self.clock.now()) {
        Ok(session) => session,
        Err(error) => {
          warn!(%error, "auth service issued an unusable token");
          self.logout().await;
          return Ok(None);
        }
      };

    // Never leave half of a pair on disk. Any earlier session may already be
    // overwritten, so it ends too.
    if let Err(error) = self.persist(&session).await {
      warn!(%error, "could not persist session; erasing partial write");
      self.logout().await;
      return Err(error);
    }

    let identity = session.identity().clone();
    info!(user_id = identity.id, username = %identity.username, "logged in");
    self.publish(AuthState::Authenticated(session));
    Ok(Some(identity))
  }

  async fn persist(&self, session: &Session) -> Result<()> {
    self
      .store
      .set(Slot::AccessToken, session.access_token().to_owned())
      .await
      .map_err(Error::storage)?;
    if let Some(refresh) = session.refresh_token() {
      self
        .store
        .set(Slot::RefreshToken, refresh.to_owned())
        .await
        .map_err(Error::storage)?;
    }
    Ok(())
  }

  async fn clear_storage(&self) {
    for slot in Slot::ALL {
      if let Err(error) = self.store.remove(slot).await {
        warn!(%error, slot = slot.key(), "could not erase persisted token");
      }
    }
  }

  fn publish(&self, state: AuthState) { self.state.send_replace(state); }
}

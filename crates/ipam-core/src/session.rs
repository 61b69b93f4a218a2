// ── Session lifecycle ──
//
// Owns the one process-wide authentication session: the bearer token, the
// user it belongs to, and the observable lifecycle state. The HTTP client
// reads the token through `TokenSource`; only login, logout, restore and a
// server-side rejection ever change it.

use std::fmt;
use std::sync::Arc;

use arc_swap::ArcSwap;
use ipam_api::{AuthClient, Error as ApiError, LoginResponse, TokenSource, User};
use secrecy::{ExposeSecret, SecretString};
use strum::Display;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tracing::{debug, info, warn};

use crate::error::CoreError;
use crate::token_store::TokenStore;

/// Lifecycle state observable by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum SessionState {
    Unauthenticated,
    /// A persisted token is being revalidated. Treat as "unknown yet",
    /// not as logged out.
    Restoring,
    Authenticated,
}

/// Token and user, always replaced together.
#[derive(Default)]
struct Snapshot {
    token: Option<SecretString>,
    user: Option<User>,
}

/// The authentication session.
///
/// Token and user live in a single `ArcSwap` snapshot, so readers never see
/// one without the other. State transitions are broadcast on a `watch`
/// channel.
pub struct Session {
    snapshot: ArcSwap<Snapshot>,
    state: watch::Sender<SessionState>,
    store: Arc<dyn TokenStore>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let snapshot = self.snapshot.load();
        f.debug_struct("Session")
            .field("state", &self.state())
            .field("has_token", &snapshot.token.is_some())
            .field("user", &snapshot.user.as_ref().map(|u| u.username.as_str()))
            .finish_non_exhaustive()
    }
}

impl Session {
    /// A fresh, unauthenticated session backed by `store`.
    ///
    /// Nothing is read from the store until [`restore`](Self::restore).
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let (state, _) = watch::channel(SessionState::Unauthenticated);
        Self {
            snapshot: ArcSwap::from_pointee(Snapshot::default()),
            state,
            store,
        }
    }

    // ── Reads ────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// True iff both a token and a validated user are present.
    pub fn is_authenticated(&self) -> bool {
        let snapshot = self.snapshot.load();
        snapshot.token.is_some() && snapshot.user.is_some()
    }

    /// True while a persisted token is being revalidated.
    pub fn is_loading(&self) -> bool {
        self.state() == SessionState::Restoring
    }

    pub fn current_user(&self) -> Option<User> {
        self.snapshot.load().user.clone()
    }

    /// Subscribe to state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// State transitions as a `Stream`, starting with the current state.
    pub fn changes(&self) -> WatchStream<SessionState> {
        WatchStream::new(self.subscribe())
    }

    // ── Transitions ──────────────────────────────────────────────

    /// Log in with email and password.
    ///
    /// On success the token and user are installed in one step and the
    /// token is persisted. A failure to persist is logged and otherwise
    /// ignored: the session is still usable for this process.
    pub async fn login(
        &self,
        auth: &AuthClient,
        email: &str,
        password: &SecretString,
    ) -> Result<User, CoreError> {
        debug!(email, "logging in");
        let resp = auth
            .login(email, password)
            .await
            .map_err(login_error)?;

        let Some(LoginResponse { user, token }) = resp.data else {
            return Err(CoreError::LoginFailed {
                message: resp
                    .message
                    .unwrap_or_else(|| "server returned no session".into()),
            });
        };

        self.establish(token, user.clone());
        info!(user = %user.username, role = %user.role, "logged in");
        Ok(user)
    }

    /// Revalidate a persisted token against `GET /auth/me`.
    ///
    /// - No persisted token: stays `Unauthenticated`, returns `Ok(None)`.
    /// - Server confirms the user: `Authenticated`, returns the user.
    /// - Server rejects the token, errors, or sends no user: the persisted
    ///   token is discarded and `Ok(None)` is returned.
    /// - Timeout or unreachable server: `Unauthenticated` for now, but the
    ///   persisted token is kept and the error returned so the caller can
    ///   try again later.
    ///
    /// If a login or logout lands while `/auth/me` is in flight, that
    /// transition wins and the restore result is dropped.
    pub async fn restore(&self, auth: &AuthClient) -> Result<Option<User>, CoreError> {
        let Some(token) = self.store.load()? else {
            debug!("no persisted session token");
            return Ok(None);
        };

        let restoring = Arc::new(Snapshot {
            token: Some(token.clone()),
            user: None,
        });
        self.snapshot.store(Arc::clone(&restoring));
        self.state.send_replace(SessionState::Restoring);
        debug!("revalidating persisted session token");

        match auth.me().await {
            Ok(resp) => match resp.data {
                Some(user) => {
                    let previous = self.snapshot.compare_and_swap(
                        &restoring,
                        Arc::new(Snapshot {
                            token: Some(token),
                            user: Some(user.clone()),
                        }),
                    );
                    if !Arc::ptr_eq(&*previous, &restoring) {
                        debug!("session changed during restore, dropping result");
                        return Ok(None);
                    }
                    self.state.send_replace(SessionState::Authenticated);
                    info!(user = %user.username, "session restored");
                    Ok(Some(user))
                }
                None => {
                    if self.discard_if_current(&restoring, true) {
                        warn!("server confirmed token but sent no user, session discarded");
                    }
                    Ok(None)
                }
            },
            Err(err) if err.is_transient() => {
                warn!(error = %err, "could not revalidate session token, keeping it for later");
                self.discard_if_current(&restoring, false);
                Err(err.into())
            }
            Err(err) => {
                if self.discard_if_current(&restoring, true) {
                    info!(error = %err, "persisted session is no longer valid");
                }
                Ok(None)
            }
        }
    }

    /// Drop token and user and remove the persisted copy.
    ///
    /// Never fails and may be called any number of times.
    pub fn logout(&self) {
        let previous = self.snapshot.swap(Arc::new(Snapshot::default()));
        if let Err(err) = self.store.clear() {
            warn!(error = %err, "failed to remove persisted session token");
        }
        let was = self.state.send_replace(SessionState::Unauthenticated);
        if previous.token.is_some() || was != SessionState::Unauthenticated {
            info!("logged out");
        }
    }

    /// Replace the cached user (e.g. after a profile update). Ignored when
    /// there is no session.
    pub fn refresh_user(&self, user: &User) {
        self.snapshot.rcu(|current| {
            if current.token.is_none() {
                return Arc::clone(current);
            }
            Arc::new(Snapshot {
                token: current.token.clone(),
                user: Some(user.clone()),
            })
        });
    }

    /// Clear the session if the snapshot is still `expected`, optionally
    /// removing the persisted token too. Returns false, touching nothing,
    /// when another transition replaced the snapshot first.
    fn discard_if_current(&self, expected: &Arc<Snapshot>, forget_persisted: bool) -> bool {
        let previous = self
            .snapshot
            .compare_and_swap(expected, Arc::new(Snapshot::default()));
        if !Arc::ptr_eq(&*previous, expected) {
            debug!("session changed meanwhile, leaving it alone");
            return false;
        }
        if forget_persisted {
            if let Err(err) = self.store.clear() {
                warn!(error = %err, "failed to remove persisted session token");
            }
        }
        self.state.send_replace(SessionState::Unauthenticated);
        true
    }

    fn establish(&self, token: SecretString, user: User) {
        if let Err(err) = self.store.save(&token) {
            warn!(error = %err, "failed to persist session token");
        }
        self.snapshot.store(Arc::new(Snapshot {
            token: Some(token),
            user: Some(user),
        }));
        self.state.send_replace(SessionState::Authenticated);
    }
}

impl TokenSource for Session {
    fn bearer_token(&self) -> Option<SecretString> {
        self.snapshot.load().token.clone()
    }

    /// Tear the session down, unless the rejected token is an older one
    /// than the session now holds.
    fn reject(&self, token: &SecretString) {
        let current = self.snapshot.load_full();
        let is_current = current
            .token
            .as_ref()
            .is_some_and(|t| t.expose_secret() == token.expose_secret());
        if !is_current {
            debug!("server rejected a superseded token, keeping the current session");
            return;
        }
        if self.discard_if_current(&current, true) {
            warn!("server rejected the session token, session torn down");
        }
    }
}

/// Sort a failed login into "bad credentials" vs everything else.
fn login_error(err: ApiError) -> CoreError {
    match err {
        ApiError::Unauthorized { message } => CoreError::InvalidCredentials { message },
        ApiError::Api { status, message } if status < 500 => {
            CoreError::InvalidCredentials { message }
        }
        other => CoreError::Api(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::token_store::MemoryTokenStore;

    fn user() -> User {
        serde_json::from_value(serde_json::json!({
            "id": "u-1", "username": "ada", "email": "ada@example.net", "role": "admin"
        }))
        .unwrap()
    }

    #[test]
    fn new_session_is_unauthenticated() {
        let session = Session::new(Arc::new(MemoryTokenStore::new()));
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(!session.is_authenticated());
        assert!(!session.is_loading());
        assert!(session.bearer_token().is_none());
    }

    #[test]
    fn establish_sets_token_and_user_together() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = Session::new(store.clone());
        session.establish(SecretString::from("tok"), user());

        assert!(session.is_authenticated());
        assert_eq!(session.state(), SessionState::Authenticated);
        assert!(!store.is_empty());
    }

    #[test]
    fn reject_tears_down_session() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = Session::new(store.clone());
        session.establish(SecretString::from("tok"), user());

        session.reject(&SecretString::from("tok"));
        assert!(!session.is_authenticated());
        assert_eq!(session.state(), SessionState::Unauthenticated);
        assert!(store.is_empty());
    }

    #[test]
    fn reject_of_a_superseded_token_keeps_session() {
        let store = Arc::new(MemoryTokenStore::new());
        let session = Session::new(store.clone());
        session.establish(SecretString::from("new"), user());

        session.reject(&SecretString::from("old"));
        assert!(session.is_authenticated());
        assert_eq!(session.state(), SessionState::Authenticated);
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "new");
    }

    #[test]
    fn refresh_user_requires_a_session() {
        let session = Session::new(Arc::new(MemoryTokenStore::new()));
        session.refresh_user(&user());
        assert!(session.current_user().is_none());

        session.establish(SecretString::from("tok"), user());
        let mut renamed = user();
        renamed.username = "ada.l".into();
        session.refresh_user(&renamed);
        assert_eq!(session.current_user().unwrap().username, "ada.l");
        assert!(session.is_authenticated());
    }

    #[test]
    fn login_error_classification() {
        let err = login_error(ApiError::Api {
            status: 400,
            message: "Invalid email or password".into(),
        });
        assert!(matches!(err, CoreError::InvalidCredentials { .. }));

        let err = login_error(ApiError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        });
        assert!(matches!(err, CoreError::Api(_)));
    }
}

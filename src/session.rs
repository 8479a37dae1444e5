//! Authentication lifecycle: hydration, login, logout, forced teardown.
//!
//! The session is a small state machine. It starts `Unauthenticated`, moves
//! through `Authenticating` while a login or hydration is in flight, and
//! lands in `Authenticated` with the signed-in user's profile. A 401 from
//! any request tears the whole thing down in one step.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Mutex;

use crate::error::ApiError;
use crate::http::HttpClient;
use crate::store::{PersistedSession, SessionStore};
use crate::types::{AuthResponse, LoginRequest, User};

/// Where the session currently stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticating,
    Authenticated(User),
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Auth endpoints, behind a trait so the state machine can be exercised
/// without a server.
#[async_trait]
pub trait AuthTransport: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError>;
    async fn fetch_profile(&self) -> Result<User, ApiError>;
    async fn logout(&self) -> Result<(), ApiError>;
}

/// The real transport, speaking to the token endpoints over [`HttpClient`].
pub struct HttpAuthTransport {
    http: Arc<HttpClient>,
}

impl HttpAuthTransport {
    pub fn new(http: Arc<HttpClient>) -> Self {
        Self { http }
    }
}

#[async_trait]
impl AuthTransport for HttpAuthTransport {
    async fn login(&self, credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
        self.http.post("/auth/login/", credentials).await
    }

    async fn fetch_profile(&self) -> Result<User, ApiError> {
        self.http.get("/users/profile/").await
    }

    async fn logout(&self) -> Result<(), ApiError> {
        let _: serde_json::Value = self.http.post_empty("/auth/logout/").await?;
        Ok(())
    }
}

/// Shared session state. Cheap to clone via the surrounding `Arc` in
/// [`crate::client::CrmClient`].
pub struct Session {
    state: RwLock<AuthState>,
    store: SessionStore,
    transport: Arc<dyn AuthTransport>,
    /// Serializes concurrent logins: one flight at a time, and the loser
    /// re-checks state after the winner finishes.
    login_gate: Mutex<()>,
}

impl Session {
    pub fn new(store: SessionStore, transport: Arc<dyn AuthTransport>) -> Self {
        Self {
            state: RwLock::new(AuthState::Unauthenticated),
            store,
            transport,
            login_gate: Mutex::new(()),
        }
    }

    pub fn state(&self) -> AuthState {
        self.state.read().clone()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().user().cloned()
    }

    /// Restore a previous session from disk. The persisted token is only
    /// trusted after a live profile fetch; a rejected or unreachable token
    /// clears the stored session rather than leaving a half-open state.
    pub async fn hydrate(&self) -> AuthState {
        let Some(persisted) = self.store.load() else {
            return AuthState::Unauthenticated;
        };

        // A persisted profile is trusted provisionally, so callers polling
        // the state see the signed-in user while the live fetch confirms the
        // token. A rejected token still tears everything down below.
        *self.state.write() = match &persisted.user {
            Some(user) => AuthState::Authenticated(user.clone()),
            None => AuthState::Authenticating,
        };
        match self.transport.fetch_profile().await {
            Ok(user) => {
                let refreshed = PersistedSession {
                    auth_token: persisted.auth_token,
                    user: Some(user.clone()),
                };
                if let Err(e) = self.store.save(&refreshed) {
                    log::warn!("failed to refresh persisted session: {}", e);
                }
                let state = AuthState::Authenticated(user);
                *self.state.write() = state.clone();
                state
            }
            Err(e) => {
                log::info!("stored session rejected during hydration: {}", e);
                self.store.clear();
                *self.state.write() = AuthState::Unauthenticated;
                AuthState::Unauthenticated
            }
        }
    }

    /// Exchange credentials for a token and persist the session.
    pub async fn login(&self, username: &str, password: &str) -> Result<User, ApiError> {
        let _flight = self.login_gate.lock().await;

        // A concurrent login may have completed while we waited.
        if let Some(user) = self.current_user() {
            return Ok(user);
        }

        *self.state.write() = AuthState::Authenticating;
        let request = LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        };
        match self.transport.login(&request).await {
            Ok(AuthResponse { token, user }) => {
                let persisted = PersistedSession {
                    auth_token: token,
                    user: Some(user.clone()),
                };
                // A token that cannot be persisted is a failed login: the
                // state machine may not be left mid-transition.
                if let Err(e) = self.store.save(&persisted) {
                    *self.state.write() = AuthState::Unauthenticated;
                    return Err(e);
                }
                *self.state.write() = AuthState::Authenticated(user.clone());
                Ok(user)
            }
            Err(e) => {
                *self.state.write() = AuthState::Unauthenticated;
                Err(e)
            }
        }
    }

    /// Sign out. Local state is torn down first and unconditionally; the
    /// server-side token revocation is best-effort and must not block or
    /// fail the logout.
    pub async fn logout(&self) {
        let was_authenticated = self.state.read().is_authenticated();
        self.store.clear();
        *self.state.write() = AuthState::Unauthenticated;

        if was_authenticated {
            let transport = self.transport.clone();
            tokio::spawn(async move {
                if let Err(e) = transport.logout().await {
                    log::debug!("server-side logout failed: {}", e);
                }
            });
        }
    }

    /// Teardown driven by a 401 on any request. Same local effect as
    /// logout, but no server call: the token is already dead.
    pub fn handle_unauthorized(&self) {
        self.store.clear();
        *self.state.write() = AuthState::Unauthenticated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn sample_user() -> User {
        serde_json::from_value(serde_json::json!({
            "id": 1,
            "username": "admin",
            "email": "admin@example.com",
            "first_name": "Site",
            "last_name": "Admin",
            "is_active": true
        }))
        .unwrap()
    }

    struct StubTransport {
        login_calls: AtomicUsize,
        login_delay: Duration,
        profile_delay: Duration,
        login_result: Box<dyn Fn() -> Result<AuthResponse, ApiError> + Send + Sync>,
        profile_result: Box<dyn Fn() -> Result<User, ApiError> + Send + Sync>,
    }

    impl StubTransport {
        fn accepting() -> Self {
            Self {
                login_calls: AtomicUsize::new(0),
                login_delay: Duration::ZERO,
                profile_delay: Duration::ZERO,
                login_result: Box::new(|| {
                    Ok(AuthResponse {
                        token: "abc".to_string(),
                        user: sample_user(),
                    })
                }),
                profile_result: Box::new(|| Ok(sample_user())),
            }
        }

        fn rejecting() -> Self {
            Self {
                login_calls: AtomicUsize::new(0),
                login_delay: Duration::ZERO,
                profile_delay: Duration::ZERO,
                login_result: Box::new(|| Err(ApiError::Unauthorized)),
                profile_result: Box::new(|| Err(ApiError::Unauthorized)),
            }
        }
    }

    #[async_trait]
    impl AuthTransport for StubTransport {
        async fn login(&self, _credentials: &LoginRequest) -> Result<AuthResponse, ApiError> {
            self.login_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.login_delay).await;
            (self.login_result)()
        }

        async fn fetch_profile(&self) -> Result<User, ApiError> {
            tokio::time::sleep(self.profile_delay).await;
            (self.profile_result)()
        }

        async fn logout(&self) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn session_in(dir: &TempDir, transport: StubTransport) -> Arc<Session> {
        Arc::new(Session::new(
            SessionStore::with_dir(dir.path()),
            Arc::new(transport),
        ))
    }

    #[tokio::test]
    async fn successful_login_authenticates_and_persists() {
        let dir = TempDir::new().unwrap();
        let session = session_in(&dir, StubTransport::accepting());

        let user = session.login("admin@example.com", "admin123").await.unwrap();
        assert_eq!(user.email, "admin@example.com");
        assert!(session.state().is_authenticated());

        let persisted = SessionStore::with_dir(dir.path()).load().unwrap();
        assert_eq!(persisted.auth_token, "abc");
    }

    #[tokio::test]
    async fn failed_login_returns_to_unauthenticated() {
        let dir = TempDir::new().unwrap();
        let session = session_in(&dir, StubTransport::rejecting());

        let err = session.login("admin", "wrong").await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized));
        assert_eq!(session.state(), AuthState::Unauthenticated);
        assert!(SessionStore::with_dir(dir.path()).load().is_none());
    }

    #[tokio::test]
    async fn concurrent_logins_issue_one_request() {
        let dir = TempDir::new().unwrap();
        let mut transport = StubTransport::accepting();
        transport.login_delay = Duration::from_millis(20);
        let stub = Arc::new(transport);
        let session = Arc::new(Session::new(
            SessionStore::with_dir(dir.path()),
            stub.clone() as Arc<dyn AuthTransport>,
        ));

        let (a, b) = tokio::join!(
            session.login("admin", "admin123"),
            session.login("admin", "admin123")
        );
        // Both callers end up signed in, but only one request went out;
        // the loser adopted the winner's session.
        assert!(a.is_ok() && b.is_ok());
        assert_eq!(stub.login_calls.load(Ordering::SeqCst), 1);
        assert!(session.state().is_authenticated());
    }

    #[tokio::test]
    async fn login_with_a_failing_store_returns_to_unauthenticated() {
        let dir = TempDir::new().unwrap();
        // Root the store under a plain file so the session write fails.
        let blocker = dir.path().join("state");
        std::fs::write(&blocker, b"occupied").unwrap();
        let session = Arc::new(Session::new(
            SessionStore::with_dir(&blocker),
            Arc::new(StubTransport::accepting()),
        ));

        let err = session.login("admin", "admin123").await;
        assert!(err.is_err());
        // The machine may not be stranded mid-transition.
        assert_eq!(session.state(), AuthState::Unauthenticated);
    }

    #[tokio::test]
    async fn hydration_serves_the_cached_profile_while_refreshing() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path());
        store
            .save(&PersistedSession {
                auth_token: "abc".to_string(),
                user: Some(sample_user()),
            })
            .unwrap();

        let mut transport = StubTransport::accepting();
        transport.profile_delay = Duration::from_millis(50);
        let session = session_in(&dir, transport);

        let hydration = {
            let session = session.clone();
            tokio::spawn(async move { session.hydrate().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        // The stored profile is visible before the live fetch resolves.
        assert_eq!(session.current_user().unwrap().username, "admin");

        let state = hydration.await.unwrap();
        assert!(state.is_authenticated());
    }

    #[tokio::test]
    async fn hydration_restores_a_valid_stored_session() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path());
        store
            .save(&PersistedSession {
                auth_token: "abc".to_string(),
                user: Some(sample_user()),
            })
            .unwrap();

        let session = session_in(&dir, StubTransport::accepting());
        let state = session.hydrate().await;
        assert!(state.is_authenticated());
        assert_eq!(session.current_user().unwrap().username, "admin");
    }

    #[tokio::test]
    async fn hydration_clears_a_rejected_stored_session() {
        init_logs();
        let dir = TempDir::new().unwrap();
        let store = SessionStore::with_dir(dir.path());
        store
            .save(&PersistedSession {
                auth_token: "expired".to_string(),
                user: None,
            })
            .unwrap();

        let session = session_in(&dir, StubTransport::rejecting());
        let state = session.hydrate().await;
        assert_eq!(state, AuthState::Unauthenticated);
        assert!(store.load().is_none());
    }

    #[tokio::test]
    async fn unauthorized_teardown_clears_state_and_store() {
        let dir = TempDir::new().unwrap();
        let session = session_in(&dir, StubTransport::accepting());
        session.login("admin", "admin123").await.unwrap();

        session.handle_unauthorized();
        assert_eq!(session.state(), AuthState::Unauthenticated);
        assert!(SessionStore::with_dir(dir.path()).load().is_none());
    }
}

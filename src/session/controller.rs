//! Session Controller
//!
//! Owns the authentication state. It is the only writer of the persisted
//! token; everything else reads through it.

use async_trait::async_trait;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::watch;

use super::store::TokenStore;
use super::validate::validate_credentials;
use super::LoginError;

/// Snapshot of the authentication state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub is_authenticated: bool,
    pub token: Option<String>,
}

/// Why a credential exchange did not produce a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The server refused the credentials; carries its message verbatim
    Rejected(String),
    /// The exchange never completed
    Transport(String),
}

/// Performs the credential-for-token exchange
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait Authenticator {
    async fn exchange(&self, email: &str, password: &str) -> Result<String, AuthFailure>;
}

/// Process-wide session owner, shared behind an `Arc` (native) or a Leptos
/// context (browser).
pub struct SessionController {
    state: RwLock<Session>,
    store: Box<dyn TokenStore>,
    token_tx: watch::Sender<Option<String>>,
}

impl SessionController {
    pub fn new(store: impl TokenStore + 'static) -> Self {
        let (token_tx, _) = watch::channel(None);
        Self {
            state: RwLock::new(Session::default()),
            store: Box::new(store),
            token_tx,
        }
    }

    /// Read the persisted token and trust it without remote validation
    pub fn initialize(&self) -> Session {
        let token = match self.store.load() {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read persisted token");
                None
            }
        };

        let session = Session {
            is_authenticated: token.is_some(),
            token,
        };
        *self.write() = session.clone();
        self.token_tx.send_replace(session.token.clone());

        tracing::debug!(authenticated = session.is_authenticated, "Session initialized");
        session
    }

    /// Validate locally, then exchange credentials for a token
    pub async fn login<A>(&self, authenticator: &A, email: &str, password: &str) -> Result<(), LoginError>
    where
        A: Authenticator + ?Sized,
    {
        validate_credentials(email, password)?;

        let token = match authenticator.exchange(email, password).await {
            Ok(token) => token,
            Err(AuthFailure::Rejected(message)) => {
                tracing::info!("Login rejected by server");
                return Err(LoginError::Rejected(message));
            }
            Err(AuthFailure::Transport(error)) => {
                tracing::error!(error = %error, "Login request failed");
                return Err(LoginError::Network(error));
            }
        };

        if let Err(e) = self.store.save(&token) {
            tracing::warn!(error = %e, "Failed to persist token; session lasts until exit");
        }

        *self.write() = Session {
            is_authenticated: true,
            token: Some(token.clone()),
        };
        self.token_tx.send_replace(Some(token));

        tracing::info!("Logged in");
        Ok(())
    }

    /// Clear the token and the authenticated flag. Never touches the network.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "Failed to clear persisted token");
        }

        let was_authenticated = {
            let mut state = self.write();
            let was = state.is_authenticated;
            *state = Session::default();
            was
        };
        self.token_tx.send_replace(None);

        if was_authenticated {
            tracing::info!("Logged out");
        }
    }

    pub fn session(&self) -> Session {
        self.read().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.read().token.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.read().is_authenticated
    }

    /// Observe token changes (login, logout, expiry)
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.token_tx.subscribe()
    }

    fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryTokenStore;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct FakeAuth {
        outcome: Result<String, AuthFailure>,
        calls: AtomicUsize,
    }

    impl FakeAuth {
        fn new(outcome: Result<String, AuthFailure>) -> Self {
            Self {
                outcome,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl Authenticator for FakeAuth {
        async fn exchange(&self, _email: &str, _password: &str) -> Result<String, AuthFailure> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    /// Store handle that lets the test inspect what the controller persisted
    #[derive(Clone, Default)]
    struct SharedStore(Arc<MemoryTokenStore>);

    impl TokenStore for SharedStore {
        fn load(&self) -> Result<Option<String>, crate::session::StoreError> {
            self.0.load()
        }
        fn save(&self, token: &str) -> Result<(), crate::session::StoreError> {
            self.0.save(token)
        }
        fn clear(&self) -> Result<(), crate::session::StoreError> {
            self.0.clear()
        }
    }

    #[test]
    fn test_initialize_trusts_persisted_token() {
        let controller = SessionController::new(MemoryTokenStore::with_token("stored"));
        let session = controller.initialize();

        assert!(session.is_authenticated);
        assert_eq!(controller.token().as_deref(), Some("stored"));
    }

    #[test]
    fn test_initialize_without_token() {
        let controller = SessionController::new(MemoryTokenStore::new());
        assert_eq!(controller.initialize(), Session::default());
        assert!(!controller.is_authenticated());
    }

    #[tokio::test]
    async fn test_login_persists_token() {
        let store = SharedStore::default();
        let controller = SessionController::new(store.clone());
        let auth = FakeAuth::new(Ok("tok-1".to_string()));

        controller.login(&auth, "ops@site.com", "secret1").await.unwrap();

        assert!(controller.is_authenticated());
        assert_eq!(store.load().unwrap().as_deref(), Some("tok-1"));
        assert_eq!(controller.subscribe().borrow().as_deref(), Some("tok-1"));
    }

    #[tokio::test]
    async fn test_validation_failure_skips_network() {
        let controller = SessionController::new(MemoryTokenStore::new());
        let auth = FakeAuth::new(Ok("unused".to_string()));

        let err = controller.login(&auth, "not-an-email", "secret1").await.unwrap_err();
        assert_eq!(err, LoginError::InvalidEmail);

        let err = controller.login(&auth, "ops@site.com", "123").await.unwrap_err();
        assert_eq!(err, LoginError::PasswordTooShort);

        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
        assert!(!controller.is_authenticated());
    }

    #[tokio::test]
    async fn test_rejection_message_is_verbatim() {
        let controller = SessionController::new(MemoryTokenStore::new());
        let auth = FakeAuth::new(Err(AuthFailure::Rejected("Invalid credentials".to_string())));

        let err = controller.login(&auth, "ops@site.com", "secret1").await.unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert!(!controller.is_authenticated());
        assert!(controller.token().is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_is_generic() {
        let controller = SessionController::new(MemoryTokenStore::new());
        let auth = FakeAuth::new(Err(AuthFailure::Transport("connection refused".to_string())));

        let err = controller.login(&auth, "ops@site.com", "secret1").await.unwrap_err();
        assert!(matches!(err, LoginError::Network(_)));
        assert_eq!(err.to_string(), "Unable to reach the server. Please try again.");
    }

    #[test]
    fn test_logout_clears_everything() {
        let store = SharedStore::default();
        store.save("tok").unwrap();
        let controller = SessionController::new(store.clone());
        controller.initialize();
        let rx = controller.subscribe();

        controller.logout();

        assert!(!controller.is_authenticated());
        assert_eq!(store.load().unwrap(), None);
        assert!(rx.borrow().is_none());
    }
}

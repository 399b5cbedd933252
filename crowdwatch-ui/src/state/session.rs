//! Session Context
//!
//! Wraps the core [`SessionController`] for the component tree. The token is
//! kept in a signal so route guards and the live channel react to login,
//! logout and expiry alike. Login and logout write the signal themselves;
//! a background mirror of the controller's token `watch` catches the logout
//! a 401/403 triggers inside the request layer.

use leptos::*;
use std::rc::Rc;

use crowdwatch::{Authenticator, LoginError, SessionController};

use crate::api::{get_api_base, HttpApi, LocalStorageTokenStore};

#[derive(Clone)]
pub struct AuthState {
    pub controller: Rc<SessionController>,
    pub api: HttpApi,
    /// Current bearer token; `None` when logged out
    pub token: RwSignal<Option<String>>,
}

impl AuthState {
    pub fn new(controller: Rc<SessionController>, api: HttpApi) -> Self {
        let mut tokens = controller.subscribe();
        let token = create_rw_signal(tokens.borrow_and_update().clone());
        spawn_local(async move {
            while tokens.changed().await.is_ok() {
                let next = tokens.borrow_and_update().clone();
                if token.with_untracked(|current| *current != next) {
                    token.set(next);
                }
            }
        });

        Self { controller, api, token }
    }

    /// Reactive authentication flag
    pub fn is_authenticated(&self) -> bool {
        self.token.with(Option::is_some)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<(), LoginError> {
        self.login_with(&self.api, email, password).await
    }

    /// Login against any authenticator; the signal is current when this returns
    pub async fn login_with<A>(&self, authenticator: &A, email: &str, password: &str) -> Result<(), LoginError>
    where
        A: Authenticator + ?Sized,
    {
        self.controller.login(authenticator, email, password).await?;
        self.sync_token();
        Ok(())
    }

    pub fn logout(&self) {
        self.controller.logout();
        self.sync_token();
    }

    fn sync_token(&self) {
        self.token.set(self.controller.token());
    }
}

/// Restore the persisted session and provide it to the component tree
pub fn provide_auth_state() -> AuthState {
    let controller = Rc::new(SessionController::new(LocalStorageTokenStore));
    controller.initialize();

    let api = HttpApi::new(get_api_base(), Rc::clone(&controller));
    let state = AuthState::new(controller, api);
    provide_context(state.clone());
    state
}

pub fn use_auth() -> AuthState {
    expect_context::<AuthState>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crowdwatch::{AuthFailure, MemoryTokenStore};
    use wasm_bindgen_test::*;

    struct Accepts(&'static str);

    #[async_trait(?Send)]
    impl Authenticator for Accepts {
        async fn exchange(&self, _email: &str, _password: &str) -> Result<String, AuthFailure> {
            Ok(self.0.to_string())
        }
    }

    fn auth_state() -> AuthState {
        let controller = Rc::new(SessionController::new(MemoryTokenStore::new()));
        let api = HttpApi::new("http://localhost:3000", Rc::clone(&controller));
        AuthState::new(controller, api)
    }

    #[wasm_bindgen_test]
    async fn test_login_is_visible_before_any_yield() {
        let runtime = create_runtime();
        let auth = auth_state();
        assert!(!auth.is_authenticated());

        auth.login_with(&Accepts("tok-1"), "user@example.com", "secret1")
            .await
            .unwrap();
        assert!(auth.is_authenticated());
        assert_eq!(auth.token.get_untracked().as_deref(), Some("tok-1"));

        auth.logout();
        assert!(!auth.is_authenticated());
        runtime.dispose();
    }

    #[wasm_bindgen_test]
    async fn test_failed_login_leaves_signal_alone() {
        let runtime = create_runtime();
        let auth = auth_state();

        let err = auth
            .login_with(&Accepts("unused"), "not-an-email", "secret1")
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(!auth.is_authenticated());
        runtime.dispose();
    }
}

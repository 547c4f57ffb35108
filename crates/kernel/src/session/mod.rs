//! Session lifecycle.
//!
//! Owns authentication state and its discrete lifecycle events. Route
//! resolution is deliberately NOT triggered here — the navigation guard
//! drives it lazily on the first authenticated navigation — but every
//! teardown path funnels through [`SessionService::cleanup`] so no partial
//! state survives a sign-out.

mod credentials;

pub use credentials::{
    AccessToken, CredentialStore, FileCredentialStore, MemoryCredentialStore, RefreshToken,
    TokenInfo, TokenType,
};

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::{info, warn};

use crate::api::AuthBackend;
use crate::error::NavResult;
use crate::menu::MenuService;
use crate::router::{RouteRegistrar, Router};

/// Discrete lifecycle events, for the guard and UI layers to subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    LoggedIn,
    LoggedOut,
    RoutesReady,
}

/// Authentication state and the single reversal point for teardown.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct SessionService {
    inner: Arc<SessionServiceInner>,
}

struct SessionServiceInner {
    credentials: Arc<dyn CredentialStore>,
    backend: Arc<dyn AuthBackend>,
    menus: MenuService,
    registrar: RouteRegistrar,
    router: Router,
    sign_in_path: String,
    events: broadcast::Sender<SessionEvent>,
}

impl SessionService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        backend: Arc<dyn AuthBackend>,
        menus: MenuService,
        registrar: RouteRegistrar,
        router: Router,
        sign_in_path: String,
        events: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            inner: Arc::new(SessionServiceInner {
                credentials,
                backend,
                menus,
                registrar,
                router,
                sign_in_path,
                events,
            }),
        }
    }

    /// Whether a usable credential is stored.
    pub fn has_login(&self) -> bool {
        self.inner
            .credentials
            .get()
            .is_some_and(|info| !info.access_token.token_value.is_empty())
    }

    /// Persist a credential and mark the session authenticated.
    ///
    /// Does not resolve routes; the guard does that on the next navigation.
    pub fn login(&self, info: TokenInfo) {
        self.inner.credentials.set(Some(info));
        let _ = self.inner.events.send(SessionEvent::LoggedIn);
        info!("session authenticated");
    }

    /// Exchange credentials for a token on the backend, then sign in.
    pub async fn authenticate(&self, username: &str, password: &str) -> NavResult<()> {
        let info = self.inner.backend.authenticate(username, password).await?;
        self.login(info);
        Ok(())
    }

    /// Revoke the token remotely (best-effort), then tear down locally.
    pub async fn logout(&self) {
        if let Err(e) = self.inner.backend.revoke().await {
            warn!(error = %e, "remote token revoke failed, continuing local teardown");
        }
        self.cleanup().await;
    }

    /// Tear down all session state and land on the sign-in entry point.
    ///
    /// Clears the credential, empties the menu and route models, unmounts
    /// the layout root, and emits `LoggedOut` — in that order, before any
    /// navigation, so a subsequent differently-permissioned login can never
    /// observe leftover screens.
    pub async fn cleanup(&self) {
        self.inner.credentials.set(None);
        self.inner.menus.clear();
        self.inner.registrar.unregister();
        let _ = self.inner.events.send(SessionEvent::LoggedOut);
        info!("session torn down");

        if let Err(e) = self.inner.router.replace(&self.inner.sign_in_path).await {
            warn!(error = %e, "failed to land on the sign-in entry after teardown");
        }
    }

    /// Subscribe to lifecycle events.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.events.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::api::MenuSource;
    use crate::error::{NavError, NavResult};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    struct EmptyBackend;

    #[async_trait]
    impl MenuSource for EmptyBackend {
        async fn fetch_menu_tree(&self) -> NavResult<Value> {
            Ok(json!([]))
        }
    }

    #[async_trait]
    impl AuthBackend for EmptyBackend {
        async fn authenticate(&self, _username: &str, _password: &str) -> NavResult<TokenInfo> {
            Ok(TokenInfo::bearer("issued"))
        }

        async fn revoke(&self) -> NavResult<()> {
            Err(NavError::Fetch("backend unreachable".to_string()))
        }
    }

    fn service() -> (SessionService, Router) {
        let router = Router::new();
        let registrar = RouteRegistrar::new(router.clone());
        let (events, _) = broadcast::channel(16);
        let backend = Arc::new(EmptyBackend);
        let menus = MenuService::new(backend.clone(), registrar.clone(), events.clone());
        let session = SessionService::new(
            Arc::new(MemoryCredentialStore::new()),
            backend,
            menus,
            registrar,
            router.clone(),
            "/sign-in".to_string(),
            events,
        );
        (session, router)
    }

    #[tokio::test]
    async fn login_then_cleanup_round_trip() {
        let (session, router) = service();
        assert!(!session.has_login());

        let mut events = session.subscribe();
        session.login(TokenInfo::bearer("tok"));
        assert!(session.has_login());
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);

        session.cleanup().await;
        assert!(!session.has_login());
        assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedOut);
        assert_eq!(router.current_path(), "/sign-in");
    }

    #[tokio::test]
    async fn empty_token_value_is_not_logged_in() {
        let (session, _router) = service();
        session.login(TokenInfo::bearer(""));
        assert!(!session.has_login());
    }

    #[tokio::test]
    async fn logout_survives_failing_revoke() {
        let (session, router) = service();
        session.login(TokenInfo::bearer("tok"));

        // revoke always fails in the stub; local teardown must proceed.
        session.logout().await;
        assert!(!session.has_login());
        assert_eq!(router.current_path(), "/sign-in");
    }

    #[tokio::test]
    async fn authenticate_stores_issued_token() {
        let (session, _router) = service();
        session.authenticate("admin", "hunter2").await.unwrap();
        assert!(session.has_login());
    }
}

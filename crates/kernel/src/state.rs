//! Application state shared across the console shell.
//!
//! Everything is wired once here and injected by reference — there is no
//! ambient module state. Single-instance semantics come from constructing
//! one `AppState` at process start and cloning the cheap handle.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

use crate::api::{AuthBackend, HttpBackend, MenuSource};
use crate::config::Config;
use crate::menu::{ComponentRef, MenuService, RouteDefinition, RouteMeta};
use crate::router::{NavigationGuard, RouteRegistrar, Router};
use crate::session::{CredentialStore, FileCredentialStore, MemoryCredentialStore, SessionService};

/// Name of the static sign-in route.
pub const SIGN_IN_ROUTE: &str = "signIn";

/// Module specifier of the sign-in screen.
const SIGN_IN_COMPONENT: &str = "sign-in/index";

/// Capacity of the lifecycle event channel; slow subscribers lag rather
/// than block the engine.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Shared application state.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    router: Router,
    registrar: RouteRegistrar,
    menus: MenuService,
    session: SessionService,
}

impl AppState {
    /// Wire the engine from explicit collaborators.
    pub fn new(
        config: Config,
        source: Arc<dyn MenuSource>,
        backend: Arc<dyn AuthBackend>,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        let router = Router::new();

        // The sign-in entry is the only static route; everything else is
        // mounted per authenticated session.
        if let Err(e) = router.add_route(sign_in_route(&config.sign_in_path)) {
            warn!(error = %e, "failed to seed the sign-in route");
        }

        let registrar = RouteRegistrar::new(router.clone());
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let menus = MenuService::new(source, registrar.clone(), events.clone());
        let session = SessionService::new(
            credentials,
            backend,
            menus.clone(),
            registrar.clone(),
            router.clone(),
            config.sign_in_path.clone(),
            events,
        );

        let guard = NavigationGuard::new(
            session.clone(),
            menus.clone(),
            registrar.clone(),
            config.sign_in_path.clone(),
        );
        router.set_guard(Arc::new(guard));

        Self {
            inner: Arc::new(AppStateInner {
                config,
                router,
                registrar,
                menus,
                session,
            }),
        }
    }

    /// Wire the engine against the HTTP backend described by `config`.
    pub fn from_config(config: Config) -> Self {
        let credentials: Arc<dyn CredentialStore> = match &config.credentials_file {
            Some(path) => Arc::new(FileCredentialStore::new(path.clone())),
            None => Arc::new(MemoryCredentialStore::new()),
        };
        let backend = Arc::new(HttpBackend::new(&config, credentials.clone()));
        Self::new(config, backend.clone(), backend, credentials)
    }

    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    pub fn router(&self) -> &Router {
        &self.inner.router
    }

    pub fn registrar(&self) -> &RouteRegistrar {
        &self.inner.registrar
    }

    pub fn menus(&self) -> &MenuService {
        &self.inner.menus
    }

    pub fn session(&self) -> &SessionService {
        &self.inner.session
    }
}

fn sign_in_route(path: &str) -> RouteDefinition {
    RouteDefinition {
        name: SIGN_IN_ROUTE.to_string(),
        path: path.to_string(),
        redirect: None,
        component: ComponentRef::lazy(SIGN_IN_COMPONENT),
        meta: RouteMeta::default(),
        children: Vec::new(),
    }
}

//! Mounting the resolved route tree into the navigation system.

use tracing::{debug, warn};

use crate::error::NavResult;
use crate::menu::{ComponentRef, RouteDefinition, RouteMeta};
use crate::router::Router;

/// Reserved name of the root entry all dynamic routes mount under.
pub const LAYOUT_ROUTE: &str = "layout";

/// Module specifier of the shell layout component.
const LAYOUT_COMPONENT: &str = "layout/index";

/// Mounts and unmounts the session's route tree under one reserved root.
///
/// Registration is idempotent per session: the underlying navigation system
/// rejects duplicate names, and re-mounting would also re-trigger the root
/// redirect and flicker the current screen.
#[derive(Clone)]
pub struct RouteRegistrar {
    router: Router,
}

impl RouteRegistrar {
    pub fn new(router: Router) -> Self {
        Self { router }
    }

    /// Mount `routes` under the reserved layout root.
    ///
    /// No-op success when the root is already mounted. The root redirects to
    /// the first top-level route's path so navigating to `/` lands on a
    /// sensible default screen.
    pub fn register(&self, routes: Vec<RouteDefinition>) -> NavResult<()> {
        if self.is_registered() {
            debug!("layout root already mounted, skipping registration");
            return Ok(());
        }

        let root = RouteDefinition {
            name: LAYOUT_ROUTE.to_string(),
            path: "/".to_string(),
            redirect: routes.first().map(|r| r.path.clone()),
            component: ComponentRef::lazy(LAYOUT_COMPONENT),
            meta: RouteMeta::default(),
            children: routes,
        };

        self.router.add_route(root).inspect_err(|e| {
            warn!(error = %e, "navigation system rejected the layout mount");
        })
    }

    /// Whether the layout root is currently mounted.
    pub fn is_registered(&self) -> bool {
        self.router.has_route(LAYOUT_ROUTE)
    }

    /// Remove the layout root. Safe to call when nothing is registered.
    pub fn unregister(&self) {
        if self.router.remove_route(LAYOUT_ROUTE) {
            debug!("layout root unmounted");
        }
    }
}

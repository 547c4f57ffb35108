//! The in-process navigation system.
//!
//! Keeps the mounted route tree and the current location, and funnels every
//! navigation attempt through the registered guard. Navigations are
//! processed in dispatch order; a guard may redirect, in which case the
//! guard re-runs against the new target (bounded, so a misbehaving guard
//! cannot loop forever).

mod guard;
mod registrar;

pub use guard::NavigationGuard;
pub use registrar::{LAYOUT_ROUTE, RouteRegistrar};

use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::debug;

use crate::error::{NavError, NavResult};
use crate::menu::RouteDefinition;

/// Upper bound on guard-driven redirects for a single dispatched navigation.
const MAX_REDIRECTS: usize = 8;

/// Guard verdict for one navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the navigation commit.
    Proceed,
    /// Re-dispatch to another target; the guard runs again.
    Redirect(String),
}

/// Hook invoked before every navigation commits.
#[async_trait]
pub trait NavigationHook: Send + Sync {
    async fn before_each(&self, to: &str, from: &str) -> GuardDecision;
}

type AfterEachHook = Box<dyn Fn(&str, &str) + Send + Sync>;

/// The live navigation system.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct Router {
    inner: Arc<RouterInner>,
}

struct RouterInner {
    /// Mounted root route definitions.
    routes: RwLock<Vec<RouteDefinition>>,

    /// Current location path. Empty until the first committed navigation.
    current: RwLock<String>,

    /// The beforeEach guard. Installed once at wiring time.
    guard: RwLock<Option<Arc<dyn NavigationHook>>>,

    /// afterEach hooks, fired after a navigation commits.
    after_each: RwLock<Vec<AfterEachHook>>,
}

impl Router {
    /// Create an empty router with no routes and no guard.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RouterInner {
                routes: RwLock::new(Vec::new()),
                current: RwLock::new(String::new()),
                guard: RwLock::new(None),
                after_each: RwLock::new(Vec::new()),
            }),
        }
    }

    /// Install the beforeEach guard.
    pub fn set_guard(&self, hook: Arc<dyn NavigationHook>) {
        *self.inner.guard.write() = Some(hook);
    }

    /// Register an afterEach hook, fired with `(to, from)` once a
    /// navigation commits.
    pub fn after_each(&self, hook: impl Fn(&str, &str) + Send + Sync + 'static) {
        self.inner.after_each.write().push(Box::new(hook));
    }

    /// Mount a root route definition.
    ///
    /// Fails with [`NavError::RegistrationConflict`] when a route with the
    /// same name is already mounted anywhere in the tree — duplicate names
    /// would corrupt name-based removal.
    pub fn add_route(&self, route: RouteDefinition) -> NavResult<()> {
        let mut routes = self.inner.routes.write();
        if contains_name(&routes, &route.name) {
            return Err(NavError::RegistrationConflict(format!(
                "route {:?} is already mounted",
                route.name
            )));
        }
        debug!(name = %route.name, children = route.children.len(), "route mounted");
        routes.push(route);
        Ok(())
    }

    /// Remove a mounted root route by name. Returns false when no such
    /// root exists.
    pub fn remove_route(&self, name: &str) -> bool {
        let mut routes = self.inner.routes.write();
        let before = routes.len();
        routes.retain(|r| r.name != name);
        let removed = routes.len() < before;
        if removed {
            debug!(name, "route removed");
        }
        removed
    }

    /// Whether a route with this name is mounted anywhere in the tree.
    pub fn has_route(&self, name: &str) -> bool {
        contains_name(&self.inner.routes.read(), name)
    }

    /// Resolve the name of the route mounted at `path`, if any.
    pub fn route_name_at(&self, path: &str) -> Option<String> {
        find_name_by_path(&self.inner.routes.read(), path)
    }

    /// Redirect declared by the route mounted at `path`, if any.
    fn redirect_at(&self, path: &str) -> Option<String> {
        find_redirect_by_path(&self.inner.routes.read(), path)
    }

    /// The current location path.
    pub fn current_path(&self) -> String {
        self.inner.current.read().clone()
    }

    /// Snapshot of the mounted root routes.
    pub fn mounted_routes(&self) -> Vec<RouteDefinition> {
        self.inner.routes.read().clone()
    }

    /// Navigate to `path`, pushing a new history entry.
    pub async fn push(&self, path: &str) -> Result<()> {
        self.navigate(path).await
    }

    /// Navigate to `path`, replacing the current history entry.
    pub async fn replace(&self, path: &str) -> Result<()> {
        self.navigate(path).await
    }

    /// Run one navigation through the guard until it commits.
    async fn navigate(&self, path: &str) -> Result<()> {
        // Latest-wins deduplication: navigating to the current location is
        // a no-op, matching the navigation system contract.
        if *self.inner.current.read() == path {
            return Ok(());
        }

        let from = self.current_path();
        let guard = self.inner.guard.read().clone();
        let mut target = path.to_string();

        for _ in 0..MAX_REDIRECTS {
            let decision = match &guard {
                Some(hook) => hook.before_each(&target, &from).await,
                None => GuardDecision::Proceed,
            };
            match decision {
                GuardDecision::Proceed => {
                    // Follow a mounted route redirect (e.g. the layout root
                    // pointing `/` at the default screen), re-running the
                    // guard for the new target.
                    if let Some(next) = self.redirect_at(&target).filter(|n| *n != target) {
                        debug!(to = %target, redirect = %next, "following route redirect");
                        target = next;
                        continue;
                    }
                    // A nested navigation (e.g. a teardown landing on the
                    // sign-in entry from inside the guard) may have already
                    // committed this target; committing again would replay
                    // the afterEach hooks.
                    if *self.inner.current.read() == target {
                        debug!(to = %target, "target already current, not recommitting");
                        return Ok(());
                    }
                    *self.inner.current.write() = target.clone();
                    debug!(to = %target, from = %from, "navigation committed");
                    for hook in self.inner.after_each.read().iter() {
                        hook(&target, &from);
                    }
                    return Ok(());
                }
                GuardDecision::Redirect(next) => {
                    debug!(to = %target, redirect = %next, "navigation redirected");
                    target = next;
                }
            }
        }

        bail!("navigation to {path:?} exceeded {MAX_REDIRECTS} redirects");
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

fn contains_name(routes: &[RouteDefinition], name: &str) -> bool {
    routes
        .iter()
        .any(|r| r.name == name || contains_name(&r.children, name))
}

fn find_name_by_path(routes: &[RouteDefinition], path: &str) -> Option<String> {
    for route in routes {
        if route.path == path {
            return Some(route.name.clone());
        }
        if let Some(name) = find_name_by_path(&route.children, path) {
            return Some(name);
        }
    }
    None
}

fn find_redirect_by_path(routes: &[RouteDefinition], path: &str) -> Option<String> {
    for route in routes {
        if route.path == path {
            return route.redirect.clone();
        }
        if let Some(redirect) = find_redirect_by_path(&route.children, path) {
            return Some(redirect);
        }
    }
    None
}

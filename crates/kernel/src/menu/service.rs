//! Session-scoped menu state and single-flight resolution.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};
use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::api::MenuSource;
use crate::error::{NavError, NavResult};
use crate::menu::{
    NavigationMenuEntry, RouteDefinition, to_navigation_menu, to_route_tree, transform_menu_tree,
};
use crate::router::RouteRegistrar;
use crate::session::SessionEvent;

/// Holds the resolved menu and route models for the authenticated session,
/// and owns the single-flight resolution of the backend tree.
///
/// Wrapped in Arc internally so Clone is cheap.
#[derive(Clone)]
pub struct MenuService {
    inner: Arc<MenuServiceInner>,
}

struct MenuServiceInner {
    source: Arc<dyn MenuSource>,
    registrar: RouteRegistrar,
    events: broadcast::Sender<SessionEvent>,

    /// Navigation menu model for the shell.
    menu_options: RwLock<Vec<NavigationMenuEntry>>,

    /// Route tree model, kept for inspection after mounting.
    route_list: RwLock<Vec<RouteDefinition>>,

    /// Single-flight slot. While a resolution is in flight this holds its
    /// broadcast handle; later callers subscribe instead of fetching again.
    pending: Mutex<Option<broadcast::Sender<NavResult<()>>>>,

    /// Bumped by [`MenuService::clear`]. A resolution that started under an
    /// older epoch belongs to a torn-down session and discards its result
    /// instead of mounting it.
    epoch: AtomicU64,
}

/// Clears the single-flight slot even when the leading future is dropped
/// mid-resolution, so waiters unblock and the next caller can retry.
struct PendingGuard<'a> {
    slot: &'a Mutex<Option<broadcast::Sender<NavResult<()>>>>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        *self.slot.lock() = None;
    }
}

impl MenuService {
    pub fn new(
        source: Arc<dyn MenuSource>,
        registrar: RouteRegistrar,
        events: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            inner: Arc::new(MenuServiceInner {
                source,
                registrar,
                events,
                menu_options: RwLock::new(Vec::new()),
                route_list: RwLock::new(Vec::new()),
                pending: Mutex::new(None),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// Current navigation menu model.
    pub fn menu_options(&self) -> Vec<NavigationMenuEntry> {
        self.inner.menu_options.read().clone()
    }

    /// Current route tree model.
    pub fn route_list(&self) -> Vec<RouteDefinition> {
        self.inner.route_list.read().clone()
    }

    /// Drop both cached models and invalidate any in-flight resolution.
    /// Part of session teardown.
    pub fn clear(&self) {
        self.inner.epoch.fetch_add(1, Ordering::SeqCst);
        self.inner.menu_options.write().clear();
        self.inner.route_list.write().clear();
    }

    /// Resolve the menu tree and mount its routes, once per session.
    ///
    /// Already-mounted routes return immediately. Otherwise the first caller
    /// fetches, transforms, projects, and registers; concurrent callers
    /// share that one in-flight resolution and resume with the same
    /// resolved or rejected outcome. Exactly one backend fetch and one
    /// registration happen per resolution regardless of caller count.
    ///
    /// A teardown landing while the fetch is in flight discards the stale
    /// tree: nothing is cached or mounted, and the next caller resolves the
    /// fresh session from scratch.
    pub async fn ensure_resolved(&self) -> NavResult<()> {
        if self.inner.registrar.is_registered() {
            return Ok(());
        }

        enum Role {
            Leader(broadcast::Sender<NavResult<()>>),
            Follower(broadcast::Receiver<NavResult<()>>),
        }

        let role = {
            let mut pending = self.inner.pending.lock();
            match &*pending {
                Some(tx) => Role::Follower(tx.subscribe()),
                None => {
                    let (tx, _rx) = broadcast::channel(1);
                    *pending = Some(tx.clone());
                    Role::Leader(tx)
                }
            }
        };

        match role {
            Role::Follower(mut rx) => {
                debug!("joining in-flight menu resolution");
                match rx.recv().await {
                    Ok(result) => result,
                    // Leader dropped without publishing a result.
                    Err(_) => Err(NavError::Fetch("menu resolution aborted".to_string())),
                }
            }
            Role::Leader(tx) => {
                let _guard = PendingGuard {
                    slot: &self.inner.pending,
                };
                let result = self.resolve_and_register().await;
                let _ = tx.send(result.clone());
                result
            }
        }
    }

    async fn resolve_and_register(&self) -> NavResult<()> {
        let epoch = self.inner.epoch.load(Ordering::SeqCst);
        let fetched = self.inner.source.fetch_menu_tree().await;

        // The fetch outcome belongs to the session that started it. If a
        // teardown landed in the meantime, mounting it would leak one
        // session's routes into the next.
        if self.inner.epoch.load(Ordering::SeqCst) != epoch {
            debug!("session torn down during resolution, discarding the fetched tree");
            return Ok(());
        }

        let payload = fetched?;
        let nodes = transform_menu_tree(&payload)?;

        let menu = to_navigation_menu(&nodes);
        let routes = to_route_tree(&nodes);
        info!(
            menu_entries = menu.len(),
            routes = routes.len(),
            "menu tree resolved"
        );

        *self.inner.menu_options.write() = menu;
        *self.inner.route_list.write() = routes.clone();

        self.inner.registrar.register(routes)?;
        let _ = self.inner.events.send(SessionEvent::RoutesReady);
        Ok(())
    }
}

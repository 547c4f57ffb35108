//! The navigation guard.
//!
//! Gates every navigation attempt on authentication and route-readiness.
//! State is re-derived per attempt from the session and the registrar, so
//! the guard itself carries nothing that could go stale.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::menu::MenuService;
use crate::router::{GuardDecision, NavigationHook, RouteRegistrar};
use crate::session::SessionService;

/// Guard state derived per navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GuardState {
    /// No usable credential.
    Unauthenticated,
    /// Authenticated, routes not yet mounted.
    Resolving,
    /// Authenticated with mounted routes; decisions are synchronous.
    Ready,
}

pub struct NavigationGuard {
    session: SessionService,
    menus: MenuService,
    registrar: RouteRegistrar,
    sign_in_path: String,
}

impl NavigationGuard {
    pub fn new(
        session: SessionService,
        menus: MenuService,
        registrar: RouteRegistrar,
        sign_in_path: String,
    ) -> Self {
        Self {
            session,
            menus,
            registrar,
            sign_in_path,
        }
    }

    fn state(&self) -> GuardState {
        if !self.session.has_login() {
            GuardState::Unauthenticated
        } else if self.registrar.is_registered() {
            GuardState::Ready
        } else {
            GuardState::Resolving
        }
    }
}

#[async_trait]
impl NavigationHook for NavigationGuard {
    async fn before_each(&self, to: &str, from: &str) -> GuardDecision {
        let state = self.state();

        if to == self.sign_in_path {
            return match state {
                GuardState::Unauthenticated => GuardDecision::Proceed,
                // Already signed in: bounce back to where the user was, or
                // to the layout root when nothing has committed yet.
                _ if from.is_empty() => GuardDecision::Redirect("/".to_string()),
                _ => GuardDecision::Redirect(from.to_string()),
            };
        }

        match state {
            GuardState::Unauthenticated => {
                debug!(to, "unauthenticated navigation attempt");
                self.session.cleanup().await;
                GuardDecision::Redirect(self.sign_in_path.clone())
            }
            GuardState::Ready => GuardDecision::Proceed,
            GuardState::Resolving => match self.menus.ensure_resolved().await {
                // Re-dispatch the original target; the guard re-runs and
                // finds Ready.
                Ok(()) => GuardDecision::Redirect(to.to_string()),
                Err(e) => {
                    // Never leave the user on a half-resolved screen; the
                    // technical detail stays in the log.
                    warn!(error = %e, to, "menu resolution failed, signing out");
                    self.session.cleanup().await;
                    GuardDecision::Redirect(self.sign_in_path.clone())
                }
            },
        }
    }
}

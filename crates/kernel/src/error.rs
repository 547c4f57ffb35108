//! Navigation engine error types.

use thiserror::Error;

/// Errors raised while resolving the menu tree into mounted routes.
///
/// `Clone` is required so the single-flight resolution slot can hand the
/// same rejection to every waiter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NavError {
    /// Network failure or non-200 result envelope from the backend.
    #[error("menu fetch failed: {0}")]
    Fetch(String),

    /// Structurally invalid menu payload (not a list, or a node field of
    /// the wrong type).
    #[error("malformed menu tree: {0}")]
    MalformedTree(String),

    /// The navigation system rejected a mount. Treated as a bug signal:
    /// logged, then followed by a forced cleanup.
    #[error("route registration conflict: {0}")]
    RegistrationConflict(String),

    /// Authorization failure surfaced by the transport layer. Routed into
    /// cleanup exactly like a guard-detected unauthenticated state.
    #[error("session expired")]
    SessionExpired,
}

/// Result type alias using NavError.
pub type NavResult<T> = Result<T, NavError>;

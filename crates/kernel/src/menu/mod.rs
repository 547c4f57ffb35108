//! Menu tree handling.
//!
//! The backend delivers a permission-filtered menu tree; this module owns the
//! node types, the normalization pass ([`transform_menu_tree`]), the two pure
//! projections ([`to_navigation_menu`], [`to_route_tree`]), and the
//! [`MenuService`] that caches the resolved models for the running session.

mod project;
mod service;
mod transform;

pub use project::{to_navigation_menu, to_route_tree};
pub use service::MenuService;
pub use transform::transform_menu_tree;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A menu record as delivered by the backend.
///
/// Every field is optional on the wire; normalization applies defaults. The
/// backend is the ordering and permission authority — nodes arrive already
/// filtered and sorted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawMenuNode {
    pub id: Option<String>,
    pub parent_id: Option<String>,
    pub disabled: Option<bool>,
    pub show: Option<bool>,
    pub key: Option<String>,
    pub label: Option<String>,
    pub icon: Option<String>,
    pub path: Option<String>,
    pub name: Option<String>,
    pub redirect: Option<String>,
    pub component: Option<String>,
    pub sort_order: Option<i64>,
    /// Arbitrary extra payload attached by the backend.
    pub extra: Option<Value>,
    pub pinned: Option<bool>,
    pub show_tab: Option<bool>,
    pub enable_multi_tab: Option<bool>,
    pub children: Option<Vec<RawMenuNode>>,
}

/// Route metadata carried from the menu record into the mounted route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_tab: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_multi_tab: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pinned: Option<bool>,
}

/// Canonical internal menu node after defaulting and path normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMenuNode {
    pub id: Option<String>,
    /// Assigned from the recursion context while normalizing, not copied
    /// from the payload. None for roots.
    pub parent_id: Option<String>,
    pub disabled: bool,
    pub show: bool,
    /// Defaults to `name` when the source key is absent.
    pub key: String,
    pub label: String,
    pub icon: String,
    /// Always begins with `/` when non-empty, otherwise empty.
    pub path: String,
    pub name: String,
    pub redirect: String,
    pub component: String,
    pub sort_order: i64,
    pub meta: RouteMeta,
    /// Serialized copy of the source `extra` field, absent when the source
    /// had none.
    pub extra: Option<String>,
    /// Present (possibly empty) exactly when the source node carried a
    /// children field at all.
    pub children: Option<Vec<NormalizedMenuNode>>,
}

/// One entry of the navigation menu shown to the user.
///
/// Nodes with `show == false` never make it here; `disabled` entries are
/// kept so the shell can render them non-interactive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationMenuEntry {
    pub key: String,
    pub label: String,
    pub icon: String,
    pub disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NavigationMenuEntry>>,
}

/// A lazy reference to a screen component.
///
/// Holds the module specifier from the menu record; the shell resolves it at
/// render time. Nothing is loaded while the route tree is being built, which
/// keeps tree construction independent from code loading.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRef(String);

impl ComponentRef {
    /// Wrap a module specifier for deferred resolution.
    pub fn lazy(spec: impl Into<String>) -> Self {
        Self(spec.into())
    }

    /// The module specifier to resolve at render time.
    pub fn spec(&self) -> &str {
        &self.0
    }
}

/// A route ready to be mounted into the navigation system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub name: String,
    pub path: String,
    /// Omitted entirely when the menu record carried no redirect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
    pub component: ComponentRef,
    pub meta: RouteMeta,
    pub children: Vec<RouteDefinition>,
}

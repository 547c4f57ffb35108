//! Pure projections over the normalized menu tree.
//!
//! Visibility and reachability are deliberately separate concerns: a node
//! hidden from the menu must still be reachable by direct path when the
//! backend issued it.

use crate::menu::{ComponentRef, NavigationMenuEntry, NormalizedMenuNode, RouteDefinition};

/// Project the tree into the navigation menu model.
///
/// Nodes with `show == false` are dropped together with their subtree,
/// preserving siblings. Disabled nodes stay so the shell can render them
/// non-interactive.
pub fn to_navigation_menu(nodes: &[NormalizedMenuNode]) -> Vec<NavigationMenuEntry> {
    nodes
        .iter()
        .filter(|node| node.show)
        .map(|node| NavigationMenuEntry {
            key: node.key.clone(),
            label: node.label.clone(),
            icon: node.icon.clone(),
            disabled: node.disabled,
            children: node.children.as_deref().map(to_navigation_menu),
        })
        .collect()
}

/// Project the tree into mountable route definitions.
///
/// Every node maps to a route regardless of `show` or `disabled`. An empty
/// redirect means "no redirect" and is omitted rather than mounted as an
/// empty string.
pub fn to_route_tree(nodes: &[NormalizedMenuNode]) -> Vec<RouteDefinition> {
    nodes
        .iter()
        .map(|node| RouteDefinition {
            name: node.name.clone(),
            path: node.path.clone(),
            redirect: (!node.redirect.is_empty()).then(|| node.redirect.clone()),
            component: ComponentRef::lazy(&node.component),
            meta: node.meta.clone(),
            children: node.children.as_deref().map(to_route_tree).unwrap_or_default(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::menu::transform_menu_tree;
    use serde_json::json;

    fn sample() -> Vec<NormalizedMenuNode> {
        transform_menu_tree(&json!([
            {"name": "dashboard", "path": "dashboard", "component": "dashboard/index"},
            {"name": "hidden", "path": "hidden", "show": false, "children": [
                {"name": "hidden-child", "path": "hidden/child"}
            ]},
            {"name": "system", "path": "system", "disabled": true, "children": [
                {"name": "users", "path": "system/users"},
                {"name": "audit", "path": "system/audit", "show": false}
            ]}
        ]))
        .unwrap()
    }

    #[test]
    fn menu_drops_hidden_subtrees_keeps_siblings() {
        let menu = to_navigation_menu(&sample());
        let keys: Vec<_> = menu.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["dashboard", "system"]);

        let system = &menu[1];
        assert!(system.disabled);
        let children = system.children.as_ref().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].key, "users");
    }

    #[test]
    fn routes_include_hidden_nodes() {
        let routes = to_route_tree(&sample());
        assert_eq!(routes.len(), 3);
        assert_eq!(routes[1].name, "hidden");
        assert_eq!(routes[1].children[0].name, "hidden-child");
        // Hidden grandchild of "system" is also routable.
        assert_eq!(routes[2].children.len(), 2);
    }

    #[test]
    fn route_count_and_order_match_input_recursively() {
        fn count(routes: &[RouteDefinition]) -> usize {
            routes.iter().map(|r| 1 + count(&r.children)).sum()
        }
        let routes = to_route_tree(&sample());
        assert_eq!(count(&routes), 6);
        let names: Vec<_> = routes.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["dashboard", "hidden", "system"]);
    }

    #[test]
    fn empty_redirect_is_omitted() {
        let nodes = transform_menu_tree(&json!([
            {"name": "a", "redirect": ""},
            {"name": "b"},
            {"name": "c", "redirect": "/c/overview"}
        ]))
        .unwrap();
        let routes = to_route_tree(&nodes);
        assert_eq!(routes[0].redirect, None);
        assert_eq!(routes[1].redirect, None);
        assert_eq!(routes[2].redirect.as_deref(), Some("/c/overview"));
    }

    #[test]
    fn component_ref_keeps_spec_for_deferred_load() {
        let routes = to_route_tree(&sample());
        assert_eq!(routes[0].component.spec(), "dashboard/index");
    }

    #[test]
    fn empty_tree_projects_to_empty_models() {
        assert!(to_navigation_menu(&[]).is_empty());
        assert!(to_route_tree(&[]).is_empty());
    }
}

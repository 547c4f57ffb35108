//! Normalization of backend menu payloads.
//!
//! The backend is the authority for both permission filtering and ordering;
//! this pass only applies defaults, normalizes paths, and assigns parent ids
//! from the recursion context. It is pure: no I/O, input untouched.

use serde_json::Value;

use crate::error::{NavError, NavResult};
use crate::menu::{NormalizedMenuNode, RawMenuNode, RouteMeta};

/// Normalize a backend menu payload into the canonical node tree.
///
/// Fails with [`NavError::MalformedTree`] when the payload is not a JSON
/// array, or when a node field carries a structurally invalid type. Absent
/// optional fields never fail — every one has a default. Non-object list
/// elements degrade to an all-defaults node.
///
/// Relative order and depth are preserved; `sortOrder` is carried through
/// but never used to re-sort.
pub fn transform_menu_tree(payload: &Value) -> NavResult<Vec<NormalizedMenuNode>> {
    let Some(items) = payload.as_array() else {
        return Err(NavError::MalformedTree(format!(
            "expected a list of menu nodes, got {}",
            json_kind(payload)
        )));
    };

    let raw: Vec<RawMenuNode> = items
        .iter()
        .map(|item| {
            if item.is_object() {
                serde_json::from_value(item.clone())
                    .map_err(|e| NavError::MalformedTree(e.to_string()))
            } else {
                Ok(RawMenuNode::default())
            }
        })
        .collect::<NavResult<_>>()?;

    Ok(normalize_nodes(&raw, None))
}

/// Recursively normalize typed nodes. Infallible once the payload has
/// deserialized; `parent_id` comes from the enclosing node, not the payload.
fn normalize_nodes(items: &[RawMenuNode], parent_id: Option<&str>) -> Vec<NormalizedMenuNode> {
    items
        .iter()
        .map(|item| {
            let name = item.name.clone().unwrap_or_default();
            let key = match &item.key {
                Some(key) if !key.is_empty() => key.clone(),
                _ => name.clone(),
            };

            // The children list mirrors the presence of the source field:
            // present (possibly empty) when the backend sent one, absent
            // when it did not.
            let children = item
                .children
                .as_ref()
                .map(|kids| normalize_nodes(kids, item.id.as_deref()));

            NormalizedMenuNode {
                id: item.id.clone(),
                parent_id: parent_id.map(str::to_string),
                disabled: item.disabled.unwrap_or(false),
                show: item.show.unwrap_or(true),
                key,
                label: item.label.clone().unwrap_or_default(),
                icon: item.icon.clone().unwrap_or_default(),
                path: normalize_path(item.path.as_deref().unwrap_or_default()),
                name,
                redirect: item.redirect.clone().unwrap_or_default(),
                component: item.component.clone().unwrap_or_default(),
                sort_order: item.sort_order.unwrap_or(0),
                meta: RouteMeta {
                    show_tab: item.show_tab,
                    enable_multi_tab: item.enable_multi_tab,
                    pinned: item.pinned,
                },
                extra: item.extra.as_ref().map(Value::to_string),
                children,
            }
        })
        .collect()
}

/// Ensure a non-empty path begins with `/`; an empty path stays empty.
fn normalize_path(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_non_list_payload() {
        let err = transform_menu_tree(&json!({"id": "1"})).unwrap_err();
        assert!(matches!(err, NavError::MalformedTree(_)));

        let err = transform_menu_tree(&json!(null)).unwrap_err();
        assert!(matches!(err, NavError::MalformedTree(_)));
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let nodes = transform_menu_tree(&json!([{}])).unwrap();
        assert_eq!(nodes.len(), 1);
        let node = &nodes[0];
        assert_eq!(node.label, "");
        assert_eq!(node.icon, "");
        assert_eq!(node.path, "");
        assert_eq!(node.redirect, "");
        assert!(!node.disabled);
        assert!(node.show);
        assert!(node.children.is_none());
        assert!(node.extra.is_none());
    }

    #[test]
    fn path_gains_leading_slash() {
        let nodes = transform_menu_tree(&json!([
            {"id": "1", "path": "dashboard", "name": "dashboard", "show": true,
             "disabled": false, "children": []}
        ]))
        .unwrap();
        assert_eq!(nodes[0].path, "/dashboard");
    }

    #[test]
    fn absolute_and_empty_paths_untouched() {
        let nodes = transform_menu_tree(&json!([
            {"path": "/settings"},
            {"path": ""},
            {}
        ]))
        .unwrap();
        assert_eq!(nodes[0].path, "/settings");
        assert_eq!(nodes[1].path, "");
        assert_eq!(nodes[2].path, "");
    }

    #[test]
    fn key_defaults_to_name() {
        let nodes = transform_menu_tree(&json!([
            {"name": "dashboard"},
            {"name": "users", "key": "user-admin"},
            {"name": "roles", "key": ""}
        ]))
        .unwrap();
        assert_eq!(nodes[0].key, "dashboard");
        assert_eq!(nodes[1].key, "user-admin");
        assert_eq!(nodes[2].key, "roles");
    }

    #[test]
    fn children_mirror_source_presence() {
        let nodes = transform_menu_tree(&json!([
            {"id": "1", "children": []},
            {"id": "2"},
            {"id": "3", "children": [{"id": "3a"}]}
        ]))
        .unwrap();
        assert_eq!(nodes[0].children.as_ref().map(Vec::len), Some(0));
        assert!(nodes[1].children.is_none());
        assert_eq!(nodes[2].children.as_ref().unwrap().len(), 1);
    }

    #[test]
    fn parent_id_comes_from_recursion_context() {
        let nodes = transform_menu_tree(&json!([
            {"id": "1", "parentId": "bogus", "children": [
                {"id": "1a", "children": [{"id": "1a-i"}]}
            ]}
        ]))
        .unwrap();
        assert_eq!(nodes[0].parent_id, None);
        let child = &nodes[0].children.as_ref().unwrap()[0];
        assert_eq!(child.parent_id.as_deref(), Some("1"));
        let grandchild = &child.children.as_ref().unwrap()[0];
        assert_eq!(grandchild.parent_id.as_deref(), Some("1a"));
    }

    #[test]
    fn extra_payload_is_serialized_copy() {
        let nodes = transform_menu_tree(&json!([
            {"extra": {"badge": 3}},
            {}
        ]))
        .unwrap();
        assert_eq!(nodes[0].extra.as_deref(), Some(r#"{"badge":3}"#));
        assert!(nodes[1].extra.is_none());
    }

    #[test]
    fn order_is_preserved_not_resorted() {
        let nodes = transform_menu_tree(&json!([
            {"name": "b", "sortOrder": 9},
            {"name": "a", "sortOrder": 1}
        ]))
        .unwrap();
        assert_eq!(nodes[0].name, "b");
        assert_eq!(nodes[0].sort_order, 9);
        assert_eq!(nodes[1].name, "a");
    }

    #[test]
    fn non_object_elements_degrade_to_defaults() {
        let nodes = transform_menu_tree(&json!([null, {"name": "real"}])).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].name, "");
        assert_eq!(nodes[1].name, "real");
    }

    #[test]
    fn wrong_typed_field_is_malformed() {
        let err = transform_menu_tree(&json!([{"show": "yes"}])).unwrap_err();
        assert!(matches!(err, NavError::MalformedTree(_)));
    }
}

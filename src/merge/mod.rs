//! Merge primitives for metadata trees.
//!
//! Three building blocks are combined by [`operation::merge_operation`]:
//!
//! - [`deep_merge`] - recursive map merge, overlay wins on leaf collisions
//! - [`merge_list`] - list merge, either wholesale replacement or keyed deduplication
//! - [`merge_responses`] - status-code keyed merge with per-response deep merge
//!
//! None of them mutate their inputs; every result is a fresh tree.

pub mod conflict;
pub mod operation;

use serde_json::{Map, Value};

/// Recursively merge `overlay` into a copy of `base`.
///
/// When both sides hold a map under the same key the maps are merged recursively;
/// any other collision is resolved in favour of `overlay`. Keys only present in
/// `base` are retained.
pub fn deep_merge(base: &Map<String, Value>, overlay: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = base.clone();

    for (key, overlay_value) in overlay {
        let combined = match (merged.get(key), overlay_value) {
            (Some(Value::Object(base_map)), Value::Object(overlay_map)) => {
                Value::Object(deep_merge(base_map, overlay_map))
            }
            _ => overlay_value.clone(),
        };
        merged.insert(key.clone(), combined);
    }

    merged
}

/// Merge two lists.
///
/// Without a `dedup_key`, a non-empty `overlay` replaces `base` entirely. With a key,
/// the result holds every `base` item whose key does not appear in `overlay`,
/// followed by all `overlay` items, each group in its original order.
///
/// Items that are not maps, or lack a string value for the key, never match anything.
pub fn merge_list(base: &[Value], overlay: &[Value], dedup_key: Option<&str>) -> Vec<Value> {
    let Some(key) = dedup_key else {
        return if overlay.is_empty() {
            base.to_vec()
        } else {
            overlay.to_vec()
        };
    };

    let overlay_keys: Vec<&str> = overlay
        .iter()
        .filter_map(|item| item_key(item, key))
        .collect();

    base.iter()
        .filter(|item| match item_key(item, key) {
            Some(k) => !overlay_keys.contains(&k),
            None => true,
        })
        .chain(overlay.iter())
        .cloned()
        .collect()
}

/// Merge two status-code keyed response maps.
///
/// The result holds the union of both key sets. A code defined on both sides gets
/// `deep_merge(base, overlay)` when both entries are maps, otherwise the overlay entry.
pub fn merge_responses(
    base: &Map<String, Value>,
    overlay: &Map<String, Value>,
) -> Map<String, Value> {
    let mut merged = base.clone();

    for (code, overlay_response) in overlay {
        let combined = match (merged.get(code), overlay_response) {
            (Some(Value::Object(base_response)), Value::Object(overlay_map)) => {
                Value::Object(deep_merge(base_response, overlay_map))
            }
            _ => overlay_response.clone(),
        };
        merged.insert(code.clone(), combined);
    }

    merged
}

/// Read the dedup key of a list item
fn item_key<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.as_object()?.get(key)?.as_str()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(m) => m,
            _ => panic!("expected an object"),
        }
    }

    fn list(value: Value) -> Vec<Value> {
        match value {
            Value::Array(items) => items,
            _ => panic!("expected an array"),
        }
    }

    #[test]
    fn test_deep_merge_nested_maps() {
        let base = map(json!({"a": 1, "b": {"x": 10, "y": 20}}));
        let overlay = map(json!({"b": {"y": 30, "z": 40}, "c": 3}));

        let merged = deep_merge(&base, &overlay);

        assert_eq!(
            Value::Object(merged),
            json!({"a": 1, "b": {"x": 10, "y": 30, "z": 40}, "c": 3})
        );
    }

    #[test]
    fn test_deep_merge_does_not_mutate_inputs() {
        let base = map(json!({"b": {"x": 1}}));
        let overlay = map(json!({"b": {"y": 2}}));
        let base_before = base.clone();
        let overlay_before = overlay.clone();

        let _ = deep_merge(&base, &overlay);

        assert_eq!(base, base_before);
        assert_eq!(overlay, overlay_before);
    }

    #[test]
    fn test_deep_merge_lists_are_replaced() {
        let base = map(json!({"items": [1, 2, 3]}));
        let overlay = map(json!({"items": [4]}));

        let merged = deep_merge(&base, &overlay);

        assert_eq!(merged["items"], json!([4]));
    }

    #[test]
    fn test_deep_merge_type_mismatch_overlay_wins() {
        let base = map(json!({"schema": {"type": "string"}}));
        let overlay = map(json!({"schema": "inline"}));

        let merged = deep_merge(&base, &overlay);

        assert_eq!(merged["schema"], json!("inline"));
    }

    #[test]
    fn test_deep_merge_disjoint_keys_is_order_independent() {
        let a = map(json!({"summary": "S", "nested": {"x": 1}}));
        let b = map(json!({"description": "D", "other": {"y": 2}}));

        let ab = deep_merge(&a, &b);
        let ba = deep_merge(&b, &a);

        assert_eq!(ab, ba);
        assert_eq!(ab.len(), 4);
    }

    #[test]
    fn test_merge_list_replace_policy() {
        let base = list(json!(["users", "admin"]));
        let overlay = list(json!(["accounts"]));

        assert_eq!(merge_list(&base, &overlay, None), list(json!(["accounts"])));
        assert_eq!(merge_list(&base, &[], None), base);
        assert_eq!(merge_list(&[], &overlay, None), overlay);
    }

    #[test]
    fn test_merge_list_dedup_replaces_matching_item() {
        let base = list(json!([{"name": "a", "x": 1}]));
        let overlay = list(json!([{"name": "a", "x": 2}]));

        let merged = merge_list(&base, &overlay, Some("name"));

        assert_eq!(merged, list(json!([{"name": "a", "x": 2}])));
    }

    #[test]
    fn test_merge_list_dedup_order() {
        let base = list(json!([
            {"name": "page", "in": "query"},
            {"name": "id", "in": "path"},
            {"name": "limit", "in": "query"}
        ]));
        let overlay = list(json!([
            {"name": "id", "in": "path", "required": true},
            {"name": "token", "in": "header"}
        ]));

        let merged = merge_list(&base, &overlay, Some("name"));
        let names: Vec<&str> = merged
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();

        assert_eq!(names, vec!["page", "limit", "id", "token"]);
        assert_eq!(merged[2]["required"], json!(true));
    }

    #[test]
    fn test_merge_list_dedup_keyless_items_are_kept() {
        let base = list(json!([{"in": "query"}, "stray"]));
        let overlay = list(json!([{"in": "header"}]));

        let merged = merge_list(&base, &overlay, Some("name"));

        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_merge_list_dedup_empty_sides_are_identity() {
        let items = list(json!([{"name": "a"}, {"name": "b"}]));

        assert_eq!(merge_list(&items, &[], Some("name")), items);
        assert_eq!(merge_list(&[], &items, Some("name")), items);
    }

    #[test]
    fn test_merge_responses_union_of_codes() {
        let base = map(json!({"404": {"description": "Not found"}}));
        let overlay = map(json!({"200": {"description": "OK"}}));

        let merged = merge_responses(&base, &overlay);

        assert!(merged.contains_key("200"));
        assert!(merged.contains_key("404"));
    }

    #[test]
    fn test_merge_responses_deep_merges_same_code() {
        let base = map(json!({
            "200": {
                "description": "Listed",
                "headers": {"X-Total": {"schema": {"type": "integer"}}}
            }
        }));
        let overlay = map(json!({
            "200": {
                "description": "OK",
                "content": {"application/json": {"schema": {"type": "array"}}}
            }
        }));

        let merged = merge_responses(&base, &overlay);

        assert_eq!(
            merged["200"],
            json!({
                "description": "OK",
                "headers": {"X-Total": {"schema": {"type": "integer"}}},
                "content": {"application/json": {"schema": {"type": "array"}}}
            })
        );
    }
}

//! Method enrichment: fill a missing `_method` on each result from the
//! collection's request definitions.

use crate::run::{is_truthy, TestRun};
use serde_json::Value;
use std::collections::HashMap;

/// Field written onto results by enrichment
pub const METHOD_FIELD: &str = "_method";

/// Lookup key for a request id: its JSON text, so the string `"7"` and the
/// number `7` stay distinct.
fn id_key(id: &Value) -> Option<String> {
    (!id.is_null()).then(|| id.to_string())
}

/// Build `request id -> method` from `collection.requests`.
///
/// A missing or non-array `requests` yields an empty map. `None` means the
/// document itself has an unusable shape (not an object, or a `collection`
/// that is set but is not an object). Later definitions win on duplicate ids.
pub fn method_map(run: &TestRun) -> Option<HashMap<String, Value>> {
    let doc = run.as_value().as_object()?;
    let collection = match doc.get("collection") {
        Some(c) if is_truthy(c) => Some(c.as_object()?),
        _ => None,
    };

    let mut map = HashMap::new();
    let requests = collection
        .and_then(|c| c.get("requests"))
        .and_then(Value::as_array);
    for req in requests.into_iter().flatten() {
        let Some(req) = req.as_object() else {
            continue;
        };
        let Some(key) = req.get("id").and_then(id_key) else {
            continue;
        };
        map.insert(key, req.get("method").cloned().unwrap_or(Value::Null));
    }
    Some(map)
}

/// Attach `_method` to every result that lacks a truthy one.
///
/// Returns the number of results annotated, or `None` when the document shape
/// made enrichment impossible; in that case the document is left untouched.
/// Existing `_method` values are never overwritten, so the operation is
/// idempotent.
pub fn enrich_methods(run: &mut TestRun) -> Option<usize> {
    let map = method_map(run)?;
    if map.is_empty() {
        return Some(0);
    }

    let Some(results) = run
        .as_value_mut()
        .get_mut("results")
        .and_then(Value::as_array_mut)
    else {
        return Some(0);
    };

    let mut annotated = 0;
    for result in results.iter_mut() {
        let Some(record) = result.as_object_mut() else {
            continue;
        };
        if record.get(METHOD_FIELD).is_some_and(is_truthy) {
            continue;
        }
        let Some(method) = record
            .get("id")
            .and_then(id_key)
            .and_then(|k| map.get(&k))
            .filter(|m| is_truthy(m))
        else {
            continue;
        };
        record.insert(METHOD_FIELD.to_string(), method.clone());
        annotated += 1;
    }
    Some(annotated)
}

/// Resolve a result's HTTP method through the same fallback chain the viewer
/// uses: `_method`, `method`, `request.method`, `meta.method`.
pub fn resolve_method(result: &Value) -> Option<&str> {
    let candidates = [
        result.get(METHOD_FIELD),
        result.get("method"),
        result.get("request").and_then(|r| r.get("method")),
        result.get("meta").and_then(|m| m.get("method")),
    ];
    candidates
        .into_iter()
        .flatten()
        .find(|v| is_truthy(v))
        .and_then(Value::as_str)
}

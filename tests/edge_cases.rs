//! Edge case tests: degenerate documents must still render.

use pmreport::{render_report, EffectiveConfig, TestRun};
use serde_json::json;

fn render(doc: serde_json::Value) -> pmreport::RenderedReport {
    let mut run = TestRun::from_value(doc);
    render_report(&mut run, &EffectiveConfig::default()).expect("render should not fail")
}

#[test]
fn empty_object_renders_with_placeholders() {
    let r = render(json!({}));
    assert_eq!(r.names.title, "未命名 - —");
    assert_eq!(r.names.file_name, "未命名 - report.html");
    assert_eq!(r.methods_enriched, Some(0));
    assert!(r.html.contains("const testData = {};"));
}

#[test]
fn top_level_array_renders() {
    let r = render(json!([1, 2, 3]));
    assert_eq!(r.methods_enriched, None);
    assert_eq!(r.names.title, "未命名 - —");
}

#[test]
fn results_not_an_array() {
    let r = render(json!({"name": "odd", "results": {"0": {"name": "x"}}}));
    assert_eq!(r.methods_enriched, Some(0));
    assert!(r.html.contains("\"0\": {"));
}

#[test]
fn malformed_collection_is_skipped_not_fatal() {
    let r = render(json!({
        "name": "bad collection",
        "collection": "oops",
        "results": [{"id": "a", "name": "first"}]
    }));
    assert_eq!(r.methods_enriched, None);
    assert!(!r.html.contains("\"_method\""));
    assert!(r.html.contains("first"));
}

#[test]
fn name_made_only_of_punctuation() {
    let r = render(json!({"name": "///", "startedAt": "2024-02-29T12:00:00Z"}));
    assert_eq!(r.names.title, "/// - 2024-02-29");
    assert_eq!(r.names.file_name, "report - 2024-02-29.html");
}

#[test]
fn garbage_started_at_falls_back() {
    let r = render(json!({"name": "Run", "startedAt": "not a date"}));
    assert_eq!(r.names.title, "Run - —");
}

#[test]
fn results_with_mixed_record_shapes() {
    let r = render(json!({
        "collection": {"requests": [{"id": "x", "method": "DELETE"}]},
        "results": [null, "text", 5, {"id": "x"}, {"id": "x", "_method": "GET"}]
    }));
    assert_eq!(r.methods_enriched, Some(1));
}

#[test]
fn large_run_keeps_every_result() {
    let results: Vec<_> = (0..500)
        .map(|i| json!({"id": format!("r{i}"), "name": format!("request {i}"), "time": i}))
        .collect();
    let r = render(json!({"name": "big", "results": results}));
    assert!(r.html.contains("request 0"));
    assert!(r.html.contains("request 499"));
}

//! The parsed test-run document
//!
//! The document is kept as an opaque `serde_json::Value` so that unknown
//! fields and key order survive into the embedded payload. Accessors are
//! best-effort lookups that never fail on unexpected shapes.

use crate::error::{ReportError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// One parsed Postman-style test run
#[derive(Debug, Clone, PartialEq)]
pub struct TestRun {
    doc: Value,
}

impl TestRun {
    /// Wrap an already-parsed document
    pub fn from_value(doc: Value) -> Self {
        Self { doc }
    }

    /// Parse a document from JSON text
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s).map(Self::from_value)
    }

    /// Read and parse the JSON file at `path`
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ReportError::from_read(path, e))?;
        Self::from_json_str(&content).map_err(|source| ReportError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn as_value(&self) -> &Value {
        &self.doc
    }

    pub fn as_value_mut(&mut self) -> &mut Value {
        &mut self.doc
    }

    pub fn into_value(self) -> Value {
        self.doc
    }

    /// Top-level field lookup; `None` if the document is not an object
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.doc.as_object()?.get(key)
    }

    /// Raw `name` field (see `naming::display_name` for the placeholder)
    pub fn name(&self) -> Option<&Value> {
        self.field("name")
    }

    pub fn started_at(&self) -> Option<&str> {
        self.field("startedAt")?.as_str()
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.field("timestamp")?.as_str()
    }

    /// Pass counter reported by the runner
    pub fn total_pass(&self) -> Option<u64> {
        self.field("totalPass")?.as_u64()
    }

    /// Fail counter reported by the runner
    pub fn total_fail(&self) -> Option<u64> {
        self.field("totalFail")?.as_u64()
    }

    /// The `results` array, or an empty slice when absent or not an array
    pub fn results(&self) -> &[Value] {
        self.field("results")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether `results` is present and actually an array
    pub fn has_results_array(&self) -> bool {
        matches!(self.field("results"), Some(Value::Array(_)))
    }
}

/// JSON truthiness as the viewer and the runner see it: `null`, `false`,
/// `0`, `""`, `[]` and `{}` are all falsy.
pub fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

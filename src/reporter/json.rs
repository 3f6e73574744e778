//! JSON reporter for machine-readable output

use crate::stats::{PassRate, SummaryStats};
use crate::GeneratedReport;
use serde::Serialize;

/// Reporter for JSON output
pub struct JsonReporter {
    /// Whether to pretty-print JSON
    pretty: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonOutput<'a> {
    output: String,
    title: &'a str,
    pass_rate: &'a PassRate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pass_percent: Option<f64>,
    methods_enriched: Option<usize>,
    summary: &'a SummaryStats,
}

impl JsonReporter {
    /// Create a new JSON reporter
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Enable pretty-printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    /// Report a generated file as JSON
    pub fn report(&self, report: &GeneratedReport) -> String {
        let output = JsonOutput {
            output: report.path.display().to_string(),
            title: &report.title,
            pass_rate: &report.pass_rate,
            pass_percent: report.pass_rate.percent(),
            methods_enriched: report.methods_enriched,
            summary: &report.stats,
        };

        if self.pretty {
            serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
        } else {
            serde_json::to_string(&output).unwrap_or_else(|_| "{}".to_string())
        }
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::PassRateSource;
    use serde_json::{json, Value};
    use std::path::PathBuf;

    #[test]
    fn test_json_summary_shape() {
        let report = GeneratedReport {
            path: PathBuf::from("out/Run - report.html"),
            title: "Run - —".into(),
            stats: SummaryStats::from_results(&[json!({
                "responseCode": {"code": 500},
                "tests": {"a": true, "b": false},
                "_method": "GET"
            })]),
            pass_rate: PassRate {
                passed: 1,
                total: 2,
                source: PassRateSource::Assertions,
            },
            methods_enriched: None,
        };
        let out = JsonReporter::new().pretty().report(&report);
        let parsed: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(parsed["output"], "out/Run - report.html");
        assert_eq!(parsed["title"], "Run - —");
        assert_eq!(parsed["passRate"]["source"], "assertions");
        assert_eq!(parsed["passPercent"], 50.0);
        assert_eq!(parsed["methodsEnriched"], Value::Null);
        assert_eq!(parsed["summary"]["serverErrors"], 1);
        assert_eq!(parsed["summary"]["failedAssertions"], 1);
        assert_eq!(parsed["summary"]["methods"], json!(["GET"]));
    }
}

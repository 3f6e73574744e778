//! Summary statistics over a run's results
//!
//! These are the same formulas the embedded viewer evaluates in the browser;
//! the console and JSON summaries use this side of them.

use crate::enrich::resolve_method;
use crate::run::TestRun;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;

/// Durations at or below this are always "fast"
pub const FAST_THRESHOLD_MS: f64 = 120.0;
/// Initial slow threshold offered by the viewer
pub const DEFAULT_SLOW_THRESHOLD_MS: u32 = 500;

/// Linear-interpolation percentile, `p` clamped to 0..=100.
///
/// Returns 0 for an empty sample. An integral index returns that sample
/// as-is; otherwise the interpolated value is rounded to 2 decimals.
pub fn percentile(samples: &[f64], p: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    let p = p.clamp(0.0, 100.0);
    let idx = (p / 100.0) * (sorted.len() - 1) as f64;
    let lo = idx.floor() as usize;
    let hi = idx.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let value = sorted[lo] + (sorted[hi] - sorted[lo]) * (idx - lo as f64);
    round2(value)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Speed bucket for one duration sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeClass {
    Fast,
    Slow,
    Bad,
}

impl TimeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeClass::Fast => "fast",
            TimeClass::Slow => "slow",
            TimeClass::Bad => "bad",
        }
    }
}

impl std::fmt::Display for TimeClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a duration: `<= 120` fast, `>= slow` bad, otherwise slow
pub fn classify_time(ms: f64, slow_threshold: f64) -> TimeClass {
    if ms <= FAST_THRESHOLD_MS {
        TimeClass::Fast
    } else if ms >= slow_threshold {
        TimeClass::Bad
    } else {
        TimeClass::Slow
    }
}

/// `part / whole * 100`, or `None` when there is nothing to divide by
pub fn percent_of(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64 * 100.0)
}

fn status_code(result: &Value) -> Option<f64> {
    result.get("responseCode")?.get("code")?.as_f64()
}

/// Assertion outcomes of one result: (total, failed)
fn assertion_counts(result: &Value) -> (usize, usize) {
    match result.get("tests").and_then(Value::as_object) {
        Some(tests) => {
            let failed = tests.values().filter(|v| **v == Value::Bool(false)).count();
            (tests.len(), failed)
        }
        None => (0, 0),
    }
}

/// Aggregate view of a run, matching the viewer's summary cards
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    pub total_results: usize,
    pub success: usize,
    pub client_errors: usize,
    pub server_errors: usize,
    pub avg_time_ms: f64,
    pub p90_ms: f64,
    pub p95_ms: f64,
    pub total_assertions: usize,
    pub failed_assertions: usize,
    pub passed_assertions: usize,
    pub methods: Vec<String>,
}

impl SummaryStats {
    pub fn from_run(run: &TestRun) -> Self {
        Self::from_results(run.results())
    }

    pub fn from_results(results: &[Value]) -> Self {
        // Zero or missing durations are left out, as in the viewer.
        let times: Vec<f64> = results
            .iter()
            .filter_map(|r| r.get("time").and_then(Value::as_f64))
            .filter(|t| *t != 0.0)
            .collect();
        let avg_time_ms = times.iter().sum::<f64>() / times.len().max(1) as f64;

        let codes: Vec<f64> = results.iter().filter_map(status_code).collect();
        let success = codes.iter().filter(|c| **c < 400.0).count();
        let client_errors = codes.iter().filter(|c| (400.0..500.0).contains(*c)).count();
        let server_errors = codes.iter().filter(|c| **c >= 500.0).count();

        let (total_assertions, failed_assertions) = results
            .iter()
            .map(assertion_counts)
            .fold((0, 0), |(t, f), (rt, rf)| (t + rt, f + rf));

        let methods: BTreeSet<String> = results
            .iter()
            .filter_map(resolve_method)
            .map(str::to_string)
            .collect();

        Self {
            total_results: results.len(),
            success,
            client_errors,
            server_errors,
            avg_time_ms,
            p90_ms: percentile(&times, 90.0),
            p95_ms: percentile(&times, 95.0),
            total_assertions,
            failed_assertions,
            passed_assertions: total_assertions - failed_assertions,
            methods: methods.into_iter().collect(),
        }
    }

    pub fn success_percent(&self) -> Option<f64> {
        percent_of(self.success, self.total_results)
    }
}

/// Where a pass-rate figure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PassRateSource {
    /// `totalPass` / `totalFail` reported by the runner
    Runner,
    /// Counted from the results' assertion maps
    Assertions,
}

/// Pass-rate line for the console summary
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassRate {
    pub passed: u64,
    pub total: u64,
    pub source: PassRateSource,
}

impl PassRate {
    /// Prefer the runner's counters; fall back to counted assertions when
    /// either counter is missing.
    pub fn for_run(run: &TestRun, stats: &SummaryStats) -> Self {
        match (run.total_pass(), run.total_fail()) {
            (Some(pass), Some(fail)) => Self {
                passed: pass,
                total: pass.saturating_add(fail),
                source: PassRateSource::Runner,
            },
            _ => Self {
                passed: stats.passed_assertions as u64,
                total: stats.total_assertions as u64,
                source: PassRateSource::Assertions,
            },
        }
    }

    pub fn percent(&self) -> Option<f64> {
        (self.total > 0).then(|| self.passed as f64 / self.total as f64 * 100.0)
    }
}

impl std::fmt::Display for PassRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.passed, self.total)?;
        match self.percent() {
            Some(pct) => write!(f, " ({:.1}%)", pct)?,
            None => write!(f, " (n/a)")?,
        }
        if self.source == PassRateSource::Assertions {
            write!(f, " (from assertions)")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_percentile_interpolates() {
        assert_eq!(percentile(&[10.0, 20.0, 30.0, 40.0], 50.0), 25.0);
        assert_eq!(percentile(&[40.0, 10.0, 30.0, 20.0], 50.0), 25.0);
        assert_eq!(percentile(&[1.0, 2.0], 33.0), 1.33);
    }

    #[test]
    fn test_percentile_exact_index_and_bounds() {
        let s = [5.0, 1.0, 3.0];
        assert_eq!(percentile(&s, 0.0), 1.0);
        assert_eq!(percentile(&s, 50.0), 3.0);
        assert_eq!(percentile(&s, 100.0), 5.0);
        assert_eq!(percentile(&[7.5], 90.0), 7.5);
    }

    #[test]
    fn test_percentile_out_of_range_is_clamped() {
        let s = [5.0, 1.0, 3.0];
        assert_eq!(percentile(&s, 150.0), 5.0);
        assert_eq!(percentile(&s, -20.0), 1.0);
        assert_eq!(percentile(&s, f64::INFINITY), 5.0);
        assert_eq!(percentile(&s, f64::NAN), 1.0);
    }

    #[test]
    fn test_percentile_empty_is_zero() {
        assert_eq!(percentile(&[], 50.0), 0.0);
        assert_eq!(percentile(&[], 95.0), 0.0);
    }

    #[test]
    fn test_classify_time() {
        assert_eq!(classify_time(100.0, 500.0), TimeClass::Fast);
        assert_eq!(classify_time(120.0, 500.0), TimeClass::Fast);
        assert_eq!(classify_time(121.0, 500.0), TimeClass::Slow);
        assert_eq!(classify_time(499.0, 500.0), TimeClass::Slow);
        assert_eq!(classify_time(500.0, 500.0), TimeClass::Bad);
        assert_eq!(classify_time(1000.0, 500.0), TimeClass::Bad);
        // fast wins even when the slow threshold is set below it
        assert_eq!(classify_time(90.0, 50.0), TimeClass::Fast);
    }

    #[test]
    fn test_assertion_totals() {
        let stats = SummaryStats::from_results(&[
            json!({"tests": {"a": true, "b": false}}),
            json!({"tests": {"c": true}}),
        ]);
        assert_eq!(stats.total_assertions, 3);
        assert_eq!(stats.failed_assertions, 1);
        assert_eq!(stats.passed_assertions, 2);
    }

    #[test]
    fn test_status_buckets_and_latency() {
        let stats = SummaryStats::from_results(&[
            json!({"responseCode": {"code": 200}, "time": 100, "_method": "GET"}),
            json!({"responseCode": {"code": 201}, "time": 300, "method": "POST"}),
            json!({"responseCode": {"code": 404}, "time": 0, "_method": "GET"}),
            json!({"responseCode": {"code": 503}}),
            json!({"name": "no response"}),
        ]);
        assert_eq!(stats.total_results, 5);
        assert_eq!(stats.success, 2);
        assert_eq!(stats.client_errors, 1);
        assert_eq!(stats.server_errors, 1);
        assert_eq!(stats.avg_time_ms, 200.0);
        assert_eq!(stats.p90_ms, 280.0);
        assert_eq!(stats.methods, vec!["GET".to_string(), "POST".to_string()]);
        assert_eq!(stats.success_percent(), Some(40.0));
    }

    #[test]
    fn test_empty_results() {
        let stats = SummaryStats::from_results(&[]);
        assert_eq!(stats.total_results, 0);
        assert_eq!(stats.avg_time_ms, 0.0);
        assert_eq!(stats.p95_ms, 0.0);
        assert_eq!(stats.success_percent(), None);
    }

    #[test]
    fn test_pass_rate_prefers_runner_counters() {
        let run = TestRun::from_value(json!({"totalPass": 9, "totalFail": 3, "results": []}));
        let stats = SummaryStats::from_run(&run);
        let rate = PassRate::for_run(&run, &stats);
        assert_eq!(rate.source, PassRateSource::Runner);
        assert_eq!(rate.to_string(), "9/12 (75.0%)");
    }

    #[test]
    fn test_pass_rate_falls_back_to_assertions() {
        let run = TestRun::from_value(json!({
            "totalPass": 1,
            "results": [{"tests": {"a": true, "b": false}}]
        }));
        let stats = SummaryStats::from_run(&run);
        let rate = PassRate::for_run(&run, &stats);
        assert_eq!(rate.source, PassRateSource::Assertions);
        assert_eq!(rate.to_string(), "1/2 (50.0%) (from assertions)");
    }

    #[test]
    fn test_pass_rate_zero_total() {
        let run = TestRun::from_value(json!({"totalPass": 0, "totalFail": 0}));
        let rate = PassRate::for_run(&run, &SummaryStats::from_run(&run));
        assert_eq!(rate.percent(), None);
        assert_eq!(rate.to_string(), "0/0 (n/a)");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(200))]

            #[test]
            fn percentile_stays_within_sample_range(
                samples in prop::collection::vec(0.0f64..60_000.0, 1..50),
                p in -50.0f64..=150.0,
            ) {
                let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
                let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                let v = percentile(&samples, p);
                prop_assert!(v >= min - 0.01 && v <= max + 0.01, "{} not in [{}, {}]", v, min, max);
            }

            #[test]
            fn percentile_ignores_input_order(
                mut samples in prop::collection::vec(0u32..10_000, 1..30),
                p in 0.0f64..=100.0,
            ) {
                let forward: Vec<f64> = samples.iter().map(|&t| t as f64).collect();
                samples.reverse();
                let reversed: Vec<f64> = samples.iter().map(|&t| t as f64).collect();
                prop_assert_eq!(percentile(&forward, p), percentile(&reversed, p));
            }
        }
    }
}

//! Console reporter with colored output

use crate::stats::{PassRate, PassRateSource, SummaryStats};
use crate::GeneratedReport;
use colored::Colorize;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Only print the output path
    quiet: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self { quiet: false }
    }

    /// Print the written path and nothing else
    pub fn quiet(mut self) -> Self {
        self.quiet = true;
        self
    }

    /// Report a generated file
    pub fn report(&self, report: &GeneratedReport) {
        print!("{}", self.render(report));
    }

    /// Build the text printed by [`report`](Self::report)
    pub fn render(&self, report: &GeneratedReport) -> String {
        if self.quiet {
            return format!("{}\n", report.path.display());
        }

        let mut out = String::new();
        out.push_str(&format!(
            "{}: HTML report written to {}\n",
            "Done".green().bold(),
            report.path.display()
        ));
        out.push_str(&format!(
            "   Results: {}\n",
            report.stats.total_results.to_string().bold()
        ));
        out.push_str(&format!("   Pass rate: {}\n", self.colorize_pass_rate(&report.pass_rate)));
        out.push_str(&format!("   Requests: {}\n", self.format_requests(&report.stats)));
        out.push_str(&format!("   Latency: {}\n", self.format_latency(&report.stats)));
        out
    }

    fn colorize_pass_rate(&self, rate: &PassRate) -> String {
        let head = format!("{}/{}", rate.passed, rate.total);
        let pct = match rate.percent() {
            Some(p) if p >= 100.0 => format!("({:.1}%)", p).green().to_string(),
            Some(p) if p >= 80.0 => format!("({:.1}%)", p).yellow().to_string(),
            Some(p) => format!("({:.1}%)", p).red().to_string(),
            None => "(n/a)".dimmed().to_string(),
        };
        match rate.source {
            PassRateSource::Runner => format!("{} {}", head, pct),
            PassRateSource::Assertions => {
                format!("{} {} {}", head, pct, "(from assertions)".dimmed())
            }
        }
    }

    fn format_requests(&self, stats: &SummaryStats) -> String {
        let client = stats.client_errors.to_string();
        let server = stats.server_errors.to_string();
        format!(
            "{} ok, {} 4xx, {} 5xx",
            stats.success.to_string().green(),
            if stats.client_errors > 0 { client.yellow() } else { client.normal() },
            if stats.server_errors > 0 { server.red() } else { server.normal() },
        )
    }

    fn format_latency(&self, stats: &SummaryStats) -> String {
        format!(
            "avg {:.1} ms | P90 {} ms | P95 {} ms",
            stats.avg_time_ms, stats.p90_ms, stats.p95_ms
        )
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

//! pmreport: offline HTML reports for Postman test runs
//!
//! Reads the JSON produced by a Postman-style collection run, fills in missing
//! HTTP methods from the collection definition, and writes a single
//! self-contained HTML page that renders summary cards, a filterable results
//! table and per-request detail panels entirely in the browser.

pub mod config;
pub mod enrich;
pub mod error;
pub mod naming;
pub mod output;
pub mod reporter;
pub mod run;
pub mod stats;

pub use config::EffectiveConfig;
pub use error::{ReportError, Result};
pub use naming::ReportNames;
pub use run::TestRun;
pub use stats::{PassRate, SummaryStats};

use reporter::HtmlReporter;
use std::path::{Path, PathBuf};

/// A rendered page that has not been written anywhere yet
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub names: ReportNames,
    pub html: String,
    /// Results annotated with `_method`; `None` when enrichment was skipped
    pub methods_enriched: Option<usize>,
}

/// Outcome of a successful generation run
#[derive(Debug, Clone)]
pub struct GeneratedReport {
    /// Where the HTML file was written
    pub path: PathBuf,
    pub title: String,
    pub stats: SummaryStats,
    pub pass_rate: PassRate,
    pub methods_enriched: Option<usize>,
}

/// Enrich the run in place and render the page. No file I/O.
pub fn render_report(run: &mut TestRun, config: &EffectiveConfig) -> Result<RenderedReport> {
    let methods_enriched = enrich::enrich_methods(run);
    let names = ReportNames::derive(run);
    let html = HtmlReporter::from_config(config).report(run, &names.title)?;
    Ok(RenderedReport {
        names,
        html,
        methods_enriched,
    })
}

/// Full pipeline: read `input`, render, and write the report into the
/// configured output directory.
pub fn generate(input: &Path, config: &EffectiveConfig) -> Result<GeneratedReport> {
    let mut run = TestRun::load(input)?;
    let rendered = render_report(&mut run, config)?;

    let dir = config
        .output_dir
        .clone()
        .unwrap_or_else(output::default_output_dir);
    let path = dir.join(&rendered.names.file_name);
    output::write_atomic(&path, &rendered.html)?;

    let stats = SummaryStats::from_run(&run);
    let pass_rate = PassRate::for_run(&run, &stats);
    Ok(GeneratedReport {
        path,
        title: rendered.names.title,
        stats,
        pass_rate,
        methods_enriched: rendered.methods_enriched,
    })
}

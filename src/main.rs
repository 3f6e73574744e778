//! pmreport: Postman test-run HTML report CLI

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use pmreport::config::{is_valid_locale, load_config, CliOverrides};
use pmreport::reporter::{ConsoleReporter, JsonReporter};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Generate an offline HTML report from a Postman test run JSON file
#[derive(Parser, Debug)]
#[command(name = "pmreport")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the Postman test run JSON file
    json_file: PathBuf,

    /// Directory to write the report to (default: parent of the executable's directory)
    #[arg(long, short)]
    output_dir: Option<PathBuf>,

    /// Path to config file (default: search .pmreportrc.json next to the input and in parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Initial slow threshold in milliseconds for the viewer
    #[arg(long, value_name = "MS")]
    slow_threshold: Option<u32>,

    /// Document language and name-sorting locale (e.g. zh-Hant, en)
    #[arg(long, value_name = "TAG", value_parser = parse_locale)]
    locale: Option<String>,

    /// Print the summary as JSON
    #[arg(long, short)]
    json: bool,

    /// Quiet mode (print only the report path)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output
    #[arg(long, short)]
    verbose: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

fn parse_locale(s: &str) -> Result<String, String> {
    if is_valid_locale(s) {
        Ok(s.to_string())
    } else {
        Err(format!("invalid locale tag: {s}"))
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    if args.no_color {
        colored::control::set_override(false);
    }

    // Resolve work directory for config search
    let work_dir = match args.json_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let (config, config_path) = load_config(work_dir, args.config.as_deref())?;
    if args.verbose {
        if let Some(ref path) = config_path {
            eprintln!("{}: config loaded from {}", "Info".blue(), path.display());
        }
    }

    let effective = config.merge_with_cli(CliOverrides {
        output_dir: args.output_dir.clone(),
        slow_threshold: args.slow_threshold,
        locale: args.locale.clone(),
    });

    let report = pmreport::generate(&args.json_file, &effective)?;

    if args.verbose {
        match report.methods_enriched {
            Some(n) => eprintln!("{}: filled in method for {} result(s)", "Info".blue(), n),
            None => eprintln!(
                "{}: method enrichment skipped (unexpected document shape)",
                "Info".blue()
            ),
        }
    }

    if args.json {
        println!("{}", JsonReporter::new().pretty().report(&report));
    } else if args.quiet {
        ConsoleReporter::new().quiet().report(&report);
    } else {
        ConsoleReporter::new().report(&report);
    }

    Ok(ExitCode::SUCCESS)
}

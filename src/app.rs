//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the cleaning/analysis pipeline
//! - prints reports/charts
//! - writes optional exports and the debug bundle

use clap::Parser;

use crate::cli::{AnalyzeArgs, Command, DemoArgs};
use crate::domain::AnalysisConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `phof` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `phof` (and `phof --seed 7`) to behave like `phof demo`,
    // so the tool does something useful before any dataset is downloaded.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Clean(args) => handle_clean(args),
        Command::Demo(args) => handle_demo(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = args.to_config();
    let run = pipeline::run_analysis(&config)?;
    print_run(&run, &config)
}

fn handle_demo(args: DemoArgs) -> Result<(), AppError> {
    let config = args.to_config();
    let run = pipeline::run_demo(args.seed, &config)?;
    print_run(&run, &config)
}

fn handle_clean(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = args.to_config();
    let clean_run = pipeline::run_clean(&config)?;

    println!(
        "{}",
        crate::report::format_clean_summary(
            config.disease.display_name(),
            clean_run.rows_read,
            &clean_run.report,
            &clean_run.row_errors,
        )
    );

    if let Some(path) = &config.export_cleaned {
        crate::io::export::write_cleaned_csv(path, &clean_run.records)?;
        println!("Cleaned records written to {}", path.display());
    }
    if let Some(path) = &config.export_report {
        crate::io::export::write_report_json(path, &clean_run.report)?;
        println!("Cleaning report written to {}", path.display());
    }
    Ok(())
}

/// Print the analysis report (and charts), then write optional artifacts.
fn print_run(run: &pipeline::RunOutput, config: &AnalysisConfig) -> Result<(), AppError> {
    println!(
        "{}",
        crate::report::format_analysis_report(&run.report, &run.clean.row_errors)
    );

    if config.charts {
        print_charts(run, config);
    }

    if let Some(path) = &config.export_cleaned {
        crate::io::export::write_cleaned_csv(path, &run.clean.records)?;
        println!("Cleaned records written to {}", path.display());
    }
    if let Some(path) = &config.export_report {
        crate::io::export::write_report_json(path, &run.report)?;
        println!("Analysis report written to {}", path.display());
    }
    if config.debug_bundle {
        let path = crate::debug::write_debug_bundle(&run.report, &run.clean.row_errors, &run.pairs)?;
        println!("Debug bundle written to {}", path.display());
    }
    Ok(())
}

fn print_charts(run: &pipeline::RunOutput, config: &AnalysisConfig) {
    let report = &run.report;
    let w = config.chart_width;
    let h = config.chart_height;

    println!("{}", crate::plot::region_overview_chart(&report.region_totals, w, h));
    println!("{}", crate::plot::region_bar_chart(&report.region_totals, w));
    println!("{}", crate::plot::sex_bar_chart(&report.sex_totals, w));
    println!("{}", crate::plot::sex_region_chart(&report.sex_region_totals, w));
    println!("{}", crate::plot::region_year_chart(&report.region_year_totals, w, h));
    if let Some(plot) = &run.probplot {
        println!("{}", crate::plot::probplot_chart(plot, w, h));
    }
    if let Some(hist) = &report.histogram {
        println!("{}", crate::plot::difference_histogram(hist, w));
    }
}

/// Rewrite argv so `phof` defaults to `phof demo`.
///
/// Rules:
/// - `phof`                     -> `phof demo`
/// - `phof --seed 7 ...`        -> `phof demo --seed 7 ...`
/// - `phof --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("demo".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "clean" | "demo");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "demo flags".
    if arg1.starts_with('-') {
        argv.insert(1, "demo".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

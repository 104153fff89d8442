//! Command-line parsing for the mortality analysis tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the cleaning/statistics code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::{AnalysisConfig, DEFAULT_LOOKUP_SHEET, Disease};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "phof",
    version,
    about = "Regional preventable-mortality analysis (PHOF datasets)"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Clean a dataset, compare rates by gender, and chart the results.
    Analyze(AnalyzeArgs),
    /// Clean a dataset and print the cleaning summary only (useful for
    /// checking a download before analysis).
    Clean(AnalyzeArgs),
    /// Run the full analysis on seeded synthetic data, no input files needed.
    Demo(DemoArgs),
}

/// Common options for commands that read the published files.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Which mortality dataset to analyze.
    #[arg(short = 'd', long, value_enum, default_value_t = Disease::Suicide)]
    pub disease: Disease,

    /// Directory holding the dataset CSVs and the region lookup workbook.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Dataset CSV path, overriding the published name under --data-dir.
    #[arg(long, value_name = "CSV")]
    pub data_file: Option<PathBuf>,

    /// Region lookup path (.xls/.xlsx or a CSV export of the sheet).
    #[arg(long, value_name = "FILE")]
    pub lookup_file: Option<PathBuf>,

    /// Worksheet holding the LA-to-region table.
    #[arg(long, default_value = DEFAULT_LOOKUP_SHEET)]
    pub lookup_sheet: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Options for the file-free demo run.
#[derive(Debug, Parser, Clone)]
pub struct DemoArgs {
    /// Dataset the synthetic rows imitate.
    #[arg(short = 'd', long, value_enum, default_value_t = Disease::Suicide)]
    pub disease: Disease,

    /// Random seed for demo data generation.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[command(flatten)]
    pub output: OutputArgs,
}

/// Output options shared by every command.
#[derive(Debug, Parser, Clone)]
pub struct OutputArgs {
    /// Render ASCII charts in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub charts: bool,

    /// Disable the terminal charts.
    #[arg(long)]
    pub no_charts: bool,

    /// Chart width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Chart height (rows).
    #[arg(long, default_value_t = 20)]
    pub height: usize,

    /// Number of histogram bins for the difference series.
    #[arg(long, default_value_t = 10)]
    pub bins: usize,

    /// Export the cleaned records to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the full analysis report to JSON.
    #[arg(long = "export-report", value_name = "JSON")]
    pub export_report: Option<PathBuf>,

    /// Write a timestamped markdown debug bundle under debug/.
    #[arg(long)]
    pub debug: bool,
}

impl AnalyzeArgs {
    pub fn to_config(&self) -> AnalysisConfig {
        self.output.to_config(
            self.disease,
            self.data_dir.clone(),
            self.data_file.clone(),
            self.lookup_file.clone(),
            self.lookup_sheet.clone(),
        )
    }
}

impl DemoArgs {
    pub fn to_config(&self) -> AnalysisConfig {
        // Demo runs never touch the filesystem for input; the path fields
        // keep their defaults.
        self.output.to_config(
            self.disease,
            PathBuf::from("data"),
            None,
            None,
            DEFAULT_LOOKUP_SHEET.to_string(),
        )
    }
}

impl OutputArgs {
    fn to_config(
        &self,
        disease: Disease,
        data_dir: PathBuf,
        data_file: Option<PathBuf>,
        lookup_file: Option<PathBuf>,
        lookup_sheet: String,
    ) -> AnalysisConfig {
        AnalysisConfig {
            disease,
            data_dir,
            data_file,
            lookup_file,
            lookup_sheet,
            charts: self.charts && !self.no_charts,
            chart_width: self.width,
            chart_height: self.height,
            hist_bins: self.bins,
            export_cleaned: self.export.clone(),
            export_report: self.export_report.clone(),
            debug_bundle: self.debug,
        }
    }
}

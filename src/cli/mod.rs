//! Command-line parsing for the food security dashboard.
//!
//! The goal of this module is to keep **argument parsing** separate from the
//! pipeline and rendering code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::io::ExportFormat;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fsd", version, about = "Food Security Dashboard (FAO suite of indicators)")]
pub struct Cli {
    #[command(flatten)]
    pub source: SourceArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Where data comes from and how it is filtered. Overrides the environment.
#[derive(Debug, Args, Clone, Default)]
pub struct SourceArgs {
    /// Dataset host prefix (overrides FOODSEC_BASE_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub base_url: Option<String>,

    /// Analyse every indicator in the files instead of the 13-item allow-list.
    #[arg(long, global = true)]
    pub all_items: bool,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the supported countries.
    Countries,
    /// List available items and dates for one country, or across all countries.
    Catalog(CatalogArgs),
    /// Time series of one indicator for one country.
    Series(SeriesArgs),
    /// Compare one indicator between two countries at a date.
    Compare(CompareArgs),
    /// Every indicator for one country at a date.
    Overview(OverviewArgs),
    /// One indicator at a date across all countries, with the global average.
    Global(GlobalArgs),
    /// Write a country's normalized observations to a file.
    Export(ExportArgs),
    /// Launch the interactive TUI.
    Tui,
}

#[derive(Debug, Args, Clone)]
pub struct CatalogArgs {
    /// Country code, ISO code, or name. Omit for the union over all countries.
    #[arg(short = 'c', long)]
    pub country: Option<String>,
}

#[derive(Debug, Args, Clone)]
pub struct SeriesArgs {
    /// Country code, ISO code, or name.
    #[arg(short = 'c', long)]
    pub country: String,

    /// Indicator name (exact, or a unique case-insensitive fragment).
    #[arg(short = 'i', long)]
    pub item: String,
}

#[derive(Debug, Args, Clone)]
pub struct CompareArgs {
    /// First country.
    #[arg(short = 'a', long = "country-a")]
    pub country_a: String,

    /// Second country.
    #[arg(short = 'b', long = "country-b")]
    pub country_b: String,

    /// Indicator name (exact, or a unique case-insensitive fragment).
    #[arg(short = 'i', long)]
    pub item: String,

    /// Date (YYYY-MM-DD). Defaults to the latest date of the first country.
    #[arg(short = 'd', long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args, Clone)]
pub struct OverviewArgs {
    /// Country code, ISO code, or name.
    #[arg(short = 'c', long)]
    pub country: String,

    /// Date (YYYY-MM-DD). Defaults to the latest available date.
    #[arg(short = 'd', long)]
    pub date: Option<NaiveDate>,

    /// Also show each indicator's cross-country average (fetches every country).
    #[arg(long)]
    pub vs_global: bool,
}

#[derive(Debug, Args, Clone)]
pub struct GlobalArgs {
    /// Indicator name (exact, or a unique case-insensitive fragment).
    #[arg(short = 'i', long)]
    pub item: String,

    /// Date (YYYY-MM-DD). Defaults to the latest date any country reports.
    #[arg(short = 'd', long)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Args, Clone)]
pub struct ExportArgs {
    /// Country code, ISO code, or name.
    #[arg(short = 'c', long)]
    pub country: String,

    /// Output file.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub out: PathBuf,

    #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
    pub format: ExportFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::parse_from([
            "fsd",
            "compare",
            "-a",
            "afg",
            "-b",
            "bra",
            "-i",
            "protein",
            "--date",
            "2010-01-01",
            "--all-items",
        ]);
        assert!(cli.source.all_items);
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.date, NaiveDate::from_ymd_opt(2010, 1, 1));
        assert_eq!(args.country_b, "bra");
    }

    #[test]
    fn export_defaults_to_csv() {
        let cli = Cli::parse_from(["fsd", "export", "-c", "ken", "-o", "ken.csv"]);
        let Command::Export(args) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.format, ExportFormat::Csv);
    }
}

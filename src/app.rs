//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and resolves settings
//! - resolves user-facing country/item/date arguments
//! - runs the dashboard queries
//! - prints reports or launches the TUI

use chrono::NaiveDate;
use clap::Parser;

use crate::analysis::resolve_item;
use crate::cli::{
    CatalogArgs, Cli, Command, CompareArgs, ExportArgs, GlobalArgs, OverviewArgs, SeriesArgs, SourceArgs,
};
use crate::config::Settings;
use crate::domain::{CountryInfo, YearWindow, countries};
use crate::error::AppError;

pub mod pipeline;
pub mod views;

pub use pipeline::Dashboard;

/// Entry point for the `fsd` binary.
pub fn run() -> Result<(), AppError> {
    // `fsd` with no subcommand opens the TUI. Clap requires a subcommand name,
    // so the argv list is rewritten before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);
    let settings = settings_from_args(Settings::from_env(), &cli.source);

    if matches!(cli.command, Command::Tui) {
        return crate::tui::run(settings);
    }

    crate::logging::init_stderr();
    let dashboard = Dashboard::from_settings(&settings);

    match cli.command {
        Command::Countries => {
            print!("{}", crate::report::format_countries(dashboard.countries(), &settings.flag_base_url));
            Ok(())
        }
        Command::Catalog(args) => handle_catalog(&dashboard, args),
        Command::Series(args) => handle_series(&dashboard, args),
        Command::Compare(args) => handle_compare(&dashboard, args),
        Command::Overview(args) => handle_overview(&dashboard, args),
        Command::Global(args) => handle_global(&dashboard, args),
        Command::Export(args) => handle_export(&dashboard, args),
        Command::Tui => Ok(()),
    }
}

/// Apply CLI overrides on top of environment settings.
pub fn settings_from_args(mut settings: Settings, args: &SourceArgs) -> Settings {
    if let Some(url) = &args.base_url {
        settings.base_url = url.clone();
    }
    if args.all_items {
        settings.restrict_items = false;
    }
    settings
}

fn handle_catalog(dashboard: &Dashboard, args: CatalogArgs) -> Result<(), AppError> {
    let country = args.country.as_deref().map(resolve_country).transpose()?;
    let catalog = dashboard.catalog(country)?;
    let scope = country.map_or_else(|| "all countries".to_string(), CountryInfo::label);
    print!("{}", crate::report::format_catalog(&catalog, &scope));
    Ok(())
}

fn handle_series(dashboard: &Dashboard, args: SeriesArgs) -> Result<(), AppError> {
    let country = resolve_country(&args.country)?;
    let catalog = dashboard.catalog(Some(country))?;
    let item = pick_item(&args.item, &catalog.items)?;

    let view = dashboard.time_series(country, item)?;
    if view.points.is_empty() {
        return Err(AppError::no_data(format!(
            "No observations of '{item}' for {} within {}-{}.",
            country.display_name,
            dashboard.window().first,
            dashboard.window().last
        )));
    }
    print!("{}", crate::report::format_time_series(&view));
    Ok(())
}

fn handle_compare(dashboard: &Dashboard, args: CompareArgs) -> Result<(), AppError> {
    let left = resolve_country(&args.country_a)?;
    let right = resolve_country(&args.country_b)?;
    let catalog = dashboard.catalog(Some(left))?;
    let item = pick_item(&args.item, &catalog.items)?;
    let date = pick_date(args.date, &catalog.dates, dashboard.window())?;

    let view = dashboard.comparison(left, right, item, date)?;
    print!("{}", crate::report::format_comparison(&view));
    Ok(())
}

fn handle_overview(dashboard: &Dashboard, args: OverviewArgs) -> Result<(), AppError> {
    let country = resolve_country(&args.country)?;
    let catalog = dashboard.catalog(Some(country))?;
    let date = pick_date(args.date, &catalog.dates, dashboard.window())?;

    let view = dashboard.overview(country, date, args.vs_global)?;
    print!("{}", crate::report::format_overview(&view));
    if view.rows.is_empty() {
        return Err(AppError::no_data("No data available for the selected date."));
    }
    Ok(())
}

fn handle_global(dashboard: &Dashboard, args: GlobalArgs) -> Result<(), AppError> {
    let catalog = dashboard.catalog(None)?;
    if catalog.items.is_empty() {
        return Err(AppError::new(4, "No country dataset could be loaded."));
    }
    let item = pick_item(&args.item, &catalog.items)?;
    let date = pick_date(args.date, &catalog.dates, dashboard.window())?;

    let view = dashboard.global_view(item, date);
    print!("{}", crate::report::format_global(&view));
    Ok(())
}

fn handle_export(dashboard: &Dashboard, args: ExportArgs) -> Result<(), AppError> {
    let country = resolve_country(&args.country)?;
    let observations = dashboard.observations(country)?;
    crate::io::write_observations(&args.out, &observations, args.format)?;
    println!(
        "Wrote {} observations for {} to {}",
        observations.len(),
        country.display_name,
        args.out.display()
    );
    Ok(())
}

pub fn resolve_country(query: &str) -> Result<&'static CountryInfo, AppError> {
    countries::find(query).ok_or_else(|| {
        let codes: Vec<&str> = countries::COUNTRIES.iter().map(|c| c.code.as_str()).collect();
        AppError::usage(format!("Unknown country '{query}'. Known codes: {}", codes.join(", ")))
    })
}

fn pick_item<'a>(query: &str, items: &'a [String]) -> Result<&'a str, AppError> {
    resolve_item(query, items).map_err(|matches| {
        if matches.is_empty() {
            AppError::usage(format!("Unknown item '{query}'. Run `fsd catalog` to list items."))
        } else {
            AppError::usage(format!(
                "Item '{query}' is ambiguous; it matches:\n  - {}",
                matches.join("\n  - ")
            ))
        }
    })
}

/// Use the explicit date, or the latest available one.
fn pick_date(explicit: Option<NaiveDate>, available: &[NaiveDate], window: YearWindow) -> Result<NaiveDate, AppError> {
    match explicit {
        Some(date) if window.contains(date) => Ok(date),
        Some(date) => Err(AppError::usage(format!(
            "Date {date} is outside the {}-{} analysis window.",
            window.first, window.last
        ))),
        None => available
            .last()
            .copied()
            .ok_or_else(|| AppError::no_data("No dates available within the analysis window.")),
    }
}

/// Rewrite argv so `fsd` defaults to `fsd tui`.
///
/// Rules:
/// - `fsd`                       -> `fsd tui`
/// - `fsd --all-items`           -> `fsd tui --all-items`
/// - `fsd --help/--version/-h`   -> unchanged (show top-level help/version)
/// - any argv naming a subcommand is left as-is
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    const SUBCOMMANDS: [&str; 9] = [
        "countries", "catalog", "series", "compare", "overview", "global", "export", "tui", "help",
    ];

    let rest = argv.get(1..).unwrap_or_default();
    let wants_help_or_version = rest
        .iter()
        .any(|a| matches!(a.as_str(), "-h" | "--help" | "-V" | "--version"));
    let names_subcommand = rest.iter().any(|a| SUBCOMMANDS.contains(&a.as_str()));

    if !wants_help_or_version && !names_subcommand {
        argv.insert(1.min(argv.len()), "tui".to_string());
    }
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_opens_tui() {
        assert_eq!(rewrite_args(argv(&["fsd"])), argv(&["fsd", "tui"]));
        assert_eq!(
            rewrite_args(argv(&["fsd", "--all-items"])),
            argv(&["fsd", "tui", "--all-items"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        let cmd = argv(&["fsd", "--all-items", "series", "-c", "afg", "-i", "x"]);
        assert_eq!(rewrite_args(cmd.clone()), cmd);
        assert_eq!(rewrite_args(argv(&["fsd", "--help"])), argv(&["fsd", "--help"]));
    }

    #[test]
    fn cli_flags_override_settings() {
        let args = SourceArgs {
            base_url: Some("http://mirror".to_string()),
            all_items: true,
        };
        let s = settings_from_args(Settings::default(), &args);
        assert_eq!(s.base_url, "http://mirror");
        assert!(!s.restrict_items);
    }

    #[test]
    fn pick_date_defaults_to_latest_and_checks_window() {
        let d = |y| NaiveDate::from_ymd_opt(y, 1, 1).unwrap();
        let available = [d(2001), d(2015)];
        assert_eq!(pick_date(None, &available, YearWindow::DEFAULT).unwrap(), d(2015));
        assert_eq!(pick_date(Some(d(2003)), &available, YearWindow::DEFAULT).unwrap(), d(2003));
        assert_eq!(pick_date(Some(d(2022)), &available, YearWindow::DEFAULT).unwrap_err().exit_code(), 2);
        assert_eq!(pick_date(None, &[], YearWindow::DEFAULT).unwrap_err().exit_code(), 3);
    }

    #[test]
    fn unknown_country_is_a_usage_error() {
        assert_eq!(resolve_country("xx").unwrap_err().exit_code(), 2);
        assert_eq!(resolve_country("Ghana").unwrap().code.as_str(), "gha");
    }
}

//! Plain-text rendering of the view models for CLI output.

use crate::analysis::fmt_pct;
use crate::app::views::{Catalog, ComparisonView, GlobalCell, GlobalView, OverviewView, TimeSeriesView};
use crate::domain::CountryInfo;

/// Two decimals with thousands separators: `1234567.891` -> `1,234,567.89`.
pub fn fmt_number(v: f64) -> String {
    let fixed = format!("{:.2}", v.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    // `-0.00` reads as noise; only sign values that survive rounding.
    let sign = if v < 0.0 && fixed.bytes().any(|b| b.is_ascii_digit() && b != b'0') { "-" } else { "" };
    format!("{sign}{grouped}.{frac_part}")
}

pub fn format_countries(countries: &[&CountryInfo], flag_base_url: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<5} {:<4} {:<16} {:<6} {:<5} {}\n", "code", "flag", "name", "iso3", "iso2", "flag_url"));
    out.push_str(&format!("{:-<5} {:-<4} {:-<16} {:-<6} {:-<5} {:-<8}\n", "", "", "", "", "", ""));
    for c in countries {
        out.push_str(&format!(
            "{:<5} {:<4} {:<16} {:<6} {:<5} {}\n",
            c.code.as_str(),
            c.flag_glyph,
            c.display_name,
            c.iso_alpha3,
            c.iso_alpha2,
            c.flag_url(flag_base_url)
        ));
    }
    out
}

pub fn format_catalog(catalog: &Catalog, scope: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Catalog: {scope} ===\n"));

    out.push_str(&format!("\nItems ({}):\n", catalog.items.len()));
    for item in &catalog.items {
        out.push_str(&format!("  - {item}\n"));
    }

    out.push_str(&format!("\nDates ({}):\n", catalog.dates.len()));
    for chunk in catalog.dates.chunks(6) {
        let line: Vec<String> = chunk.iter().map(|d| d.to_string()).collect();
        out.push_str(&format!("  {}\n", line.join("  ")));
    }

    for (country, err) in &catalog.failures {
        out.push_str(&format!("  (skipped {}) {err}\n", country.display_name));
    }
    out
}

pub fn format_time_series(view: &TimeSeriesView) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Time Series: {} ===\n", view.item));
    out.push_str(&format!("Country: {}\n", view.country.label()));
    out.push_str(&format!("Points: {}\n\n", view.points.len()));

    out.push_str(&format!("{:<12} {:>16}\n", "date", "value"));
    out.push_str(&format!("{:-<12} {:-<16}\n", "", ""));
    for p in &view.points {
        out.push_str(&format!("{:<12} {:>16}\n", p.date.to_string(), truncate(&p.display_value(), 16)));
    }

    out.push_str(&format!("\nChange (first -> last): {}\n", fmt_pct(view.change_pct)));
    out
}

pub fn format_comparison(view: &ComparisonView) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Comparison of {} on {} ===\n", view.item, view.date));
    for reading in [&view.left, &view.right] {
        out.push_str(&format!(
            "{:<24} {:>18}\n",
            truncate(&reading.country.label(), 24),
            reading.display_value()
        ));
    }
    out.push_str(&format!(
        "\n{} vs {}: {}\n",
        view.right.country.display_name,
        view.left.country.display_name,
        fmt_pct(view.difference_pct)
    ));
    out
}

pub fn format_overview(view: &OverviewView) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Country Overview: {} on {} ===\n", view.country.label(), view.date));

    if view.rows.is_empty() {
        out.push_str("No data available for the selected date.\n");
        return out;
    }

    if view.with_global {
        out.push_str(&format!("{:<60} {:>14} {:>14} {:>10}\n", "item", "value", "global avg", "vs avg"));
        out.push_str(&format!("{:-<60} {:-<14} {:-<14} {:-<10}\n", "", "", "", ""));
        for row in &view.rows {
            out.push_str(&format!(
                "{:<60} {:>14} {:>14} {:>10}\n",
                truncate(&row.observation.item, 60),
                truncate(&row.observation.display_value(), 14),
                row.global_average.map(fmt_number).unwrap_or_else(|| "-".to_string()),
                row.vs_global_pct.map(fmt_pct).unwrap_or_else(|| "-".to_string()),
            ));
        }
    } else {
        out.push_str(&format!("{:<60} {:>14}\n", "item", "value"));
        out.push_str(&format!("{:-<60} {:-<14}\n", "", ""));
        for row in &view.rows {
            out.push_str(&format!(
                "{:<60} {:>14}\n",
                truncate(&row.observation.item, 60),
                truncate(&row.observation.display_value(), 14),
            ));
        }
    }
    out
}

pub fn format_global(view: &GlobalView) -> String {
    let mut out = String::new();
    out.push_str(&format!("=== Global Analysis for {} on {} ===\n", view.item, view.date));
    out.push_str(&format!(
        "Global average: {} ({} reporting)\n\n",
        view.average.map(fmt_number).unwrap_or_else(|| "N/A".to_string()),
        view.reporting_countries()
    ));

    out.push_str(&format!("{:<24} {:>18} {:>10}\n", "country", "value", "vs avg"));
    out.push_str(&format!("{:-<24} {:-<18} {:-<10}\n", "", "", ""));
    for row in &view.rows {
        let (value, delta) = match &row.cell {
            GlobalCell::Reported {
                observation,
                vs_average_pct,
            } => (observation.display_value(), fmt_pct(*vs_average_pct)),
            GlobalCell::NoData => ("No data available".to_string(), "-".to_string()),
            GlobalCell::Failed(_) => ("fetch failed".to_string(), "-".to_string()),
        };
        out.push_str(&format!(
            "{:<24} {:>18} {:>10}\n",
            truncate(&row.country.label(), 24),
            truncate(&value, 18),
            delta
        ));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::app::views::{CountryReading, GlobalRow, OverviewRow};
    use crate::domain::{Observation, Value, countries};
    use crate::error::DivisionUndefined;

    fn obs(code: &str, item: &str, value: Value, raw: &str) -> Observation {
        Observation {
            country: countries::find(code).unwrap().code,
            item: item.to_string(),
            date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            value,
            raw_value: raw.to_string(),
        }
    }

    #[test]
    fn numbers_get_thousands_separators() {
        assert_eq!(fmt_number(0.0), "0.00");
        assert_eq!(fmt_number(42.5), "42.50");
        assert_eq!(fmt_number(1234.0), "1,234.00");
        assert_eq!(fmt_number(1234567.891), "1,234,567.89");
        assert_eq!(fmt_number(-9876.5), "-9,876.50");
        assert_eq!(fmt_number(-0.001), "0.00");
    }

    #[test]
    fn truncate_marks_cut_text() {
        assert_eq!(truncate("abcdef", 10), "abcdef");
        assert_eq!(truncate("abcdef", 4), "abc.");
    }

    #[test]
    fn comparison_renders_na_for_undefined_difference() {
        let view = ComparisonView {
            item: "X".to_string(),
            date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            left: CountryReading {
                country: countries::find("afg").unwrap(),
                observation: Some(obs("afg", "X", Value::Present(0.0), "0")),
            },
            right: CountryReading {
                country: countries::find("bra").unwrap(),
                observation: None,
            },
            difference_pct: Err(DivisionUndefined::ZeroDenominator),
        };
        let text = format_comparison(&view);
        assert!(text.contains("No data available"));
        assert!(text.contains("Brazil vs Afghanistan: N/A"));
    }

    #[test]
    fn overview_shows_raw_text_for_non_numeric_values() {
        let view = OverviewView {
            country: countries::find("yem").unwrap(),
            date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            rows: vec![OverviewRow {
                observation: obs("yem", "X", Value::Missing, "n.r."),
                global_average: None,
                vs_global_pct: None,
            }],
            with_global: false,
        };
        assert!(format_overview(&view).contains("n.r."));
    }

    #[test]
    fn global_table_lists_every_country_state() {
        let view = GlobalView {
            item: "X".to_string(),
            date: NaiveDate::from_ymd_opt(2010, 1, 1).unwrap(),
            average: Some(15.0),
            rows: vec![
                GlobalRow {
                    country: countries::find("afg").unwrap(),
                    cell: GlobalCell::Reported {
                        observation: obs("afg", "X", Value::Present(10.0), "10"),
                        vs_average_pct: Ok(-100.0 / 3.0),
                    },
                },
                GlobalRow {
                    country: countries::find("bra").unwrap(),
                    cell: GlobalCell::NoData,
                },
            ],
        };
        let text = format_global(&view);
        assert!(text.contains("Global average: 15.00 (1 reporting)"));
        assert!(text.contains("-33.33%"));
        assert!(text.contains("No data available"));
    }
}

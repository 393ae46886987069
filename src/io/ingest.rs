//! Table normalization.
//!
//! This module is responsible for turning a raw per-country CSV into a clean
//! sequence of `Observation`s that the views can index by date.
//!
//! Rules:
//! - **Strict schema** for required columns (`item`, `startdate`, `value`)
//! - **Row-level recovery**: bad dates drop the row, bad values are kept as
//!   `Value::Missing`
//! - **Deterministic**: output order is input order

use std::collections::HashMap;

use crate::domain::{AllowList, CountryCode, Observation};
use crate::error::SchemaError;
use crate::io::parse::{parse_date, parse_value};
use crate::io::raw::RawTable;

pub const ITEM_COLUMN: &str = "item";
pub const DATE_COLUMN: &str = "startdate";
pub const VALUE_COLUMN: &str = "value";

/// Normalizer output plus counts of what happened to each input row.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub observations: Vec<Observation>,
    pub rows_read: usize,
    pub dropped_bad_date: usize,
    pub dropped_not_allowed: usize,
}

impl NormalizedTable {
    pub fn rows_used(&self) -> usize {
        self.observations.len()
    }
}

/// Normalize `table` into observations for `country`.
pub fn normalize(
    table: &RawTable,
    country: CountryCode,
    allowed: Option<&AllowList>,
) -> Result<Vec<Observation>, SchemaError> {
    normalize_detailed(table, country, allowed).map(|t| t.observations)
}

/// Like [`normalize`], also reporting row counts.
pub fn normalize_detailed(
    table: &RawTable,
    country: CountryCode,
    allowed: Option<&AllowList>,
) -> Result<NormalizedTable, SchemaError> {
    let header_map = build_header_map(&table.headers);

    let item_idx = require_column(&header_map, ITEM_COLUMN)?;
    let date_idx = require_column(&header_map, DATE_COLUMN)?;
    let value_idx = require_column(&header_map, VALUE_COLUMN)?;

    let mut out = NormalizedTable {
        observations: Vec::with_capacity(table.len()),
        rows_read: 0,
        dropped_bad_date: 0,
        dropped_not_allowed: 0,
    };

    for row in 0..table.len() {
        out.rows_read += 1;

        let Some(date) = parse_date(table.cell(row, date_idx)) else {
            out.dropped_bad_date += 1;
            continue;
        };

        let item = table.cell(row, item_idx).unwrap_or_default();
        if let Some(list) = allowed {
            if !list.contains(item) {
                out.dropped_not_allowed += 1;
                continue;
            }
        }

        let raw_value = table.cell(row, value_idx);
        out.observations.push(Observation {
            country,
            item: item.to_string(),
            date,
            value: parse_value(raw_value),
            raw_value: raw_value.unwrap_or_default().to_string(),
        });
    }

    tracing::debug!(
        country = %country,
        rows_read = out.rows_read,
        rows_used = out.rows_used(),
        dropped_bad_date = out.dropped_bad_date,
        dropped_not_allowed = out.dropped_not_allowed,
        "normalized dataset"
    );

    Ok(out)
}

fn build_header_map(headers: &[String]) -> HashMap<String, usize> {
    let mut map = HashMap::with_capacity(headers.len());
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins on duplicate names.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim_start_matches('\u{feff}').trim();
    name.to_lowercase()
}

fn require_column(header_map: &HashMap<String, usize>, column: &'static str) -> Result<usize, SchemaError> {
    header_map
        .get(column)
        .copied()
        .ok_or(SchemaError::MissingColumn { column })
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::Value;

    fn afg() -> CountryCode {
        CountryCode::new("afg").unwrap()
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn bad_dates_are_dropped_and_censored_values_parsed() {
        let table = RawTable::from_csv(
            "item,startdate,value\nA,2005-01-01,10\nA,2006-01-01,<20\nB,bad-date,5\n",
        )
        .unwrap();

        let obs = normalize(&table, afg(), None).unwrap();
        assert_eq!(obs.len(), 2);
        assert_eq!((obs[0].item.as_str(), obs[0].date, obs[0].value), ("A", ymd(2005, 1, 1), Value::Present(10.0)));
        assert_eq!((obs[1].item.as_str(), obs[1].date, obs[1].value), ("A", ymd(2006, 1, 1), Value::Present(20.0)));
        assert_eq!(obs[1].raw_value, "<20");
    }

    #[test]
    fn missing_values_are_retained() {
        let table = RawTable::from_csv("item,startdate,value\nA,2005-01-01,n.a.\nA,2006-01-01,\n").unwrap();
        let obs = normalize(&table, afg(), None).unwrap();
        assert_eq!(obs.len(), 2);
        assert!(obs.iter().all(|o| o.value.is_missing()));
        assert_eq!(obs[0].display_value(), "n.a.");
        assert_eq!(obs[1].display_value(), "n/a");
    }

    #[test]
    fn headers_are_case_and_whitespace_insensitive() {
        let table = RawTable::from_csv("\u{feff} Item ,STARTDATE,  Value\nA,2005-01-01,1\n").unwrap();
        let obs = normalize(&table, afg(), None).unwrap();
        assert_eq!(obs.len(), 1);
    }

    #[test]
    fn missing_required_column_is_a_schema_error() {
        let table = RawTable::from_csv("item,date,value\nA,2005-01-01,1\n").unwrap();
        assert_eq!(
            normalize(&table, afg(), None),
            Err(SchemaError::MissingColumn { column: "startdate" })
        );
    }

    #[test]
    fn allow_list_filters_by_exact_item() {
        let list = AllowList::new(["Keep me"]);
        let table = RawTable::from_csv(
            "item,startdate,value\nKeep me,2005-01-01,1\nkeep me,2005-01-01,2\nOther,2005-01-01,3\n",
        )
        .unwrap();

        let detailed = normalize_detailed(&table, afg(), Some(&list)).unwrap();
        assert_eq!(detailed.rows_read, 3);
        assert_eq!(detailed.dropped_not_allowed, 2);
        assert!(detailed.observations.iter().all(|o| list.contains(&o.item)));
    }

    #[test]
    fn normalization_is_deterministic_and_order_preserving() {
        let table = RawTable::from_csv(
            "item,startdate,value\nZ,2010-01-01,3\nA,2001-01-01,1\nM,2005-01-01,>2\n",
        )
        .unwrap();
        let first = normalize(&table, afg(), None).unwrap();
        let second = normalize(&table, afg(), None).unwrap();
        assert_eq!(first, second);
        let items: Vec<_> = first.iter().map(|o| o.item.as_str()).collect();
        assert_eq!(items, ["Z", "A", "M"]);
    }

    #[test]
    fn hxl_tag_row_is_dropped() {
        let table = RawTable::from_csv(
            "Item,StartDate,Value\n#indicator+name,#date+start,#indicator+value+num\nA,2005-01-01,1\n",
        )
        .unwrap();
        let detailed = normalize_detailed(&table, afg(), None).unwrap();
        assert_eq!(detailed.dropped_bad_date, 1);
        assert_eq!(detailed.rows_used(), 1);
    }
}

//! Lookups over one country's observations.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::domain::{Observation, Value, YearWindow};

/// Value of `item` at exactly `date`: the first matching row wins, and no
/// matching row reads as `Missing`.
pub fn value_at(observations: &[Observation], item: &str, date: NaiveDate) -> Value {
    find_at(observations, item, date).map_or(Value::Missing, |o| o.value)
}

/// The first row for `item` at `date`, if any.
pub fn find_at<'a>(observations: &'a [Observation], item: &str, date: NaiveDate) -> Option<&'a Observation> {
    observations.iter().find(|o| o.date == date && o.item == item)
}

/// Sorted distinct dates inside `window`.
pub fn available_dates(observations: &[Observation], window: YearWindow) -> Vec<NaiveDate> {
    observations
        .iter()
        .map(|o| o.date)
        .filter(|d| window.contains(*d))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Sorted distinct item names.
pub fn items(observations: &[Observation]) -> Vec<String> {
    observations
        .iter()
        .map(|o| o.item.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Rows for `item` inside `window`, sorted by date (stable for equal dates).
pub fn series(observations: &[Observation], item: &str, window: YearWindow) -> Vec<Observation> {
    let mut rows: Vec<Observation> = observations
        .iter()
        .filter(|o| o.item == item && window.contains(o.date))
        .cloned()
        .collect();
    rows.sort_by_key(|o| o.date);
    rows
}

/// All rows at exactly `date`, in input order.
pub fn rows_at(observations: &[Observation], date: NaiveDate) -> Vec<&Observation> {
    observations.iter().filter(|o| o.date == date).collect()
}

/// Resolve a user-supplied item name against `candidates`.
///
/// Exact match first, then a unique case-insensitive substring match.
pub fn resolve_item<'a>(query: &str, candidates: &'a [String]) -> Result<&'a str, Vec<&'a str>> {
    if let Some(exact) = candidates.iter().find(|c| c.as_str() == query) {
        return Ok(exact.as_str());
    }
    let needle = query.trim().to_lowercase();
    let matches: Vec<&str> = candidates
        .iter()
        .filter(|c| !needle.is_empty() && c.to_lowercase().contains(&needle))
        .map(String::as_str)
        .collect();
    if matches.len() == 1 { Ok(matches[0]) } else { Err(matches) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CountryCode;

    fn obs(item: &str, y: i32, value: Value) -> Observation {
        Observation {
            country: CountryCode::new("ken").unwrap(),
            item: item.to_string(),
            date: NaiveDate::from_ymd_opt(y, 1, 1).unwrap(),
            value,
            raw_value: String::new(),
        }
    }

    fn ymd(y: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, 1, 1).unwrap()
    }

    #[test]
    fn value_at_takes_first_match_or_missing() {
        let rows = vec![
            obs("A", 2005, Value::Present(1.0)),
            obs("A", 2005, Value::Present(2.0)),
        ];
        assert_eq!(value_at(&rows, "A", ymd(2005)), Value::Present(1.0));
        assert_eq!(value_at(&rows, "A", ymd(2006)), Value::Missing);
        assert_eq!(value_at(&rows, "B", ymd(2005)), Value::Missing);
    }

    #[test]
    fn dates_are_windowed_sorted_and_distinct() {
        let rows = vec![
            obs("A", 2010, Value::Missing),
            obs("B", 1999, Value::Missing),
            obs("A", 2001, Value::Missing),
            obs("B", 2010, Value::Missing),
            obs("A", 2021, Value::Missing),
        ];
        assert_eq!(available_dates(&rows, YearWindow::DEFAULT), vec![ymd(2001), ymd(2010)]);
        assert_eq!(items(&rows), vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn series_is_sorted_and_windowed() {
        let rows = vec![
            obs("A", 2010, Value::Present(3.0)),
            obs("A", 1995, Value::Present(1.0)),
            obs("A", 2002, Value::Present(2.0)),
            obs("B", 2003, Value::Present(9.0)),
        ];
        let s = series(&rows, "A", YearWindow::DEFAULT);
        let dates: Vec<_> = s.iter().map(|o| o.date).collect();
        assert_eq!(dates, vec![ymd(2002), ymd(2010)]);
    }

    #[test]
    fn resolve_item_prefers_exact_then_unique_substring() {
        let items = vec![
            "Prevalence of undernourishment (percent)".to_string(),
            "Number of people undernourished (million)".to_string(),
            "Average protein supply".to_string(),
        ];
        assert_eq!(resolve_item("Average protein supply", &items), Ok("Average protein supply"));
        assert_eq!(resolve_item("PROTEIN", &items), Ok("Average protein supply"));
        assert_eq!(resolve_item("undernourish", &items).unwrap_err().len(), 2);
        assert!(resolve_item("rainfall", &items).unwrap_err().is_empty());
    }
}

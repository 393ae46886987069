//! View models returned by the dashboard queries.
//!
//! Each struct carries everything a front-end needs to render one analysis
//! mode; none of them hold references into the fetch cache.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{CountryInfo, Observation, Value};
use crate::error::{DataError, DivisionUndefined};

/// One country's value for an `(item, date)` query.
#[derive(Debug, Clone)]
pub struct CountryReading {
    pub country: &'static CountryInfo,
    /// `None` when the dataset has no row for the item at the date.
    pub observation: Option<Observation>,
}

impl CountryReading {
    pub fn value(&self) -> Value {
        self.observation.as_ref().map_or(Value::Missing, |o| o.value)
    }

    pub fn display_value(&self) -> String {
        self.observation
            .as_ref()
            .map_or_else(|| "No data available".to_string(), Observation::display_value)
    }
}

/// Time Series mode: one indicator for one country across the year window.
#[derive(Debug, Clone)]
pub struct TimeSeriesView {
    pub country: &'static CountryInfo,
    pub item: String,
    /// Sorted by date, window-filtered; missing values included.
    pub points: Vec<Observation>,
    /// Change from the first to the last present value.
    pub change_pct: Result<f64, DivisionUndefined>,
}

impl TimeSeriesView {
    /// `(date, value)` pairs with a present value, for charting.
    pub fn numeric_points(&self) -> Vec<(NaiveDate, f64)> {
        self.points
            .iter()
            .filter_map(|o| o.value.as_f64().map(|v| (o.date, v)))
            .collect()
    }
}

/// Comparison mode: the same indicator for two countries at one date.
#[derive(Debug, Clone)]
pub struct ComparisonView {
    pub item: String,
    pub date: NaiveDate,
    pub left: CountryReading,
    pub right: CountryReading,
    /// `right` relative to `left`, in percent.
    pub difference_pct: Result<f64, DivisionUndefined>,
}

#[derive(Debug, Clone)]
pub struct OverviewRow {
    pub observation: Observation,
    /// Present only when the overview was asked to include global averages
    /// and at least one country reported the item.
    pub global_average: Option<f64>,
    pub vs_global_pct: Option<Result<f64, DivisionUndefined>>,
}

/// Country Overview mode: every indicator for one country at one date.
#[derive(Debug, Clone)]
pub struct OverviewView {
    pub country: &'static CountryInfo,
    pub date: NaiveDate,
    pub rows: Vec<OverviewRow>,
    pub with_global: bool,
}

/// Per-country cell of the Global mode table.
#[derive(Debug, Clone)]
pub enum GlobalCell {
    Reported {
        observation: Observation,
        vs_average_pct: Result<f64, DivisionUndefined>,
    },
    NoData,
    Failed(DataError),
}

#[derive(Debug, Clone)]
pub struct GlobalRow {
    pub country: &'static CountryInfo,
    pub cell: GlobalCell,
}

/// Global mode: one indicator at one date across every country.
#[derive(Debug, Clone)]
pub struct GlobalView {
    pub item: String,
    pub date: NaiveDate,
    /// Mean over countries with a present value; `None` when none reported.
    pub average: Option<f64>,
    pub rows: Vec<GlobalRow>,
}

impl GlobalView {
    pub fn reporting_countries(&self) -> usize {
        self.rows
            .iter()
            .filter(|r| matches!(&r.cell, GlobalCell::Reported { observation, .. } if !observation.value.is_missing()))
            .count()
    }
}

/// Item -> mean at one date, plus the countries that could not contribute.
#[derive(Debug, Clone)]
pub struct GlobalAverages {
    pub date: NaiveDate,
    pub by_item: BTreeMap<String, f64>,
    pub countries_used: usize,
    pub failures: Vec<(&'static CountryInfo, DataError)>,
}

/// Selector contents: items and in-window dates.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub items: Vec<String>,
    pub dates: Vec<NaiveDate>,
    pub failures: Vec<(&'static CountryInfo, DataError)>,
}

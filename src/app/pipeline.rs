//! Shared query pipeline used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch (cached) -> normalize -> filter/aggregate -> view model
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::analysis::{self, pct_change, relative_pct};
use crate::app::views::{
    Catalog, ComparisonView, CountryReading, GlobalAverages, GlobalCell, GlobalRow, GlobalView, OverviewRow,
    OverviewView, TimeSeriesView,
};
use crate::config::Settings;
use crate::data::{DatasetFetcher, HttpTransport, Transport};
use crate::domain::{AllowList, COUNTRIES, CountryInfo, Observation, Value, YearWindow};
use crate::error::DataError;
use crate::io::normalize_detailed;

type CountryResult = (&'static CountryInfo, Result<Vec<Observation>, DataError>);

/// Process-scoped query service: the fetch cache plus normalization settings.
pub struct Dashboard<T: Transport = HttpTransport> {
    fetcher: DatasetFetcher<T>,
    allow_list: Option<AllowList>,
    window: YearWindow,
    countries: Vec<&'static CountryInfo>,
}

impl Dashboard<HttpTransport> {
    pub fn from_settings(settings: &Settings) -> Self {
        let allow_list = settings.restrict_items.then(AllowList::standard);
        Self::new(DatasetFetcher::http(settings.base_url.clone()), allow_list, settings.window)
    }
}

impl<T: Transport> Dashboard<T> {
    pub fn new(fetcher: DatasetFetcher<T>, allow_list: Option<AllowList>, window: YearWindow) -> Self {
        Self {
            fetcher,
            allow_list,
            window,
            countries: COUNTRIES.iter().collect(),
        }
    }

    /// Restrict the country universe (global queries iterate over it).
    pub fn with_countries(mut self, countries: impl IntoIterator<Item = &'static CountryInfo>) -> Self {
        self.countries = countries.into_iter().collect();
        self
    }

    pub fn countries(&self) -> &[&'static CountryInfo] {
        &self.countries
    }

    pub fn allow_list(&self) -> Option<&AllowList> {
        self.allow_list.as_ref()
    }

    pub fn window(&self) -> YearWindow {
        self.window
    }

    pub fn fetcher(&self) -> &DatasetFetcher<T> {
        &self.fetcher
    }

    /// Normalized observations for one country.
    pub fn observations(&self, country: &CountryInfo) -> Result<Vec<Observation>, DataError> {
        let table = self.fetcher.fetch(&country.resource_name())?;
        let normalized = normalize_detailed(&table, country.code, self.allow_list.as_ref()).map_err(|source| {
            DataError::Schema {
                country: country.code,
                source,
            }
        })?;
        Ok(normalized.observations)
    }

    /// Normalized observations for two countries, fetched concurrently.
    pub fn observation_pair(
        &self,
        a: &CountryInfo,
        b: &CountryInfo,
    ) -> Result<(Vec<Observation>, Vec<Observation>), DataError> {
        let (left, right) = rayon::join(|| self.observations(a), || self.observations(b));
        Ok((left?, right?))
    }

    /// Every configured country, fetched in parallel. Order follows the
    /// country table.
    pub fn all_observations(&self) -> Vec<CountryResult> {
        self.countries
            .par_iter()
            .map(|&country| (country, self.observations(country)))
            .collect()
    }

    /// Mean per item at `date` across every country that can be loaded.
    pub fn global_average(&self, date: NaiveDate) -> GlobalAverages {
        let (loaded, failures) = split_failures(self.all_observations());
        let by_item = analysis::global_average(date, loaded.iter().map(|(_, obs)| obs.as_slice()));
        GlobalAverages {
            date,
            by_item,
            countries_used: loaded.len(),
            failures,
        }
    }

    /// Items and in-window dates for one country, or the union over all.
    pub fn catalog(&self, country: Option<&CountryInfo>) -> Result<Catalog, DataError> {
        if let Some(country) = country {
            let obs = self.observations(country)?;
            return Ok(Catalog {
                items: analysis::items(&obs),
                dates: analysis::available_dates(&obs, self.window),
                failures: Vec::new(),
            });
        }

        let (loaded, failures) = split_failures(self.all_observations());
        let mut items = std::collections::BTreeSet::new();
        let mut dates = std::collections::BTreeSet::new();
        for (_, obs) in &loaded {
            items.extend(analysis::items(obs));
            dates.extend(analysis::available_dates(obs, self.window));
        }
        Ok(Catalog {
            items: items.into_iter().collect(),
            dates: dates.into_iter().collect(),
            failures,
        })
    }

    pub fn time_series(&self, country: &'static CountryInfo, item: &str) -> Result<TimeSeriesView, DataError> {
        let obs = self.observations(country)?;
        let points = analysis::series(&obs, item, self.window);

        let mut present = points.iter().filter_map(|o| o.value.as_f64());
        let first = present.next();
        let last = present.last();
        let change_pct = match (first, last) {
            (Some(first), Some(last)) => pct_change(first, last),
            _ => pct_change(Value::Missing, Value::Missing),
        };

        Ok(TimeSeriesView {
            country,
            item: item.to_string(),
            points,
            change_pct,
        })
    }

    pub fn comparison(
        &self,
        left: &'static CountryInfo,
        right: &'static CountryInfo,
        item: &str,
        date: NaiveDate,
    ) -> Result<ComparisonView, DataError> {
        let (left_obs, right_obs) = self.observation_pair(left, right)?;
        let left = CountryReading {
            country: left,
            observation: analysis::find_at(&left_obs, item, date).cloned(),
        };
        let right = CountryReading {
            country: right,
            observation: analysis::find_at(&right_obs, item, date).cloned(),
        };
        let difference_pct = pct_change(left.value(), right.value());

        Ok(ComparisonView {
            item: item.to_string(),
            date,
            left,
            right,
            difference_pct,
        })
    }

    /// Every item the country reports at `date`; with `with_global`, each row
    /// also carries the cross-country average and the deviation from it.
    pub fn overview(
        &self,
        country: &'static CountryInfo,
        date: NaiveDate,
        with_global: bool,
    ) -> Result<OverviewView, DataError> {
        let obs = self.observations(country)?;
        let averages = with_global.then(|| self.global_average(date));

        let rows = analysis::rows_at(&obs, date)
            .into_iter()
            .map(|o| {
                let global_average = averages.as_ref().and_then(|a| a.by_item.get(&o.item).copied());
                let vs_global_pct = global_average.map(|avg| relative_pct(o.value, avg));
                OverviewRow {
                    observation: o.clone(),
                    global_average,
                    vs_global_pct,
                }
            })
            .collect();

        Ok(OverviewView {
            country,
            date,
            rows,
            with_global,
        })
    }

    /// One indicator at one date across every country. Countries that fail
    /// to load appear as failed rows; the average ignores them.
    pub fn global_view(&self, item: &str, date: NaiveDate) -> GlobalView {
        let results = self.all_observations();

        let average = {
            let loaded = results.iter().filter_map(|(_, r)| r.as_ref().ok().map(Vec::as_slice));
            analysis::global_average(date, loaded).get(item).copied()
        };

        let rows = results
            .into_iter()
            .map(|(country, result)| {
                let cell = match result {
                    Err(e) => {
                        tracing::warn!(country = %country.code, error = %e, "country skipped in global view");
                        GlobalCell::Failed(e)
                    }
                    Ok(obs) => match analysis::find_at(&obs, item, date) {
                        Some(o) => GlobalCell::Reported {
                            observation: o.clone(),
                            vs_average_pct: relative_pct(o.value, Value::from(average)),
                        },
                        None => GlobalCell::NoData,
                    },
                };
                GlobalRow { country, cell }
            })
            .collect();

        GlobalView {
            item: item.to_string(),
            date,
            average,
            rows,
        }
    }
}

fn split_failures(
    results: Vec<CountryResult>,
) -> (
    Vec<(&'static CountryInfo, Vec<Observation>)>,
    Vec<(&'static CountryInfo, DataError)>,
) {
    let mut loaded = Vec::with_capacity(results.len());
    let mut failures = Vec::new();
    for (country, result) in results {
        match result {
            Ok(obs) => loaded.push((country, obs)),
            Err(e) => {
                tracing::warn!(country = %country.code, error = %e, "country skipped");
                failures.push((country, e));
            }
        }
    }
    (loaded, failures)
}

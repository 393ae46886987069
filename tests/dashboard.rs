use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;

use foodsec_dash::app::Dashboard;
use foodsec_dash::app::views::GlobalCell;
use foodsec_dash::data::{DatasetFetcher, Transport};
use foodsec_dash::domain::{AllowList, COUNTRIES, CountryInfo, Value, YearWindow, countries};
use foodsec_dash::error::{DataError, FetchError};

const PROTEIN: &str = "Average protein supply (g/cap/day) (3-year average)";
const UNDERNOURISHMENT: &str = "Prevalence of undernourishment (percent) (3-year average)";

/// Serves canned CSV bodies keyed by resource name; unknown names fail.
struct StubTransport {
    bodies: HashMap<String, String>,
    calls: Mutex<HashMap<String, usize>>,
}

impl StubTransport {
    fn new(bodies: &[(&str, &str)]) -> Self {
        Self {
            bodies: bodies
                .iter()
                .map(|(code, body)| (country(code).resource_name(), body.to_string()))
                .collect(),
            calls: Mutex::new(HashMap::new()),
        }
    }

    fn calls(&self, resource: &str) -> usize {
        self.calls.lock().unwrap().get(resource).copied().unwrap_or(0)
    }

    fn max_calls(&self) -> usize {
        self.calls.lock().unwrap().values().copied().max().unwrap_or(0)
    }
}

impl Transport for StubTransport {
    fn get_text(&self, _url: &str, resource: &str) -> Result<String, FetchError> {
        *self.calls.lock().unwrap().entry(resource.to_string()).or_default() += 1;
        self.bodies.get(resource).cloned().ok_or_else(|| FetchError::Network {
            resource: resource.to_string(),
            message: "request failed with status 404 Not Found".to_string(),
        })
    }
}

fn country(code: &str) -> &'static CountryInfo {
    countries::find(code).unwrap()
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dashboard(bodies: &[(&str, &str)], codes: &[&str], allow: Option<AllowList>) -> Dashboard<StubTransport> {
    let fetcher = DatasetFetcher::new(StubTransport::new(bodies), "http://stub");
    let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
    Dashboard::new(fetcher, allow, YearWindow::DEFAULT)
        .with_countries(COUNTRIES.iter().filter(move |c| codes.iter().any(|code| code == c.code.as_str())))
}

fn afg_csv() -> String {
    format!(
        "Item,StartDate,Value\n\
         #indicator+name,#date+start,#indicator+value\n\
         {PROTEIN},2010-01-01,10\n\
         {PROTEIN},2015-01-01,12\n\
         {UNDERNOURISHMENT},2010-01-01,<2.5\n\
         Some other indicator,2010-01-01,99\n"
    )
}

fn bra_csv() -> String {
    format!(
        "item,startdate,value\n\
         {PROTEIN},2010-01-01,20\n\
         {UNDERNOURISHMENT},2010-01-01,5\n"
    )
}

fn chn_csv() -> String {
    format!("item,startdate,value\n{PROTEIN},2010-01-01,n.a.\n")
}

#[test]
fn global_average_ignores_missing_values() {
    let (afg, bra, chn) = (afg_csv(), bra_csv(), chn_csv());
    let dash = dashboard(
        &[("afg", &afg), ("bra", &bra), ("chn", &chn)],
        &["afg", "bra", "chn"],
        Some(AllowList::standard()),
    );

    let averages = dash.global_average(ymd(2010, 1, 1));
    assert_eq!(averages.by_item.get(PROTEIN), Some(&15.0));
    assert_eq!(averages.countries_used, 3);
    assert!(averages.failures.is_empty());

    let view = dash.global_view(PROTEIN, ymd(2010, 1, 1));
    assert_eq!(view.average, Some(15.0));
    assert_eq!(view.reporting_countries(), 2);
    let chn_row = view.rows.iter().find(|r| r.country.code.as_str() == "chn").unwrap();
    match &chn_row.cell {
        GlobalCell::Reported { observation, vs_average_pct } => {
            assert!(observation.value.is_missing());
            assert!(vs_average_pct.is_err());
        }
        other => panic!("unexpected cell: {other:?}"),
    }
}

#[test]
fn each_dataset_is_fetched_once_across_queries() {
    let (afg, bra) = (afg_csv(), bra_csv());
    let dash = dashboard(&[("afg", &afg), ("bra", &bra)], &["afg", "bra", "chn"], None);

    for _ in 0..3 {
        dash.global_view(PROTEIN, ymd(2010, 1, 1));
        dash.catalog(None).unwrap();
        let _ = dash.comparison(country("afg"), country("bra"), PROTEIN, ymd(2010, 1, 1));
    }

    let transport = dash.fetcher().transport();
    assert_eq!(transport.max_calls(), 1);
    assert_eq!(transport.calls(&country("chn").resource_name()), 1);
    assert_eq!(dash.fetcher().cached_len(), 3);
}

#[test]
fn unavailable_country_is_reported_not_fatal() {
    let (afg, bra) = (afg_csv(), bra_csv());
    let dash = dashboard(&[("afg", &afg), ("bra", &bra)], &["afg", "bra", "chn"], None);

    let view = dash.global_view(PROTEIN, ymd(2010, 1, 1));
    assert_eq!(view.rows.len(), 3);
    assert_eq!(view.average, Some(15.0));
    let failed = view.rows.iter().find(|r| r.country.code.as_str() == "chn").unwrap();
    assert!(matches!(failed.cell, GlobalCell::Failed(DataError::Fetch(FetchError::Network { .. }))));

    let err = dash.observations(country("chn")).unwrap_err();
    assert!(matches!(err, DataError::Fetch(_)));
}

#[test]
fn comparison_reports_right_relative_to_left() {
    let (afg, bra) = (afg_csv(), bra_csv());
    let dash = dashboard(&[("afg", &afg), ("bra", &bra)], &["afg", "bra"], None);

    let view = dash.comparison(country("afg"), country("bra"), PROTEIN, ymd(2010, 1, 1)).unwrap();
    assert_eq!(view.left.value(), Value::Present(10.0));
    assert_eq!(view.right.value(), Value::Present(20.0));
    assert_eq!(view.difference_pct, Ok(100.0));

    let none = dash.comparison(country("afg"), country("bra"), PROTEIN, ymd(2015, 1, 1)).unwrap();
    assert!(none.right.observation.is_none());
    assert_eq!(none.right.display_value(), "No data available");
    assert!(none.difference_pct.is_err());
}

#[test]
fn overview_carries_global_average_when_asked() {
    let (afg, bra) = (afg_csv(), bra_csv());
    let dash = dashboard(&[("afg", &afg), ("bra", &bra)], &["afg", "bra"], Some(AllowList::standard()));

    let plain = dash.overview(country("afg"), ymd(2010, 1, 1), false).unwrap();
    assert_eq!(plain.rows.len(), 2);
    assert!(plain.rows.iter().all(|r| r.global_average.is_none()));

    let view = dash.overview(country("afg"), ymd(2010, 1, 1), true).unwrap();
    let protein = view.rows.iter().find(|r| r.observation.item == PROTEIN).unwrap();
    assert_eq!(protein.global_average, Some(15.0));
    let delta = protein.vs_global_pct.unwrap().unwrap();
    assert!((delta - (-100.0 / 3.0)).abs() < 1e-9);

    let under = view.rows.iter().find(|r| r.observation.item == UNDERNOURISHMENT).unwrap();
    assert_eq!(under.observation.value, Value::Present(2.5));
    assert_eq!(under.global_average, Some(3.75));
}

#[test]
fn catalog_unions_items_and_dates() {
    let (afg, bra) = (afg_csv(), bra_csv());
    let dash = dashboard(&[("afg", &afg), ("bra", &bra)], &["afg", "bra", "chn"], None);

    let one = dash.catalog(Some(country("bra"))).unwrap();
    assert_eq!(one.dates, vec![ymd(2010, 1, 1)]);

    let all = dash.catalog(None).unwrap();
    assert_eq!(all.dates, vec![ymd(2010, 1, 1), ymd(2015, 1, 1)]);
    assert!(all.items.contains(&"Some other indicator".to_string()));
    assert!(all.items.contains(&PROTEIN.to_string()));
    assert_eq!(all.failures.len(), 1);
    assert_eq!(all.failures[0].0.code.as_str(), "chn");
}

#[test]
fn time_series_change_spans_first_to_last_value() {
    let afg = afg_csv();
    let dash = dashboard(&[("afg", &afg)], &["afg"], Some(AllowList::standard()));

    let view = dash.time_series(country("afg"), PROTEIN).unwrap();
    assert_eq!(view.points.len(), 2);
    assert_eq!(view.change_pct, Ok(20.0));

    let single = dash.time_series(country("afg"), UNDERNOURISHMENT).unwrap();
    assert_eq!(single.points.len(), 1);
    assert!(single.change_pct.is_err());
}

//! Cross-country averages.

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::domain::{Observation, Value};

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

/// Unweighted mean per item at exactly `date`, across countries.
///
/// Each element of `countries` is one country's normalized observations. A
/// country contributes at most one value per item (its first row for that
/// item at `date`), and only when that value is present. Items no country
/// reports are absent from the result.
pub fn global_average<'a, I>(date: NaiveDate, countries: I) -> BTreeMap<String, f64>
where
    I: IntoIterator<Item = &'a [Observation]>,
{
    let mut acc: BTreeMap<&'a str, Accumulator> = BTreeMap::new();

    for observations in countries {
        let mut seen: HashSet<&str> = HashSet::new();
        for o in observations.iter().filter(|o| o.date == date) {
            if !seen.insert(o.item.as_str()) {
                continue;
            }
            if let Value::Present(v) = o.value {
                let slot = acc.entry(o.item.as_str()).or_default();
                slot.sum += v;
                slot.count += 1;
            }
        }
    }

    acc.into_iter()
        .filter(|(_, a)| a.count > 0)
        .map(|(item, a)| (item.to_string(), a.sum / a.count as f64))
        .collect()
}

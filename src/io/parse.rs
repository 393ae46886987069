//! Cell-level parsers. Neither ever fails: unparseable input becomes a
//! missing marker that the normalizer then acts on.

use chrono::NaiveDate;

use crate::domain::Value;

/// Parse an indicator value.
///
/// A leading `<` or `>` censoring mark is stripped and the bound itself is
/// returned, so `<5` and `>5` both read as `5.0`. The direction is not kept;
/// the raw cell text on the observation is the only trace of it.
pub fn parse_value(raw: Option<&str>) -> Value {
    let Some(raw) = raw else {
        return Value::Missing;
    };
    let trimmed = raw.trim();
    let number = trimmed
        .strip_prefix(['<', '>'])
        .map(str::trim)
        .unwrap_or(trimmed);
    match number.parse::<f64>() {
        Ok(v) => Value::from(v),
        Err(_) => Value::Missing,
    }
}

/// Parse an ISO `YYYY-MM-DD` date; any other shape yields `None`.
pub fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw?.trim(), "%Y-%m-%d").ok()
}

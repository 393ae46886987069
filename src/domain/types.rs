//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - produced by the normalizer and passed between views
//! - exported to JSON/CSV

use chrono::{Datelike, NaiveDate};
use serde::{Serialize, Serializer};

/// Three-letter dataset code (`afg`, `bra`, ...), stored lowercase.
///
/// The code identifies which per-country file an observation came from; it is
/// not read from the row itself.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CountryCode([u8; 3]);

impl CountryCode {
    /// Parse a code, accepting any ASCII case. Anything other than exactly
    /// three ASCII letters is rejected.
    pub fn new(raw: &str) -> Option<Self> {
        let bytes = raw.trim().as_bytes();
        if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_alphabetic) {
            return None;
        }
        Some(Self([
            bytes[0].to_ascii_lowercase(),
            bytes[1].to_ascii_lowercase(),
            bytes[2].to_ascii_lowercase(),
        ]))
    }

    /// Compile-time constructor for the static country table.
    pub(crate) const fn from_static(raw: &str) -> Self {
        let b = raw.as_bytes();
        assert!(b.len() == 3, "country code must have three letters");
        assert!(
            b[0].is_ascii_lowercase() && b[1].is_ascii_lowercase() && b[2].is_ascii_lowercase(),
            "country code must be lowercase ASCII"
        );
        Self([b[0], b[1], b[2]])
    }

    pub fn as_str(&self) -> &str {
        // Only ever built from ASCII letters.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl std::fmt::Display for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_ascii_uppercase())
    }
}

impl std::fmt::Debug for CountryCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CountryCode({})", self.as_str())
    }
}

impl Serialize for CountryCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A parsed indicator value: a finite number or an explicit missing marker.
///
/// `Missing` is distinct from zero. NaN and infinities never appear as
/// `Present`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Present(f64),
    Missing,
}

impl Value {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            Value::Present(v) => Some(v),
            Value::Missing => None,
        }
    }

    pub fn is_missing(self) -> bool {
        matches!(self, Value::Missing)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        if v.is_finite() { Value::Present(v) } else { Value::Missing }
    }
}

impl From<Option<f64>> for Value {
    fn from(v: Option<f64>) -> Self {
        v.map_or(Value::Missing, Value::from)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_f64().serialize(serializer)
    }
}

/// One normalized `(country, item, date, value)` row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub country: CountryCode,
    pub item: String,
    pub date: NaiveDate,
    pub value: Value,
    /// The value cell as it appeared in the source (e.g. `<2.5`, `n.a.`).
    ///
    /// Kept so non-numeric values can still be shown verbatim.
    pub raw_value: String,
}

impl Observation {
    /// Display text for the value: the number when present, else the raw cell.
    pub fn display_value(&self) -> String {
        match self.value {
            Value::Present(v) => crate::report::fmt_number(v),
            Value::Missing if self.raw_value.trim().is_empty() => "n/a".to_string(),
            Value::Missing => self.raw_value.trim().to_string(),
        }
    }
}

/// Inclusive calendar-year window applied by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub first: i32,
    pub last: i32,
}

impl YearWindow {
    pub const DEFAULT: YearWindow = YearWindow { first: 2000, last: 2020 };

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.first..=self.last).contains(&date.year())
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn country_code_is_case_insensitive() {
        let code = CountryCode::new("AfG").unwrap();
        assert_eq!(code.as_str(), "afg");
        assert_eq!(code.to_string(), "AFG");
        assert!(CountryCode::new("af").is_none());
        assert!(CountryCode::new("a1g").is_none());
    }

    #[test]
    fn non_finite_values_become_missing() {
        assert_eq!(Value::from(f64::NAN), Value::Missing);
        assert_eq!(Value::from(f64::INFINITY), Value::Missing);
        assert_eq!(Value::from(Some(1.5)), Value::Present(1.5));
        assert_eq!(Value::from(None), Value::Missing);
    }

    #[test]
    fn year_window_is_inclusive() {
        let w = YearWindow::DEFAULT;
        assert!(w.contains(NaiveDate::from_ymd_opt(2000, 1, 1).unwrap()));
        assert!(w.contains(NaiveDate::from_ymd_opt(2020, 12, 31).unwrap()));
        assert!(!w.contains(NaiveDate::from_ymd_opt(1999, 12, 31).unwrap()));
        assert!(!w.contains(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()));
    }
}

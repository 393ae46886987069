//! Percentage change and relative-to-average deviation.

use crate::domain::Value;
use crate::error::DivisionUndefined;

/// `(end - start) / start * 100`.
pub fn pct_change(start: impl Into<Value>, end: impl Into<Value>) -> Result<f64, DivisionUndefined> {
    ratio_pct(end.into(), start.into())
}

/// `(value - average) / average * 100`.
pub fn relative_pct(value: impl Into<Value>, average: impl Into<Value>) -> Result<f64, DivisionUndefined> {
    ratio_pct(value.into(), average.into())
}

fn ratio_pct(value: Value, base: Value) -> Result<f64, DivisionUndefined> {
    let (Value::Present(value), Value::Present(base)) = (value, base) else {
        return Err(DivisionUndefined::MissingOperand);
    };
    if base == 0.0 {
        return Err(DivisionUndefined::ZeroDenominator);
    }
    let pct = (value - base) / base * 100.0;
    if pct.is_finite() {
        Ok(pct)
    } else {
        Err(DivisionUndefined::ZeroDenominator)
    }
}

/// `+12.50%`, or `N/A` when the ratio is undefined.
pub fn fmt_pct(result: Result<f64, DivisionUndefined>) -> String {
    match result {
        Ok(v) => format!("{v:+.2}%"),
        Err(_) => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pct_change_basic() {
        assert_eq!(pct_change(100.0, 120.0), Ok(20.0));
        assert_eq!(pct_change(200.0, 150.0), Ok(-25.0));
        assert_eq!(pct_change(5.0, 5.0), Ok(0.0));
    }

    #[test]
    fn zero_and_missing_bases_are_undefined() {
        assert_eq!(pct_change(0.0, 50.0), Err(DivisionUndefined::ZeroDenominator));
        assert_eq!(pct_change(Value::Missing, 50.0), Err(DivisionUndefined::MissingOperand));
        assert_eq!(pct_change(50.0, Value::Missing), Err(DivisionUndefined::MissingOperand));
        assert_eq!(pct_change(f64::NAN, 50.0), Err(DivisionUndefined::MissingOperand));
    }

    #[test]
    fn relative_pct_uses_average_as_denominator() {
        assert_eq!(relative_pct(15.0, 10.0), Ok(50.0));
        assert_eq!(relative_pct(15.0, 0.0), Err(DivisionUndefined::ZeroDenominator));
    }

    #[test]
    fn formatting_distinguishes_zero_from_undefined() {
        assert_eq!(fmt_pct(pct_change(10.0, 10.0)), "+0.00%");
        assert_eq!(fmt_pct(pct_change(0.0, 10.0)), "N/A");
        assert_eq!(fmt_pct(pct_change(10.0, 8.0)), "-20.00%");
    }
}

//! Derived numbers over normalized observations.
//!
//! Everything here is pure: inputs are observation slices already produced by
//! the normalizer, outputs are plain values.

pub mod aggregate;
pub mod delta;
pub mod query;

pub use aggregate::global_average;
pub use delta::{fmt_pct, pct_change, relative_pct};
pub use query::{available_dates, find_at, items, resolve_item, rows_at, series, value_at};

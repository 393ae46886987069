//! Reporting utilities: formatted terminal output for each analysis mode.
//!
//! We keep formatting code in one place so:
//! - the pipeline and analysis code stay clean and testable
//! - output changes are localized (important for future snapshot tests)

pub mod format;

pub use format::*;

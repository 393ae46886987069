//! Input/output helpers.
//!
//! - raw CSV decoding (`raw`)
//! - cell parsers for values and dates (`parse`)
//! - table normalization (`ingest`)
//! - observation exports (CSV/JSON) (`export`)

pub mod export;
pub mod ingest;
pub mod parse;
pub mod raw;

pub use export::*;
pub use ingest::*;
pub use parse::*;
pub use raw::*;

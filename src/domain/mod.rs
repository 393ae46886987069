//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the normalized observation record (`Observation`, `Value`, `CountryCode`)
//! - the static country reference table (`countries`)
//! - the indicator allow-list (`indicators`)

pub mod countries;
pub mod indicators;
pub mod types;

pub use countries::{COUNTRIES, CountryInfo};
pub use indicators::{ALLOWED_ITEMS, AllowList};
pub use types::*;

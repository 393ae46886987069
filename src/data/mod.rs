//! Remote dataset access.
//!
//! - `remote`: the HTTP transport and URL layout of the dataset host
//! - `cache`: the per-resource memoizing fetcher built on top of it

pub mod cache;
pub mod remote;

pub use cache::DatasetFetcher;
pub use remote::{DEFAULT_BASE_URL, DEFAULT_FLAG_BASE_URL, HttpTransport, Transport, resource_url};

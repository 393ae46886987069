//! `foodsec-dash` library crate.
//!
//! The binary (`fsd`) is a thin wrapper around this library so that:
//!
//! - the fetch/normalize/aggregate pipeline is testable without a network
//! - the CLI and the TUI share one query surface (`app::Dashboard`)
//! - code stays easy to navigate as the project grows

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod report;
pub mod tui;

//! Runtime settings, read from the environment (and `.env`).
//!
//! CLI flags override these; see `cli::SourceArgs`.

use std::path::PathBuf;

use crate::data::{DEFAULT_BASE_URL, DEFAULT_FLAG_BASE_URL};
use crate::domain::YearWindow;

pub const ENV_BASE_URL: &str = "FOODSEC_BASE_URL";
pub const ENV_FLAG_BASE_URL: &str = "FOODSEC_FLAG_BASE_URL";
pub const ENV_ALL_ITEMS: &str = "FOODSEC_ALL_ITEMS";
pub const ENV_LOG_FILE: &str = "FOODSEC_LOG_FILE";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Prefix of the dataset files.
    pub base_url: String,
    /// Prefix of the flag images.
    pub flag_base_url: String,
    /// Restrict analysis to the 13-item allow-list.
    pub restrict_items: bool,
    pub window: YearWindow,
    /// Where the TUI writes its log (it owns stderr's terminal).
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            flag_base_url: DEFAULT_FLAG_BASE_URL.to_string(),
            restrict_items: true,
            window: YearWindow::DEFAULT,
            log_file: None,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup (the environment in
    /// production, a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            base_url: non_empty(ENV_BASE_URL).unwrap_or(defaults.base_url),
            flag_base_url: non_empty(ENV_FLAG_BASE_URL).unwrap_or(defaults.flag_base_url),
            restrict_items: !non_empty(ENV_ALL_ITEMS).is_some_and(|v| is_truthy(&v)),
            window: defaults.window,
            log_file: non_empty(ENV_LOG_FILE).map(PathBuf::from),
        }
    }
}

fn is_truthy(v: &str) -> bool {
    matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

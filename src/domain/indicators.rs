//! The fixed indicator allow-list.
//!
//! Membership is exact string equality against the `item` column; no case
//! folding or whitespace normalization is applied.

use std::collections::BTreeSet;

/// The 13 indicators the dashboard analyses by default.
pub const ALLOWED_ITEMS: [&str; 13] = [
    "Average dietary energy supply adequacy (percent) (3-year average)",
    "Average value of food production (constant I$ per capita) (3-year average)",
    "Share of dietary energy supply derived from cereals, roots and tubers (percent) (3-year average)",
    "Average protein supply (g/cap/day) (3-year average)",
    "Average supply of protein of animal origin (g/cap/day) (3-year average)",
    "Prevalence of undernourishment (percent) (3-year average)",
    "Number of people undernourished (million) (3-year average)",
    "Prevalence of severe food insecurity in the total population (percent) (3-year average)",
    "Prevalence of moderate or severe food insecurity in the total population (percent) (3-year average)",
    "Cereal import dependency ratio (percent) (3-year average)",
    "Percent of arable land equipped for irrigation (percent) (3-year average)",
    "Political stability and absence of violence/terrorism (index)",
    "Per capita food supply variability (kcal/cap/day)",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowList {
    items: BTreeSet<String>,
}

impl AllowList {
    pub fn new<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// The built-in 13-item list.
    pub fn standard() -> Self {
        Self::new(ALLOWED_ITEMS)
    }

    pub fn contains(&self, item: &str) -> bool {
        self.items.contains(item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }
}

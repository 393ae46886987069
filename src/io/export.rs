//! Export normalized observations to CSV or JSON.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use clap::ValueEnum;
use serde::Serialize;

use crate::domain::Observation;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Row shape shared by both formats; `value` is empty/`null` when missing.
#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    country: &'a str,
    item: &'a str,
    date: String,
    value: Option<f64>,
    raw_value: &'a str,
}

impl<'a> From<&'a Observation> for ExportRow<'a> {
    fn from(o: &'a Observation) -> Self {
        Self {
            country: o.country.as_str(),
            item: &o.item,
            date: o.date.to_string(),
            value: o.value.as_f64(),
            raw_value: &o.raw_value,
        }
    }
}

pub fn write_observations(path: &Path, observations: &[Observation], format: ExportFormat) -> Result<(), AppError> {
    match format {
        ExportFormat::Csv => write_observations_csv(path, observations),
        ExportFormat::Json => write_observations_json(path, observations),
    }
}

/// Write observations to a CSV file (header: `country,item,date,value,raw_value`).
pub fn write_observations_csv(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export CSV '{}': {e}", path.display())))?;

    // Item names contain commas, so rows go through the csv writer for quoting.
    let mut writer = csv::Writer::from_writer(file);
    for o in observations {
        writer
            .serialize(ExportRow::from(o))
            .map_err(|e| AppError::new(4, format!("Failed to write export CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::new(4, format!("Failed to flush export CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = observations.len(), "wrote CSV export");
    Ok(())
}

/// Write observations as a pretty-printed JSON array.
pub fn write_observations_json(path: &Path, observations: &[Observation]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::usage(format!("Failed to create export JSON '{}': {e}", path.display())))?;

    let rows: Vec<ExportRow<'_>> = observations.iter().map(ExportRow::from).collect();
    serde_json::to_writer_pretty(file, &rows)
        .map_err(|e| AppError::new(4, format!("Failed to write export JSON: {e}")))?;

    tracing::info!(path = %path.display(), rows = observations.len(), "wrote JSON export");
    Ok(())
}

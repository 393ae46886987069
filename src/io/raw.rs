//! Raw tabular data as delivered by the source, before any cleaning.

/// Header row plus string rows. No invariants beyond "rows are never wider
/// than the header"; short rows are allowed and read as empty cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Decode CSV text. The first record is the header row.
    pub fn from_csv(text: &str) -> Result<Self, String> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::None)
            .from_reader(text.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| format!("Failed to read CSV headers: {e}"))?
            .iter()
            .map(str::to_string)
            .collect();

        if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
            return Err("No columns to parse (empty document).".to_string());
        }

        let mut rows = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            // +2: records() starts after the header, and lines are 1-based.
            let line = idx + 2;
            let record = result.map_err(|e| format!("CSV parse error near line {line}: {e}"))?;
            if record.len() > headers.len() {
                return Err(format!(
                    "Expected {} fields on line {line}, saw {}.",
                    headers.len(),
                    record.len()
                ));
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    /// Cell text, `None` when the row is shorter than `column`.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

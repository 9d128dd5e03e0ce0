//! CSV Import
//!
//! Loads `date,value[,label]` rows into timeline events.
//! Rows that fail to parse are counted and reported, not fatal.

use crate::calendar::CalendarDate;
use crate::config::ImportConfig;
use crate::timeline::{Event, Timeline};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Maximum number of row errors kept in a report
const MAX_REPORTED_ERRORS: usize = 100;

/// Import errors
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid import settings: {0}")]
    Settings(String),
}

/// Payload of an imported row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Record {
    pub fn new(value: f64) -> Self {
        Self { value, label: None }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// Result of a CSV import operation
#[derive(Debug, Default)]
pub struct CsvImportResult {
    pub events: Vec<Event<Record>>,
    pub rows_processed: usize,
    /// Rows with a blank value
    pub rows_skipped: usize,
    pub rows_failed: usize,
    pub errors: Vec<String>,
}

impl CsvImportResult {
    /// Build a timeline over the imported values
    pub fn into_timeline(self, config: crate::timeline::IndexConfig) -> Timeline<Record> {
        let mut timeline = Timeline::with_config(|r: &Record| r.value, config);
        timeline.extend(self.events);
        timeline
    }
}

/// CSV file loader with configurable column mapping
#[derive(Debug, Clone, Default)]
pub struct CsvLoader {
    config: ImportConfig,
}

impl CsvLoader {
    pub fn new(config: ImportConfig) -> Self {
        Self { config }
    }

    /// Import data from a CSV file
    pub fn load(&self, path: &Path) -> Result<CsvImportResult, ImportError> {
        let file = std::fs::File::open(path)?;
        let result = self.load_reader(file)?;

        tracing::info!(
            path = %path.display(),
            rows = result.rows_processed,
            skipped = result.rows_skipped,
            failed = result.rows_failed,
            "Imported CSV"
        );
        Ok(result)
    }

    /// Import from a CSV string (useful for testing)
    pub fn load_str(&self, csv_data: &str) -> Result<CsvImportResult, ImportError> {
        self.load_reader(csv_data.as_bytes())
    }

    /// Import from any reader
    pub fn load_reader<R: Read>(&self, reader: R) -> Result<CsvImportResult, ImportError> {
        let delimiter = u8::try_from(self.config.delimiter).map_err(|_| {
            ImportError::Settings(format!(
                "delimiter {:?} is not a single-byte character",
                self.config.delimiter
            ))
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(self.config.has_header)
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        let mut result = CsvImportResult::default();

        for (line_num, row) in reader.records().enumerate() {
            let actual_line = if self.config.has_header {
                line_num + 2
            } else {
                line_num + 1
            };

            let parsed = row
                .map_err(|e| e.to_string())
                .and_then(|record| self.parse_record(&record));

            match parsed {
                Ok(Some(event)) => {
                    result.events.push(event);
                    result.rows_processed += 1;
                }
                Ok(None) => {
                    tracing::debug!(line = actual_line, "Skipping CSV row with blank value");
                    result.rows_skipped += 1;
                }
                Err(e) => {
                    tracing::debug!(line = actual_line, error = %e, "Skipping CSV row");
                    result.errors.push(format!("Line {}: {}", actual_line, e));
                    result.rows_failed += 1;
                }
            }
        }

        if result.errors.len() > MAX_REPORTED_ERRORS {
            let total = result.errors.len();
            result.errors.truncate(MAX_REPORTED_ERRORS);
            result
                .errors
                .push(format!("... and {} more errors", total - MAX_REPORTED_ERRORS));
        }

        Ok(result)
    }

    fn parse_record(&self, record: &csv::StringRecord) -> Result<Option<Event<Record>>, String> {
        let date_str = record
            .get(self.config.date_column)
            .map(str::trim)
            .ok_or("missing date column")?;
        let date = CalendarDate::parse_with_format(date_str, &self.config.date_format)
            .map_err(|e| e.to_string())?;

        let value_str = record
            .get(self.config.value_column)
            .map(str::trim)
            .unwrap_or_default();
        if value_str.is_empty() {
            return Ok(None);
        }
        let value = value_str
            .parse::<f64>()
            .map_err(|_| format!("invalid value {:?}", value_str))?;

        let label = self
            .config
            .label_column
            .and_then(|col| record.get(col))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Some(Event::new(date, Record { value, label })))
    }
}

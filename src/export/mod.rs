//! Export module - CSV and PDF payloads for the currently selected report
//!
//! Exports always cover a record's full row set, never the paginated slice
//! the detail view happens to be showing. With no report selected both
//! entry points are deliberate no-ops.

mod csv;
mod pdf;

use crate::data::FileRecord;
use thiserror::Error;
use tracing::debug;

/// Placeholder rendered for cells a row does not carry.
pub(crate) const MISSING_CELL: &str = "-";

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("PDF rendering failed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("export I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Entry points handed to the detail view's export actions.
pub struct ExportAdapter;

impl ExportAdapter {
    /// CSV payload: discovered column names as the header row, then each
    /// row's values in that column order. `None` when no file is selected.
    pub fn export_csv(file: Option<&FileRecord>) -> Result<Option<Vec<u8>>, ExportError> {
        let Some(file) = file else {
            return Ok(None);
        };
        debug!(name = %file.name, rows = file.rows.len(), "exporting CSV");
        csv::payload(file).map(Some)
    }

    /// Paginated PDF table: title line, upload date line, and the full row
    /// set under a repeated header. `None` when no file is selected.
    pub fn export_pdf(file: Option<&FileRecord>) -> Result<Option<Vec<u8>>, ExportError> {
        let Some(file) = file else {
            return Ok(None);
        };
        debug!(name = %file.name, rows = file.rows.len(), "exporting PDF");
        pdf::payload(file).map(Some)
    }
}

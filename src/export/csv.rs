//! CSV Payload Module
//! Serializes one report's full row set; quoting and escaping are the csv
//! crate's job.

use super::{ExportError, MISSING_CELL};
use crate::data::FileRecord;
use csv::Writer;

pub(super) fn payload(file: &FileRecord) -> Result<Vec<u8>, ExportError> {
    let columns = file.columns();
    if columns.is_empty() {
        // No rows, no discovered schema: nothing to serialize.
        return Ok(Vec::new());
    }
    let mut buf = Vec::new();
    {
        let mut writer = Writer::from_writer(&mut buf);
        writer.write_record(&columns)?;
        for row in &file.rows {
            writer.write_record(columns.iter().map(|c| row.get(c).unwrap_or(MISSING_CELL)))?;
        }
        writer.flush()?;
    }
    Ok(buf)
}

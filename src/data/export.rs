//! CSV export of the flattened table, one row per record in [`COLUMNS`] order.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use thiserror::Error;

use crate::data::dataset::COLUMNS;
use crate::data::record::UnitModelRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unable to create output file: {0}")]
    Io(#[from] std::io::Error),
    #[error("unable to write csv: {0}")]
    Csv(#[from] csv::Error),
}

/// Writes the header even when `records` is empty.
pub fn export_csv<W: Write>(records: &[UnitModelRecord], writer: W) -> Result<(), ExportError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(COLUMNS)?;
    for record in records {
        let stats = record.stats;
        out.write_record([
            record.faction.clone(),
            record.name.clone(),
            record.role.clone(),
            record.org_slot.clone(),
            record.points.to_string(),
            record.troop_type.clone(),
            record.rules_text(),
            record.equipment_text(),
            record.upgrades_text(),
            stats.m.to_string(),
            stats.ws.to_string(),
            stats.bs.to_string(),
            stats.s.to_string(),
            stats.t.to_string(),
            stats.w.to_string(),
            stats.i.to_string(),
            stats.a.to_string(),
            stats.ld.to_string(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

pub fn export_csv_file(records: &[UnitModelRecord], path: impl AsRef<Path>) -> Result<(), ExportError> {
    let file = File::create(path)?;
    export_csv(records, file)
}

//! Result export sinks (CSV and JSON Lines).

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use thiserror::Error;

use crate::cli::ExportFormat;
use crate::history::{VisitRecord, format_visit_time};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub fn export_records(
    records: &[VisitRecord],
    path: &Path,
    format: ExportFormat,
) -> Result<(), ExportError> {
    match format {
        ExportFormat::Csv => write_csv(records, path),
        ExportFormat::Jsonl => write_jsonl(records, path),
    }
}

/// Write a two-column CSV: a `URL`/`Visit Time` header followed by every
/// record in the order given, times rendered exactly as printed.
pub fn write_csv(records: &[VisitRecord], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
    writer.write_record(["URL", "Visit Time"])?;
    for record in records {
        let visit_time = format_visit_time(record.visit_time);
        writer.write_record([record.url.as_str(), visit_time.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct VisitRecordJson<'a> {
    url: &'a str,
    visit_time: Option<String>,
}

pub fn write_jsonl(records: &[VisitRecord], path: &Path) -> Result<(), ExportError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    for record in records {
        let line = VisitRecordJson {
            url: &record.url,
            visit_time: record.visit_time.map(|t| format_visit_time(Some(t))),
        };
        serde_json::to_writer(&mut writer, &line)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

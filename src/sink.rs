//! CSV output
//!
//! Rows are flushed as soon as they are written, so a run that dies halfway
//! leaves a valid file with every row produced so far.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{HarvestError, Result};
use crate::record::{OutputSchema, Record};

pub struct CsvSink<W: Write> {
    writer: csv::Writer<W>,
    width: Option<usize>,
    rows: usize,
}

impl CsvSink<File> {
    /// Create (or truncate) the output file
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| HarvestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> CsvSink<W> {
    pub fn from_writer(inner: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(inner),
            width: None,
            rows: 0,
        }
    }

    pub fn write_header(&mut self, schema: &OutputSchema) -> Result<()> {
        self.writer.write_record(schema.headers())?;
        self.writer.flush().map_err(csv::Error::from)?;
        self.width = Some(schema.len());
        Ok(())
    }

    pub fn write_row(&mut self, record: &Record) -> Result<()> {
        if let Some(expected) = self.width {
            if record.len() != expected {
                return Err(HarvestError::RowWidth {
                    expected,
                    actual: record.len(),
                });
            }
        }
        self.writer.write_record(record.values())?;
        self.writer.flush().map_err(csv::Error::from)?;
        self.rows += 1;
        Ok(())
    }

    /// Data rows written so far (header excluded)
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush and hand back the underlying writer
    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| HarvestError::Csv(csv::Error::from(e.into_error())))
    }
}

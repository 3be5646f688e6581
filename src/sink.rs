//! Incremental CSV result sink.
//!
//! Rows are appended as each record finishes and flushed every
//! `flush_interval` rows, so a batch interrupted mid-run leaves a valid,
//! independently usable output file behind. Nothing is held back for an
//! end-of-run write.

use anyhow::{Context, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

pub const DEFAULT_FLUSH_INTERVAL: usize = 10;

pub struct CsvSink {
    writer: csv::Writer<File>,
    path: PathBuf,
    flush_interval: usize,
    count: usize,
    unflushed: usize,
}

impl CsvSink {
    /// Create the sink, writing the header row immediately.
    pub fn create(path: &Path, headers: &[String], flush_interval: usize) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
        }

        let file = File::create(path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        let mut writer = csv::Writer::from_writer(file);

        writer
            .write_record(headers)
            .context("Failed to write CSV header")?;
        writer.flush().context("Failed to flush CSV header")?;

        Ok(Self {
            writer,
            path: path.to_path_buf(),
            flush_interval: flush_interval.max(1),
            count: 0,
            unflushed: 0,
        })
    }

    /// Append one row; flushes automatically at the configured interval.
    pub fn append(&mut self, row: &[String]) -> Result<()> {
        self.writer
            .write_record(row)
            .with_context(|| format!("Failed to write row {} to {}", self.count + 1, self.path.display()))?;
        self.count += 1;
        self.unflushed += 1;

        if self.unflushed >= self.flush_interval {
            self.flush()?;
        }

        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush().context("Failed to flush CSV writer")?;
        self.unflushed = 0;
        Ok(())
    }

    /// Flush remaining rows and return how many were written.
    pub fn finish(mut self) -> Result<usize> {
        self.flush()?;
        Ok(self.count)
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

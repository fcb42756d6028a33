//! Result accumulation and persistence of the two JSON artifacts.

use crate::error::Result;
use crate::types::ResultRecord;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Path of the formatted results artifact for a run.
pub fn bbox_results_path(output_dir: &Path, set_name: &str) -> PathBuf {
    output_dir.join(format!("{set_name}_bbox_results.json"))
}

/// Path of the processed image ids artifact for a run.
pub fn processed_ids_path(output_dir: &Path, set_name: &str) -> PathBuf {
    output_dir.join(format!("{set_name}_processed_image_ids.json"))
}

/// The accumulated output of one evaluation run.
///
/// `records` holds every formatted result in emission order; `image_ids`
/// holds one entry per processed sample whether or not it produced results.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    pub records: Vec<ResultRecord>,
    pub image_ids: Vec<u64>,
}

impl ResultSet {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a formatted result.
    pub fn push(&mut self, record: ResultRecord) {
        self.records.push(record);
    }

    /// Record a sample's image id as processed.
    pub fn record_image(&mut self, image_id: u64) {
        self.image_ids.push(image_id);
    }

    /// Whether the run produced any formatted results.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of formatted results.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Write both artifacts under `output_dir`, prefixed with `set_name`.
    ///
    /// Files are pretty-printed and overwritten if present.
    pub fn write(&self, output_dir: &Path, set_name: &str) -> Result<()> {
        write_pretty(&bbox_results_path(output_dir, set_name), &self.records)?;
        write_pretty(&processed_ids_path(output_dir, set_name), &self.image_ids)?;
        Ok(())
    }
}

fn write_pretty<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    Ok(())
}

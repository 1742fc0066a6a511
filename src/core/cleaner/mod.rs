//! CSV cleaning function
//!
//! Reads a raw export object, fixes it up, and writes the result to the
//! clean bucket:
//!
//! - `.csv` data exports get the NULL-marker rewrite and land at
//!   `csv/<basename>`
//! - anything else is treated as a schema export: its `name,datatype`
//!   lines become a warehouse schema JSON array at `schemas/<stem>.json`,
//!   where the loader expects to find it

pub mod null_markers;
pub mod schema;

pub use null_markers::{clean_csv, clean_csv_line};
pub use schema::infer_schema;

use crate::adapters::storage::ObjectStore;
use crate::domain::{Result, StorageError};
use std::sync::Arc;

/// What the cleaner produced for one object
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanOutcome {
    /// A cleaned CSV was written
    CleanedCsv {
        /// Destination object name in the clean bucket
        destination: String,
    },

    /// A schema JSON was written
    SchemaJson {
        /// Destination object name in the clean bucket
        destination: String,
        /// Number of columns inferred
        columns: usize,
    },
}

/// Blob-to-blob cleaner between the raw and clean buckets
pub struct BlobCleaner {
    source: Arc<dyn ObjectStore>,
    destination: Arc<dyn ObjectStore>,
}

impl BlobCleaner {
    /// Create a cleaner reading from `source` and writing to `destination`
    pub fn new(source: Arc<dyn ObjectStore>, destination: Arc<dyn ObjectStore>) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// Clean one object
    ///
    /// # Errors
    ///
    /// Returns an error if the object cannot be fetched, is not UTF-8,
    /// or the result cannot be stored.
    pub async fn clean_object(&self, name: &str) -> Result<CleanOutcome> {
        let bytes = self.source.fetch(name).await?;
        let text = String::from_utf8(bytes).map_err(|_| StorageError::InvalidContent {
            name: name.to_string(),
            message: "object is not valid UTF-8".to_string(),
        })?;

        let basename = basename(name);

        if name.ends_with(".csv") {
            let destination = format!("csv/{basename}");
            let cleaned = clean_csv(&text);
            self.destination
                .store(&destination, cleaned.into_bytes())
                .await?;

            tracing::info!(
                object = name,
                destination = %destination,
                "Cleaned CSV uploaded"
            );

            Ok(CleanOutcome::CleanedCsv { destination })
        } else {
            let fields = infer_schema(&text);
            let destination = format!("schemas/{}.json", stem(basename));
            let body = serde_json::to_vec(&fields)?;
            self.destination.store(&destination, body).await?;

            tracing::info!(
                object = name,
                destination = %destination,
                columns = fields.len(),
                "Inferred schema uploaded"
            );

            Ok(CleanOutcome::SchemaJson {
                destination,
                columns: fields.len(),
            })
        }
    }
}

/// Last path component of an object name
fn basename(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}

/// Basename with its final extension removed
fn stem(basename: &str) -> &str {
    match basename.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => basename,
    }
}

//! Clean command implementation
//!
//! Runs the CSV cleaner on one object from the raw bucket.

use crate::adapters::storage::RestObjectStore;
use crate::config::load_config;
use crate::core::{BlobCleaner, CleanOutcome};
use clap::Args;
use std::sync::Arc;

/// Arguments for the clean command
#[derive(Args, Debug)]
pub struct CleanArgs {
    /// Object name in the raw bucket, e.g. `exports/2026-08-06/orders.csv`
    #[arg(long)]
    pub object: String,
}

impl CleanArgs {
    /// Execute the clean command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = load_config(config_path)?;

        let source = Arc::new(RestObjectStore::new(
            &config.storage,
            config.storage.bucket.clone(),
        )?);
        let destination = Arc::new(RestObjectStore::new(
            &config.storage,
            config.storage.clean_destination_bucket.clone(),
        )?);

        let cleaner = BlobCleaner::new(source, destination);

        match cleaner.clean_object(&self.object).await {
            Ok(CleanOutcome::CleanedCsv { destination }) => {
                println!("Cleaned CSV written to {destination}");
                Ok(0)
            }
            Ok(CleanOutcome::SchemaJson {
                destination,
                columns,
            }) => {
                println!("Schema with {columns} columns written to {destination}");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(object = %self.object, error = %e, "Cleaning failed");
                eprintln!("Error: {e}");
                Ok(1)
            }
        }
    }
}

//! Load command implementation
//!
//! Runs the warehouse loader on one object from the clean bucket.

use crate::adapters::storage::RestObjectStore;
use crate::adapters::warehouse::RestWarehouseLoader;
use crate::config::load_config;
use crate::core::CsvLoader;
use clap::Args;
use std::sync::Arc;

/// Arguments for the load command
#[derive(Args, Debug)]
pub struct LoadArgs {
    /// Object name in the clean bucket, e.g. `csv/orders.csv`
    #[arg(long)]
    pub object: String,
}

impl LoadArgs {
    /// Execute the load command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = load_config(config_path)?;

        let store = Arc::new(RestObjectStore::new(
            &config.storage,
            config.storage.clean_destination_bucket.clone(),
        )?);
        let warehouse = Arc::new(RestWarehouseLoader::new(&config.warehouse)?);

        let loader = CsvLoader::new(store, warehouse);

        match loader.load_object(&self.object).await {
            Ok(Some(report)) => {
                println!("Loaded {} rows into table {}", report.rows, report.table);
                Ok(0)
            }
            Ok(None) => {
                println!("Object {} is not a CSV file, nothing to load", self.object);
                Ok(0)
            }
            Err(e) => {
                tracing::error!(object = %self.object, error = %e, "Load failed");
                eprintln!("Error: {e}");
                Ok(1)
            }
        }
    }
}

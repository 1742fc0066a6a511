//! List-tables command implementation
//!
//! Runs the table lister once: executes the configured seed query and
//! publishes the resulting table list as the first batch message.

use crate::adapters::queue::RestQueuePublisher;
use crate::adapters::secrets::RestSecretProvider;
use crate::adapters::source::SourceDatabase;
use crate::config::load_config;
use crate::core::TableLister;
use clap::Args;
use std::sync::Arc;

/// Arguments for the list-tables command
#[derive(Args, Debug)]
pub struct ListTablesArgs {}

impl ListTablesArgs {
    /// Execute the list-tables command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = load_config(config_path)?;

        let secrets = RestSecretProvider::new(&config.secrets)?;
        let source = SourceDatabase::connect(&config.source, &config.secrets, &secrets).await?;
        let publisher =
            RestQueuePublisher::new(&config.queue, config.export.tables_list_topic.clone())?;

        let lister = TableLister::new(
            Arc::new(source),
            Arc::new(publisher),
            config.export.seed_query.clone(),
            config.export.max_batches,
        );

        match lister.run().await {
            Ok(message_id) => {
                println!("Seed message published: {message_id}");
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Table listing failed");
                eprintln!("Error: {e}");
                Ok(1)
            }
        }
    }
}

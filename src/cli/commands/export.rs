//! Export command implementation
//!
//! One coordinator invocation: decodes a queue delivery envelope and
//! drains as many tables as the time budget allows. The exit code tells
//! the delivery mechanism what to do with the message: 0 for handled
//! (including a conflict skip and a re-published remainder), 1 for a
//! failure the queue may redeliver, 2 for a failure redelivery can never
//! fix.

use crate::adapters::database::RestDatabaseAdmin;
use crate::adapters::queue::RestQueuePublisher;
use crate::config::load_config;
use crate::core::{BatchExportCoordinator, BatchOutcome, ExportJobConfig};
use crate::domain::DeliveryEnvelope;
use clap::Args;
use std::io::Read;
use std::sync::Arc;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Path to the delivery envelope JSON, or `-` for stdin
    #[arg(long, default_value = "-")]
    pub message: String,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = load_config(config_path)?;

        let raw = self.read_envelope()?;
        let envelope: DeliveryEnvelope = match serde_json::from_str(&raw) {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::error!(error = %e, "Delivery envelope is not valid JSON");
                eprintln!("Error: invalid delivery envelope: {e}");
                return Ok(2);
            }
        };

        let message = match envelope.into_message() {
            Ok(message) => message,
            Err(e) => {
                tracing::error!(error = %e, "Message failed validation");
                eprintln!("Error: {e}");
                return Ok(2);
            }
        };

        let admin = Arc::new(RestDatabaseAdmin::new(&config.source)?);
        let publisher = Arc::new(RestQueuePublisher::new(
            &config.queue,
            config.export.tables_list_topic.clone(),
        )?);
        let coordinator =
            BatchExportCoordinator::new(admin, publisher, ExportJobConfig::from_config(&config));

        match coordinator.handle(message).await {
            Ok(summary) => {
                summary.log_summary();
                match summary.outcome {
                    BatchOutcome::Completed => {
                        println!("Batch complete: {} tables exported", summary.tables_exported)
                    }
                    BatchOutcome::Republished => println!(
                        "Batch budget reached: {} exported, {} re-published",
                        summary.tables_exported, summary.tables_republished
                    ),
                    BatchOutcome::ConflictSkip => {
                        println!("Another invocation owns this batch, exiting")
                    }
                }
                Ok(0)
            }
            Err(e) if !e.is_retryable() => {
                tracing::error!(error = %e, "Batch failed fatally");
                eprintln!("Error: {e}");
                Ok(2)
            }
            Err(e) => {
                tracing::error!(error = %e, "Batch failed");
                eprintln!("Error: {e}");
                Ok(1)
            }
        }
    }

    fn read_envelope(&self) -> anyhow::Result<String> {
        if self.message == "-" {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        } else {
            Ok(std::fs::read_to_string(&self.message)?)
        }
    }
}

//! Validate config command implementation

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                println!("Configuration invalid: {e}");
                return Ok(2);
            }
        };

        println!("Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Instance: {}", config.source.instance);
        println!("  Database: {}", config.source.database);
        println!("  Export Bucket: {}", config.export.bucket);
        println!(
            "  Time Budget: {}s",
            config.export.max_exec_time_seconds
        );
        println!("  Max Batches: {}", config.export.max_batches);
        println!("  Tables Topic: {}", config.export.tables_list_topic);
        println!("  Warehouse Dataset: {}", config.warehouse.dataset);
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_args_creation() {
        let args = ValidateArgs {};
        let _ = format!("{args:?}");
    }
}

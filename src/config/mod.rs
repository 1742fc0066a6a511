//! Configuration management for sluice.
//!
//! This module provides TOML-based configuration loading, parsing, and
//! validation.
//!
//! # Overview
//!
//! Sluice uses one TOML configuration file across all entry points, with
//! support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `SLUICE_*` environment overrides for the deployment knobs
//! - Default values for optional settings
//! - Per-section validation
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! instance = "prod-db"
//! database = "shop"
//! admin_api_base_url = "https://sqladmin.example.com"
//!
//! [export]
//! bucket = "shop-exports"
//! max_exec_time_seconds = 60
//! max_batches = 5
//! tables_list_topic = "tables-list"
//! seed_query = "SELECT table_name FROM information_schema.tables WHERE table_schema = 'shop'"
//!
//! [queue]
//! api_base_url = "https://queue.example.com"
//! auth_token = "${SLUICE_QUEUE_TOKEN}"
//!
//! [storage]
//! api_base_url = "https://storage.example.com"
//! bucket = "shop-exports"
//! clean_destination_bucket = "shop-clean"
//!
//! [warehouse]
//! api_base_url = "https://warehouse.example.com"
//! dataset = "shop_analytics"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

// Re-export commonly used types
pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ExportConfig, LoggingConfig, QueueConfig, SecretsConfig, SluiceConfig,
    SourceConfig, StorageConfig, WarehouseConfig,
};
pub use secret::{secret_string, secret_string_opt, SecretString, SecretValue};

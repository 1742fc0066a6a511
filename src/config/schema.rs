//! Configuration schema types
//!
//! This module defines the configuration structure for sluice. One TOML
//! file covers all functions; each function reads the sections it needs.

use crate::config::SecretString;
use serde::{Deserialize, Serialize};

/// Main sluice configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SluiceConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Source database and admin API
    pub source: SourceConfig,

    /// Export job settings (coordinator + lister)
    pub export: ExportConfig,

    /// Message queue
    pub queue: QueueConfig,

    /// Object store
    pub storage: StorageConfig,

    /// Warehouse loader
    pub warehouse: WarehouseConfig,

    /// Secret store
    #[serde(default)]
    pub secrets: SecretsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SluiceConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.export.validate()?;
        self.queue.validate()?;
        self.storage.validate()?;
        self.warehouse.validate()?;
        self.secrets.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Source database configuration
///
/// Covers both the admin API (export trigger + operation status) and the
/// direct connection the table lister uses for its seed query. Connection
/// credentials are NOT configured here; they come from the secret store
/// at invocation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Database instance identifier, as the admin API knows it
    pub instance: String,

    /// Database (schema) name within the instance
    pub database: String,

    /// Base URL of the database admin API
    pub admin_api_base_url: String,

    /// Bearer token for the admin API (optional; `${VAR}` substitution)
    #[serde(default)]
    pub auth_token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Seed-query connection pool size
    #[serde(default = "default_pool_size")]
    pub max_connections: usize,

    /// Seed-query connection timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub connection_timeout_seconds: u64,
}

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if self.instance.is_empty() {
            return Err("source.instance cannot be empty".to_string());
        }
        if self.database.is_empty() {
            return Err("source.database cannot be empty".to_string());
        }
        validate_base_url("source.admin_api_base_url", &self.admin_api_base_url)?;
        if self.max_connections == 0 {
            return Err("source.max_connections must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Export job configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Destination bucket for schema and data exports
    pub bucket: String,

    /// Wall-clock budget for one coordinator invocation, in seconds.
    /// Checked between tables; once exceeded the remainder is
    /// re-published as the next batch.
    #[serde(default = "default_max_exec_time")]
    pub max_exec_time_seconds: u64,

    /// Ceiling on batch chain length
    #[serde(default = "default_max_batches")]
    pub max_batches: u32,

    /// Topic the table list messages travel on
    pub tables_list_topic: String,

    /// Seed query producing one table name per row
    pub seed_query: String,

    /// Status poll attempts per export operation
    #[serde(default = "default_poll_attempts")]
    pub poll_attempts: u32,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.bucket.is_empty() {
            return Err("export.bucket cannot be empty".to_string());
        }
        if self.tables_list_topic.is_empty() {
            return Err("export.tables_list_topic cannot be empty".to_string());
        }
        if self.seed_query.is_empty() {
            return Err("export.seed_query cannot be empty".to_string());
        }
        if self.max_batches == 0 {
            return Err("export.max_batches must be at least 1".to_string());
        }
        if self.poll_attempts == 0 {
            return Err("export.poll_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Message queue configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Base URL of the queue API
    pub api_base_url: String,

    /// Bearer token for the queue API (optional)
    #[serde(default)]
    pub auth_token: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl QueueConfig {
    fn validate(&self) -> Result<(), String> {
        validate_base_url("queue.api_base_url", &self.api_base_url)
    }
}

/// Object store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Base URL of the object store API
    pub api_base_url: String,

    /// Bearer token for the object store (optional)
    #[serde(default)]
    pub auth_token: Option<SecretString>,

    /// Bucket the cleaner reads raw exports from
    pub bucket: String,

    /// Bucket the cleaner writes cleaned objects to
    pub clean_destination_bucket: String,

    /// Request timeout in seconds
    #[serde(default = "default_storage_timeout")]
    pub timeout_seconds: u64,
}

impl StorageConfig {
    fn validate(&self) -> Result<(), String> {
        validate_base_url("storage.api_base_url", &self.api_base_url)?;
        if self.bucket.is_empty() {
            return Err("storage.bucket cannot be empty".to_string());
        }
        if self.clean_destination_bucket.is_empty() {
            return Err("storage.clean_destination_bucket cannot be empty".to_string());
        }
        Ok(())
    }
}

/// Warehouse loader configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WarehouseConfig {
    /// Base URL of the warehouse API
    pub api_base_url: String,

    /// Bearer token for the warehouse API (optional)
    #[serde(default)]
    pub auth_token: Option<SecretString>,

    /// Dataset the tables are loaded into
    pub dataset: String,

    /// Seconds between load-job status checks
    #[serde(default = "default_job_poll_interval")]
    pub job_poll_interval_seconds: u64,

    /// Ceiling on the synchronous wait for a load job, in seconds
    #[serde(default = "default_job_wait_timeout")]
    pub job_wait_timeout_seconds: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl WarehouseConfig {
    fn validate(&self) -> Result<(), String> {
        validate_base_url("warehouse.api_base_url", &self.api_base_url)?;
        if self.dataset.is_empty() {
            return Err("warehouse.dataset cannot be empty".to_string());
        }
        if self.job_poll_interval_seconds == 0 {
            return Err("warehouse.job_poll_interval_seconds must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Secret store configuration
///
/// The secret names default to the conventional ones; the base URL is
/// required only by entry points that actually fetch credentials (the
/// table lister).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretsConfig {
    /// Base URL of the secret store API
    #[serde(default)]
    pub api_base_url: String,

    /// Bearer token for the secret store (optional)
    #[serde(default)]
    pub auth_token: Option<SecretString>,

    /// Secret holding the source database username
    #[serde(default = "default_sql_user_secret")]
    pub sql_user_secret: String,

    /// Secret holding the source database password
    #[serde(default = "default_sql_pass_secret")]
    pub sql_pass_secret: String,

    /// Secret holding the source database connection name
    #[serde(default = "default_sql_connection_secret")]
    pub sql_connection_name_secret: String,

    /// Request timeout in seconds
    #[serde(default = "default_secret_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            auth_token: None,
            sql_user_secret: default_sql_user_secret(),
            sql_pass_secret: default_sql_pass_secret(),
            sql_connection_name_secret: default_sql_connection_secret(),
            timeout_seconds: default_secret_timeout(),
        }
    }
}

impl SecretsConfig {
    fn validate(&self) -> Result<(), String> {
        if !self.api_base_url.is_empty() {
            validate_base_url("secrets.api_base_url", &self.api_base_url)?;
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Log file rotation: daily or hourly
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

fn validate_base_url(field: &str, value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err(format!("{field} cannot be empty"));
    }
    if !value.starts_with("http://") && !value.starts_with("https://") {
        return Err(format!("{field} must start with http:// or https://"));
    }
    Ok(())
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_storage_timeout() -> u64 {
    60
}

fn default_secret_timeout() -> u64 {
    10
}

fn default_pool_size() -> usize {
    2
}

fn default_max_exec_time() -> u64 {
    60
}

fn default_max_batches() -> u32 {
    5
}

fn default_poll_attempts() -> u32 {
    8
}

fn default_job_poll_interval() -> u64 {
    2
}

fn default_job_wait_timeout() -> u64 {
    300
}

fn default_sql_user_secret() -> String {
    "sql_user".to_string()
}

fn default_sql_pass_secret() -> String {
    "sql_pass".to_string()
}

fn default_sql_connection_secret() -> String {
    "sql_connection_name".to_string()
}

fn default_log_path() -> String {
    "logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}

//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Configurable log levels via config or `RUST_LOG`
//! - Console output for serverless/stdout collection
//! - Optional local file logging with rotation
//!
//! # Example
//!
//! ```no_run
//! use sluice::logging::init_logging;
//! use sluice::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Function invocation started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

// sluice - Cloud Table Export Pipeline
// Copyright (c) 2026 Sluice Contributors
// Licensed under the MIT License

//! # sluice - Cloud Table Export Pipeline
//!
//! Sluice is a set of single-shot functions that move data between
//! managed cloud services: exporting source database tables to object
//! storage, cleaning up the exported CSVs, and loading them into a
//! warehouse. Long multi-table exports are split across invocations by a
//! batched continuation protocol over a message queue.
//!
//! ## Overview
//!
//! - **Table lister** - runs a configured query and publishes the table
//!   list as the seed message of an export chain
//! - **Batch export coordinator** - consumes a batch message, exports
//!   each table's schema and data, and re-publishes the remainder with
//!   an incremented batch number when the time budget runs out, up to a
//!   configured ceiling
//! - **CSV cleaner** - rewrites the export's NULL markers and infers
//!   warehouse schemas from schema exports
//! - **Warehouse loader** - truncate-and-loads cleaned CSVs, waiting for
//!   the job and reporting row counts
//!
//! ## Architecture
//!
//! Sluice follows a layered architecture:
//!
//! - [`cli`] - Command-line interface; one subcommand per function
//! - [`core`] - Business logic (coordinator, poller, lister, cleaner,
//!   loader)
//! - [`adapters`] - External collaborators behind capability traits
//!   (database admin API, queue, object store, warehouse, secret store,
//!   source database)
//! - [`domain`] - Message, operation, and schema models plus error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sluice::adapters::database::RestDatabaseAdmin;
//! use sluice::adapters::queue::RestQueuePublisher;
//! use sluice::config::load_config;
//! use sluice::core::{BatchExportCoordinator, ExportJobConfig};
//! use sluice::domain::DeliveryEnvelope;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("sluice.toml")?;
//!
//!     let envelope: DeliveryEnvelope =
//!         serde_json::from_str(r#"{"data": "b3JkZXJz", "attributes": {"batch_no": "1", "max_batches": "5"}}"#)?;
//!     let message = envelope.into_message()?;
//!
//!     let admin = Arc::new(RestDatabaseAdmin::new(&config.source)?);
//!     let publisher = Arc::new(RestQueuePublisher::new(
//!         &config.queue,
//!         config.export.tables_list_topic.clone(),
//!     )?);
//!     let coordinator = BatchExportCoordinator::new(
//!         admin,
//!         publisher,
//!         ExportJobConfig::from_config(&config),
//!     );
//!
//!     let summary = coordinator.handle(message).await?;
//!     println!("Exported {} tables", summary.tables_exported);
//!     Ok(())
//! }
//! ```
//!
//! ## Delivery Semantics
//!
//! The queue delivers at-least-once; there is no exactly-once guarantee
//! anywhere in this pipeline. Duplicate deliveries are tolerated by the
//! admin API's refusal to run concurrent exports against the same
//! instance, which the coordinator surfaces as a clean
//! [`ConflictSkip`](core::BatchOutcome::ConflictSkip) exit. Fatal errors
//! surface as non-zero exit codes and the queue's own redelivery policy
//! decides whether to try again.
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::Result`], with
//! [`domain::SluiceError`] distinguishing retryable failures from those
//! redelivery can never fix (`is_retryable`).
//!
//! ## Logging
//!
//! Sluice uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! tracing::info!(batch_no = 1, tables = 12, "Starting export batch");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;

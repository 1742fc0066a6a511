//! Business logic
//!
//! One module per function, plus the poller the coordinator shares:
//!
//! - [`lister`] - seed an export chain from the configured query
//! - [`coordinator`] - drain a batch message, re-publishing the tail
//!   when the time budget runs out
//! - [`poller`] - backoff/jitter status polling for export operations
//! - [`cleaner`] - NULL-marker cleanup and schema inference
//! - [`loader`] - truncate-and-load cleaned CSVs into the warehouse

pub mod cleaner;
pub mod coordinator;
pub mod lister;
pub mod loader;
pub mod poller;

pub use cleaner::{BlobCleaner, CleanOutcome};
pub use coordinator::{BatchExportCoordinator, BatchOutcome, BatchRunSummary, ExportJobConfig};
pub use lister::TableLister;
pub use loader::{CsvLoader, LoadReport};
pub use poller::{OperationPoller, PollOutcome};

//! Warehouse load abstraction traits

use crate::domain::ids::LoadJobId;
use crate::domain::schema::SchemaField;
use crate::domain::Result;
use async_trait::async_trait;

/// One truncate-and-load job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadJobRequest {
    /// Object-store URI of the CSV to load
    pub source_uri: String,

    /// Destination table (replaced wholesale on load)
    pub table: String,

    /// Explicit column schema for the load
    pub schema: Vec<SchemaField>,
}

/// Warehouse load capability
///
/// Loads replace the destination table's contents; callers wait for the
/// job synchronously and report the resulting row count.
#[async_trait]
pub trait WarehouseLoader: Send + Sync {
    /// Start a truncate-and-load job
    ///
    /// # Errors
    ///
    /// Returns an error if the job is rejected.
    async fn start_load(&self, request: &LoadJobRequest) -> Result<LoadJobId>;

    /// Block until the job reaches a terminal state, returning the number
    /// of rows in the destination table
    ///
    /// # Errors
    ///
    /// Returns an error if the job fails, or if the wait exceeds the
    /// configured ceiling.
    async fn wait_for_load(&self, id: &LoadJobId) -> Result<u64>;
}

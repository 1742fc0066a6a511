//! Database admin abstraction traits
//!
//! This module defines the capability the coordinator uses to drive
//! exports: trigger an asynchronous export of a query's result set to an
//! object-store URI, and read the status of a previously started
//! operation.

use crate::domain::ids::OperationId;
use crate::domain::operation::OperationStatus;
use crate::domain::Result;
use async_trait::async_trait;

/// One export trigger call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    /// Database instance, as the admin API names it
    pub instance: String,

    /// Database within the instance
    pub database: String,

    /// SELECT statement whose result set is exported as CSV
    pub select_query: String,

    /// Object-store URI the export lands at
    pub destination_uri: String,
}

/// Outcome of an export trigger call
///
/// `Conflict` is a named result, not an error: the admin API refuses to
/// run two exports against the same instance concurrently, and the
/// coordinator leans on that refusal to detect duplicate message
/// delivery. Callers must not treat it as a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportStart {
    /// Export accepted; poll the operation for completion
    Accepted(OperationId),

    /// Another export is already running against this instance
    Conflict,
}

/// Database admin capability
///
/// The coordinator only ever sees this trait; the concrete REST client
/// maps the vendor's error-code conventions (e.g. HTTP 409) into
/// [`ExportStart::Conflict`] so the core stays decoupled from them.
#[async_trait]
pub trait DatabaseAdmin: Send + Sync {
    /// Trigger an asynchronous CSV export
    ///
    /// # Errors
    ///
    /// Returns an error for anything other than acceptance or a
    /// concurrent-export conflict.
    async fn start_export(&self, request: &ExportRequest) -> Result<ExportStart>;

    /// Read the current status of an operation
    ///
    /// # Errors
    ///
    /// Returns an error if the status endpoint cannot be reached or the
    /// response cannot be interpreted.
    async fn operation_status(&self, id: &OperationId) -> Result<OperationStatus>;
}

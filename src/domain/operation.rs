//! Export operation model
//!
//! An export operation is the remote, asynchronous side of one trigger
//! call: the admin API accepts a query plus destination URI and returns
//! an operation handle whose status is observed by polling. Operations
//! live only for the duration of one poll loop; nothing is persisted
//! across invocations.

use crate::domain::ids::{OperationId, TableName};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an export operation produces for a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportKind {
    /// Column name/type listing, destined for `schemas/<date>/<table>.schema`
    Schema,
    /// Full row data, destined for `exports/<date>/<table>.csv`
    Data,
}

impl fmt::Display for ExportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportKind::Schema => write!(f, "schema"),
            ExportKind::Data => write!(f, "data"),
        }
    }
}

/// Remote status of an export operation
///
/// Wire names match the admin API's status strings. Anything the API
/// reports that we don't recognize maps to `Unknown` rather than failing
/// the poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationStatus {
    /// Queued, not yet started
    Pending,
    /// In progress
    Running,
    /// Terminal: completed successfully
    Done,
    /// Terminal: failed remotely
    Failed,
    /// Reported status not recognized
    #[serde(other)]
    Unknown,
}

impl OperationStatus {
    /// Parse a status string as reported by the admin API
    pub fn from_wire(value: &str) -> Self {
        match value {
            "PENDING" => OperationStatus::Pending,
            "RUNNING" => OperationStatus::Running,
            "DONE" => OperationStatus::Done,
            "FAILED" => OperationStatus::Failed,
            _ => OperationStatus::Unknown,
        }
    }
}

impl fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OperationStatus::Pending => "PENDING",
            OperationStatus::Running => "RUNNING",
            OperationStatus::Done => "DONE",
            OperationStatus::Failed => "FAILED",
            OperationStatus::Unknown => "UNKNOWN",
        };
        write!(f, "{s}")
    }
}

/// One in-flight export, tracked for the duration of a poll loop
#[derive(Debug, Clone)]
pub struct ExportOperation {
    /// Table being exported
    pub table: TableName,

    /// Schema or data export
    pub kind: ExportKind,

    /// Where the export lands in the object store
    pub destination_uri: String,

    /// Handle for the status endpoint
    pub operation_id: OperationId,

    /// Last observed status
    pub status: OperationStatus,
}

impl ExportOperation {
    /// Create a freshly triggered operation (status starts `Pending`)
    pub fn new(
        table: TableName,
        kind: ExportKind,
        destination_uri: impl Into<String>,
        operation_id: OperationId,
    ) -> Self {
        Self {
            table,
            kind,
            destination_uri: destination_uri.into(),
            operation_id,
            status: OperationStatus::Pending,
        }
    }
}

//! Domain error types
//!
//! This module defines the error hierarchy for sluice. All errors are
//! domain-specific and don't expose third-party types. The split between
//! retryable and non-retryable errors drives the exit codes the queue's
//! redelivery policy reacts to.

use thiserror::Error;

/// Main sluice error type
///
/// This is the primary error type used throughout the application.
/// It wraps the per-collaborator error types and provides context for
/// error handling.
#[derive(Debug, Error)]
pub enum SluiceError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Queue message decoding and validation errors
    #[error("Message error: {0}")]
    Message(#[from] MessageError),

    /// Database admin API errors
    #[error("Database admin error: {0}")]
    Database(#[from] DatabaseError),

    /// Message queue errors
    #[error("Queue error: {0}")]
    Queue(#[from] QueueError),

    /// Object store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Warehouse load errors
    #[error("Warehouse error: {0}")]
    Warehouse(#[from] WarehouseError),

    /// Secret store errors
    #[error("Secret error: {0}")]
    Secret(#[from] SecretError),

    /// Source database errors (seed query)
    #[error("Source database error: {0}")]
    Source(String),

    /// Batch chain has re-published itself past the configured ceiling.
    /// Never retried; this terminates the chain.
    #[error("Batch {batch_no} exceeds the configured ceiling of {max_batches} batches")]
    BatchCeilingExceeded { batch_no: u32, max_batches: u32 },

    /// A table export failed; the whole invocation aborts and the queue
    /// may redeliver the message.
    #[error("Failed to export table `{table}` in batch {batch_no}: {source}")]
    TableExport {
        table: String,
        batch_no: u32,
        #[source]
        source: Box<SluiceError>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl SluiceError {
    /// Whether the queue's redelivery policy should be allowed to retry
    /// the invocation that produced this error.
    ///
    /// Ceiling violations and malformed messages will fail the same way
    /// on every delivery; everything else may be transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            SluiceError::BatchCeilingExceeded { .. }
            | SluiceError::Message(_)
            | SluiceError::Configuration(_) => false,
            SluiceError::TableExport { source, .. } => source.is_retryable(),
            _ => true,
        }
    }
}

/// Queue message decoding errors
///
/// Produced at the delivery boundary when the payload or attributes do
/// not form a valid [`ExportBatchMessage`](crate::domain::message::ExportBatchMessage).
/// Distinct from [`SluiceError::BatchCeilingExceeded`]: a well-formed
/// message over the ceiling decodes fine and fails in the coordinator.
#[derive(Debug, Error)]
pub enum MessageError {
    /// Payload bytes are not valid UTF-8
    #[error("Message payload is not valid UTF-8")]
    InvalidPayload,

    /// A required attribute is absent
    #[error("Missing required message attribute `{0}`")]
    MissingAttribute(&'static str),

    /// An attribute is present but not a positive integer
    #[error("Message attribute `{name}` has invalid value `{value}`: expected an integer >= 1")]
    InvalidAttribute { name: &'static str, value: String },

    /// The payload decodes to zero table names
    #[error("Message contains no table names")]
    EmptyTableList,

    /// A table name in the payload fails validation
    #[error("Invalid table name in message: {0}")]
    InvalidTableName(String),
}

/// Database admin API errors
///
/// Errors from the export trigger and operation status endpoints. These
/// don't expose the HTTP client's types. A concurrent-export conflict is
/// NOT an error: it surfaces as
/// [`ExportStart::Conflict`](crate::adapters::database::ExportStart).
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Failed to reach the admin API
    #[error("Failed to connect to database admin API: {0}")]
    ConnectionFailed(String),

    /// The API rejected the request
    #[error("Admin API request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// The API returned a body we could not interpret
    #[error("Invalid response from admin API: {0}")]
    InvalidResponse(String),

    /// An export operation reported a FAILED status
    #[error("Export operation {0} reported FAILED")]
    OperationFailed(String),

    /// Request timed out
    #[error("Admin API request timed out: {0}")]
    Timeout(String),
}

/// Message queue errors
#[derive(Debug, Error)]
pub enum QueueError {
    /// Failed to reach the queue API
    #[error("Failed to connect to queue: {0}")]
    ConnectionFailed(String),

    /// The publish call was rejected
    #[error("Publish failed with status {status}: {message}")]
    PublishFailed { status: u16, message: String },

    /// The publish response could not be interpreted
    #[error("Invalid response from queue: {0}")]
    InvalidResponse(String),
}

/// Object store errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to reach the object store
    #[error("Failed to connect to object store: {0}")]
    ConnectionFailed(String),

    /// The named object does not exist
    #[error("Object not found: {0}")]
    NotFound(String),

    /// The store rejected the request
    #[error("Object store request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// The object body could not be interpreted
    #[error("Invalid object content for `{name}`: {message}")]
    InvalidContent { name: String, message: String },
}

/// Warehouse load errors
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// Failed to reach the warehouse API
    #[error("Failed to connect to warehouse: {0}")]
    ConnectionFailed(String),

    /// The load job was rejected or reported failure
    #[error("Load job failed for table `{table}`: {message}")]
    JobFailed { table: String, message: String },

    /// The API rejected the request
    #[error("Warehouse request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// The API returned a body we could not interpret
    #[error("Invalid response from warehouse: {0}")]
    InvalidResponse(String),

    /// The synchronous wait for a load job gave up
    #[error("Timed out waiting for load job {0}")]
    WaitTimeout(String),
}

/// Secret store errors
#[derive(Debug, Error)]
pub enum SecretError {
    /// Failed to reach the secret store
    #[error("Failed to connect to secret store: {0}")]
    ConnectionFailed(String),

    /// The named secret does not exist
    #[error("Secret not found: {0}")]
    NotFound(String),

    /// The store rejected the request
    #[error("Secret store request failed with status {status}: {message}")]
    RequestFailed { status: u16, message: String },

    /// The secret payload could not be decoded
    #[error("Invalid secret payload for `{0}`")]
    InvalidPayload(String),
}

// Conversion from std::io::Error
impl From<std::io::Error> for SluiceError {
    fn from(err: std::io::Error) -> Self {
        SluiceError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for SluiceError {
    fn from(err: serde_json::Error) -> Self {
        SluiceError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for SluiceError {
    fn from(err: toml::de::Error) -> Self {
        SluiceError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sluice_error_display() {
        let err = SluiceError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_message_error_conversion() {
        let msg_err = MessageError::MissingAttribute("batch_no");
        let err: SluiceError = msg_err.into();
        assert!(matches!(err, SluiceError::Message(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_database_error_conversion() {
        let db_err = DatabaseError::RequestFailed {
            status: 500,
            message: "boom".to_string(),
        };
        let err: SluiceError = db_err.into();
        assert!(matches!(err, SluiceError::Database(_)));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_ceiling_error_is_not_retryable() {
        let err = SluiceError::BatchCeilingExceeded {
            batch_no: 6,
            max_batches: 5,
        };
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("ceiling"));
    }

    #[test]
    fn test_table_export_inherits_retryability() {
        let retryable = SluiceError::TableExport {
            table: "orders".to_string(),
            batch_no: 2,
            source: Box::new(SluiceError::Database(DatabaseError::Timeout(
                "slow".to_string(),
            ))),
        };
        assert!(retryable.is_retryable());

        let fatal = SluiceError::TableExport {
            table: "orders".to_string(),
            batch_no: 2,
            source: Box::new(SluiceError::Configuration("bad".to_string())),
        };
        assert!(!fatal.is_retryable());
    }

    #[test]
    fn test_table_export_display_includes_context() {
        let err = SluiceError::TableExport {
            table: "orders".to_string(),
            batch_no: 3,
            source: Box::new(SluiceError::Database(DatabaseError::RequestFailed {
                status: 500,
                message: "server error".to_string(),
            })),
        };
        let text = err.to_string();
        assert!(text.contains("orders"));
        assert!(text.contains("batch 3"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: SluiceError = io_err.into();
        assert!(matches!(err, SluiceError::Io(_)));
    }

    #[test]
    fn test_sluice_error_implements_std_error() {
        let err = SluiceError::Serialization("Test error".to_string());
        let _: &dyn std::error::Error = &err;
    }
}

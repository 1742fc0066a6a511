//! Domain models and types for sluice.
//!
//! This module contains the core domain models, types, and business rules
//! shared by the export functions.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`TableName`], [`OperationId`],
//!   [`MessageId`], [`LoadJobId`])
//! - **The queue message model** ([`ExportBatchMessage`],
//!   [`DeliveryEnvelope`]), decoded and validated at the delivery
//!   boundary
//! - **The export operation model** ([`ExportOperation`],
//!   [`OperationStatus`])
//! - **Warehouse schema types** ([`SchemaField`], [`FieldType`])
//! - **Error types** ([`SluiceError`] and the per-collaborator enums)
//! - **Result type alias** ([`Result`])
//!
//! # Type Safety
//!
//! Identifiers use the newtype pattern so a table name can never be
//! confused with an operation handle:
//!
//! ```
//! use sluice::domain::{TableName, OperationId};
//!
//! # fn example() -> Result<(), String> {
//! let table = TableName::new("orders")?;
//! let operation = OperationId::new("op-8254")?;
//! # Ok(())
//! # }
//! ```

pub mod errors;
pub mod ids;
pub mod message;
pub mod operation;
pub mod result;
pub mod schema;

// Re-export commonly used types for convenience
pub use errors::{
    DatabaseError, MessageError, QueueError, SecretError, SluiceError, StorageError,
    WarehouseError,
};
pub use ids::{LoadJobId, MessageId, OperationId, TableName};
pub use message::{DeliveryEnvelope, ExportBatchMessage};
pub use operation::{ExportKind, ExportOperation, OperationStatus};
pub use result::Result;
pub use schema::{FieldType, SchemaField};

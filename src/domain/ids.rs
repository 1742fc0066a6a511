//! Domain identifier types with validation
//!
//! This module provides newtype wrappers for the identifiers that flow
//! between the export functions. Each type validates its wire constraints
//! on construction so the rest of the code can rely on them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Table name newtype wrapper
///
/// Represents a source database table selected for export. The queue wire
/// format joins table names with commas and the export statements
/// interpolate the name into a backtick-quoted identifier, so names
/// containing either character are rejected.
///
/// # Examples
///
/// ```
/// use sluice::domain::ids::TableName;
/// use std::str::FromStr;
///
/// let table = TableName::from_str("customer_orders").unwrap();
/// assert_eq!(table.as_str(), "customer_orders");
///
/// assert!(TableName::from_str("bad,name").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableName(String);

impl TableName {
    /// Creates a new TableName from a string
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or contains a character the
    /// wire format or export statements cannot carry.
    pub fn new(name: impl Into<String>) -> Result<Self, String> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err("Table name cannot be empty".to_string());
        }
        if trimmed.contains(',') {
            return Err(format!(
                "Table name `{trimmed}` contains a comma, which the message format cannot carry"
            ));
        }
        if trimmed.contains('`') {
            return Err(format!("Table name `{trimmed}` contains a backtick"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the table name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TableName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Export operation identifier newtype wrapper
///
/// Handle returned by the database admin API when an export is accepted.
/// Opaque to this system; only ever passed back to the status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationId(String);

impl OperationId {
    /// Creates a new OperationId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Operation ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the operation ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OperationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Queue message identifier returned by a successful publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageId(String);

impl MessageId {
    /// Creates a new MessageId from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the message ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Warehouse load job identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadJobId(String);

impl LoadJobId {
    /// Creates a new LoadJobId from a string
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the job ID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LoadJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

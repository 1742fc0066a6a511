//! Database admin adapter
//!
//! The export trigger and operation status capability, plus the REST
//! client implementing it.

pub mod rest;
pub mod traits;

pub use rest::RestDatabaseAdmin;
pub use traits::{DatabaseAdmin, ExportRequest, ExportStart};

//! External integrations
//!
//! Each collaborator the functions depend on lives behind a narrow
//! capability trait with a REST-backed implementation next to it:
//!
//! - [`database`] - Database admin API (export trigger + operation status)
//! - [`queue`] - Message queue publisher
//! - [`storage`] - Object store
//! - [`warehouse`] - Warehouse load API
//! - [`secrets`] - Secret store
//! - [`source`] - Direct source-database connection (seed query)
//!
//! The core consumes only the traits; wiring concrete clients happens in
//! the CLI commands.

pub mod database;
pub mod queue;
pub mod secrets;
pub mod source;
pub mod storage;
pub mod warehouse;

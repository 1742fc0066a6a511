//! Command implementations

pub mod clean;
pub mod export;
pub mod list_tables;
pub mod load;
pub mod validate;

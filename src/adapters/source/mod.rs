//! Source database adapter
//!
//! Direct connection to the source database, used by the table lister's
//! seed query. Credentials come from the secret store at connect time.

pub mod client;

pub use client::{SourceDatabase, TableSource};

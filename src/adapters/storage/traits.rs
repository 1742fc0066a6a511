//! Object store abstraction traits

use crate::domain::Result;
use async_trait::async_trait;

/// Object store capability, scoped to one bucket
///
/// Objects are named byte blobs; names may contain `/` separators, which
/// the store treats as opaque.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch an object's bytes
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::NotFound`](crate::domain::StorageError::NotFound)
    /// if the object does not exist, other storage errors otherwise.
    async fn fetch(&self, name: &str) -> Result<Vec<u8>>;

    /// Store an object, replacing any existing object of that name
    ///
    /// # Errors
    ///
    /// Returns an error if the write is rejected.
    async fn store(&self, name: &str, bytes: Vec<u8>) -> Result<()>;

    /// The bucket this store is scoped to
    fn bucket(&self) -> &str;
}

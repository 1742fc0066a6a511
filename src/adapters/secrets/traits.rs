//! Secret store abstraction traits

use crate::config::SecretString;
use crate::domain::Result;
use async_trait::async_trait;

/// Secret fetch capability
///
/// One method: fetch a named credential. Injected into the entry points
/// that need credentials rather than looked up ambiently; callers fetch
/// at invocation time and never cache across invocations.
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Fetch the latest version of a named secret
    ///
    /// # Errors
    ///
    /// Returns [`SecretError::NotFound`](crate::domain::SecretError::NotFound)
    /// if the secret does not exist, other secret-store errors otherwise.
    async fn fetch(&self, name: &str) -> Result<SecretString>;
}

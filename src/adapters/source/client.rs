//! Source database client
//!
//! Pooled connection to the source database for the seed query. The
//! connection credentials (`sql_user`, `sql_pass`, `sql_connection_name`)
//! are fetched from the secret store when the client is built, once per
//! invocation, and are not cached beyond the pool's lifetime.

use crate::adapters::secrets::SecretProvider;
use crate::config::{SecretsConfig, SourceConfig};
use crate::domain::{Result, SluiceError};
use async_trait::async_trait;
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::NoTls;

/// Capability the table lister consumes: run a query returning one table
/// name per row
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Execute the seed query and collect the single-column result
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails; the lister propagates it.
    async fn table_names(&self, query: &str) -> Result<Vec<String>>;
}

/// Pooled source database client
pub struct SourceDatabase {
    pool: Pool,
}

impl SourceDatabase {
    /// Connect to the source database with secret-store credentials
    ///
    /// The connection name secret is used as the host: an absolute path
    /// selects a unix socket directory, anything else is a hostname.
    ///
    /// # Errors
    ///
    /// Returns an error if a credential cannot be fetched or the pool
    /// cannot be built.
    pub async fn connect(
        config: &SourceConfig,
        secrets_config: &SecretsConfig,
        secrets: &dyn SecretProvider,
    ) -> Result<Self> {
        let user = secrets.fetch(&secrets_config.sql_user_secret).await?;
        let password = secrets.fetch(&secrets_config.sql_pass_secret).await?;
        let connection_name = secrets
            .fetch(&secrets_config.sql_connection_name_secret)
            .await?;

        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .user(user.expose_secret().as_ref())
            .password(password.expose_secret().as_ref())
            .dbname(&config.database)
            .host(connection_name.expose_secret().as_ref())
            .connect_timeout(Duration::from_secs(config.connection_timeout_seconds));

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .wait_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .create_timeout(Some(Duration::from_secs(config.connection_timeout_seconds)))
            .build()
            .map_err(|e| SluiceError::Source(format!("Failed to create connection pool: {e}")))?;

        Ok(Self { pool })
    }

    async fn connection(&self) -> Result<deadpool_postgres::Object> {
        self.pool
            .get()
            .await
            .map_err(|e| SluiceError::Source(format!("Failed to get connection from pool: {e}")))
    }
}

#[async_trait]
impl TableSource for SourceDatabase {
    async fn table_names(&self, query: &str) -> Result<Vec<String>> {
        let client = self.connection().await?;

        let rows = client
            .query(query, &[])
            .await
            .map_err(|e| SluiceError::Source(format!("Seed query failed: {e}")))?;

        let mut names = Vec::with_capacity(rows.len());
        for row in rows {
            let name: String = row
                .try_get(0)
                .map_err(|e| SluiceError::Source(format!("Seed query returned non-text column: {e}")))?;
            names.push(name);
        }

        tracing::debug!(count = names.len(), "Seed query returned table names");
        Ok(names)
    }
}

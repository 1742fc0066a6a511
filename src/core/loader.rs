//! Warehouse loading function
//!
//! Reacts to a cleaned CSV landing in the clean bucket: looks up the
//! sibling schema JSON at `schemas/<table>.json`, issues a
//! truncate-and-load job named after the file's basename, waits for it,
//! and reports the destination row count. Non-CSV objects are ignored.

use crate::adapters::storage::ObjectStore;
use crate::adapters::warehouse::{LoadJobRequest, WarehouseLoader};
use crate::domain::schema::SchemaField;
use crate::domain::{Result, SluiceError};
use std::sync::Arc;

/// Report of one completed load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadReport {
    /// Destination table
    pub table: String,

    /// Rows in the destination table after the load
    pub rows: u64,
}

/// Loader from the clean bucket into the warehouse
pub struct CsvLoader {
    store: Arc<dyn ObjectStore>,
    warehouse: Arc<dyn WarehouseLoader>,
}

impl CsvLoader {
    /// Create a loader reading schemas and CSVs from `store`
    pub fn new(store: Arc<dyn ObjectStore>, warehouse: Arc<dyn WarehouseLoader>) -> Self {
        Self { store, warehouse }
    }

    /// Load one object into the warehouse
    ///
    /// Returns `Ok(None)` for objects that are not CSV files.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema is missing or unreadable, the job
    /// is rejected, or the job fails.
    pub async fn load_object(&self, name: &str) -> Result<Option<LoadReport>> {
        let Some(table) = csv_table_name(name) else {
            tracing::debug!(object = name, "Not a CSV file, skipping");
            return Ok(None);
        };

        let schema_object = format!("schemas/{table}.json");
        let schema_bytes = self.store.fetch(&schema_object).await?;
        let schema: Vec<SchemaField> = serde_json::from_slice(&schema_bytes).map_err(|e| {
            SluiceError::Serialization(format!("Schema {schema_object} is invalid: {e}"))
        })?;

        let request = LoadJobRequest {
            source_uri: format!("{}/{}", self.store.bucket(), name),
            table: table.to_string(),
            schema,
        };

        let job_id = self.warehouse.start_load(&request).await?;
        tracing::info!(
            table = %table,
            job = %job_id,
            "Starting warehouse load"
        );

        let rows = self.warehouse.wait_for_load(&job_id).await?;
        tracing::info!(rows, table = %table, "Loaded rows into table");

        Ok(Some(LoadReport {
            table: table.to_string(),
            rows,
        }))
    }
}

/// Destination table for a CSV object: the basename without `.csv`
fn csv_table_name(name: &str) -> Option<&str> {
    let basename = name.rsplit('/').next().unwrap_or(name);
    basename.strip_suffix(".csv").filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ids::LoadJobId;
    use crate::domain::schema::FieldType;
    use crate::domain::{StorageError, WarehouseError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MemoryStore {
        objects: HashMap<String, Vec<u8>>,
    }

    impl MemoryStore {
        fn with_schema(table: &str, json: &str) -> Self {
            let mut objects = HashMap::new();
            objects.insert(format!("schemas/{table}.json"), json.as_bytes().to_vec());
            Self { objects }
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn fetch(&self, name: &str) -> Result<Vec<u8>> {
            self.objects
                .get(name)
                .cloned()
                .ok_or_else(|| StorageError::NotFound(name.to_string()).into())
        }

        async fn store(&self, _name: &str, _bytes: Vec<u8>) -> Result<()> {
            unimplemented!("loader never writes objects")
        }

        fn bucket(&self) -> &str {
            "shop-clean"
        }
    }

    #[derive(Default)]
    struct FakeWarehouse {
        requests: Mutex<Vec<LoadJobRequest>>,
        fail_job: bool,
    }

    #[async_trait]
    impl WarehouseLoader for FakeWarehouse {
        async fn start_load(&self, request: &LoadJobRequest) -> Result<LoadJobId> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(LoadJobId::new("job-1"))
        }

        async fn wait_for_load(&self, id: &LoadJobId) -> Result<u64> {
            if self.fail_job {
                Err(WarehouseError::JobFailed {
                    table: id.to_string(),
                    message: "bad row".to_string(),
                }
                .into())
            } else {
                Ok(77)
            }
        }
    }

    const ORDERS_SCHEMA: &str =
        r#"[{"name": "id", "type": "INTEGER", "mode": "NULLABLE"}]"#;

    #[tokio::test]
    async fn test_load_csv_object() {
        let store = Arc::new(MemoryStore::with_schema("orders", ORDERS_SCHEMA));
        let warehouse = Arc::new(FakeWarehouse::default());
        let loader = CsvLoader::new(store, warehouse.clone());

        let report = loader.load_object("csv/orders.csv").await.unwrap().unwrap();

        assert_eq!(
            report,
            LoadReport {
                table: "orders".to_string(),
                rows: 77,
            }
        );

        let requests = warehouse.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].table, "orders");
        assert_eq!(requests[0].source_uri, "shop-clean/csv/orders.csv");
        assert_eq!(
            requests[0].schema,
            vec![SchemaField::nullable("id", FieldType::Integer)]
        );
    }

    #[tokio::test]
    async fn test_non_csv_object_is_skipped() {
        let store = Arc::new(MemoryStore::with_schema("orders", ORDERS_SCHEMA));
        let warehouse = Arc::new(FakeWarehouse::default());
        let loader = CsvLoader::new(store, warehouse.clone());

        let report = loader.load_object("schemas/orders.json").await.unwrap();

        assert!(report.is_none());
        assert!(warehouse.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_schema_is_an_error() {
        let store = Arc::new(MemoryStore {
            objects: HashMap::new(),
        });
        let warehouse = Arc::new(FakeWarehouse::default());
        let loader = CsvLoader::new(store, warehouse);

        let err = loader.load_object("csv/orders.csv").await.unwrap_err();
        assert!(matches!(
            err,
            SluiceError::Storage(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_failed_job_propagates() {
        let store = Arc::new(MemoryStore::with_schema("orders", ORDERS_SCHEMA));
        let warehouse = Arc::new(FakeWarehouse {
            fail_job: true,
            ..Default::default()
        });
        let loader = CsvLoader::new(store, warehouse);

        let err = loader.load_object("csv/orders.csv").await.unwrap_err();
        assert!(matches!(err, SluiceError::Warehouse(_)));
    }

    #[test]
    fn test_csv_table_name() {
        assert_eq!(csv_table_name("csv/orders.csv"), Some("orders"));
        assert_eq!(csv_table_name("orders.csv"), Some("orders"));
        assert_eq!(csv_table_name("schemas/orders.json"), None);
        assert_eq!(csv_table_name(".csv"), None);
    }
}

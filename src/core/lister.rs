//! Table lister
//!
//! Seeds an export chain: runs the configured query against the source
//! database, turns the single-column result into a table list, and
//! publishes it as the first batch message. Failures propagate; there is
//! no retry here, and the only side effect is the one publish.

use crate::adapters::queue::QueuePublisher;
use crate::adapters::source::TableSource;
use crate::domain::ids::{MessageId, TableName};
use crate::domain::message::ExportBatchMessage;
use crate::domain::{MessageError, Result};
use std::sync::Arc;

/// Table lister
pub struct TableLister {
    source: Arc<dyn TableSource>,
    publisher: Arc<dyn QueuePublisher>,
    seed_query: String,
    max_batches: u32,
}

impl TableLister {
    /// Create a new lister
    pub fn new(
        source: Arc<dyn TableSource>,
        publisher: Arc<dyn QueuePublisher>,
        seed_query: impl Into<String>,
        max_batches: u32,
    ) -> Self {
        Self {
            source,
            publisher,
            seed_query: seed_query.into(),
            max_batches,
        }
    }

    /// Run the seed query and publish the table list
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails, a returned name is invalid,
    /// the query matches no tables, or the publish fails.
    pub async fn run(&self) -> Result<MessageId> {
        let names = self.source.table_names(&self.seed_query).await?;

        let mut tables = Vec::with_capacity(names.len());
        for name in names {
            let table = TableName::new(name).map_err(MessageError::InvalidTableName)?;
            tables.push(table);
        }

        let message = ExportBatchMessage::seed(tables, self.max_batches)?;
        let (payload, attributes) = message.encode();
        let message_id = self.publisher.publish(&payload, &attributes).await?;

        tracing::info!(
            message_id = %message_id,
            tables = message.pending_tables.len(),
            max_batches = message.max_batches,
            "Published seed message with table list"
        );

        Ok(message_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SluiceError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeSource {
        names: Vec<String>,
    }

    #[async_trait]
    impl TableSource for FakeSource {
        async fn table_names(&self, _query: &str) -> Result<Vec<String>> {
            Ok(self.names.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl TableSource for FailingSource {
        async fn table_names(&self, _query: &str) -> Result<Vec<String>> {
            Err(SluiceError::Source("connection refused".to_string()))
        }
    }

    #[derive(Default)]
    struct RecordingPublisher {
        published: Mutex<Vec<(Vec<u8>, HashMap<String, String>)>>,
    }

    #[async_trait]
    impl QueuePublisher for RecordingPublisher {
        async fn publish(
            &self,
            payload: &[u8],
            attributes: &HashMap<String, String>,
        ) -> Result<MessageId> {
            self.published
                .lock()
                .unwrap()
                .push((payload.to_vec(), attributes.clone()));
            Ok(MessageId::new("1"))
        }
    }

    #[tokio::test]
    async fn test_run_publishes_seed_message() {
        let source = Arc::new(FakeSource {
            names: vec!["orders".to_string(), "customers".to_string()],
        });
        let publisher = Arc::new(RecordingPublisher::default());
        let lister = TableLister::new(source, publisher.clone(), "SELECT ...", 5);

        lister.run().await.unwrap();

        let published = publisher.published.lock().unwrap();
        assert_eq!(published.len(), 1);

        let (payload, attributes) = &published[0];
        assert_eq!(payload, b"orders,customers");
        assert_eq!(attributes["batch_no"], "1");
        assert_eq!(attributes["max_batches"], "5");
    }

    #[tokio::test]
    async fn test_run_propagates_query_failure() {
        let publisher = Arc::new(RecordingPublisher::default());
        let lister = TableLister::new(Arc::new(FailingSource), publisher.clone(), "SELECT ...", 5);

        let err = lister.run().await.unwrap_err();

        assert!(matches!(err, SluiceError::Source(_)));
        assert!(publisher.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_rejects_empty_result() {
        let source = Arc::new(FakeSource { names: Vec::new() });
        let publisher = Arc::new(RecordingPublisher::default());
        let lister = TableLister::new(source, publisher.clone(), "SELECT ...", 5);

        let err = lister.run().await.unwrap_err();

        assert!(matches!(
            err,
            SluiceError::Message(MessageError::EmptyTableList)
        ));
        assert!(publisher.published.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_run_rejects_invalid_table_name() {
        let source = Arc::new(FakeSource {
            names: vec!["good".to_string(), "bad,name".to_string()],
        });
        let publisher = Arc::new(RecordingPublisher::default());
        let lister = TableLister::new(source, publisher.clone(), "SELECT ...", 5);

        let err = lister.run().await.unwrap_err();

        assert!(matches!(
            err,
            SluiceError::Message(MessageError::InvalidTableName(_))
        ));
        assert!(publisher.published.lock().unwrap().is_empty());
    }
}

//! Batch export coordinator
//!
//! One coordinator invocation drains table names from a queue message,
//! exporting each table's schema and data to the object store, until the
//! list is empty or the wall-clock budget runs out. Remaining work is
//! handed to the next invocation by re-publishing the tail of the list
//! with an incremented batch number; a configured ceiling caps how long
//! such a chain may grow.
//!
//! The queue delivers at-least-once, so the same message may arrive
//! twice. The only defense is the admin API's refusal to run concurrent
//! exports: a [`ExportStart::Conflict`] from the trigger means another
//! invocation already owns this work, and the run exits cleanly without
//! re-publishing. There is no locking or lease here; the check is
//! cooperative and the budget is only consulted between tables, never
//! during a poll.

use crate::adapters::database::{DatabaseAdmin, ExportRequest, ExportStart};
use crate::adapters::queue::QueuePublisher;
use crate::config::SluiceConfig;
use crate::core::poller::{OperationPoller, PollOutcome};
use crate::domain::ids::TableName;
use crate::domain::message::ExportBatchMessage;
use crate::domain::operation::{ExportKind, ExportOperation, OperationStatus};
use crate::domain::{Result, SluiceError};
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;

/// Per-invocation settings for the coordinator
#[derive(Debug, Clone)]
pub struct ExportJobConfig {
    /// Database instance, as the admin API names it
    pub instance: String,

    /// Database within the instance
    pub database: String,

    /// Destination bucket
    pub bucket: String,

    /// Wall-clock budget; checked between tables
    pub exec_time_budget: Duration,

    /// Status poll attempts per export operation
    pub poll_attempts: u32,
}

impl ExportJobConfig {
    /// Extract the coordinator's settings from the full configuration
    pub fn from_config(config: &SluiceConfig) -> Self {
        Self {
            instance: config.source.instance.clone(),
            database: config.source.database.clone(),
            bucket: config.export.bucket.clone(),
            exec_time_budget: Duration::from_secs(config.export.max_exec_time_seconds),
            poll_attempts: config.export.poll_attempts,
        }
    }
}

/// How a coordinator run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchOutcome {
    /// Every pending table was exported
    Completed,

    /// The time budget ran out; the remainder was re-published
    Republished,

    /// A concurrent export was detected; another invocation owns this
    /// work and the run exited without re-publishing
    ConflictSkip,
}

/// Summary of one coordinator invocation
#[derive(Debug, Clone)]
pub struct BatchRunSummary {
    /// Batch number of the handled message
    pub batch_no: u32,

    /// Tables fully exported (schema and data) this invocation
    pub tables_exported: usize,

    /// Tables handed to the follow-up message, zero unless re-published
    pub tables_republished: usize,

    /// How the run ended
    pub outcome: BatchOutcome,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl BatchRunSummary {
    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            batch_no = self.batch_no,
            tables_exported = self.tables_exported,
            tables_republished = self.tables_republished,
            outcome = ?self.outcome,
            duration_secs = self.duration.as_secs(),
            "Batch run finished"
        );
    }
}

/// Why a single table's export stopped the run
enum TableFailure {
    /// Another invocation is already exporting; benign
    Conflict,
    /// Anything else; aborts the invocation
    Fatal(SluiceError),
}

/// Batch export coordinator
pub struct BatchExportCoordinator {
    admin: Arc<dyn DatabaseAdmin>,
    publisher: Arc<dyn QueuePublisher>,
    poller: OperationPoller,
    config: ExportJobConfig,
}

impl BatchExportCoordinator {
    /// Create a new coordinator
    pub fn new(
        admin: Arc<dyn DatabaseAdmin>,
        publisher: Arc<dyn QueuePublisher>,
        config: ExportJobConfig,
    ) -> Self {
        let poller = OperationPoller::with_max_attempts(admin.clone(), config.poll_attempts);
        Self {
            admin,
            publisher,
            poller,
            config,
        }
    }

    /// Handle one delivered batch message
    ///
    /// # Errors
    ///
    /// Returns [`SluiceError::BatchCeilingExceeded`] (never retryable)
    /// when the message is past its ceiling, and
    /// [`SluiceError::TableExport`] when a table's export fails; the
    /// queue's redelivery policy decides what happens next. A detected
    /// conflict is a clean `Ok` with [`BatchOutcome::ConflictSkip`].
    pub async fn handle(&self, message: ExportBatchMessage) -> Result<BatchRunSummary> {
        let started = tokio::time::Instant::now();

        tracing::info!(
            batch_no = message.batch_no,
            max_batches = message.max_batches,
            tables = message.pending_tables.len(),
            "Starting export batch"
        );

        if message.exceeds_ceiling() {
            return Err(SluiceError::BatchCeilingExceeded {
                batch_no: message.batch_no,
                max_batches: message.max_batches,
            });
        }

        let today = Utc::now().date_naive();
        let mut remaining = message.pending_tables.clone();
        let mut exported = 0usize;

        while let Some(table) = remaining.pop() {
            match self.export_table(&table, today).await {
                Ok(()) => {
                    exported += 1;
                    tracing::info!(table = %table, "Table exported successfully");
                }
                Err(TableFailure::Conflict) => {
                    tracing::info!(
                        table = %table,
                        batch_no = message.batch_no,
                        max_batches = message.max_batches,
                        "Another instance is already exporting, stopping this run"
                    );
                    return Ok(BatchRunSummary {
                        batch_no: message.batch_no,
                        tables_exported: exported,
                        tables_republished: 0,
                        outcome: BatchOutcome::ConflictSkip,
                        duration: started.elapsed(),
                    });
                }
                Err(TableFailure::Fatal(source)) => {
                    return Err(SluiceError::TableExport {
                        table: table.into_inner(),
                        batch_no: message.batch_no,
                        source: Box::new(source),
                    });
                }
            }

            if started.elapsed() > self.config.exec_time_budget && !remaining.is_empty() {
                let republished = remaining.len();
                self.republish_remainder(&message, remaining).await?;
                return Ok(BatchRunSummary {
                    batch_no: message.batch_no,
                    tables_exported: exported,
                    tables_republished: republished,
                    outcome: BatchOutcome::Republished,
                    duration: started.elapsed(),
                });
            }
        }

        Ok(BatchRunSummary {
            batch_no: message.batch_no,
            tables_exported: exported,
            tables_republished: 0,
            outcome: BatchOutcome::Completed,
            duration: started.elapsed(),
        })
    }

    /// Export one table: schema first, then data
    async fn export_table(&self, table: &TableName, date: NaiveDate) -> std::result::Result<(), TableFailure> {
        let schema_uri = destination_uri(&self.config.bucket, "schemas", date, table, "schema");
        self.run_export(
            table,
            ExportKind::Schema,
            schema_columns_query(&self.config.database, table),
            schema_uri,
        )
        .await?;
        tracing::info!(table = %table, "Schema export complete");

        let data_uri = destination_uri(&self.config.bucket, "exports", date, table, "csv");
        self.run_export(table, ExportKind::Data, data_query(table), data_uri)
            .await?;

        Ok(())
    }

    /// Trigger one export and poll it to a terminal outcome
    async fn run_export(
        &self,
        table: &TableName,
        kind: ExportKind,
        select_query: String,
        destination_uri: String,
    ) -> std::result::Result<(), TableFailure> {
        let request = ExportRequest {
            instance: self.config.instance.clone(),
            database: self.config.database.clone(),
            select_query,
            destination_uri: destination_uri.clone(),
        };

        let operation_id = match self.admin.start_export(&request).await {
            Ok(ExportStart::Accepted(id)) => id,
            Ok(ExportStart::Conflict) => return Err(TableFailure::Conflict),
            Err(e) => return Err(TableFailure::Fatal(e)),
        };

        let mut operation =
            ExportOperation::new(table.clone(), kind, destination_uri, operation_id);

        tracing::debug!(
            table = %operation.table,
            kind = %operation.kind,
            operation = %operation.operation_id,
            destination = %operation.destination_uri,
            "Export operation started"
        );

        let outcome = self
            .poller
            .poll(&operation.operation_id)
            .await
            .map_err(TableFailure::Fatal)?;
        operation.status = outcome.last_status();

        match outcome {
            PollOutcome::Completed(_) => Ok(()),
            PollOutcome::Exhausted(OperationStatus::Failed) => {
                Err(TableFailure::Fatal(SluiceError::Database(
                    crate::domain::DatabaseError::OperationFailed(
                        operation.operation_id.to_string(),
                    ),
                )))
            }
            PollOutcome::Exhausted(last) => {
                // Compatibility behavior: an export that never reported
                // DONE within the attempt budget is treated as
                // success-like. The destination object may or may not
                // exist yet.
                tracing::warn!(
                    table = %operation.table,
                    kind = %operation.kind,
                    operation = %operation.operation_id,
                    last_status = %last,
                    "Poll attempts exhausted without DONE, continuing"
                );
                Ok(())
            }
        }
    }

    /// Publish the remaining tables as the next batch in the chain
    async fn republish_remainder(
        &self,
        message: &ExportBatchMessage,
        remaining: Vec<TableName>,
    ) -> Result<()> {
        let next = message.next_batch(remaining);
        let (payload, attributes) = next.encode();
        let message_id = self.publisher.publish(&payload, &attributes).await?;

        tracing::info!(
            message_id = %message_id,
            batch_no = next.batch_no,
            max_batches = next.max_batches,
            tables = next.pending_tables.len(),
            "Time budget exceeded, re-published remaining tables"
        );

        Ok(())
    }
}

/// Columns query for a table's schema export, ordered by column position
fn schema_columns_query(database: &str, table: &TableName) -> String {
    format!(
        "SELECT COLUMN_NAME,DATA_TYPE FROM INFORMATION_SCHEMA.COLUMNS \
         WHERE TABLE_SCHEMA = '{database}' AND TABLE_NAME = '{table}' \
         ORDER BY ORDINAL_POSITION;"
    )
}

/// Full-table query for a data export
fn data_query(table: &TableName) -> String {
    format!("SELECT * FROM `{table}`;")
}

/// Destination URI: `<bucket>/<prefix>/<ISO date>/<table>.<extension>`
fn destination_uri(
    bucket: &str,
    prefix: &str,
    date: NaiveDate,
    table: &TableName,
    extension: &str,
) -> String {
    format!("{bucket}/{prefix}/{date}/{table}.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str) -> TableName {
        TableName::new(name).unwrap()
    }

    #[test]
    fn test_schema_columns_query_shape() {
        let query = schema_columns_query("shop", &table("orders"));
        assert!(query.contains("TABLE_SCHEMA = 'shop'"));
        assert!(query.contains("TABLE_NAME = 'orders'"));
        assert!(query.contains("ORDER BY ORDINAL_POSITION"));
    }

    #[test]
    fn test_data_query_quotes_table() {
        assert_eq!(data_query(&table("orders")), "SELECT * FROM `orders`;");
    }

    #[test]
    fn test_destination_uri_shape() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(
            destination_uri("shop-exports", "schemas", date, &table("orders"), "schema"),
            "shop-exports/schemas/2026-08-06/orders.schema"
        );
        assert_eq!(
            destination_uri("shop-exports", "exports", date, &table("orders"), "csv"),
            "shop-exports/exports/2026-08-06/orders.csv"
        );
    }
}

//! Message queue abstraction traits

use crate::domain::ids::MessageId;
use crate::domain::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Queue publish capability
///
/// Implementations are scoped to one topic; the payload and attribute map
/// follow the batch message wire contract
/// ([`ExportBatchMessage::encode`](crate::domain::message::ExportBatchMessage::encode)).
/// Delivery downstream is at-least-once; publishing here says nothing
/// about how many times a consumer will see the message.
#[async_trait]
pub trait QueuePublisher: Send + Sync {
    /// Publish one message
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be accepted by the
    /// queue. Callers treat publish failure as fatal for the invocation.
    async fn publish(
        &self,
        payload: &[u8],
        attributes: &HashMap<String, String>,
    ) -> Result<MessageId>;
}

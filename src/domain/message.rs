//! Batch export message model
//!
//! The queue carries one message shape: a comma-joined list of table
//! names in the payload, plus `batch_no` and `max_batches` as string
//! attributes. This module decodes that wire format into a strongly
//! typed struct at the boundary, validating the attributes as part of
//! decoding, and encodes follow-up messages for re-publication.

use crate::domain::errors::MessageError;
use crate::domain::ids::TableName;
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Attribute key carrying the current batch number
pub const ATTR_BATCH_NO: &str = "batch_no";

/// Attribute key carrying the re-publication ceiling
pub const ATTR_MAX_BATCHES: &str = "max_batches";

/// One batch of export work, as delivered by the queue
///
/// Invariant: `batch_no` strictly increases along a re-publication chain
/// started from the same seed message; `max_batches` is carried through
/// unchanged. A message with `batch_no > max_batches` decodes fine and is
/// rejected by the coordinator, not here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportBatchMessage {
    /// Tables still to be exported, processed most-recently-added-first
    pub pending_tables: Vec<TableName>,

    /// Current batch number, 1-based
    pub batch_no: u32,

    /// Hard ceiling on how many batches the chain may spawn
    pub max_batches: u32,
}

impl ExportBatchMessage {
    /// Build the seed message for a new export chain (`batch_no = 1`)
    ///
    /// # Errors
    ///
    /// Returns [`MessageError::EmptyTableList`] when there is nothing to
    /// export; publishing an empty seed would only produce a message the
    /// coordinator immediately drains.
    pub fn seed(
        pending_tables: Vec<TableName>,
        max_batches: u32,
    ) -> Result<Self, MessageError> {
        if pending_tables.is_empty() {
            return Err(MessageError::EmptyTableList);
        }
        Ok(Self {
            pending_tables,
            batch_no: 1,
            max_batches: max_batches.max(1),
        })
    }

    /// Decode a delivered payload and attribute map
    ///
    /// The payload must be UTF-8 comma-joined table names; both
    /// attributes must be decimal strings of integers >= 1. Malformed
    /// input is a [`MessageError`], a distinct kind from the batch
    /// ceiling fatal.
    pub fn decode(
        payload: &[u8],
        attributes: &HashMap<String, String>,
    ) -> Result<Self, MessageError> {
        let text = std::str::from_utf8(payload).map_err(|_| MessageError::InvalidPayload)?;

        let batch_no = parse_attribute(attributes, ATTR_BATCH_NO)?;
        let max_batches = parse_attribute(attributes, ATTR_MAX_BATCHES)?;

        let mut pending_tables = Vec::new();
        for name in text.split(',') {
            if name.trim().is_empty() {
                continue;
            }
            let table = TableName::new(name).map_err(MessageError::InvalidTableName)?;
            pending_tables.push(table);
        }

        if pending_tables.is_empty() {
            return Err(MessageError::EmptyTableList);
        }

        Ok(Self {
            pending_tables,
            batch_no,
            max_batches,
        })
    }

    /// Encode into the wire format: payload bytes and attribute map
    pub fn encode(&self) -> (Vec<u8>, HashMap<String, String>) {
        let payload = self
            .pending_tables
            .iter()
            .map(TableName::as_str)
            .collect::<Vec<_>>()
            .join(",")
            .into_bytes();

        let mut attributes = HashMap::new();
        attributes.insert(ATTR_BATCH_NO.to_string(), self.batch_no.to_string());
        attributes.insert(ATTR_MAX_BATCHES.to_string(), self.max_batches.to_string());

        (payload, attributes)
    }

    /// Build the follow-up message that hands the remaining tables to the
    /// next invocation, incrementing the batch number and preserving the
    /// ceiling.
    pub fn next_batch(&self, remaining: Vec<TableName>) -> Self {
        Self {
            pending_tables: remaining,
            batch_no: self.batch_no + 1,
            max_batches: self.max_batches,
        }
    }

    /// True when this message is past the re-publication ceiling
    pub fn exceeds_ceiling(&self) -> bool {
        self.batch_no > self.max_batches
    }
}

fn parse_attribute(
    attributes: &HashMap<String, String>,
    name: &'static str,
) -> Result<u32, MessageError> {
    let value = attributes
        .get(name)
        .ok_or(MessageError::MissingAttribute(name))?;

    match value.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(MessageError::InvalidAttribute {
            name,
            value: value.clone(),
        }),
    }
}

/// Queue push-delivery envelope
///
/// The delivery mechanism hands the function a JSON document with the
/// payload base64-encoded under `data` and the attributes alongside.
/// This type is the outermost decode step for the `export` entry point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryEnvelope {
    /// Base64-encoded message payload
    pub data: String,

    /// String attribute map
    #[serde(default)]
    pub attributes: HashMap<String, String>,
}

impl DeliveryEnvelope {
    /// Decode the envelope into a typed batch message
    pub fn into_message(self) -> Result<ExportBatchMessage, MessageError> {
        let payload = general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|_| MessageError::InvalidPayload)?;
        ExportBatchMessage::decode(&payload, &self.attributes)
    }

    /// Wrap an encoded message in an envelope (used by tests and the
    /// lister's dry-run output)
    pub fn from_message(message: &ExportBatchMessage) -> Self {
        let (payload, attributes) = message.encode();
        Self {
            data: general_purpose::STANDARD.encode(payload),
            attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attrs(batch_no: &str, max_batches: &str) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert(ATTR_BATCH_NO.to_string(), batch_no.to_string());
        map.insert(ATTR_MAX_BATCHES.to_string(), max_batches.to_string());
        map
    }

    #[test]
    fn test_decode_valid_message() {
        let message =
            ExportBatchMessage::decode(b"orders,customers,invoices", &attrs("2", "5")).unwrap();

        assert_eq!(message.batch_no, 2);
        assert_eq!(message.max_batches, 5);
        assert_eq!(
            message
                .pending_tables
                .iter()
                .map(TableName::as_str)
                .collect::<Vec<_>>(),
            vec!["orders", "customers", "invoices"]
        );
    }

    #[test]
    fn test_decode_missing_attribute() {
        let mut attributes = HashMap::new();
        attributes.insert(ATTR_BATCH_NO.to_string(), "1".to_string());

        let err = ExportBatchMessage::decode(b"orders", &attributes).unwrap_err();
        assert!(matches!(
            err,
            MessageError::MissingAttribute(ATTR_MAX_BATCHES)
        ));
    }

    #[test]
    fn test_decode_non_numeric_attribute() {
        let err = ExportBatchMessage::decode(b"orders", &attrs("first", "5")).unwrap_err();
        assert!(matches!(
            err,
            MessageError::InvalidAttribute {
                name: ATTR_BATCH_NO,
                ..
            }
        ));
    }

    #[test]
    fn test_decode_zero_attribute_rejected() {
        let err = ExportBatchMessage::decode(b"orders", &attrs("0", "5")).unwrap_err();
        assert!(matches!(err, MessageError::InvalidAttribute { .. }));
    }

    #[test]
    fn test_decode_empty_payload() {
        let err = ExportBatchMessage::decode(b"", &attrs("1", "5")).unwrap_err();
        assert!(matches!(err, MessageError::EmptyTableList));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let err = ExportBatchMessage::decode(&[0xff, 0xfe], &attrs("1", "5")).unwrap_err();
        assert!(matches!(err, MessageError::InvalidPayload));
    }

    #[test]
    fn test_decode_over_ceiling_is_not_a_decode_error() {
        // The ceiling is enforced by the coordinator, not the decoder.
        let message = ExportBatchMessage::decode(b"orders", &attrs("9", "5")).unwrap();
        assert!(message.exceeds_ceiling());
    }

    #[test]
    fn test_encode_round_trip() {
        let message = ExportBatchMessage::decode(b"a,b,c", &attrs("3", "7")).unwrap();
        let (payload, attributes) = message.encode();

        assert_eq!(payload, b"a,b,c");
        assert_eq!(attributes[ATTR_BATCH_NO], "3");
        assert_eq!(attributes[ATTR_MAX_BATCHES], "7");

        let decoded = ExportBatchMessage::decode(&payload, &attributes).unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_next_batch_increments_and_preserves_ceiling() {
        let message = ExportBatchMessage::decode(b"a,b,c", &attrs("2", "5")).unwrap();
        let remaining = vec![TableName::new("a").unwrap()];
        let next = message.next_batch(remaining);

        assert_eq!(next.batch_no, 3);
        assert_eq!(next.max_batches, 5);
        assert_eq!(next.pending_tables.len(), 1);
    }

    #[test]
    fn test_seed_rejects_empty_list() {
        let err = ExportBatchMessage::seed(Vec::new(), 5).unwrap_err();
        assert!(matches!(err, MessageError::EmptyTableList));
    }

    #[test]
    fn test_seed_starts_at_batch_one() {
        let tables = vec![TableName::new("orders").unwrap()];
        let message = ExportBatchMessage::seed(tables, 5).unwrap();
        assert_eq!(message.batch_no, 1);
        assert_eq!(message.max_batches, 5);
    }

    #[test]
    fn test_envelope_round_trip() {
        let message = ExportBatchMessage::decode(b"orders,customers", &attrs("1", "5")).unwrap();
        let envelope = DeliveryEnvelope::from_message(&message);
        let decoded = envelope.into_message().unwrap();
        assert_eq!(decoded, message);
    }

    #[test]
    fn test_envelope_rejects_bad_base64() {
        let envelope = DeliveryEnvelope {
            data: "not-base64!!!".to_string(),
            attributes: attrs("1", "5"),
        };
        assert!(matches!(
            envelope.into_message().unwrap_err(),
            MessageError::InvalidPayload
        ));
    }
}

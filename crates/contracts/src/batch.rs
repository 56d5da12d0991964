//! InboundBatch - one trigger's worth of messages
//!
//! Decodes the hosting runtime's queue event shape:
//!
//! ```json
//! {"Records": [{"messageId": "...", "receiptHandle": "...", "body": "...",
//!   "messageAttributes": {"APPLICATION_NAME": {"stringValue": "fred", "dataType": "String"}}}]}
//! ```

use serde::Deserialize;
use std::collections::HashMap;

use crate::{ContractError, InboundMessage};

/// Messages delivered by one trigger invocation, in arrival order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InboundBatch {
    pub messages: Vec<InboundMessage>,
}

impl InboundBatch {
    pub fn new(messages: Vec<InboundMessage>) -> Self {
        Self { messages }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, InboundMessage> {
        self.messages.iter()
    }

    /// Decode a queue event document
    ///
    /// Attributes without a string value (binary attributes) are skipped.
    pub fn from_event_json(content: &str) -> Result<Self, ContractError> {
        let event: QueueEvent = serde_json::from_str(content)
            .map_err(|e| ContractError::decode(format!("queue event: {e}")))?;
        Ok(Self::new(
            event.records.into_iter().map(QueueRecord::into_message).collect(),
        ))
    }
}

impl From<Vec<InboundMessage>> for InboundBatch {
    fn from(messages: Vec<InboundMessage>) -> Self {
        Self::new(messages)
    }
}

impl<'a> IntoIterator for &'a InboundBatch {
    type Item = &'a InboundMessage;
    type IntoIter = std::slice::Iter<'a, InboundMessage>;

    fn into_iter(self) -> Self::IntoIter {
        self.messages.iter()
    }
}

#[derive(Debug, Deserialize)]
struct QueueEvent {
    #[serde(rename = "Records", default)]
    records: Vec<QueueRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueueRecord {
    message_id: String,
    receipt_handle: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    message_attributes: Option<HashMap<String, QueueAttribute>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueueAttribute {
    #[serde(default)]
    string_value: Option<String>,
}

impl QueueRecord {
    fn into_message(self) -> InboundMessage {
        let attributes = self.message_attributes.map(|attrs| {
            attrs
                .into_iter()
                .filter_map(|(name, attr)| attr.string_value.map(|value| (name, value)))
                .collect()
        });

        InboundMessage {
            id: self.message_id,
            deletion_token: self.receipt_handle,
            body: self.body,
            attributes,
        }
    }
}

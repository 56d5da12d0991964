//! ColumnarRecord - fixed-schema row written to the object store

use serde::{Deserialize, Serialize};

use crate::{AttributeError, AttributeName, InboundMessage};

/// One log line in columnar form
///
/// All fields are text; the timestamp is stored as received, not parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnarRecord {
    pub time: String,
    pub tracking_id: String,
    pub message_id: String,
    pub level: String,
    pub application: String,
    pub version: String,
    pub message: String,
}

impl ColumnarRecord {
    /// Build a record from a message, requiring every column
    ///
    /// # Errors
    /// The first required attribute that is missing or empty, checked in
    /// the order application name, version, log level, timestamp, tracking id.
    pub fn from_message(message: &InboundMessage) -> Result<Self, AttributeError> {
        let application = message.attribute(AttributeName::ApplicationName)?;
        let version = message.attribute(AttributeName::ApplicationVersion)?;
        let level = message.attribute(AttributeName::LogLevel)?;
        let time = message.attribute(AttributeName::Timestamp)?;
        let tracking_id = message.attribute(AttributeName::TrackingId)?;

        Ok(Self {
            time: time.to_string(),
            tracking_id: tracking_id.to_string(),
            message_id: message.id.clone(),
            level: level.to_string(),
            application: application.to_string(),
            version: version.to_string(),
            message: message.body.clone(),
        })
    }
}

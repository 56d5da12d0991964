//! InboundMessage - the envelope handed over by the inbound queue
//!
//! Attribute access goes through [`InboundMessage::extract`], which enforces
//! presence and non-emptiness and reports which of the three failed.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::AttributeError;

/// Fixed attribute vocabulary understood by the router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeName {
    ApplicationName,
    ApplicationVersion,
    LogLevel,
    Timestamp,
    TrackingId,
}

impl AttributeName {
    /// Every attribute name, in columnar field order of use
    pub const ALL: [AttributeName; 5] = [
        Self::ApplicationName,
        Self::ApplicationVersion,
        Self::LogLevel,
        Self::Timestamp,
        Self::TrackingId,
    ];

    /// Wire name of the attribute on the queue message
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ApplicationName => "APPLICATION_NAME",
            Self::ApplicationVersion => "APPLICATION_VERS",
            Self::LogLevel => "LOG_LEVEL",
            Self::Timestamp => "TIMESTAMP",
            Self::TrackingId => "TRACKING_ID",
        }
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message received from the inbound queue
///
/// Owned by the orchestrator for one processing pass and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Queue-assigned unique id
    pub id: String,

    /// Opaque token used only to acknowledge the message
    pub deletion_token: String,

    /// Raw body text
    pub body: String,

    /// Attribute name -> string value; `None` when the message has no map at all
    #[serde(default)]
    pub attributes: Option<HashMap<String, String>>,
}

impl InboundMessage {
    /// Create a message without an attribute map
    pub fn new(
        id: impl Into<String>,
        deletion_token: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            deletion_token: deletion_token.into(),
            body: body.into(),
            attributes: None,
        }
    }

    /// Add one attribute, creating the map on first use
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Attach an (possibly empty) attribute map
    pub fn with_attributes(mut self, attributes: HashMap<String, String>) -> Self {
        self.attributes = Some(attributes);
        self
    }

    /// Extract a named attribute
    ///
    /// # Errors
    /// - [`AttributeError::Missing`] if the message has no attribute map
    /// - [`AttributeError::NotFound`] if the key is absent
    /// - [`AttributeError::Empty`] if the value is the empty string
    pub fn extract(&self, name: &str) -> Result<&str, AttributeError> {
        let attributes = self.attributes.as_ref().ok_or(AttributeError::Missing)?;
        let value = attributes
            .get(name)
            .ok_or_else(|| AttributeError::not_found(name))?;
        if value.is_empty() {
            return Err(AttributeError::empty(name));
        }
        Ok(value)
    }

    /// Extract one of the router's fixed attributes
    pub fn attribute(&self, name: AttributeName) -> Result<&str, AttributeError> {
        self.extract(name.as_str())
    }

    /// Number of attributes carried (0 when the map is absent)
    pub fn attribute_count(&self) -> usize {
        self.attributes.as_ref().map_or(0, HashMap::len)
    }
}

//! Router error types

use contracts::ContractError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    /// Configuration rejected before any message is processed
    #[error("invalid router configuration: {0}")]
    InvalidConfig(#[source] ContractError),

    /// The inbound queue name resolved to no address
    #[error("inbound queue '{queue}' has no address")]
    InboundQueueNotFound { queue: String },

    /// Removing a delivered message from the inbound queue failed
    #[error("failed to delete message '{message_id}' from inbound queue: {source}")]
    DeleteFailed {
        message_id: String,
        #[source]
        source: ContractError,
    },
}

impl RouterError {
    pub fn inbound_queue_not_found(queue: impl Into<String>) -> Self {
        Self::InboundQueueNotFound {
            queue: queue.into(),
        }
    }

    pub fn delete_failed(message_id: impl Into<String>, source: ContractError) -> Self {
        Self::DeleteFailed {
            message_id: message_id.into(),
            source,
        }
    }
}

use crate::{InboundMessage, OutboundMessage};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum MessageClientError {
    // can be retried in a bit, like a network issue
    #[error("transient queue error: {0}")]
    Transient(String),

    // requires human intervention, like a config issue
    #[error("unrecoverable queue error: {0}")]
    Unrecoverable(String),
}

impl MessageClientError {
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}

// This trait abstracts away message publishing to the outbound queue.
// Implementations will need to know the concrete queue API.
#[async_trait]
pub trait MessagePubClient: Send + Sync {
    /// Returns the id the queue assigned to the message once it has durably accepted it.
    async fn publish_message(&self, message: OutboundMessage) -> Result<String, MessageClientError>;
}

// This trait abstracts away message retrieval and disposal on the inbound queue.
// Implementations will need to know the concrete queue API.
#[async_trait]
pub trait MessageSubClient: Send + Sync {
    /// Long-polls for at most one message. `Ok(None)` means the wait elapsed with nothing to do.
    async fn receive_message(&self) -> Result<Option<InboundMessage>, MessageClientError>;

    async fn delete_message(&self, receipt_handle: &str) -> Result<(), MessageClientError>;
}

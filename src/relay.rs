use crate::{
    BodyDeriver, DeriveError, InboundMessage, MessageClientError, MessagePubClient,
    MessageSubClient, OutboundMessage,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("failed to receive from inbound queue: {0}")]
    Receive(#[source] MessageClientError),

    #[error("message {message_id} has no receipt handle and cannot be acknowledged")]
    MissingReceiptHandle { message_id: String },

    #[error("failed to derive outbound body for message {message_id}: {source}")]
    Derive {
        message_id: String,
        #[source]
        source: DeriveError,
    },

    #[error("failed to publish message {message_id} to outbound queue: {source}")]
    Publish {
        message_id: String,
        #[source]
        source: MessageClientError,
    },

    #[error("forwarded message {message_id} as {outbound_message_id} but failed to delete it: {source}")]
    Delete {
        message_id: String,
        outbound_message_id: String,
        #[source]
        source: MessageClientError,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IterationOutcome {
    /// The long poll came back empty.
    Idle,
    Forwarded {
        message_id: String,
        outbound_message_id: String,
    },
}

#[derive(Debug, Clone)]
pub struct RelaySettings {
    pub group_id: String,
    /// Use the inbound message id as the outbound deduplication id, so a redelivered message
    /// that gets forwarded twice is dropped by the outbound queue inside its dedup window.
    pub deduplicate_by_message_id: bool,
    /// Pause after a failed receive. Zero disables it.
    pub error_pause: Duration,
}

impl RelaySettings {
    pub fn new(group_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            deduplicate_by_message_id: true,
            error_pause: Duration::from_secs(1),
        }
    }
}

pub struct Relay {
    inbound: Arc<dyn MessageSubClient>,
    outbound: Arc<dyn MessagePubClient>,
    deriver: Arc<dyn BodyDeriver>,
    settings: RelaySettings,
}

impl Relay {
    pub fn new(
        inbound: Arc<dyn MessageSubClient>,
        outbound: Arc<dyn MessagePubClient>,
        deriver: Arc<dyn BodyDeriver>,
        settings: RelaySettings,
    ) -> Self {
        Self {
            inbound,
            outbound,
            deriver,
            settings,
        }
    }

    /// Relays messages until `shutdown` flips to `true` (or its sender goes away).
    ///
    /// Shutdown is honoured while waiting on the inbound queue and between iterations. A message
    /// that has already been received is always taken through publish and delete first.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) {
        log::info!(
            "Relay started, forwarding with group id {:?}",
            self.settings.group_id
        );
        while !*shutdown.borrow_and_update() {
            let received = tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                received = self.inbound.receive_message() => received,
            };

            let failed_receive = received.is_err();
            match self.handle_received(received).await {
                Ok(outcome) => log_outcome(&outcome),
                Err(e) => log::error!("Relay iteration failed: {e}"),
            }

            if failed_receive && !self.settings.error_pause.is_zero() {
                tokio::select! {
                    biased;
                    _ = shutdown.changed() => break,
                    _ = tokio::time::sleep(self.settings.error_pause) => {}
                }
            }
        }
        log::info!("Relay stopped");
    }

    /// Runs exactly one receive, forward, delete cycle.
    pub async fn run_once(&self) -> Result<IterationOutcome, RelayError> {
        let received = self.inbound.receive_message().await;
        self.handle_received(received).await
    }

    async fn handle_received(
        &self,
        received: Result<Option<InboundMessage>, MessageClientError>,
    ) -> Result<IterationOutcome, RelayError> {
        match received.map_err(RelayError::Receive)? {
            Some(message) => self.forward(message).await,
            None => Ok(IterationOutcome::Idle),
        }
    }

    // The inbound message is deleted only after the outbound queue has acknowledged the publish.
    // Every early return leaves it on the queue for redelivery.
    async fn forward(&self, message: InboundMessage) -> Result<IterationOutcome, RelayError> {
        let message_id = message.message_id().to_string();
        log::debug!("Received message {message_id}");

        if message.receipt_handle().is_empty() {
            return Err(RelayError::MissingReceiptHandle { message_id });
        }

        let body = self
            .deriver
            .derive(message.body())
            .map_err(|source| RelayError::Derive {
                message_id: message_id.clone(),
                source,
            })?;

        let mut outbound = OutboundMessage::new(body, self.settings.group_id.as_str());
        if self.settings.deduplicate_by_message_id {
            outbound = outbound.with_deduplication_id(message_id.as_str());
        }

        let outbound_message_id = self
            .outbound
            .publish_message(outbound)
            .await
            .map_err(|source| RelayError::Publish {
                message_id: message_id.clone(),
                source,
            })?;
        log::debug!("Published message {message_id} as {outbound_message_id}. Deleting.");

        self.inbound
            .delete_message(message.receipt_handle())
            .await
            .map_err(|source| RelayError::Delete {
                message_id: message_id.clone(),
                outbound_message_id: outbound_message_id.clone(),
                source,
            })?;

        Ok(IterationOutcome::Forwarded {
            message_id,
            outbound_message_id,
        })
    }
}

fn log_outcome(outcome: &IterationOutcome) {
    match outcome {
        IterationOutcome::Idle => log::trace!("No message received"),
        IterationOutcome::Forwarded {
            message_id,
            outbound_message_id,
        } => log::info!("Forwarded message {message_id} as {outbound_message_id}"),
    }
}

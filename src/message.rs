/// A single delivery of a message pulled off the inbound queue.
///
/// The `receipt_handle` is scoped to this delivery attempt only. If the message is
/// redelivered it will arrive with the same `message_id` but a fresh handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    message_id: String,
    receipt_handle: String,
    body: String,
}

impl InboundMessage {
    pub fn new(
        message_id: impl Into<String>,
        receipt_handle: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            message_id: message_id.into(),
            receipt_handle: receipt_handle.into(),
            body: body.into(),
        }
    }

    pub fn message_id(&self) -> &str {
        &self.message_id
    }

    pub fn receipt_handle(&self) -> &str {
        &self.receipt_handle
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// The message the relay publishes to the outbound FIFO queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    body: String,
    group_id: String,
    deduplication_id: Option<String>,
}

impl OutboundMessage {
    pub fn new(body: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            group_id: group_id.into(),
            deduplication_id: None,
        }
    }

    pub fn with_deduplication_id(mut self, deduplication_id: impl Into<String>) -> Self {
        self.deduplication_id = Some(deduplication_id.into());
        self
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn deduplication_id(&self) -> Option<&str> {
        self.deduplication_id.as_deref()
    }
}

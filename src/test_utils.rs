use crate::{
    InboundMessage, MessageClientError, MessagePubClient, MessageSubClient, OutboundMessage,
};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub(crate) struct MockInboundClient {
    pending: Mutex<VecDeque<Result<Option<InboundMessage>, MessageClientError>>>,
    receive_calls: AtomicUsize,
    deleted: Mutex<Vec<String>>,
    delete_error: Option<MessageClientError>,
}

impl MockInboundClient {
    pub(crate) fn new() -> Self {
        Self {
            pending: Mutex::new(VecDeque::new()),
            receive_calls: AtomicUsize::new(0),
            deleted: Mutex::new(Vec::new()),
            delete_error: None,
        }
    }

    pub(crate) fn with_messages(messages: Vec<InboundMessage>) -> Self {
        let mock = Self::new();
        mock.pending
            .lock()
            .unwrap()
            .extend(messages.into_iter().map(|m| Ok(Some(m))));
        mock
    }

    // the error is served before any queued messages
    pub(crate) fn fail_next_receive(self, err: MessageClientError) -> Self {
        self.pending.lock().unwrap().push_front(Err(err));
        self
    }

    pub(crate) fn fail_deletes(mut self, err: MessageClientError) -> Self {
        self.delete_error = Some(err);
        self
    }

    pub(crate) fn receive_calls(&self) -> usize {
        self.receive_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn deleted(&self) -> Vec<String> {
        self.deleted.lock().unwrap().clone()
    }
}

#[async_trait]
impl MessageSubClient for MockInboundClient {
    async fn receive_message(&self) -> Result<Option<InboundMessage>, MessageClientError> {
        self.receive_calls.fetch_add(1, Ordering::SeqCst);
        let next = self.pending.lock().unwrap().pop_front();
        match next {
            Some(res) => res,
            None => {
                // stands in for the long poll so a running relay doesn't starve the test
                tokio::task::yield_now().await;
                Ok(None)
            }
        }
    }

    async fn delete_message(&self, receipt_handle: &str) -> Result<(), MessageClientError> {
        if let Some(err) = &self.delete_error {
            return Err(err.clone());
        }
        self.deleted.lock().unwrap().push(receipt_handle.to_string());
        Ok(())
    }
}

pub(crate) struct MockOutboundClient {
    published: Mutex<Vec<OutboundMessage>>,
    publish_calls: AtomicUsize,
    error: Option<MessageClientError>,
}

impl MockOutboundClient {
    pub(crate) fn new() -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            publish_calls: AtomicUsize::new(0),
            error: None,
        }
    }

    pub(crate) fn failing(err: MessageClientError) -> Self {
        Self {
            error: Some(err),
            ..Self::new()
        }
    }

    pub(crate) fn published(&self) -> Vec<OutboundMessage> {
        self.published.lock().unwrap().clone()
    }

    pub(crate) fn publish_calls(&self) -> usize {
        self.publish_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessagePubClient for MockOutboundClient {
    async fn publish_message(&self, message: OutboundMessage) -> Result<String, MessageClientError> {
        let call = self.publish_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        self.published.lock().unwrap().push(message);
        Ok(format!("out-{call}"))
    }
}

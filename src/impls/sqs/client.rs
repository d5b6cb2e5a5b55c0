use crate::{
    InboundMessage, MessageClientError, MessagePubClient, MessageSubClient, OutboundMessage,
    StartupError,
};
use async_trait::async_trait;
use aws_config::timeout::TimeoutConfig;
use aws_sdk_sqs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_sqs::Client;
use std::time::Duration;

// Service error codes that retrying will not fix. Older endpoints still use the query-protocol
// spelling for a missing queue.
const UNRECOVERABLE_ERROR_CODES: &[&str] = &[
    "QueueDoesNotExist",
    "AWS.SimpleQueueService.NonExistentQueue",
    "ReceiptHandleIsInvalid",
    "InvalidIdFormat",
    "InvalidParameterValue",
    "MissingParameter",
    "InvalidMessageContents",
    "AccessDenied",
    "AccessDeniedException",
];

/// Loads AWS config from the environment. Every queue call is capped at `operation_timeout`,
/// which must be longer than the long-poll wait.
pub async fn build_sdk_client(endpoint_url: Option<&str>, operation_timeout: Duration) -> Client {
    let timeout_config = TimeoutConfig::builder()
        .operation_timeout(operation_timeout)
        .build();
    let mut loader = aws_config::from_env().timeout_config(timeout_config);
    if let Some(endpoint) = endpoint_url {
        loader = loader.endpoint_url(endpoint);
    }
    let config = loader.load().await;
    Client::new(&config)
}

pub struct SqsQueueClient {
    sqs_client: Client,
    queue_url: String,
    wait_time_seconds: i32,
    visibility_timeout: Option<i32>,
}

impl SqsQueueClient {
    pub fn new(sqs_client: Client, queue_url: impl Into<String>) -> Self {
        Self {
            sqs_client,
            queue_url: queue_url.into(),
            wait_time_seconds: 20,
            visibility_timeout: None,
        }
    }

    /// Looks the queue up by name. A queue that can't be resolved is fatal at startup.
    pub async fn resolve(sqs_client: Client, queue_name: &str) -> Result<Self, StartupError> {
        let output = sqs_client
            .get_queue_url()
            .queue_name(queue_name)
            .send()
            .await
            .map_err(|e| StartupError::QueueNotFound {
                queue_name: queue_name.to_string(),
                reason: DisplayErrorContext(&e).to_string(),
            })?;
        let queue_url = output.queue_url.ok_or_else(|| StartupError::QueueNotFound {
            queue_name: queue_name.to_string(),
            reason: "no queue url in response".to_string(),
        })?;
        log::info!("Resolved queue {queue_name} to {queue_url}");
        Ok(Self::new(sqs_client, queue_url))
    }

    pub fn with_wait_time_seconds(mut self, wait_time_seconds: i32) -> Self {
        self.wait_time_seconds = wait_time_seconds;
        self
    }

    pub fn with_visibility_timeout(mut self, visibility_timeout: Option<i32>) -> Self {
        self.visibility_timeout = visibility_timeout;
        self
    }
}

#[async_trait]
impl MessagePubClient for SqsQueueClient {
    async fn publish_message(&self, message: OutboundMessage) -> Result<String, MessageClientError> {
        let output = self
            .sqs_client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(message.body())
            .message_group_id(message.group_id())
            .set_message_deduplication_id(message.deduplication_id().map(str::to_string))
            .send()
            .await
            .map_err(classify)?;
        Ok(output.message_id.unwrap_or_default())
    }
}

#[async_trait]
impl MessageSubClient for SqsQueueClient {
    async fn receive_message(&self) -> Result<Option<InboundMessage>, MessageClientError> {
        let message = self
            .sqs_client
            .receive_message()
            .queue_url(&self.queue_url)
            .max_number_of_messages(1)
            .wait_time_seconds(self.wait_time_seconds)
            .set_visibility_timeout(self.visibility_timeout)
            .send()
            .await
            .map_err(classify)?
            .messages
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(InboundMessage::from);
        Ok(message)
    }

    async fn delete_message(&self, receipt_handle: &str) -> Result<(), MessageClientError> {
        self.sqs_client
            .delete_message()
            .queue_url(&self.queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }
}

fn classify<E, R>(err: SdkError<E, R>) -> MessageClientError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let unrecoverable = err
        .as_service_error()
        .and_then(|e| e.code())
        .is_some_and(|code| UNRECOVERABLE_ERROR_CODES.contains(&code));
    let reason = DisplayErrorContext(&err).to_string();
    if unrecoverable {
        MessageClientError::Unrecoverable(reason)
    } else {
        MessageClientError::Transient(reason)
    }
}

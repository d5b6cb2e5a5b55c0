use crate::RelaySettings;
use clap::Parser;
use std::time::Duration;
use thiserror::Error;

/// A zero wait turns the long poll into a busy loop on an empty queue.
pub const MIN_WAIT_TIME_SECONDS: i32 = 1;
/// SQS caps long polling at 20 seconds.
pub const MAX_WAIT_TIME_SECONDS: i32 = 20;
/// SQS caps the visibility timeout at 12 hours.
pub const MAX_VISIBILITY_TIMEOUT_SECONDS: i32 = 43_200;
/// SQS limit on `MessageGroupId` length.
pub const MAX_GROUP_ID_LEN: usize = 128;

/// Headroom on top of the long-poll wait before a queue call is abandoned.
const OPERATION_TIMEOUT_MARGIN: Duration = Duration::from_secs(10);

/// Errors that stop the process before the relay starts.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("queue {queue_name:?} could not be resolved: {reason}")]
    QueueNotFound { queue_name: String, reason: String },
}

/// Relays messages from one SQS FIFO queue to another.
#[derive(Parser, Debug, Clone)]
#[command(name = "sqs-relay", version)]
pub struct RelayConfig {
    /// Name of the queue to consume from
    #[arg(long, default_value = "incoming-queue.fifo", env = "RELAY_INBOUND_QUEUE")]
    pub inbound_queue: String,

    /// Name of the queue to forward to
    #[arg(long, default_value = "outgoing-queue.fifo", env = "RELAY_OUTBOUND_QUEUE")]
    pub outbound_queue: String,

    /// Message group id attached to every forwarded message
    #[arg(long, default_value = "arcusteam_test", env = "RELAY_GROUP_ID")]
    pub group_id: String,

    /// Long-poll wait for each receive, in seconds
    #[arg(long, default_value_t = MAX_WAIT_TIME_SECONDS, env = "RELAY_WAIT_TIME_SECONDS")]
    pub wait_time_seconds: i32,

    /// Visibility timeout for received messages, in seconds (queue default when unset)
    #[arg(long, env = "RELAY_VISIBILITY_TIMEOUT")]
    pub visibility_timeout: Option<i32>,

    /// Pause after a failed receive, in milliseconds
    #[arg(long, default_value_t = 1000, env = "RELAY_ERROR_PAUSE_MS")]
    pub error_pause_ms: u64,

    /// Don't send deduplication ids (for outbound queues with content-based deduplication)
    #[arg(long, env = "RELAY_NO_DEDUP")]
    pub no_dedup: bool,

    /// Override the SQS endpoint, e.g. for a local emulator
    #[arg(long, env = "RELAY_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info", env = "RELAY_LOG_LEVEL")]
    pub log_level: String,
}

impl RelayConfig {
    pub fn validate(&self) -> Result<(), StartupError> {
        if self.inbound_queue.trim().is_empty() {
            return Err(StartupError::InvalidConfig(
                "inbound queue name must not be empty".to_string(),
            ));
        }
        if self.outbound_queue.trim().is_empty() {
            return Err(StartupError::InvalidConfig(
                "outbound queue name must not be empty".to_string(),
            ));
        }
        if self.group_id.is_empty() {
            return Err(StartupError::InvalidConfig(
                "group id must not be empty".to_string(),
            ));
        }
        if self.group_id.len() > MAX_GROUP_ID_LEN {
            return Err(StartupError::InvalidConfig(format!(
                "group id must be at most {MAX_GROUP_ID_LEN} characters"
            )));
        }
        if !(MIN_WAIT_TIME_SECONDS..=MAX_WAIT_TIME_SECONDS).contains(&self.wait_time_seconds) {
            return Err(StartupError::InvalidConfig(format!(
                "wait time must be between {MIN_WAIT_TIME_SECONDS} and {MAX_WAIT_TIME_SECONDS} seconds, got {}",
                self.wait_time_seconds
            )));
        }
        if let Some(timeout) = self.visibility_timeout {
            if !(0..=MAX_VISIBILITY_TIMEOUT_SECONDS).contains(&timeout) {
                return Err(StartupError::InvalidConfig(format!(
                    "visibility timeout must be between 0 and {MAX_VISIBILITY_TIMEOUT_SECONDS} seconds, got {timeout}"
                )));
            }
        }
        Ok(())
    }

    pub fn relay_settings(&self) -> RelaySettings {
        RelaySettings {
            group_id: self.group_id.clone(),
            deduplicate_by_message_id: !self.no_dedup,
            error_pause: Duration::from_millis(self.error_pause_ms),
        }
    }

    /// Upper bound for a single queue call. Always longer than the long poll.
    pub fn operation_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_time_seconds.max(MIN_WAIT_TIME_SECONDS) as u64) + OPERATION_TIMEOUT_MARGIN
    }
}

mod client;
mod message;

pub use client::{build_sdk_client, SqsQueueClient};

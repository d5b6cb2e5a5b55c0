use crate::InboundMessage;
use aws_sdk_sqs::types::Message as SqsMessage;

impl From<SqsMessage> for InboundMessage {
    fn from(value: SqsMessage) -> Self {
        InboundMessage::new(
            value.message_id.unwrap_or_default(),
            value.receipt_handle.unwrap_or_default(),
            value.body.unwrap_or_default(),
        )
    }
}

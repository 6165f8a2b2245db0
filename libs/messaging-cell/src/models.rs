use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// One stored message. Delivery is the transport's concern; this side
/// only persists and lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub body: String,
    pub read: bool,
    pub sent_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMessageRequest {
    pub recipient_id: Uuid,
    pub body: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MessagingError {
    EmptyBody,
    SelfMessage,
}

impl std::fmt::Display for MessagingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessagingError::EmptyBody => write!(f, "Message body cannot be empty"),
            MessagingError::SelfMessage => write!(f, "Cannot send a message to yourself"),
        }
    }
}

impl std::error::Error for MessagingError {}

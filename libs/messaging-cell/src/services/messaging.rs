use anyhow::{Result, anyhow};
use reqwest::Method;
use serde_json::{json, Value};
use tracing::debug;
use chrono::Utc;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Message, MessagingError, SendMessageRequest};

pub struct MessagingService {
    supabase: SupabaseClient,
}

impl MessagingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    pub async fn send_message(
        &self,
        sender_id: &str,
        request: SendMessageRequest,
        auth_token: &str,
    ) -> Result<Message> {
        debug!("Sending message from {} to {}", sender_id, request.recipient_id);

        if request.body.trim().is_empty() {
            return Err(MessagingError::EmptyBody.into());
        }
        if request.recipient_id.to_string() == sender_id {
            return Err(MessagingError::SelfMessage.into());
        }

        let message_data = json!({
            "sender_id": sender_id,
            "recipient_id": request.recipient_id,
            "body": request.body,
            "read": false,
            "sent_at": Utc::now().to_rfc3339()
        });

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert("Prefer", reqwest::header::HeaderValue::from_static("return=representation"));

        let result: Vec<Value> = self.supabase.request_with_headers(
            Method::POST,
            "/rest/v1/messages",
            Some(auth_token),
            Some(message_data),
            Some(headers),
        ).await?;

        if result.is_empty() {
            return Err(anyhow!("Failed to send message"));
        }

        let message: Message = serde_json::from_value(result[0].clone())?;
        Ok(message)
    }

    /// Both directions of a conversation, oldest first.
    pub async fn get_conversation(
        &self,
        user_id: &str,
        peer_id: &str,
        auth_token: &str,
    ) -> Result<Vec<Message>> {
        debug!("Fetching conversation between {} and {}", user_id, peer_id);

        let path = format!(
            "/rest/v1/messages?or=(and(sender_id.eq.{user},recipient_id.eq.{peer}),and(sender_id.eq.{peer},recipient_id.eq.{user}))&order=sent_at.asc",
            user = user_id,
            peer = peer_id
        );
        let result: Vec<Value> = self.supabase.request(
            Method::GET,
            &path,
            Some(auth_token),
            None,
        ).await?;

        let messages: Vec<Message> = result.into_iter()
            .map(serde_json::from_value)
            .collect::<std::result::Result<Vec<Message>, _>>()?;

        Ok(messages)
    }

    /// Mark everything the peer sent to this user as read.
    pub async fn mark_conversation_read(
        &self,
        user_id: &str,
        peer_id: &str,
        auth_token: &str,
    ) -> Result<()> {
        debug!("Marking messages from {} to {} as read", peer_id, user_id);

        let path = format!(
            "/rest/v1/messages?sender_id=eq.{}&recipient_id=eq.{}&read=eq.false",
            peer_id, user_id
        );

        let _: Vec<Value> = self.supabase.request(
            Method::PATCH,
            &path,
            Some(auth_token),
            Some(json!({ "read": true })),
        ).await?;

        Ok(())
    }
}

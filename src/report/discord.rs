//! Discord REST transport

use crate::report::{ChatTransport, DeliveryError, MessageId, ReportDestination};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Posts messages and starts threads through the Discord HTTP API
#[derive(Debug, Clone)]
pub struct DiscordTransport {
    client: reqwest::Client,
    token: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct Created {
    id: String,
}

impl DiscordTransport {
    /// Create a transport authenticating as the bot owning `token`
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.into(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// Point the transport at a different API root
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    fn messages_url(&self, channel_id: &str) -> String {
        format!("{}/channels/{}/messages", self.api_base, channel_id)
    }

    fn thread_url(&self, channel_id: &str, message_id: &str) -> String {
        format!(
            "{}/channels/{}/messages/{}/threads",
            self.api_base, channel_id, message_id
        )
    }

    async fn post(&self, url: &str, body: serde_json::Value) -> Result<Created, DeliveryError> {
        debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .header("Authorization", format!("Bot {}", self.token))
            .json(&body)
            .send()
            .await
            .map_err(|e| DeliveryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<Created>()
            .await
            .map_err(|e| DeliveryError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ChatTransport for DiscordTransport {
    async fn send_message(
        &self,
        destination: &ReportDestination,
        content: &str,
    ) -> Result<MessageId, DeliveryError> {
        let created = self
            .post(&self.messages_url(destination.id()), json!({ "content": content }))
            .await?;
        Ok(MessageId(created.id))
    }

    async fn start_thread(
        &self,
        channel: &ReportDestination,
        anchor: &MessageId,
        name: &str,
        auto_archive_minutes: u32,
    ) -> Result<ReportDestination, DeliveryError> {
        let created = self
            .post(
                &self.thread_url(channel.id(), &anchor.0),
                json!({ "name": name, "auto_archive_duration": auto_archive_minutes }),
            )
            .await?;
        Ok(ReportDestination::thread(created.id, channel.id()))
    }
}

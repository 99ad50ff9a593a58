use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::error::SendError;
use crate::config::TelegramConfig;
use crate::error::ConfigError;

/// Delivers a rendered card to a named channel.
#[async_trait]
pub trait ChannelSender: Send + Sync {
    async fn send(&self, channel: &str, message: &str) -> Result<(), SendError>;
}

/// Writes cards to the log instead of a chat service.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSender;

#[async_trait]
impl ChannelSender for LogSender {
    async fn send(&self, channel: &str, message: &str) -> Result<(), SendError> {
        tracing::info!(channel = %channel, "broadcast card:\n{}", message);
        Ok(())
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
}

#[derive(Deserialize)]
struct BotApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Sends cards through the Telegram Bot API `sendMessage` method.
pub struct TelegramSender {
    client: Client,
    api_base: String,
    token: SecretString,
}

impl TelegramSender {
    const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub fn new(api_base: impl Into<String>, token: SecretString) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Self::REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    /// Resolves the bot token from the configured environment variable.
    pub fn from_config(config: &TelegramConfig) -> Result<Self, ConfigError> {
        let token = match std::env::var(&config.token_env_var) {
            Ok(value) if !value.trim().is_empty() => SecretString::from(value.trim()),
            _ => {
                return Err(ConfigError::MissingSecret {
                    name: config.token_env_var.clone(),
                })
            }
        };
        Self::new(config.api_base.clone(), token)
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            self.api_base,
            self.token.expose_secret()
        )
    }
}

impl std::fmt::Debug for TelegramSender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramSender")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChannelSender for TelegramSender {
    async fn send(&self, channel: &str, message: &str) -> Result<(), SendError> {
        let request = SendMessageRequest {
            chat_id: channel,
            text: message,
            parse_mode: "Markdown",
        };

        // The URL embeds the bot token, keep it out of error text.
        let response = self
            .client
            .post(self.send_message_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| SendError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body = response.json::<BotApiResponse>().await.ok();

        match body {
            Some(body) if status.is_success() && body.ok => Ok(()),
            Some(body) => Err(SendError::Rejected {
                status: status.as_u16(),
                description: body
                    .description
                    .unwrap_or_else(|| status.to_string()),
            }),
            None => Err(SendError::Rejected {
                status: status.as_u16(),
                description: format!("unreadable response ({})", status),
            }),
        }
    }
}

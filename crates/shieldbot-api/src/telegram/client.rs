// Telegram Bot API HTTP client
//
// Every method is a POST to `{base}bot{token}/{method}` with a JSON body.
// The token is part of the path, so URLs are never logged.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::telegram::models::{BotResponse, Message, ReplyMarkup, Update};
use crate::transport::TransportConfig;

/// Default Bot API root.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org/";

/// Parse mode used for every outgoing text.
const PARSE_MODE: &str = "HTML";

/// Bot API limit for callback answer text.
const ALERT_MAX_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct TelegramClient {
    http: reqwest::Client,
    base_url: Url,
    token: SecretString,
    timeout: Duration,
}

impl TelegramClient {
    pub fn new(base_url: Url, token: SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            token,
            timeout: transport.timeout,
        })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, token: SecretString) -> Self {
        Self {
            http,
            base_url,
            token,
            timeout: TransportConfig::default().timeout,
        }
    }

    fn method_url(&self, method: &str) -> Result<Url, Error> {
        Ok(self
            .base_url
            .join(&format!("bot{}/{method}", self.token.expose_secret()))?)
    }

    /// Call a Bot API method and unwrap the `{ ok, result }` envelope.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &impl Serialize,
        timeout: Duration,
    ) -> Result<T, Error> {
        debug!(method, "telegram request");
        let url = self.method_url(method)?;
        let resp = self
            .http
            .post(url)
            .timeout(timeout)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Transport(e.without_url()))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| Error::Transport(e.without_url()))?;

        // Error replies (400 "message is not modified", 403 "bot was
        // blocked") still carry the envelope, so parse before checking status.
        let envelope: BotResponse<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => {
                return Err(Error::HttpStatus {
                    status: status.as_u16(),
                    body: text,
                });
            }
            Err(e) => {
                return Err(Error::Deserialization {
                    message: e.to_string(),
                    body: text,
                });
            }
        };

        if !envelope.ok {
            return Err(Error::Telegram {
                code: envelope.error_code.unwrap_or(status.as_u16()),
                description: envelope.description.unwrap_or_default(),
            });
        }

        envelope.result.ok_or_else(|| Error::Deserialization {
            message: format!("{method}: envelope has no result"),
            body: text,
        })
    }

    /// Long-poll for updates after `offset`.
    ///
    /// The HTTP timeout is stretched by `poll_timeout` so the server can
    /// hold the request open.
    pub async fn get_updates(&self, offset: i64, poll_timeout: Duration) -> Result<Vec<Update>, Error> {
        let body = json!({
            "offset": offset,
            "timeout": poll_timeout.as_secs(),
            "allowed_updates": ["message", "callback_query"],
        });
        self.call("getUpdates", &body, self.timeout + poll_timeout).await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&ReplyMarkup>,
    ) -> Result<Message, Error> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
            "parse_mode": PARSE_MODE,
        });
        if let Some(markup) = markup {
            body["reply_markup"] = json!(markup);
        }
        self.call("sendMessage", &body, self.timeout).await
    }

    /// Replace the text (and keyboard) of a message the bot sent earlier.
    ///
    /// Telegram answers `400 Bad Request: message is not modified` when the
    /// new content equals the old; see [`Error::is_message_not_modified`].
    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        markup: Option<&ReplyMarkup>,
    ) -> Result<(), Error> {
        let mut body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
            "parse_mode": PARSE_MODE,
        });
        if let Some(markup) = markup {
            body["reply_markup"] = json!(markup);
        }
        // Returns the edited Message, or `true` for inline messages.
        let _: serde_json::Value = self.call("editMessageText", &body, self.timeout).await?;
        Ok(())
    }

    /// Answer a callback query, optionally with a toast or modal alert.
    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), Error> {
        let mut body = json!({
            "callback_query_id": callback_query_id,
            "show_alert": show_alert,
        });
        if let Some(text) = text {
            let clipped: String = text.chars().take(ALERT_MAX_CHARS).collect();
            body["text"] = json!(clipped);
        }
        let _: bool = self.call("answerCallbackQuery", &body, self.timeout).await?;
        Ok(())
    }
}

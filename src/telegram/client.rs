//! Telegram Bot API client module
//!
//! Posting digest chunks is single-shot. Polling calls (`getMe`, `getUpdates`)
//! are retried with backoff since they sit outside the digest pipeline.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;
use tokio_retry::strategy::jitter;
use tokio_retry::{Retry, strategy::ExponentialBackoff};

use crate::core::models::ChannelId;
use crate::errors::DigestError;
use crate::worker::deliver::{MessageTransport, ParseMode};

const TELEGRAM_API_BASE: &str = "https://api.telegram.org";

/// Seconds added on top of the long-poll timeout for the HTTP request itself.
const POLL_GRACE_SECS: u64 = 10;

/// Upper bound on a single backoff delay between polling retries.
const RETRY_MAX_DELAY: Duration = Duration::from_secs(30);
const RETRY_ATTEMPTS: usize = 5;

/// Delays before jitter: 100ms, 200ms, 400ms, ... capped at `RETRY_MAX_DELAY`.
fn retry_backoff() -> ExponentialBackoff {
    ExponentialBackoff::from_millis(2)
        .factor(50)
        .max_delay(RETRY_MAX_DELAY)
}

/// Envelope around every Bot API response.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<i64>,
}

impl<T> ApiResponse<T> {
    fn into_result(self, method: &str) -> Result<T, String> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            (true, None) => Err(format!("{method}: response without result")),
            (false, _) => Err(format!(
                "{method} failed ({}): {}",
                self.error_code.unwrap_or_default(),
                self.description.as_deref().unwrap_or("no description")
            )),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub is_bot: bool,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
    #[serde(default)]
    pub channel_post: Option<Message>,
}

impl Update {
    /// The message carried by this update, whether sent in a chat or posted in a channel.
    #[must_use]
    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref().or(self.channel_post.as_ref())
    }
}

pub struct TelegramClient {
    token: String,
    http: Client,
}

impl TelegramClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(token: String, poll_timeout_secs: u64) -> Result<Self, DigestError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + POLL_GRACE_SECS))
            .build()
            .map_err(|e| {
                DigestError::HttpError(format!("Failed to build Telegram HTTP client: {e}"))
            })?;
        Ok(Self { token, http })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{TELEGRAM_API_BASE}/bot{}/{method}", self.token)
    }

    async fn with_retry<F, Fut, R>(&self, operation: F) -> Result<R, DigestError>
    where
        F: FnMut() -> Fut + Send,
        Fut: std::future::Future<Output = Result<R, DigestError>> + Send,
        R: Send,
    {
        let strategy = retry_backoff().map(jitter).take(RETRY_ATTEMPTS);

        Retry::spawn(strategy, operation).await
    }

    async fn call<R: DeserializeOwned>(
        &self,
        method: &str,
        payload: &Value,
    ) -> Result<R, DigestError> {
        let resp = self
            .http
            .post(self.method_url(method))
            .json(payload)
            .send()
            .await?;

        let status = resp.status();
        let body: ApiResponse<R> = resp.json().await.map_err(|e| {
            DigestError::HttpError(format!("{method}: invalid response (status {status}): {e}"))
        })?;
        body.into_result(method).map_err(DigestError::HttpError)
    }

    /// # Errors
    ///
    /// Returns an error if the token is rejected or the API is unreachable.
    pub async fn get_me(&self) -> Result<User, DigestError> {
        self.with_retry(|| async { self.call("getMe", &json!({})).await })
            .await
    }

    /// Long-poll for updates after `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error once retries are exhausted.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, DigestError> {
        let payload = build_get_updates_payload(offset, timeout_secs);
        self.with_retry(|| async { self.call("getUpdates", &payload).await })
            .await
    }

    /// Send one message. Never retried.
    ///
    /// # Errors
    ///
    /// Returns `DigestError::TransportError` with the API description on failure.
    pub async fn send_message(
        &self,
        chat_id: &str,
        text: &str,
        parse_mode: Option<ParseMode>,
    ) -> Result<(), DigestError> {
        let payload = build_send_message_payload(chat_id, text, parse_mode);
        self.call::<Value>("sendMessage", &payload)
            .await
            .map(|_| ())
            .map_err(|e| match e {
                DigestError::HttpError(msg) => DigestError::TransportError(msg),
                other => other,
            })
    }
}

#[async_trait]
impl MessageTransport for TelegramClient {
    async fn send(
        &self,
        destination: &ChannelId,
        text: &str,
        parse_mode: ParseMode,
    ) -> Result<(), DigestError> {
        self.send_message(destination.as_str(), text, Some(parse_mode))
            .await
    }
}

#[must_use]
fn build_send_message_payload(
    chat_id: &str,
    text: &str,
    parse_mode: Option<ParseMode>,
) -> Value {
    let mut payload = json!({
        "chat_id": chat_id,
        "text": text,
    });
    if let Some(mode) = parse_mode {
        payload["parse_mode"] = Value::String(mode.as_str().to_string());
    }
    payload
}

#[must_use]
fn build_get_updates_payload(offset: Option<i64>, timeout_secs: u64) -> Value {
    let mut payload = json!({
        "timeout": timeout_secs,
        "allowed_updates": ["message", "channel_post"],
    });
    if let Some(offset) = offset {
        payload["offset"] = json!(offset);
    }
    payload
}

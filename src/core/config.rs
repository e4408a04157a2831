use std::env;
use std::str::FromStr;

use crate::errors::DigestError;

pub const DEFAULT_MESSAGE_LIMIT: usize = 4096;
pub const DEFAULT_NEWS_PAGE_SIZE: u32 = 10;
pub const DEFAULT_SUMMARY_CONTEXT_TOKENS: usize = 8192;
pub const DEFAULT_POLL_TIMEOUT_SECS: u64 = 30;

/// Process-wide settings, loaded once at startup and handed to each component.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_org_id: Option<String>,
    pub telegram_bot_token: String,
    /// Bot username without the leading `@`.
    pub telegram_bot_name: String,
    pub telegram_channel_id: String,
    pub newsapi_key: String,
    /// Hard per-message ceiling of the chat transport, in characters.
    pub message_limit: usize,
    pub news_page_size: u32,
    pub summary_context_tokens: usize,
    pub poll_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, DigestError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DigestError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| {
            get(key).ok_or_else(|| DigestError::ConfigError(format!("{key}: not set")))
        };

        let message_limit = parse_or(
            get("TELEGRAM_MESSAGE_LIMIT"),
            "TELEGRAM_MESSAGE_LIMIT",
            DEFAULT_MESSAGE_LIMIT,
        )?;
        if message_limit == 0 {
            return Err(DigestError::ConfigError(
                "TELEGRAM_MESSAGE_LIMIT: must be greater than zero".to_string(),
            ));
        }

        let news_page_size = parse_or(
            get("NEWSAPI_PAGE_SIZE"),
            "NEWSAPI_PAGE_SIZE",
            DEFAULT_NEWS_PAGE_SIZE,
        )?;
        if !(1..=100).contains(&news_page_size) {
            return Err(DigestError::ConfigError(format!(
                "NEWSAPI_PAGE_SIZE: {news_page_size} is outside 1..=100"
            )));
        }

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            openai_model: required("OPENAI_LLM")?,
            openai_org_id: get("OPENAI_ORG_ID"),
            telegram_bot_token: required("TELEGRAM_BOT_TOKEN")?,
            telegram_bot_name: required("TELEGRAM_BOT_NAME")?
                .trim()
                .trim_start_matches('@')
                .to_string(),
            telegram_channel_id: required("TELEGRAM_CHANNEL_ID")?,
            newsapi_key: required("NEWSAPI_KEY")?,
            message_limit,
            news_page_size,
            summary_context_tokens: parse_or(
                get("SUMMARY_CONTEXT_TOKENS"),
                "SUMMARY_CONTEXT_TOKENS",
                DEFAULT_SUMMARY_CONTEXT_TOKENS,
            )?,
            poll_timeout_secs: parse_or(
                get("TELEGRAM_POLL_TIMEOUT_SECS"),
                "TELEGRAM_POLL_TIMEOUT_SECS",
                DEFAULT_POLL_TIMEOUT_SECS,
            )?,
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T, DigestError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map_err(|e| DigestError::ConfigError(format!("{key}: {e}"))),
        None => Ok(default),
    }
}

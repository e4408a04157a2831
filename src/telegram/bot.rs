//! Long-polling event loop for the Telegram bot.
//!
//! Updates are handled strictly one after another: a slow digest blocks the
//! next mention until it finishes.

use std::sync::Arc;
use tracing::{error, info, warn};

use super::client::{TelegramClient, Update};
use super::mention::MentionParser;
use crate::ai::client::LlmClient;
use crate::core::config::AppConfig;
use crate::errors::DigestError;
use crate::news::client::NewsApiClient;
use crate::worker::handler::{DigestPipeline, PipelineOutcome};
use crate::worker::summarize::DigestSummarizer;

pub type NewsPipeline = DigestPipeline<NewsApiClient, LlmClient, Arc<TelegramClient>>;

/// What an inbound message asks the bot to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    Mention(String),
    None,
}

#[must_use]
pub fn usage_text(bot_handle: &str) -> String {
    format!("Tag me with keywords (e.g., @{bot_handle} News Keywords) to get a news summary!")
}

#[must_use]
pub fn help_text(bot_handle: &str) -> String {
    format!(
        "Commands:\n\
         /start - how to use this bot\n\
         /help - show this message\n\
         @{bot_handle} <keywords> - post a news digest about <keywords> to the channel"
    )
}

/// Classify a message. `/start` and `/help` may carry the `@handle` suffix
/// Telegram adds in group chats.
#[must_use]
pub fn classify_message(text: &str, bot_handle: &str, mentioned: bool) -> BotCommand {
    let first = text.split_whitespace().next().unwrap_or_default();
    let (command, target) = match first.split_once('@') {
        Some((cmd, target)) => (cmd, Some(target)),
        None => (first, None),
    };
    let addressed_to_us = target.is_none_or(|t| t == bot_handle);

    match command {
        "/start" if addressed_to_us => BotCommand::Start,
        "/help" if addressed_to_us => BotCommand::Help,
        _ if mentioned => BotCommand::Mention(text.to_string()),
        _ => BotCommand::None,
    }
}

/// What the event loop does with one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotAction {
    /// Answer in the chat the update came from.
    Reply { chat_id: i64, text: String },
    /// Hand the message text to the digest pipeline.
    Digest(String),
}

/// Decide how to react to an update. Updates without text, and text that is
/// neither a command nor a mention, yield `None`.
#[must_use]
pub fn route_update(update: &Update, parser: &MentionParser) -> Option<BotAction> {
    let message = update.message()?;
    let text = message.text.as_deref()?;
    let handle = parser.handle();

    match classify_message(text, handle, parser.is_mentioned(text)) {
        BotCommand::Start => Some(BotAction::Reply {
            chat_id: message.chat.id,
            text: usage_text(handle),
        }),
        BotCommand::Help => Some(BotAction::Reply {
            chat_id: message.chat.id,
            text: help_text(handle),
        }),
        BotCommand::Mention(text) => Some(BotAction::Digest(text)),
        BotCommand::None => None,
    }
}

pub struct NewsBot {
    client: Arc<TelegramClient>,
    pipeline: NewsPipeline,
    poll_timeout_secs: u64,
}

impl NewsBot {
    /// Wire up every collaborator from the config.
    ///
    /// # Errors
    ///
    /// Returns an error if any HTTP client or the mention pattern cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, DigestError> {
        let client = Arc::new(TelegramClient::new(
            config.telegram_bot_token.clone(),
            config.poll_timeout_secs,
        )?);
        let summarizer = DigestSummarizer::from_config(LlmClient::from_config(config)?, config);
        let pipeline = DigestPipeline::new(
            config,
            NewsApiClient::new(config)?,
            summarizer,
            Arc::clone(&client),
        )?;

        Ok(Self {
            client,
            pipeline,
            poll_timeout_secs: config.poll_timeout_secs,
        })
    }

    /// Poll forever, handling one update at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the bot token is rejected at startup or polling
    /// keeps failing after retries.
    pub async fn run_polling(&self) -> Result<(), DigestError> {
        let me = self.client.get_me().await?;
        let handle = self.pipeline.parser().handle();
        if me.username.as_deref() != Some(handle) {
            warn!(
                "Configured bot name {} differs from Telegram username {:?}",
                handle, me.username
            );
        }
        info!("Bot @{} is polling for updates", handle);

        let mut offset: Option<i64> = None;
        loop {
            let updates = self
                .client
                .get_updates(offset, self.poll_timeout_secs)
                .await?;
            for update in updates {
                offset = Some(update.update_id + 1);
                self.handle_update(&update).await;
            }
        }
    }

    pub async fn handle_update(&self, update: &Update) {
        match route_update(update, self.pipeline.parser()) {
            Some(BotAction::Reply { chat_id, text }) => self.reply(chat_id, &text).await,
            Some(BotAction::Digest(text)) => self.handle_mention(&text).await,
            None => {}
        }
    }

    async fn handle_mention(&self, text: &str) {
        match self.pipeline.handle_mention(text).await {
            Ok(PipelineOutcome::Ignored) => {}
            Ok(PipelineOutcome::Delivered { topic, report }) => {
                if report.is_complete() {
                    info!("Digest for '{}' delivered in {} messages", topic, report.total);
                } else {
                    warn!(
                        "Digest for '{}' partially delivered: {}/{} messages",
                        topic, report.succeeded, report.total
                    );
                }
            }
            Err(DigestError::FetchFailure(topic)) => {
                info!("Nothing to summarize for '{}'", topic);
            }
            Err(e) => error!("Failed to produce digest: {}", e),
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self
            .client
            .send_message(&chat_id.to_string(), text, None)
            .await
        {
            warn!("Failed to reply in chat {}: {}", chat_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_command_variants() {
        assert_eq!(classify_message("/start", "NewsBot", false), BotCommand::Start);
        assert_eq!(
            classify_message("/start@NewsBot", "NewsBot", true),
            BotCommand::Start
        );
        assert_eq!(
            classify_message("/start@OtherBot", "NewsBot", false),
            BotCommand::None
        );
    }

    #[test]
    fn help_command() {
        assert_eq!(classify_message("/help", "NewsBot", false), BotCommand::Help);
    }

    #[test]
    fn mentions_are_forwarded_verbatim() {
        assert_eq!(
            classify_message("hello @NewsBot", "NewsBot", true),
            BotCommand::Mention("hello @NewsBot".to_string())
        );
        assert_eq!(classify_message("just chatting", "NewsBot", false), BotCommand::None);
    }

    fn update(json: &str) -> Update {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn start_update_replies_with_usage_in_same_chat() {
        let parser = MentionParser::new("NewsBot").unwrap();
        let start = update(
            r#"{"update_id": 1, "message": {"message_id": 5,
                "chat": {"id": 4242, "type": "private"}, "text": "/start"}}"#,
        );

        assert_eq!(
            route_update(&start, &parser),
            Some(BotAction::Reply {
                chat_id: 4242,
                text: usage_text("NewsBot"),
            })
        );
    }

    #[test]
    fn channel_mention_is_routed_to_digest() {
        let parser = MentionParser::new("NewsBot").unwrap();
        let post = update(
            r#"{"update_id": 2, "channel_post": {"message_id": 6,
                "chat": {"id": -1001, "type": "channel"}, "text": "@NewsBot rust"}}"#,
        );

        assert_eq!(
            route_update(&post, &parser),
            Some(BotAction::Digest("@NewsBot rust".to_string()))
        );
    }

    #[test]
    fn updates_without_text_or_mention_are_dropped() {
        let parser = MentionParser::new("NewsBot").unwrap();
        let photo = update(
            r#"{"update_id": 3, "message": {"message_id": 7,
                "chat": {"id": 1, "type": "group"}}}"#,
        );
        let chatter = update(
            r#"{"update_id": 4, "message": {"message_id": 8,
                "chat": {"id": 1, "type": "group"}, "text": "morning all"}}"#,
        );

        assert_eq!(route_update(&photo, &parser), None);
        assert_eq!(route_update(&chatter, &parser), None);
        assert_eq!(route_update(&update(r#"{"update_id": 5}"#), &parser), None);
    }

    #[test]
    fn usage_text_names_the_handle() {
        assert_eq!(
            usage_text("NewsBot"),
            "Tag me with keywords (e.g., @NewsBot News Keywords) to get a news summary!"
        );
        assert!(help_text("NewsBot").contains("/start"));
    }
}

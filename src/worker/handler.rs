//! One pipeline run per mention event: parse, fetch, summarize, deliver.

use tracing::{info, warn};
use uuid::Uuid;

use super::deliver::{MessageTransport, deliver_digest};
use super::summarize::DigestSummarizer;
use crate::ai::client::LanguageModel;
use crate::core::config::AppConfig;
use crate::core::models::{ChannelId, DeliveryReport};
use crate::errors::DigestError;
use crate::news::client::ArticleSource;
use crate::telegram::mention::MentionParser;

/// How a pipeline run ended when nothing went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// The message did not match `@<handle> <topic>`; nothing was fetched.
    Ignored,
    Delivered {
        topic: String,
        report: DeliveryReport,
    },
}

pub struct DigestPipeline<S, L, T> {
    source: S,
    summarizer: DigestSummarizer<L>,
    transport: T,
    parser: MentionParser,
    destination: ChannelId,
    message_limit: usize,
}

impl<S, L, T> DigestPipeline<S, L, T>
where
    S: ArticleSource,
    L: LanguageModel,
    T: MessageTransport,
{
    /// # Errors
    ///
    /// Returns an error if the bot handle cannot be turned into a mention pattern.
    pub fn new(
        config: &AppConfig,
        source: S,
        summarizer: DigestSummarizer<L>,
        transport: T,
    ) -> Result<Self, DigestError> {
        Ok(Self {
            source,
            summarizer,
            transport,
            parser: MentionParser::new(&config.telegram_bot_name)?,
            destination: ChannelId::new(config.telegram_channel_id.clone()),
            message_limit: config.message_limit,
        })
    }

    #[must_use]
    pub fn parser(&self) -> &MentionParser {
        &self.parser
    }

    /// Run the full pipeline for one inbound message.
    ///
    /// # Errors
    ///
    /// `FetchFailure` when no articles come back, otherwise whatever the
    /// summarizer raised. Delivery failures are reported in the outcome, not
    /// as errors.
    pub async fn handle_mention(
        &self,
        event_text: &str,
    ) -> Result<PipelineOutcome, DigestError> {
        let correlation_id = Uuid::new_v4();

        let Some(topic) = self.parser.parse(event_text) else {
            warn!(
                "No topic found in input: {:?} (pattern={} handle={} corr_id={})",
                event_text,
                self.parser.pattern(),
                self.parser.handle(),
                correlation_id
            );
            return Ok(PipelineOutcome::Ignored);
        };
        info!("User is searching for '{}' (corr_id={})", topic, correlation_id);

        let report = self.run_topic(&topic, correlation_id).await?;
        Ok(PipelineOutcome::Delivered { topic, report })
    }

    /// Fetch, summarize and deliver for an already-parsed topic.
    ///
    /// # Errors
    ///
    /// Same as [`Self::handle_mention`].
    pub async fn run_topic(
        &self,
        topic: &str,
        correlation_id: Uuid,
    ) -> Result<DeliveryReport, DigestError> {
        let digest = self.summarize_topic(topic, correlation_id).await?;
        let report = self.deliver(&digest).await;
        info!(
            "Delivery finished: total={} succeeded={} failed={} (corr_id={})",
            report.total, report.succeeded, report.failed, correlation_id
        );
        Ok(report)
    }

    /// Fetch and summarize without delivering.
    ///
    /// # Errors
    ///
    /// Same as [`Self::handle_mention`].
    pub async fn summarize_topic(
        &self,
        topic: &str,
        correlation_id: Uuid,
    ) -> Result<String, DigestError> {
        let articles = self.source.fetch(Some(topic)).await;
        if articles.is_empty() {
            info!("No articles found for '{}' (corr_id={})", topic, correlation_id);
            return Err(DigestError::FetchFailure(topic.to_string()));
        }

        self.summarizer.summarize(articles, topic).await
    }

    /// Deliver an already-produced digest to the configured channel.
    pub async fn deliver(&self, digest: &str) -> DeliveryReport {
        deliver_digest(&self.transport, &self.destination, digest, self.message_limit).await
    }
}

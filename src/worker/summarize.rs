use tracing::info;

use crate::ai::client::LanguageModel;
use crate::ai::prompt_builder::SummaryPrompt;
use crate::ai::tree::tree_summarize;
use crate::core::config::AppConfig;
use crate::core::models::{RawArticle, TopicSet};
use crate::errors::DigestError;
use crate::news::normalize::normalize;

/// Turns a batch of raw articles into one bullet-point digest.
pub struct DigestSummarizer<L> {
    model: L,
    context_tokens: usize,
}

impl<L: LanguageModel> DigestSummarizer<L> {
    pub fn new(model: L, context_tokens: usize) -> Self {
        Self {
            model,
            context_tokens,
        }
    }

    pub fn from_config(model: L, config: &AppConfig) -> Self {
        Self::new(model, config.summary_context_tokens)
    }

    #[must_use]
    pub fn model(&self) -> &L {
        &self.model
    }

    /// Summarize `articles` fetched for `topic`. The model's answer is returned
    /// verbatim; its bullet format is not checked.
    ///
    /// # Errors
    ///
    /// `EmptyInput` when there is nothing to summarize (the model is never
    /// called); any model failure is propagated as-is, without retry.
    pub async fn summarize(
        &self,
        articles: Vec<RawArticle>,
        topic: &str,
    ) -> Result<String, DigestError> {
        if articles.is_empty() {
            return Err(DigestError::EmptyInput);
        }

        let topics = TopicSet::from_articles(&articles);
        let documents = normalize(&articles, topic);
        if documents.is_empty() {
            return Err(DigestError::EmptyInput);
        }

        let query = SummaryPrompt::for_topics(&topics).render();
        let texts = documents
            .iter()
            .map(|doc| doc.render_for_context())
            .collect();

        let digest = tree_summarize(&self.model, &query, texts, self.context_tokens).await?;
        info!(
            "News has been summarized ({} documents, {} chars)",
            documents.len(),
            digest.chars().count()
        );
        Ok(digest)
    }
}

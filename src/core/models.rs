use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Article record as returned by the news API. Every field may be missing or null.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArticle {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub source: Option<RawSource>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// Query topic, attached by the fetcher.
    #[serde(default)]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSource {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source: String,
    pub url: Option<String>,
    pub published_at: Option<String>,
    pub author: Option<String>,
    pub topic: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedDocument {
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl NormalizedDocument {
    /// Text block handed to the summarizer, prefixed with the provenance the
    /// model needs to cite sources.
    #[must_use]
    pub fn render_for_context(&self) -> String {
        let mut out = format!("source: {}\n", self.metadata.source);
        if let Some(url) = self.metadata.url.as_deref().filter(|u| !u.is_empty()) {
            out.push_str(&format!("url: {url}\n"));
        }
        if let Some(ts) = self.metadata.published_at.as_deref().filter(|t| !t.is_empty()) {
            out.push_str(&format!("published_at: {ts}\n"));
        }
        out.push('\n');
        out.push_str(&self.text);
        out
    }
}

/// Distinct non-empty topics seen across one batch of articles.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicSet(BTreeSet<String>);

impl TopicSet {
    #[must_use]
    pub fn from_articles(articles: &[RawArticle]) -> Self {
        Self(
            articles
                .iter()
                .filter_map(|a| a.topic.as_deref())
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for TopicSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self.iter().collect::<Vec<_>>().join(", ");
        write!(f, "{{{joined}}}")
    }
}

/// Chat destination; either a numeric chat id or an `@channelusername`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(pub String);

impl ChannelId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of delivering one digest. Used for logging only; never drives a retry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeliveryReport {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl DeliveryReport {
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.failed == 0 && self.succeeded == self.total
    }
}

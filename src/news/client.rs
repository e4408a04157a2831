//! NewsAPI client module
//!
//! Fetches recent articles for a topic. Every upstream problem (network,
//! rate limit, bad payload, zero results) collapses into an empty list.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

use crate::core::config::AppConfig;
use crate::core::models::RawArticle;
use crate::errors::DigestError;

const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2/";
const NEWSAPI_LANGUAGE: &str = "en";

/// Source of raw articles for a topic.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Fetch articles for `topic`, or top headlines when `topic` is `None`.
    /// Returns an empty list on any failure.
    async fn fetch(&self, topic: Option<&str>) -> Vec<RawArticle>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NewsApiResponse {
    status: String,
    #[serde(default)]
    total_results: Option<u64>,
    #[serde(default)]
    articles: Vec<RawArticle>,
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

pub struct NewsApiClient {
    api_key: String,
    page_size: u32,
    base_url: Url,
    http: Client,
}

impl NewsApiClient {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &AppConfig) -> Result<Self, DigestError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                DigestError::HttpError(format!("Failed to build NewsAPI client: {e}"))
            })?;
        let base_url = Url::parse(NEWSAPI_BASE_URL)
            .map_err(|e| DigestError::ConfigError(format!("NewsAPI base URL: {e}")))?;

        Ok(Self {
            api_key: config.newsapi_key.clone(),
            page_size: config.news_page_size,
            base_url,
            http,
        })
    }

    /// Endpoint and query for a topic search, or top headlines without one.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint path cannot be joined onto the base URL.
    pub fn request_url(&self, topic: Option<&str>) -> Result<Url, DigestError> {
        let page_size = self.page_size.to_string();
        let topic = topic.map(str::trim).filter(|t| !t.is_empty());

        let (path, params): (&str, Vec<(&str, &str)>) = match topic {
            Some(q) => (
                "everything",
                vec![
                    ("q", q),
                    ("language", NEWSAPI_LANGUAGE),
                    ("sortBy", "publishedAt"),
                    ("pageSize", &page_size),
                ],
            ),
            None => (
                "top-headlines",
                vec![("language", NEWSAPI_LANGUAGE), ("pageSize", &page_size)],
            ),
        };

        let mut url = self
            .base_url
            .join(path)
            .map_err(|e| DigestError::GeneralError(format!("NewsAPI URL: {e}")))?;
        url.query_pairs_mut().extend_pairs(params);
        Ok(url)
    }

    async fn try_fetch(&self, topic: Option<&str>) -> Result<Vec<RawArticle>, DigestError> {
        let url = self.request_url(topic)?;
        let response = self
            .http
            .get(url)
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        let parsed = parse_response(&body)?;
        if !status.is_success() {
            return Err(DigestError::HttpError(format!("NewsAPI returned status {status}")));
        }
        Ok(parsed)
    }
}

/// Decode a NewsAPI payload, surfacing `status: "error"` bodies as errors.
fn parse_response(body: &str) -> Result<Vec<RawArticle>, DigestError> {
    let parsed: NewsApiResponse = serde_json::from_str(body)
        .map_err(|e| DigestError::GeneralError(format!("Invalid NewsAPI payload: {e}")))?;

    if parsed.status != "ok" {
        return Err(DigestError::HttpError(format!(
            "NewsAPI error {}: {}",
            parsed.code.as_deref().unwrap_or("unknown"),
            parsed.message.as_deref().unwrap_or("no message")
        )));
    }

    if let Some(total) = parsed.total_results {
        info!("NewsAPI reports {} total results", total);
    }
    Ok(parsed.articles)
}

#[async_trait]
impl ArticleSource for NewsApiClient {
    async fn fetch(&self, topic: Option<&str>) -> Vec<RawArticle> {
        let label = topic.unwrap_or("<top headlines>");
        let mut articles = match self.try_fetch(topic).await {
            Ok(articles) => articles,
            Err(e) => {
                error!("Error fetching news for {}: {}", label, e);
                return Vec::new();
            }
        };

        if articles.is_empty() {
            error!("Couldn't find any article related to {}", label);
            return articles;
        }

        for article in &mut articles {
            article.topic = topic.map(str::to_string);
        }

        info!("Fetched {} articles for topic {}", articles.len(), label);
        articles
    }
}

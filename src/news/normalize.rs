//! Turns raw news API records into uniform documents for the summarizer.
//!
//! Articles are short enough to be ingested whole, so no splitting happens
//! here. Long articles pass through unmodified.

use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use crate::core::models::{DocumentMetadata, NormalizedDocument, RawArticle};
use crate::errors::DigestError;

static HTML_TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<[^>]+>").expect("static regex compile"));

/// Remove `<...>` tag markup. Entities such as `&amp;` are left alone.
#[must_use]
pub fn strip_html_tags(input: &str) -> String {
    HTML_TAG_RE.replace_all(input, "").into_owned()
}

/// Stable document id for articles without a URL: hex SHA-256 of the text.
#[must_use]
pub fn content_id(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Normalize a single article.
///
/// # Errors
///
/// Returns `DigestError::MalformedArticle` when the article has no source name.
pub fn normalize_article(
    article: &RawArticle,
    topic: &str,
) -> Result<NormalizedDocument, DigestError> {
    let source = article
        .source
        .as_ref()
        .and_then(|s| s.name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            DigestError::MalformedArticle(format!(
                "missing source.name (url: {})",
                article.url.as_deref().unwrap_or("<none>")
            ))
        })?;

    let text = strip_html_tags(&format!(
        "{}\n{}\n{}",
        article.title.as_deref().unwrap_or_default(),
        article.description.as_deref().unwrap_or_default(),
        article.content.as_deref().unwrap_or_default(),
    ));

    let url = article.url.clone().filter(|u| !u.trim().is_empty());
    let id = url.clone().unwrap_or_else(|| content_id(&text));

    Ok(NormalizedDocument {
        id,
        text,
        metadata: DocumentMetadata {
            source: source.to_string(),
            url,
            published_at: article.published_at.clone(),
            author: article.author.clone(),
            topic: topic.trim().to_string(),
        },
    })
}

/// Normalize a batch. Malformed articles are skipped with a warning; the rest
/// of the batch is still returned.
#[must_use]
pub fn normalize(articles: &[RawArticle], topic: &str) -> Vec<NormalizedDocument> {
    let documents: Vec<NormalizedDocument> = articles
        .iter()
        .filter_map(|article| match normalize_article(article, topic) {
            Ok(doc) => Some(doc),
            Err(e) => {
                warn!("Skipping article: {}", e);
                None
            }
        })
        .collect();

    info!(
        "Created {} documents from {} articles",
        documents.len(),
        articles.len()
    );
    documents
}

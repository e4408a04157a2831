use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, info};

use crate::core::models::{ChannelId, DeliveryReport};
use crate::errors::DigestError;

/// Message formatting mode understood by the chat transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    Html,
}

impl ParseMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ParseMode::Html => "HTML",
        }
    }
}

/// Outbound chat transport. One call sends one message.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// # Errors
    ///
    /// Returns `DigestError::TransportError` when the message is rejected or
    /// cannot be sent.
    async fn send(
        &self,
        destination: &ChannelId,
        text: &str,
        parse_mode: ParseMode,
    ) -> Result<(), DigestError>;
}

#[async_trait]
impl<T: MessageTransport + ?Sized> MessageTransport for Arc<T> {
    async fn send(
        &self,
        destination: &ChannelId,
        text: &str,
        parse_mode: ParseMode,
    ) -> Result<(), DigestError> {
        (**self).send(destination, text, parse_mode).await
    }
}

/// Split `text` into contiguous pieces of at most `limit` characters, in order.
/// Concatenating the result gives back `text`; an empty input yields one empty chunk.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    if text.chars().count() <= limit {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;
    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == limit {
            chunks.push(std::mem::take(&mut current));
            count = 0;
        }
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

/// Send `digest` to `destination`, one chunk at a time and in order.
///
/// A failed chunk is logged and skipped; later chunks are still attempted.
/// Nothing is retried and nothing already sent is rolled back.
pub async fn deliver_digest<T>(
    transport: &T,
    destination: &ChannelId,
    digest: &str,
    limit: usize,
) -> DeliveryReport
where
    T: MessageTransport + ?Sized,
{
    let chunks = split_message(digest, limit);
    let mut report = DeliveryReport {
        total: chunks.len(),
        ..DeliveryReport::default()
    };

    for (idx, chunk) in chunks.iter().enumerate() {
        match transport.send(destination, chunk, ParseMode::Html).await {
            Ok(()) => {
                report.succeeded += 1;
                info!(
                    "Message chunk {}/{} posted successfully to channel {}",
                    idx + 1,
                    report.total,
                    destination
                );
            }
            Err(e) => {
                report.failed += 1;
                error!(
                    "Error posting chunk {}/{} to channel {}: {}",
                    idx + 1,
                    report.total,
                    destination,
                    e
                );
            }
        }
    }

    if report.total > 1 {
        info!(
            "Long message posted as {} chunks to channel {} ({} failed)",
            report.total, destination, report.failed
        );
    }
    report
}

//! In-memory collaborators shared by the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use newsroom::core::config::AppConfig;
use newsroom::core::models::{ChannelId, RawArticle, RawSource};
use newsroom::errors::DigestError;
use newsroom::news::ArticleSource;
use newsroom::ai::LanguageModel;
use newsroom::worker::{MessageTransport, ParseMode};

/// Model double that records every prompt and answers from a script.
#[derive(Default)]
pub struct FakeModel {
    pub prompts: Mutex<Vec<String>>,
    reply: String,
    fail_with: Option<String>,
}

impl FakeModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Self::default()
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            fail_with: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn infer(&self, prompt: &str) -> Result<String, DigestError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.fail_with {
            Some(msg) => Err(DigestError::SummarizationFailure(msg.clone())),
            None => Ok(self.reply.clone()),
        }
    }
}

/// Transport double that fails on chosen call indices (0-based) and records
/// every chunk it was asked to send.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<(String, String, ParseMode)>>,
    fail_on: Vec<usize>,
}

impl RecordingTransport {
    pub fn failing_on(fail_on: &[usize]) -> Self {
        Self {
            fail_on: fail_on.to_vec(),
            ..Self::default()
        }
    }

    pub fn chunks(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|(_, text, _)| text.clone())
            .collect()
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send(
        &self,
        destination: &ChannelId,
        text: &str,
        parse_mode: ParseMode,
    ) -> Result<(), DigestError> {
        let mut sent = self.sent.lock().unwrap();
        let index = sent.len();
        sent.push((destination.to_string(), text.to_string(), parse_mode));
        if self.fail_on.contains(&index) {
            return Err(DigestError::TransportError(format!("chunk {index} rejected")));
        }
        Ok(())
    }
}

/// Article source double returning a fixed batch and recording queried topics.
#[derive(Default)]
pub struct FakeSource {
    pub articles: Vec<RawArticle>,
    pub queries: Mutex<Vec<Option<String>>>,
}

impl FakeSource {
    pub fn with(articles: Vec<RawArticle>) -> Self {
        Self {
            articles,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ArticleSource for FakeSource {
    async fn fetch(&self, topic: Option<&str>) -> Vec<RawArticle> {
        self.queries.lock().unwrap().push(topic.map(str::to_string));
        self.articles
            .iter()
            .cloned()
            .map(|mut a| {
                a.topic = topic.map(str::to_string);
                a
            })
            .collect()
    }
}

pub fn article(source: &str, title: &str, url: Option<&str>) -> RawArticle {
    RawArticle {
        title: Some(title.to_string()),
        description: Some(format!("{title} description")),
        content: Some(format!("{title} content")),
        source: Some(RawSource {
            id: None,
            name: Some(source.to_string()),
        }),
        url: url.map(str::to_string),
        published_at: Some("2024-05-01T10:00:00Z".to_string()),
        author: None,
        topic: None,
    }
}

pub fn test_env() -> HashMap<&'static str, String> {
    HashMap::from([
        ("OPENAI_API_KEY", "sk-test".to_string()),
        ("OPENAI_LLM", "gpt-4o-mini".to_string()),
        ("TELEGRAM_BOT_TOKEN", "123:abc".to_string()),
        ("TELEGRAM_BOT_NAME", "NewsBot".to_string()),
        ("TELEGRAM_CHANNEL_ID", "@newsroom".to_string()),
        ("NEWSAPI_KEY", "news-key".to_string()),
    ])
}

pub fn test_config() -> AppConfig {
    let env = test_env();
    AppConfig::from_lookup(|key| env.get(key).cloned()).unwrap()
}

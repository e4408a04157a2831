use thiserror::Error;

#[derive(Debug, Error)]
pub enum DigestError {
    #[error("No articles fetched for topic: {0}")]
    FetchFailure(String),

    #[error("Malformed article: {0}")]
    MalformedArticle(String),

    #[error("No articles to summarize")]
    EmptyInput,

    #[error("Failed to summarize articles: {0}")]
    SummarizationFailure(String),

    #[error("Failed to deliver Telegram message: {0}")]
    TransportError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("{0}")]
    GeneralError(String),
}

impl From<reqwest::Error> for DigestError {
    fn from(error: reqwest::Error) -> Self {
        DigestError::HttpError(error.to_string())
    }
}

impl From<anyhow::Error> for DigestError {
    fn from(error: anyhow::Error) -> Self {
        DigestError::GeneralError(error.to_string())
    }
}

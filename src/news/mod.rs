//! News retrieval and normalization

pub mod client;
pub mod normalize;

pub use client::{ArticleSource, NewsApiClient};
pub use normalize::{normalize, normalize_article, strip_html_tags};

//! All AI/LLM functionality

pub mod client;
pub mod prompt_builder;
pub mod tree;

// Re-export main types for convenience
pub use client::{LanguageModel, LlmClient, estimate_tokens};
pub use prompt_builder::SummaryPrompt;
pub use tree::tree_summarize;

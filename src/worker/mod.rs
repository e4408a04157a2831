//! The query-to-digest pipeline

pub mod deliver;
pub mod handler;
pub mod summarize;

// Re-export the main entry points for convenience
pub use deliver::{MessageTransport, ParseMode, deliver_digest, split_message};
pub use handler::{DigestPipeline, PipelineOutcome};
pub use summarize::DigestSummarizer;

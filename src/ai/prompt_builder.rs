//! Prompt templates for the news digest.

use crate::core::models::TopicSet;

pub const DIGEST_GOAL: &str = "Summarize the key points from the provided articles concisely.";

pub const DIGEST_CONTEXT: &str = "You are a news summarization assistant. You will be given a list \
    of articles with titles, descriptions and contents, and your job is aggregating insight from \
    that data.";

pub const DIGEST_OUTPUT_FORMAT: &str = "Present your work as numbered bullet points like this example:
1. Key takeaway #1 key/term: summarized content | from source-1, source-2.
2. Key takeaway #2 key/term: summarized content | from source-1, source-2.
3. Key takeaway #3 key/term: summarized content | from source-1, source-2.";

const CONTEXT_SEPARATOR: &str = "---------------------";

/// The four-slot instruction block sent as the query of every summarization call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPrompt {
    pub goal: String,
    pub context: String,
    pub topics: String,
    pub output_format: String,
}

impl SummaryPrompt {
    #[must_use]
    pub fn for_topics(topics: &TopicSet) -> Self {
        Self {
            goal: DIGEST_GOAL.to_string(),
            context: DIGEST_CONTEXT.to_string(),
            topics: topics.to_string(),
            output_format: DIGEST_OUTPUT_FORMAT.to_string(),
        }
    }

    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "Goal: {}\n---\nContext: {}\n---\nOutput Structure:\n{}:\n{}",
            self.goal, self.context, self.topics, self.output_format
        )
    }
}

/// Wrap packed document context and the query into one model call.
#[must_use]
pub fn render_context_prompt(context: &str, query: &str) -> String {
    format!(
        "Context information from multiple sources is below.\n\
         {CONTEXT_SEPARATOR}\n\
         {context}\n\
         {CONTEXT_SEPARATOR}\n\
         Given the information from multiple sources and not prior knowledge, answer the query.\n\
         Query: {query}\n\
         Answer: "
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::RawArticle;

    #[test]
    fn render_contains_all_slots_in_order() {
        let articles = vec![RawArticle {
            topic: Some("climate policy".into()),
            ..RawArticle::default()
        }];
        let rendered = SummaryPrompt::for_topics(&TopicSet::from_articles(&articles)).render();

        let goal = rendered.find("Goal: Summarize the key points").unwrap();
        let context = rendered.find("Context: You are a news summarization assistant").unwrap();
        let topics = rendered.find("{climate policy}:").unwrap();
        let format = rendered.find("1. Key takeaway #1 key/term").unwrap();
        assert!(goal < context && context < topics && topics < format);
    }

    #[test]
    fn context_prompt_embeds_context_and_query() {
        let prompt = render_context_prompt("source: BBC\n\nbody", "What happened?");
        assert!(prompt.starts_with("Context information from multiple sources is below."));
        assert!(prompt.contains("source: BBC\n\nbody"));
        assert!(prompt.contains("Query: What happened?"));
        assert!(prompt.ends_with("Answer: "));
    }
}

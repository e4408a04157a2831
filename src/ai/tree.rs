//! Tree-style summarization.
//!
//! Texts are packed into groups that fit the model's context budget, each group
//! is answered separately, and the answers are fed back in as the next level's
//! texts until a single answer remains. Prompt size stays bounded no matter how
//! many documents come in.

use tracing::{info, warn};

use super::client::{LanguageModel, estimate_tokens};
use super::prompt_builder::render_context_prompt;
use crate::errors::DigestError;

/// Tokens kept free for the model's answer in every call.
pub const OUTPUT_TOKEN_RESERVE: usize = 1024;

const TEXT_SEPARATOR: &str = "\n\n";

/// Context tokens left for packed texts once the template, query and answer
/// reserve are accounted for.
#[must_use]
pub fn context_budget(context_tokens: usize, query: &str) -> usize {
    let overhead = estimate_tokens(&render_context_prompt("", query));
    context_tokens
        .saturating_sub(overhead)
        .saturating_sub(OUTPUT_TOKEN_RESERVE)
}

fn truncate_to_budget(text: &str, budget: usize) -> String {
    if estimate_tokens(text) <= budget {
        return text.to_string();
    }
    let max_chars = budget.saturating_sub(1) * 4;
    warn!(
        "Truncating text of {} chars to {} chars to fit the context budget",
        text.chars().count(),
        max_chars
    );
    text.chars().take(max_chars).collect()
}

/// Greedily pack texts, in order, into groups whose estimated size fits `budget`.
/// A single text larger than the budget is truncated and gets a group of its own.
#[must_use]
pub fn pack_texts(texts: &[String], budget: usize) -> Vec<String> {
    let mut packs: Vec<String> = Vec::new();
    let mut current = String::new();

    for text in texts {
        let text = truncate_to_budget(text, budget);
        if current.is_empty() {
            current = text;
            continue;
        }
        let candidate_tokens = estimate_tokens(&current)
            + estimate_tokens(TEXT_SEPARATOR)
            + estimate_tokens(&text);
        if candidate_tokens <= budget {
            current.push_str(TEXT_SEPARATOR);
            current.push_str(&text);
        } else {
            packs.push(std::mem::replace(&mut current, text));
        }
    }
    if !current.is_empty() {
        packs.push(current);
    }
    packs
}

/// Answer `query` over all `texts`, combining partial answers level by level.
/// Calls are issued one at a time.
///
/// # Errors
///
/// Fails when `texts` is empty, when the query leaves no room for context, when
/// a reduction level stops shrinking, or when the model call fails.
pub async fn tree_summarize<L>(
    model: &L,
    query: &str,
    texts: Vec<String>,
    context_tokens: usize,
) -> Result<String, DigestError>
where
    L: LanguageModel + ?Sized,
{
    if texts.is_empty() {
        return Err(DigestError::EmptyInput);
    }

    let budget = context_budget(context_tokens, query);
    if budget == 0 {
        return Err(DigestError::SummarizationFailure(format!(
            "query does not fit a {context_tokens}-token context window"
        )));
    }

    let mut texts = texts;
    let mut level = 0usize;
    loop {
        let packs = pack_texts(&texts, budget);
        info!(
            "Tree summarize level {}: {} texts packed into {} calls",
            level,
            texts.len(),
            packs.len()
        );

        if level > 0 && packs.len() >= texts.len() {
            return Err(DigestError::SummarizationFailure(format!(
                "partial summaries did not converge at level {level} ({} texts)",
                texts.len()
            )));
        }

        let mut answers = Vec::with_capacity(packs.len());
        for pack in &packs {
            answers.push(model.infer(&render_context_prompt(pack, query)).await?);
        }

        if answers.len() == 1 {
            return Ok(answers.remove(0));
        }
        texts = answers;
        level += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_texts_share_one_pack() {
        let texts = vec!["alpha".to_string(), "beta".to_string()];
        let packs = pack_texts(&texts, 100);
        assert_eq!(packs, vec!["alpha\n\nbeta".to_string()]);
    }

    #[test]
    fn packs_split_when_budget_is_exceeded() {
        let texts = vec!["a".repeat(40), "b".repeat(40), "c".repeat(40)];
        // Each text is ~11 tokens; two of them plus the separator exceed 20.
        let packs = pack_texts(&texts, 20);
        assert_eq!(packs.len(), 3);
        assert_eq!(packs[1], "b".repeat(40));
    }

    #[test]
    fn oversized_text_is_truncated() {
        let texts = vec!["x".repeat(1000)];
        let packs = pack_texts(&texts, 10);
        assert_eq!(packs.len(), 1);
        assert!(estimate_tokens(&packs[0]) <= 10);
    }

    #[test]
    fn budget_subtracts_template_and_reserve() {
        let budget = context_budget(8192, "query");
        assert!(budget < 8192 - OUTPUT_TOKEN_RESERVE);
        assert_eq!(context_budget(10, "query"), 0);
    }
}

//! Extracts the topic from a message that tags the bot.

use regex::Regex;

use crate::errors::DigestError;

/// Matches `@<handle> <topic>` anchored at both ends of the message. A single
/// trailing newline is tolerated and left out of the topic.
#[derive(Debug, Clone)]
pub struct MentionParser {
    handle: String,
    pattern: Regex,
}

impl MentionParser {
    /// # Errors
    ///
    /// Returns an error if the pattern built from `bot_handle` does not compile.
    pub fn new(bot_handle: &str) -> Result<Self, DigestError> {
        let handle = bot_handle.trim_start_matches('@').to_string();
        let pattern = Regex::new(&format!(r"^@{}\s+(.+)\n?$", regex::escape(&handle)))
            .map_err(|e| DigestError::ConfigError(format!("mention pattern: {e}")))?;
        Ok(Self { handle, pattern })
    }

    #[must_use]
    pub fn handle(&self) -> &str {
        &self.handle
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// The captured remainder after the mention, untrimmed, or `None` when the
    /// message does not start with the mention followed by text.
    #[must_use]
    pub fn parse(&self, event_text: &str) -> Option<String> {
        self.pattern
            .captures(event_text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// Whether the message mentions the bot anywhere.
    #[must_use]
    pub fn is_mentioned(&self, text: &str) -> bool {
        let needle = format!("@{}", self.handle);
        text.match_indices(&needle).any(|(idx, _)| {
            text[idx + needle.len()..]
                .chars()
                .next()
                .is_none_or(|c| !(c.is_alphanumeric() || c == '_'))
        })
    }
}

/// One-off form of [`MentionParser::parse`].
#[must_use]
pub fn parse_query(event_text: &str, bot_handle: &str) -> Option<String> {
    MentionParser::new(bot_handle)
        .ok()
        .and_then(|parser| parser.parse(event_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_with_regex_metacharacters_is_escaped() {
        let parser = MentionParser::new("news.bot").unwrap();
        assert_eq!(parser.parse("@news.bot AI").as_deref(), Some("AI"));
        assert!(parser.parse("@newsXbot AI").is_none());
    }

    #[test]
    fn leading_at_in_handle_is_ignored() {
        let parser = MentionParser::new("@NewsBot").unwrap();
        assert_eq!(parser.handle(), "NewsBot");
        assert_eq!(parser.parse("@NewsBot rust").as_deref(), Some("rust"));
    }

    #[test]
    fn mention_detection_respects_username_boundaries() {
        let parser = MentionParser::new("NewsBot").unwrap();
        assert!(parser.is_mentioned("hello @NewsBot"));
        assert!(parser.is_mentioned("@NewsBot, hi"));
        assert!(!parser.is_mentioned("@NewsBotter hi"));
        assert!(!parser.is_mentioned("no mention"));
    }
}

use newsroom::telegram::{MentionParser, parse_query};

#[test]
fn test_mention_with_topic() {
    assert_eq!(
        parse_query("@NewsBot climate policy", "NewsBot"),
        Some("climate policy".to_string())
    );
}

#[test]
fn test_mention_not_at_start_is_ignored() {
    assert_eq!(parse_query("hello @NewsBot", "NewsBot"), None);
}

#[test]
fn test_mention_without_topic_is_ignored() {
    assert_eq!(parse_query("@NewsBot", "NewsBot"), None);
}

#[test]
fn test_other_bot_is_ignored() {
    assert_eq!(parse_query("@OtherBot rust", "NewsBot"), None);
}

#[test]
fn test_handle_with_at_sign_is_accepted() {
    let parser = MentionParser::new("@NewsBot").unwrap();
    assert_eq!(parser.handle(), "NewsBot");
    assert_eq!(parser.parse("@NewsBot rust"), Some("rust".to_string()));
}

#[test]
fn test_trailing_newline_is_not_part_of_topic() {
    assert_eq!(
        parse_query("@NewsBot climate policy\n", "NewsBot"),
        Some("climate policy".to_string())
    );
    assert_eq!(parse_query("@NewsBot climate\npolicy", "NewsBot"), None);
}

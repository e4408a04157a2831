//! All Telegram-specific functionality

pub mod bot;
pub mod client;
pub mod mention;

// Re-export main types for convenience
pub use bot::NewsBot;
pub use client::TelegramClient;
pub use mention::{MentionParser, parse_query};

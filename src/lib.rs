/// Newsroom - a Telegram bot that turns a topic into a bullet-point news digest.
///
/// A user tags the bot with keywords; the bot fetches recent articles from
/// NewsAPI, condenses them with an `OpenAI` model and posts the digest to a
/// Telegram channel, split into transport-sized messages.
///
/// # Architecture
///
/// One pipeline run per mention, processed sequentially:
/// - `telegram::mention` extracts the topic from `@bot <topic>`
/// - `news::client` fetches articles, `news::normalize` cleans them
/// - `worker::summarize` builds the prompt and reduces the documents with
///   `ai::tree` into one digest
/// - `worker::deliver` splits the digest and posts each chunk in order
///
/// # Example
///
/// ```no_run
/// use newsroom::core::config::AppConfig;
/// use newsroom::telegram::NewsBot;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     newsroom::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let bot = NewsBot::new(&config)?;
///     bot.run_polling().await?;
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod core;
pub mod errors;
pub mod news;
pub mod telegram;
pub mod worker;

pub use errors::DigestError;

/// Configure structured JSON logging.
///
/// Verbosity comes from `RUST_LOG` and defaults to `info`. Calling this more
/// than once is harmless; only the first call installs the subscriber.
///
/// # Example
///
/// ```
/// newsroom::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}

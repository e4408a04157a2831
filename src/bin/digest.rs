// One-shot digest from the command line

use anyhow::{Result, bail};
use clap::Parser;
use newsroom::ai::LlmClient;
use newsroom::core::config::AppConfig;
use newsroom::news::NewsApiClient;
use newsroom::telegram::TelegramClient;
use newsroom::worker::{DigestPipeline, DigestSummarizer};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "newsroom-digest", about = "Summarize recent news about a topic")]
struct Cli {
    /// Topic keywords to search for
    #[arg(required = true, num_args = 1..)]
    topic: Vec<String>,

    /// Also post the digest to the configured Telegram channel
    #[arg(long)]
    post: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    newsroom::setup_logging();

    let cli = Cli::parse();
    let topic = cli.topic.join(" ");
    let config = AppConfig::from_env()?;

    let transport = Arc::new(TelegramClient::new(
        config.telegram_bot_token.clone(),
        config.poll_timeout_secs,
    )?);
    let pipeline = DigestPipeline::new(
        &config,
        NewsApiClient::new(&config)?,
        DigestSummarizer::from_config(LlmClient::from_config(&config)?, &config),
        transport,
    )?;

    let digest = pipeline.summarize_topic(&topic, Uuid::new_v4()).await?;
    println!("{digest}");

    if cli.post {
        let report = pipeline.deliver(&digest).await;
        println!(
            "Posted {}/{} messages to {}",
            report.succeeded, report.total, config.telegram_channel_id
        );
        if !report.is_complete() {
            bail!("{} of {} messages failed to post", report.failed, report.total);
        }
    }
    Ok(())
}

// Entry point for the long-polling Telegram bot

use anyhow::Result;
use newsroom::core::config::AppConfig;
use newsroom::telegram::NewsBot;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    newsroom::setup_logging();

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        e
    })?;
    info!(
        "Starting newsroom bot @{} posting to {}",
        config.telegram_bot_name, config.telegram_channel_id
    );

    let bot = NewsBot::new(&config)?;
    bot.run_polling().await?;
    Ok(())
}

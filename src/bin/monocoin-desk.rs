use monocoin::config::DeskConfig;
use monocoin::services::{HttpPriceFeed, SeededRandom, TradingDesk};
use monocoin::tui::{run_tui, LogBuffer, LogMakeWriter};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Tracing goes to the Logs view; stdout belongs to the terminal UI
    let log_buffer = Arc::new(LogBuffer::new(500));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monocoin=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(LogMakeWriter::new(log_buffer.clone()))
                .with_ansi(false),
        )
        .init();

    // Load configuration
    let config = DeskConfig::from_env();
    info!(
        "Polling {} every {}ms (cash ${}, loss policy {:?})",
        config.oracle_url, config.poll_interval_ms, config.starting_cash, config.loss_policy
    );

    let feed = HttpPriceFeed::new(config.oracle_url.clone(), config.request_timeout())?;
    let rng = SeededRandom::from_optional_seed(config.rng_seed);
    let desk = Arc::new(TradingDesk::start(
        Arc::new(feed),
        config.desk_settings(),
        Box::new(rng),
    ));

    run_tui(desk, log_buffer).await?;

    Ok(())
}

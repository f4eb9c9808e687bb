use monocoin::config::Config;
use monocoin::{app, AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "monocoin=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    let addr = config.bind_addr();
    info!(
        "Starting MonoCoin oracle on {} (initial price {}, max delta {})",
        addr, config.initial_price, config.max_delta
    );
    if let Some(seed) = config.rng_seed {
        info!("Price walk seeded with {}", seed);
    }

    let state = AppState::new(config);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("MonoCoin oracle listening on {}", addr);

    axum::serve(listener, app(state)).await?;

    Ok(())
}

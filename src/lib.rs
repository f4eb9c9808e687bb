//! MonoCoin - simulated crypto trading game: a random-walk price oracle
//! and a terminal trading desk that polls it.

pub mod api;
pub mod config;
pub mod error;
pub mod services;
pub mod tui;
pub mod types;

use axum::Router;
use config::Config;
use services::OracleRegistry;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Oracle server state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub oracles: Arc<OracleRegistry>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let oracles = OracleRegistry::new(config.initial_price, config.max_delta, config.rng_seed);
        Self {
            config: Arc::new(config),
            oracles: Arc::new(oracles),
        }
    }
}

/// Build the oracle HTTP application with permissive CORS and request
/// tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(api::router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// Re-export commonly used types
pub use services::{SessionError, TradingDesk, TradingSession};
pub use types::*;

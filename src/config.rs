use std::env;
use std::time::Duration;

use crate::services::{DeskSettings, SessionSettings};
use crate::types::LossPolicy;

/// Parse a numeric variable, rejecting `inf` and `NaN`.
fn finite_var(key: &str) -> Option<f64> {
    parse_finite(env::var(key).ok()?.as_str())
}

fn parse_finite(raw: &str) -> Option<f64> {
    raw.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a duration variable, rejecting zero.
fn positive_var(key: &str) -> Option<u64> {
    parse_positive(env::var(key).ok()?.as_str())
}

fn parse_positive(raw: &str) -> Option<u64> {
    raw.parse::<u64>().ok().filter(|v| *v > 0)
}

/// Oracle server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Starting price of every oracle session.
    pub initial_price: f64,
    /// Largest absolute change per tick.
    pub max_delta: f64,
    /// Seed for reproducible price walks (entropy when unset).
    pub rng_seed: Option<u64>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(4000),
            initial_price: finite_var("INITIAL_PRICE").unwrap_or(100.0),
            max_delta: finite_var("ORACLE_MAX_DELTA").unwrap_or(5.0),
            rng_seed: env::var("RNG_SEED").ok().and_then(|v| v.parse().ok()),
        }
    }

    /// `host:port` to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Trading desk configuration.
#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// Full URL of the oracle price endpoint.
    pub oracle_url: String,
    /// Oracle poll interval (ms).
    pub poll_interval_ms: u64,
    /// Delay before a forecast settles (seconds).
    pub forecast_settle_secs: u64,
    /// Oracle request timeout (ms).
    pub request_timeout_ms: u64,
    /// Cash balance at session start.
    pub starting_cash: f64,
    /// Displayed price before the first poll.
    pub initial_price: f64,
    /// Retained price samples (0 = unbounded).
    pub history_capacity: usize,
    /// Retained event log rows (0 = unbounded).
    pub event_log_capacity: usize,
    /// Charge for an incorrect forecast.
    pub loss_policy: LossPolicy,
    /// Seed for dice and regulation draws (entropy when unset).
    pub rng_seed: Option<u64>,
}

impl DeskConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            oracle_url: env::var("ORACLE_URL")
                .unwrap_or_else(|_| "http://localhost:4000/price".to_string()),
            poll_interval_ms: positive_var("POLL_INTERVAL_MS").unwrap_or(5_000),
            forecast_settle_secs: positive_var("FORECAST_SETTLE_SECS").unwrap_or(30),
            request_timeout_ms: positive_var("REQUEST_TIMEOUT_MS").unwrap_or(3_000),
            starting_cash: finite_var("STARTING_CASH").unwrap_or(200.0),
            initial_price: finite_var("INITIAL_PRICE").unwrap_or(100.0),
            history_capacity: env::var("HISTORY_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            event_log_capacity: env::var("EVENT_LOG_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1_000),
            loss_policy: env::var("FORECAST_LOSS_POLICY")
                .ok()
                .and_then(|v| LossPolicy::from_str(&v))
                .unwrap_or_default(),
            rng_seed: env::var("RNG_SEED").ok().and_then(|v| v.parse().ok()),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Settings for [`crate::services::TradingDesk::start`].
    pub fn desk_settings(&self) -> DeskSettings {
        DeskSettings {
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            settle_delay: Duration::from_secs(self.forecast_settle_secs),
            session: SessionSettings {
                starting_cash: self.starting_cash,
                initial_price: self.initial_price,
                history_capacity: self.history_capacity,
                event_log_capacity: self.event_log_capacity,
                loss_policy: self.loss_policy,
            },
        }
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

//! Client side of the price oracle.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::types::PriceQuote;

/// A failed poll. The poller logs it and skips the tick.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Oracle request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Oracle returned status {0}")]
    Status(u16),

    #[error("Oracle returned an invalid price: {0}")]
    InvalidPrice(f64),

    #[error("Oracle unavailable: {0}")]
    Unavailable(String),
}

/// Source of base prices for the display pipeline.
#[async_trait]
pub trait PriceFeed: Send + Sync {
    async fn fetch_price(&self) -> Result<f64, FeedError>;
}

/// Polls `GET /price` on a remote oracle.
#[derive(Clone)]
pub struct HttpPriceFeed {
    client: Client,
    url: String,
}

impl HttpPriceFeed {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, FeedError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PriceFeed for HttpPriceFeed {
    async fn fetch_price(&self) -> Result<f64, FeedError> {
        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            return Err(FeedError::Status(response.status().as_u16()));
        }

        let quote: PriceQuote = response.json().await?;
        if !quote.price.is_finite() {
            return Err(FeedError::InvalidPrice(quote.price));
        }

        debug!("Fetched base price {} from {}", quote.price, self.url);
        Ok(quote.price)
    }
}

//! Trading Desk
//!
//! Drives a [`TradingSession`] in time:
//! - one steady poll interval feeding base prices into the session
//! - one settlement timer per active forecast
//!
//! Both tasks are aborted when the desk is dropped, so nothing settles after
//! teardown.

use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::price_feed::PriceFeed;
use super::randomness::RandomSource;
use super::session::{SessionError, SessionSettings, TradingSession};
use crate::types::{
    Forecast, ForecastDirection, ForecastSettlement, MarketEvent, SessionSnapshot, TradeReceipt,
};

/// Timing and session settings for a desk.
#[derive(Debug, Clone)]
pub struct DeskSettings {
    pub poll_interval: Duration,
    pub settle_delay: Duration,
    pub session: SessionSettings,
}

impl Default for DeskSettings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            settle_delay: Duration::from_secs(30),
            session: SessionSettings::default(),
        }
    }
}

/// A running trading session. Must be created inside a tokio runtime.
pub struct TradingDesk {
    session: Arc<Mutex<TradingSession>>,
    rng: Mutex<Box<dyn RandomSource>>,
    settle_delay: Duration,
    poller: JoinHandle<()>,
    settlement: Mutex<Option<JoinHandle<()>>>,
    settlement_tx: broadcast::Sender<ForecastSettlement>,
}

impl TradingDesk {
    /// Create the session and start polling `feed`.
    pub fn start(
        feed: Arc<dyn PriceFeed>,
        settings: DeskSettings,
        rng: Box<dyn RandomSource>,
    ) -> Self {
        let poll_interval = if settings.poll_interval.is_zero() {
            let fallback = DeskSettings::default().poll_interval;
            warn!("Zero poll interval, using {:?}", fallback);
            fallback
        } else {
            settings.poll_interval
        };

        let session = Arc::new(Mutex::new(TradingSession::new(settings.session)));
        let poller = tokio::spawn(run_poller(feed, session.clone(), poll_interval));
        let (settlement_tx, _) = broadcast::channel(16);

        info!(
            "Trading desk started: polling every {:?}, forecasts settle after {:?}",
            poll_interval, settings.settle_delay
        );

        Self {
            session,
            rng: Mutex::new(rng),
            settle_delay: settings.settle_delay,
            poller,
            settlement: Mutex::new(None),
            settlement_tx,
        }
    }

    /// Shared handle to the underlying session.
    pub fn session(&self) -> Arc<Mutex<TradingSession>> {
        self.session.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.session.lock().unwrap().snapshot()
    }

    pub fn settle_delay(&self) -> Duration {
        self.settle_delay
    }

    /// Receive every forecast settlement.
    pub fn subscribe_settlements(&self) -> broadcast::Receiver<ForecastSettlement> {
        self.settlement_tx.subscribe()
    }

    // =========================================================================
    // Intents
    // =========================================================================

    pub fn buy(&self, amount: f64) -> Result<TradeReceipt, SessionError> {
        self.session.lock().unwrap().buy(amount)
    }

    pub fn sell(&self, amount: f64) -> Result<TradeReceipt, SessionError> {
        self.session.lock().unwrap().sell(amount)
    }

    pub fn add_funds(&self, amount: f64) -> Result<f64, SessionError> {
        self.session.lock().unwrap().add_funds(amount)
    }

    pub fn withdraw_funds(&self, amount: f64) -> Result<f64, SessionError> {
        self.session.lock().unwrap().withdraw_funds(amount)
    }

    /// Place a forecast and arm its one-shot settlement timer.
    pub fn place_forecast(
        &self,
        amount: f64,
        direction: ForecastDirection,
    ) -> Result<Forecast, SessionError> {
        let forecast = self
            .session
            .lock()
            .unwrap()
            .place_forecast(amount, direction)?;

        let session = self.session.clone();
        let settlement_tx = self.settlement_tx.clone();
        let forecast_id = forecast.id.clone();
        let delay = self.settle_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let settlement = session.lock().unwrap().settle_forecast(&forecast_id);
            if let Some(settlement) = settlement {
                // No subscribers is fine.
                let _ = settlement_tx.send(settlement);
            }
        });

        if let Some(previous) = self.settlement.lock().unwrap().replace(handle) {
            previous.abort();
        }

        Ok(forecast)
    }

    pub fn roll_dice(&self) -> MarketEvent {
        let mut rng = self.rng.lock().unwrap();
        self.session.lock().unwrap().roll_dice(rng.as_mut())
    }

    pub fn apply_regulation(&self) -> MarketEvent {
        let mut rng = self.rng.lock().unwrap();
        self.session.lock().unwrap().apply_regulation(rng.as_mut())
    }

    pub fn hacker_attack(&self) -> MarketEvent {
        self.session.lock().unwrap().hacker_attack()
    }

    pub fn tech_upgrade(&self) -> MarketEvent {
        self.session.lock().unwrap().tech_upgrade()
    }
}

impl Drop for TradingDesk {
    fn drop(&mut self) {
        self.poller.abort();
        if let Some(handle) = self.settlement.lock().unwrap().take() {
            handle.abort();
        }
        debug!("Trading desk stopped");
    }
}

async fn run_poller(
    feed: Arc<dyn PriceFeed>,
    session: Arc<Mutex<TradingSession>>,
    period: Duration,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match feed.fetch_price().await {
            Ok(base) => {
                let price = session.lock().unwrap().record_base_price(base);
                debug!("Displayed price is now {}", price);
            }
            Err(e) => {
                warn!("Price poll failed, skipping tick: {}", e);
            }
        }
    }
}

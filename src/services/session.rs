//! Trading Session
//!
//! All user-facing game state and the rules that mutate it:
//! - Displayed price derived from the oracle's base price and the modifier
//! - Buy / sell / add funds / withdraw funds
//! - Forecast placement and settlement
//! - Market events (dice, regulation, hacker attack, tech upgrade)
//!
//! Every validation runs before any mutation, so a rejected intent leaves
//! the session untouched.

use thiserror::Error;
use tracing::{debug, info};

use super::randomness::RandomSource;
use super::retention::Retained;
use crate::types::{
    displayed_price, EventEntry, Forecast, ForecastDirection, ForecastSettlement, LossPolicy,
    MarketEvent, PricePoint, SessionSnapshot, TradeReceipt, TradeSide,
};

/// Payout multiple on a correct forecast.
pub const FORECAST_PAYOUT_MULTIPLIER: f64 = 3.0;

/// Session errors. Each one is a rejected intent; state is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Not enough cash: need {needed}, have {available}")]
    InsufficientFunds { needed: f64, available: f64 },

    #[error("Not enough Monocoins: need {needed}, have {available}")]
    InsufficientHoldings { needed: f64, available: f64 },

    #[error("Invalid forecast: {0}")]
    InvalidForecast(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

/// Strip leading zeros from typed input, keeping a lone `0`.
pub fn strip_leading_zeros(text: &str) -> &str {
    let trimmed = text.trim_start_matches('0');
    if trimmed.is_empty() && !text.is_empty() {
        &text[text.len() - 1..]
    } else {
        trimmed
    }
}

/// Parse a free-form amount. Sign and range checks belong to each operation.
pub fn parse_amount(text: &str) -> Result<f64, SessionError> {
    let cleaned = strip_leading_zeros(text.trim());
    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(SessionError::InvalidAmount(text.to_string())),
    }
}

/// Session tunables.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub starting_cash: f64,
    /// Displayed price before the first successful poll.
    pub initial_price: f64,
    /// Max retained price samples (0 = unbounded).
    pub history_capacity: usize,
    /// Max retained event log rows (0 = unbounded).
    pub event_log_capacity: usize,
    pub loss_policy: LossPolicy,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            starting_cash: 200.0,
            initial_price: 100.0,
            history_capacity: 10_000,
            event_log_capacity: 1_000,
            loss_policy: LossPolicy::DoubleDebit,
        }
    }
}

/// A single player's game state.
#[derive(Debug, Clone)]
pub struct TradingSession {
    displayed_price: f64,
    cash_balance: f64,
    asset_balance: f64,
    price_modifier: i32,
    active_forecast: Option<Forecast>,
    events: Retained<EventEntry>,
    history: Retained<PricePoint>,
    loss_policy: LossPolicy,
}

impl TradingSession {
    pub fn new(settings: SessionSettings) -> Self {
        Self {
            displayed_price: settings.initial_price,
            cash_balance: settings.starting_cash,
            asset_balance: 0.0,
            price_modifier: 0,
            active_forecast: None,
            events: Retained::new(settings.event_log_capacity),
            history: Retained::new(settings.history_capacity),
            loss_policy: settings.loss_policy,
        }
    }

    // =========================================================================
    // Reads
    // =========================================================================

    pub fn displayed_price(&self) -> f64 {
        self.displayed_price
    }

    pub fn cash_balance(&self) -> f64 {
        self.cash_balance
    }

    pub fn asset_balance(&self) -> f64 {
        self.asset_balance
    }

    pub fn price_modifier(&self) -> i32 {
        self.price_modifier
    }

    pub fn active_forecast(&self) -> Option<&Forecast> {
        self.active_forecast.as_ref()
    }

    pub fn loss_policy(&self) -> LossPolicy {
        self.loss_policy
    }

    pub fn events(&self) -> &Retained<EventEntry> {
        &self.events
    }

    pub fn price_history(&self) -> &Retained<PricePoint> {
        &self.history
    }

    /// Everything the dashboard renders.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            displayed_price: self.displayed_price,
            cash_balance: self.cash_balance,
            asset_balance: self.asset_balance,
            price_modifier: self.price_modifier,
            active_forecast: self.active_forecast.clone(),
            events: self.events.to_vec(),
            price_history: self.history.to_vec(),
        }
    }

    // =========================================================================
    // Price pipeline
    // =========================================================================

    /// Apply the current modifier to a polled base price, record the result
    /// in history and make it the live displayed price.
    pub fn record_base_price(&mut self, base: f64) -> f64 {
        self.record_price_point(base, chrono::Utc::now().timestamp_millis())
    }

    /// Same as [`record_base_price`](Self::record_base_price) with an
    /// explicit sample time (Unix ms).
    pub fn record_price_point(&mut self, base: f64, time: i64) -> f64 {
        let price = displayed_price(base, self.price_modifier);
        self.displayed_price = price;
        self.history.push(PricePoint { time, price });
        debug!(
            "Base {:.4} with modifier {}% -> displayed {}",
            base, self.price_modifier, price
        );
        price
    }

    // =========================================================================
    // Trades and funds
    // =========================================================================

    pub fn buy(&mut self, amount: f64) -> Result<TradeReceipt, SessionError> {
        let price = self.displayed_price;
        let cost = amount * price;
        if !(amount > 0.0) || cost > self.cash_balance {
            return Err(SessionError::InsufficientFunds {
                needed: cost,
                available: self.cash_balance,
            });
        }

        self.cash_balance -= cost;
        self.asset_balance += amount;
        self.log_event(format!("Bought {} Monocoins for ${}", amount, cost));
        info!("Bought {} at {} for {}", amount, price, cost);

        Ok(TradeReceipt {
            side: TradeSide::Buy,
            amount,
            price,
            total: cost,
        })
    }

    pub fn sell(&mut self, amount: f64) -> Result<TradeReceipt, SessionError> {
        if !(amount > 0.0) || amount > self.asset_balance {
            return Err(SessionError::InsufficientHoldings {
                needed: amount,
                available: self.asset_balance,
            });
        }

        let price = self.displayed_price;
        let proceeds = amount * price;
        self.asset_balance -= amount;
        self.cash_balance += proceeds;
        self.log_event(format!("Sold {} Monocoins for ${}", amount, proceeds));
        info!("Sold {} at {} for {}", amount, price, proceeds);

        Ok(TradeReceipt {
            side: TradeSide::Sell,
            amount,
            price,
            total: proceeds,
        })
    }

    /// Returns the new cash balance.
    pub fn add_funds(&mut self, amount: f64) -> Result<f64, SessionError> {
        if !(amount > 0.0) {
            return Err(SessionError::InvalidAmount(amount.to_string()));
        }

        self.cash_balance += amount;
        self.log_event(format!("Added ${} to cash balance", amount));
        Ok(self.cash_balance)
    }

    /// Returns the new cash balance.
    pub fn withdraw_funds(&mut self, amount: f64) -> Result<f64, SessionError> {
        if !(amount > 0.0) || amount > self.cash_balance {
            return Err(SessionError::InsufficientFunds {
                needed: amount,
                available: self.cash_balance,
            });
        }

        self.cash_balance -= amount;
        self.log_event(format!("Withdrew ${} from cash balance", amount));
        Ok(self.cash_balance)
    }

    // =========================================================================
    // Forecasts
    // =========================================================================

    /// Escrow `amount` by debiting it and record the current displayed price
    /// as the reference.
    pub fn place_forecast(
        &mut self,
        amount: f64,
        direction: ForecastDirection,
    ) -> Result<Forecast, SessionError> {
        if self.active_forecast.is_some() {
            return Err(SessionError::InvalidForecast(
                "a forecast is already active".to_string(),
            ));
        }
        if !(amount > 0.0) || amount > self.asset_balance {
            return Err(SessionError::InvalidForecast(format!(
                "amount {} must be positive and at most {}",
                amount, self.asset_balance
            )));
        }

        let forecast = Forecast::new(self.displayed_price, amount, direction);
        self.asset_balance -= amount;
        self.active_forecast = Some(forecast.clone());
        self.log_event(format!(
            "Forecast placed: {} with {} Monocoins",
            direction, amount
        ));
        info!(
            "Forecast {} placed: {} {} at reference {}",
            forecast.id, direction, amount, forecast.reference_price
        );

        Ok(forecast)
    }

    /// Settle the active forecast if its id is `forecast_id`, reading the
    /// displayed price now. Returns `None` when there is nothing to settle,
    /// so a stale timer is a no-op.
    pub fn settle_forecast(&mut self, forecast_id: &str) -> Option<ForecastSettlement> {
        if self.active_forecast.as_ref().map(|f| f.id.as_str()) != Some(forecast_id) {
            debug!("No active forecast {} to settle", forecast_id);
            return None;
        }
        let forecast = self.active_forecast.take()?;

        let current = self.displayed_price;
        let correct = forecast.direction.is_correct(forecast.reference_price, current);

        let asset_change = if correct {
            let payout = forecast.amount * FORECAST_PAYOUT_MULTIPLIER;
            self.log_event(format!("Forecast was correct! Gained {} Monocoins", payout));
            payout
        } else {
            self.log_event(format!(
                "Forecast was incorrect. Lost {} Monocoins",
                forecast.amount
            ));
            match self.loss_policy {
                LossPolicy::DoubleDebit => -forecast.amount,
                LossPolicy::ForfeitStake => 0.0,
            }
        };
        self.asset_balance += asset_change;

        info!(
            "Forecast {} settled at {} (reference {}): {}",
            forecast.id,
            current,
            forecast.reference_price,
            if correct { "correct" } else { "incorrect" }
        );

        Some(ForecastSettlement {
            forecast,
            settlement_price: current,
            correct,
            asset_change,
        })
    }

    // =========================================================================
    // Market events
    // =========================================================================

    /// Apply an event's modifier delta and log it. Returns the new modifier.
    pub fn apply_event(&mut self, event: MarketEvent) -> i32 {
        self.price_modifier += event.modifier_delta();
        self.log_event(event.description());
        debug!("{:?} -> modifier {}%", event, self.price_modifier);
        self.price_modifier
    }

    pub fn roll_dice(&mut self, rng: &mut dyn RandomSource) -> MarketEvent {
        let event = MarketEvent::DiceRoll {
            roll: rng.dice_roll(),
        };
        self.apply_event(event);
        event
    }

    pub fn apply_regulation(&mut self, rng: &mut dyn RandomSource) -> MarketEvent {
        let event = MarketEvent::Regulation {
            raised: rng.next_unit() > 0.5,
        };
        self.apply_event(event);
        event
    }

    pub fn hacker_attack(&mut self) -> MarketEvent {
        self.apply_event(MarketEvent::HackerAttack);
        MarketEvent::HackerAttack
    }

    pub fn tech_upgrade(&mut self) -> MarketEvent {
        self.apply_event(MarketEvent::TechUpgrade);
        MarketEvent::TechUpgrade
    }

    fn log_event(&mut self, description: String) -> u64 {
        let id = self.events.total_appended() + 1;
        self.events.push(EventEntry {
            id,
            description,
            timestamp: chrono::Utc::now().timestamp_millis(),
        });
        id
    }
}

impl Default for TradingSession {
    fn default() -> Self {
        Self::new(SessionSettings::default())
    }
}

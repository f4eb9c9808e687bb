use serde::{Deserialize, Serialize};
use std::fmt;

use super::PricePoint;

/// Direction a forecast bets on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ForecastDirection {
    #[default]
    Rise,
    Fall,
}

impl ForecastDirection {
    /// The other direction.
    pub fn toggled(self) -> Self {
        match self {
            Self::Rise => Self::Fall,
            Self::Fall => Self::Rise,
        }
    }

    /// Whether moving from `reference` to `current` matches this direction.
    /// An unchanged price is never a match.
    pub fn is_correct(self, reference: f64, current: f64) -> bool {
        match self {
            Self::Rise => current > reference,
            Self::Fall => current < reference,
        }
    }
}

impl fmt::Display for ForecastDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rise => write!(f, "rise"),
            Self::Fall => write!(f, "fall"),
        }
    }
}

/// How an incorrect forecast is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LossPolicy {
    /// The stake is debited at placement and debited again on a loss.
    #[default]
    DoubleDebit,
    /// The stake debited at placement is the whole loss.
    ForfeitStake,
}

impl LossPolicy {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "double_debit" | "double" => Some(Self::DoubleDebit),
            "forfeit_stake" | "forfeit" | "single" => Some(Self::ForfeitStake),
            _ => None,
        }
    }
}

/// A pending forecast wager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Forecast {
    pub id: String,
    /// Displayed price when the forecast was placed.
    pub reference_price: f64,
    /// Asset units wagered (already debited).
    pub amount: f64,
    pub direction: ForecastDirection,
    /// Placement time (Unix ms).
    pub placed_at: i64,
}

impl Forecast {
    pub fn new(reference_price: f64, amount: f64, direction: ForecastDirection) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            reference_price,
            amount,
            direction,
            placed_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Result of settling a forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSettlement {
    pub forecast: Forecast,
    /// Displayed price read at settlement time.
    pub settlement_price: f64,
    pub correct: bool,
    /// Signed change applied to the asset balance at settlement.
    pub asset_change: f64,
}

/// One-shot market event that shifts the price modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MarketEvent {
    DiceRoll { roll: u8 },
    Regulation { raised: bool },
    HackerAttack,
    TechUpgrade,
}

impl MarketEvent {
    /// Signed percentage added to the price modifier.
    pub fn modifier_delta(&self) -> i32 {
        match self {
            Self::DiceRoll { roll } if *roll <= 3 => -10,
            Self::DiceRoll { .. } => 10,
            Self::Regulation { raised: true } => 15,
            Self::Regulation { raised: false } => -15,
            Self::HackerAttack => -20,
            Self::TechUpgrade => 10,
        }
    }

    /// Event log description.
    pub fn description(&self) -> String {
        match self {
            Self::DiceRoll { roll } if *roll <= 3 => {
                format!("Rolled {}: Monocoin price decreased by 10%", roll)
            }
            Self::DiceRoll { roll } => {
                format!("Rolled {}: Monocoin price increased by 10%", roll)
            }
            Self::Regulation { raised: true } => {
                "New Regulation: Monocoin price increased by 15%".to_string()
            }
            Self::Regulation { raised: false } => {
                "New Regulation: Monocoin price decreased by 15%".to_string()
            }
            Self::HackerAttack => "Hacker Attack: Monocoin price decreased by 20%".to_string(),
            Self::TechUpgrade => "Tech Upgrade: Monocoin price increased by 10%".to_string(),
        }
    }
}

/// Side of an executed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TradeSide {
    Buy,
    Sell,
}

/// An executed buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TradeReceipt {
    pub side: TradeSide,
    pub amount: f64,
    pub price: f64,
    /// Cash paid (buy) or received (sell).
    pub total: f64,
}

/// A single event log row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEntry {
    pub id: u64,
    pub description: String,
    pub timestamp: i64,
}

/// Read-only view of a trading session for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub displayed_price: f64,
    pub cash_balance: f64,
    pub asset_balance: f64,
    pub price_modifier: i32,
    pub active_forecast: Option<Forecast>,
    pub events: Vec<EventEntry>,
    pub price_history: Vec<PricePoint>,
}

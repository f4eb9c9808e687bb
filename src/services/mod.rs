pub mod desk;
pub mod oracle;
pub mod price_feed;
pub mod randomness;
pub mod retention;
pub mod session;

pub use desk::{DeskSettings, TradingDesk};
pub use oracle::{OracleRegistry, PriceOracle, DEFAULT_SESSION, PRICE_FLOOR};
pub use price_feed::{FeedError, HttpPriceFeed, PriceFeed};
pub use randomness::{RandomSource, SeededRandom};
pub use retention::Retained;
pub use session::{
    parse_amount, strip_leading_zeros, SessionError, SessionSettings, TradingSession,
    FORECAST_PAYOUT_MULTIPLIER,
};

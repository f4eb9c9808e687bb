//! Price oracle: a bounded random walk, floor-clamped at 1, owned per
//! session.

use dashmap::DashMap;
use tracing::{debug, info};

use super::randomness::{RandomSource, SeededRandom};

/// Lowest price the walk can reach.
pub const PRICE_FLOOR: f64 = 1.0;

/// Session id used when a request names none.
pub const DEFAULT_SESSION: &str = "default";

/// A single random-walk price.
#[derive(Debug, Clone)]
pub struct PriceOracle {
    price: f64,
    max_delta: f64,
}

impl PriceOracle {
    pub fn new(initial_price: f64, max_delta: f64) -> Self {
        Self {
            price: initial_price.max(PRICE_FLOOR),
            max_delta: max_delta.abs(),
        }
    }

    /// Current price without advancing the walk.
    pub fn price(&self) -> f64 {
        self.price
    }

    /// Advance the walk by a uniform delta in `[-max_delta, +max_delta)`.
    pub fn tick(&mut self, rng: &mut dyn RandomSource) -> f64 {
        let delta = rng.uniform(-self.max_delta, self.max_delta);
        self.price = (self.price + delta).max(PRICE_FLOOR);
        self.price
    }
}

struct OracleEntry {
    oracle: PriceOracle,
    rng: SeededRandom,
}

/// Per-session oracles keyed by session id.
pub struct OracleRegistry {
    oracles: DashMap<String, OracleEntry>,
    initial_price: f64,
    max_delta: f64,
    seed: Option<u64>,
}

impl OracleRegistry {
    pub fn new(initial_price: f64, max_delta: f64, seed: Option<u64>) -> Self {
        Self {
            oracles: DashMap::new(),
            initial_price,
            max_delta,
            seed,
        }
    }

    /// Advance and return the price for `session`, creating its oracle on
    /// first use.
    pub fn tick(&self, session: &str) -> f64 {
        let mut entry = self.oracles.entry(session.to_string()).or_insert_with(|| {
            info!("Creating price oracle for session {}", session);
            OracleEntry {
                oracle: PriceOracle::new(self.initial_price, self.max_delta),
                rng: SeededRandom::from_optional_seed(self.session_seed(session)),
            }
        });

        let OracleEntry { oracle, rng } = entry.value_mut();
        let price = oracle.tick(rng);
        debug!("Oracle {} ticked to {:.4}", session, price);
        price
    }

    /// Current price for `session`, if it has been created.
    pub fn price(&self, session: &str) -> Option<f64> {
        self.oracles.get(session).map(|e| e.oracle.price())
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }

    fn session_seed(&self, session: &str) -> Option<u64> {
        // FNV-1a over the session id keeps seeded sessions distinct.
        self.seed.map(|seed| {
            session.bytes().fold(seed ^ 0xcbf2_9ce4_8422_2325, |hash, b| {
                (hash ^ u64::from(b)).wrapping_mul(0x0100_0000_01b3)
            })
        })
    }
}

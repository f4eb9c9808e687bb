use serde::{Deserialize, Serialize};

/// Body of `GET /price`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: f64,
}

/// A single displayed-price sample in the session's price history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Sample time (Unix ms).
    pub time: i64,
    /// Displayed price after the modifier was applied.
    pub price: f64,
}

impl PricePoint {
    /// Local wall-clock label used on chart axes.
    pub fn time_label(&self) -> String {
        chrono::DateTime::from_timestamp_millis(self.time)
            .map(|t| t.with_timezone(&chrono::Local).format("%H:%M:%S").to_string())
            .unwrap_or_default()
    }
}

/// Round half up (x.5 goes toward positive infinity).
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Apply a percentage modifier to a base price and round to whole units.
pub fn displayed_price(base: f64, modifier_pct: i32) -> f64 {
    round_half_up(base * (1.0 + f64::from(modifier_pct) / 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_quote_serialization() {
        let json = serde_json::to_string(&PriceQuote { price: 101.5 }).unwrap();
        assert_eq!(json, r#"{"price":101.5}"#);
    }

    #[test]
    fn test_displayed_price_without_modifier() {
        assert_eq!(displayed_price(100.0, 0), 100.0);
        assert_eq!(displayed_price(99.4, 0), 99.0);
        assert_eq!(displayed_price(99.5, 0), 100.0);
    }

    #[test]
    fn test_displayed_price_with_modifier() {
        assert_eq!(displayed_price(100.0, 10), 110.0);
        assert_eq!(displayed_price(100.0, -20), 80.0);
        assert_eq!(displayed_price(103.7, 15), 119.0);
    }

    #[test]
    fn test_round_half_up_negative() {
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }
}

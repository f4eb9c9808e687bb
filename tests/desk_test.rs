//! Integration tests for the trading desk timers
//!
//! Time is paused, so every poll and settlement happens on a virtual clock.

use async_trait::async_trait;
use monocoin::services::{
    DeskSettings, FeedError, PriceFeed, SeededRandom, SessionSettings, TradingDesk,
};
use monocoin::types::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

/// Feed that replays scripted poll results, then reports itself unavailable.
struct ScriptedFeed {
    script: Mutex<VecDeque<Result<f64, FeedError>>>,
    calls: AtomicUsize,
}

impl ScriptedFeed {
    fn new(script: Vec<Result<f64, FeedError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn prices(prices: &[f64]) -> Arc<Self> {
        Self::new(prices.iter().map(|p| Ok(*p)).collect())
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PriceFeed for ScriptedFeed {
    async fn fetch_price(&self) -> Result<f64, FeedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(FeedError::Unavailable("script exhausted".into())))
    }
}

fn settings() -> DeskSettings {
    DeskSettings {
        session: SessionSettings {
            starting_cash: 10_000.0,
            ..SessionSettings::default()
        },
        ..DeskSettings::default()
    }
}

fn start(feed: Arc<ScriptedFeed>) -> TradingDesk {
    TradingDesk::start(feed, settings(), Box::new(SeededRandom::from_seed(1)))
}

/// Sleep just past `secs` so timers due at `secs` have fired.
async fn advance_past(secs: u64) {
    sleep(Duration::from_secs(secs) + Duration::from_millis(100)).await;
}

// =============================================================================
// Polling Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_first_poll_after_one_interval() {
    let feed = ScriptedFeed::prices(&[120.0]);
    let desk = start(feed.clone());

    sleep(Duration::from_secs(4)).await;
    assert_eq!(feed.calls(), 0);
    assert_eq!(desk.snapshot().displayed_price, 100.0);

    advance_past(1).await;
    assert_eq!(feed.calls(), 1);
    assert_eq!(desk.snapshot().displayed_price, 120.0);
}

#[tokio::test(start_paused = true)]
async fn test_polls_every_interval_and_records_history() {
    let feed = ScriptedFeed::prices(&[101.0, 102.0, 103.0]);
    let desk = start(feed.clone());

    advance_past(15).await;

    let snapshot = desk.snapshot();
    assert_eq!(feed.calls(), 3);
    let prices: Vec<f64> = snapshot.price_history.iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![101.0, 102.0, 103.0]);
    assert_eq!(snapshot.displayed_price, 103.0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_poll_is_skipped() {
    let feed = ScriptedFeed::new(vec![
        Ok(101.0),
        Err(FeedError::Status(503)),
        Ok(104.0),
    ]);
    let desk = start(feed.clone());

    advance_past(10).await;
    assert_eq!(desk.snapshot().displayed_price, 101.0);
    assert_eq!(desk.snapshot().price_history.len(), 1);

    advance_past(5).await;
    let snapshot = desk.snapshot();
    assert_eq!(snapshot.displayed_price, 104.0);
    assert_eq!(snapshot.price_history.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_modifier_applies_to_next_poll() {
    let feed = ScriptedFeed::prices(&[100.0, 100.0]);
    let desk = start(feed);

    advance_past(5).await;
    desk.tech_upgrade();
    assert_eq!(desk.snapshot().displayed_price, 100.0);

    advance_past(5).await;
    assert_eq!(desk.snapshot().displayed_price, 110.0);
}

#[tokio::test(start_paused = true)]
async fn test_zero_poll_interval_falls_back_to_default() {
    let feed = ScriptedFeed::prices(&[107.0]);
    let desk = TradingDesk::start(
        feed.clone(),
        DeskSettings {
            poll_interval: Duration::ZERO,
            ..settings()
        },
        Box::new(SeededRandom::from_seed(1)),
    );

    sleep(Duration::from_millis(200)).await;
    assert_eq!(feed.calls(), 0);

    advance_past(5).await;
    assert_eq!(feed.calls(), 1);
    assert_eq!(desk.snapshot().displayed_price, 107.0);
}

// =============================================================================
// Settlement Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_forecast_settles_after_delay() {
    // Price rises on the first poll and stays up.
    let feed = ScriptedFeed::prices(&[110.0; 8]);
    let desk = start(feed);
    desk.buy(100.0).unwrap();

    let forecast = desk.place_forecast(50.0, ForecastDirection::Rise).unwrap();
    assert_eq!(forecast.reference_price, 100.0);
    assert_eq!(desk.snapshot().asset_balance, 50.0);

    sleep(Duration::from_secs(29)).await;
    assert!(desk.snapshot().active_forecast.is_some());

    advance_past(1).await;
    let snapshot = desk.snapshot();
    assert!(snapshot.active_forecast.is_none());
    assert_eq!(snapshot.asset_balance, 200.0);
}

#[tokio::test(start_paused = true)]
async fn test_settlement_reads_price_at_settlement_time() {
    // Up on the first poll, down for every later one.
    let mut script = vec![110.0];
    script.extend([90.0; 7]);
    let feed = ScriptedFeed::prices(&script);
    let desk = start(feed);
    desk.buy(100.0).unwrap();

    let mut settlements = desk.subscribe_settlements();
    desk.place_forecast(50.0, ForecastDirection::Rise).unwrap();

    let settlement = settlements.recv().await.unwrap();
    assert!(!settlement.correct);
    assert_eq!(settlement.settlement_price, 90.0);
    assert_eq!(settlement.asset_change, -50.0);
    assert_eq!(desk.snapshot().asset_balance, 0.0);
}

#[tokio::test(start_paused = true)]
async fn test_no_settlement_after_drop() {
    let feed = ScriptedFeed::prices(&[110.0; 8]);
    let desk = start(feed.clone());
    desk.buy(100.0).unwrap();
    desk.place_forecast(50.0, ForecastDirection::Rise).unwrap();

    let session = desk.session();
    advance_past(5).await;
    let calls = feed.calls();
    drop(desk);

    advance_past(60).await;
    let session = session.lock().unwrap();
    assert!(session.active_forecast().is_some());
    assert_eq!(session.asset_balance(), 50.0);
    assert_eq!(feed.calls(), calls);
}

#[tokio::test(start_paused = true)]
async fn test_overlapping_forecast_rejected_while_pending() {
    let feed = ScriptedFeed::prices(&[]);
    let desk = start(feed);
    desk.buy(10.0).unwrap();

    desk.place_forecast(2.0, ForecastDirection::Rise).unwrap();
    assert!(desk.place_forecast(2.0, ForecastDirection::Fall).is_err());

    advance_past(30).await;
    // Unchanged price settles as incorrect; a new forecast is accepted.
    assert_eq!(desk.snapshot().asset_balance, 6.0);
    assert!(desk.place_forecast(1.0, ForecastDirection::Fall).is_ok());
}

// =============================================================================
// Intent Tests
// =============================================================================

#[tokio::test(start_paused = true)]
async fn test_random_events_through_desk() {
    let desk = start(ScriptedFeed::prices(&[]));

    let MarketEvent::DiceRoll { roll } = desk.roll_dice() else {
        panic!("expected a dice roll");
    };
    assert!((1..=6).contains(&roll));
    assert_eq!(desk.snapshot().price_modifier.abs(), 10);

    desk.apply_regulation();
    desk.hacker_attack();
    let snapshot = desk.snapshot();
    assert_eq!(snapshot.events.len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_intents_through_desk() {
    let desk = start(ScriptedFeed::prices(&[]));

    tokio_test::assert_err!(desk.sell(1.0));
    tokio_test::assert_err!(desk.withdraw_funds(20_000.0));
    tokio_test::assert_ok!(desk.add_funds(5.0));

    let snapshot = desk.snapshot();
    assert_eq!(snapshot.cash_balance, 10_005.0);
    assert_eq!(snapshot.events.len(), 1);
}

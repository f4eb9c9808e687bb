//! Integration tests for the random-walk price oracle

use monocoin::services::{OracleRegistry, PriceOracle, SeededRandom, PRICE_FLOOR};

#[test]
fn test_tick_stays_within_max_delta() {
    for seed in 0..50 {
        let mut rng = SeededRandom::from_seed(seed);
        let mut oracle = PriceOracle::new(100.0, 5.0);

        for _ in 0..200 {
            let before = oracle.price();
            let after = oracle.tick(&mut rng);
            assert!(after >= PRICE_FLOOR, "seed {} fell below floor: {}", seed, after);
            assert!(
                (after - before).abs() <= 5.0,
                "seed {} jumped {} -> {}",
                seed,
                before,
                after
            );
        }
    }
}

#[test]
fn test_walk_is_floored() {
    let mut rng = SeededRandom::from_seed(7);
    let mut oracle = PriceOracle::new(2.0, 50.0);

    for _ in 0..500 {
        assert!(oracle.tick(&mut rng) >= PRICE_FLOOR);
    }
}

#[test]
fn test_initial_price_clamped_to_floor() {
    let oracle = PriceOracle::new(-10.0, 5.0);
    assert_eq!(oracle.price(), PRICE_FLOOR);
}

#[test]
fn test_seeded_walks_are_reproducible() {
    let mut a = SeededRandom::from_seed(42);
    let mut b = SeededRandom::from_seed(42);
    let mut first = PriceOracle::new(100.0, 5.0);
    let mut second = PriceOracle::new(100.0, 5.0);

    for _ in 0..20 {
        assert_eq!(first.tick(&mut a), second.tick(&mut b));
    }
}

#[test]
fn test_registry_sessions_are_isolated() {
    let registry = OracleRegistry::new(100.0, 5.0, Some(9));
    assert!(registry.is_empty());

    for _ in 0..10 {
        registry.tick("alice");
    }
    registry.tick("bob");

    assert_eq!(registry.len(), 2);
    let alice = registry.price("alice").unwrap();
    let bob = registry.price("bob").unwrap();
    assert!((bob - 100.0).abs() <= 5.0);
    assert!((alice - 100.0).abs() <= 50.0);
    assert!(registry.price("carol").is_none());
}

#[test]
fn test_registry_seed_reproducible_per_session() {
    let first = OracleRegistry::new(100.0, 5.0, Some(3));
    let second = OracleRegistry::new(100.0, 5.0, Some(3));

    for _ in 0..5 {
        assert_eq!(first.tick("same"), second.tick("same"));
    }
}

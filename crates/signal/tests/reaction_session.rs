//! A trainee session: price model pivots feed the signal model
//!
//! Simulated seconds are mapped onto a synthetic `Instant` timeline so the
//! reaction times are exact.

use chrono::{Duration as ChronoDuration, TimeZone, Utc};
use obr_clock::SimulatedClock;
use obr_core::Pivot;
use obr_market_sim::{PriceModel, SimulationConfig};
use obr_quote_model::QuoteModel;
use obr_signal::{ReactionKey, Signal, SignalModel};
use std::sync::Arc;
use std::time::{Duration, Instant};

const WALK_JSON: &str = r#"{
    "transition": {
        "N,O,U": { "2,2,4": 50, "-2,2,4": 50 },
        "N,O,D": { "2,2,4": 50, "-2,2,4": 50 },
        "N,O,F": { "2,2,4": 50, "-2,2,4": 50 }
    },
    "ticks_per_regime": { "N,O": 2 },
    "seconds_per_regime": { "N,O": 1 }
}"#;

fn price_model(model: QuoteModel, window: usize) -> PriceModel {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap();
    let clock = Arc::new(SimulatedClock::stepping(start, ChronoDuration::seconds(1)));
    let config = SimulationConfig::default().with_window(window).with_seeds(3, 42);
    PriceModel::with_clock(Arc::new(model), &config, clock).unwrap()
}

#[test]
fn test_flat_market_fires_exit_once_window_fills() {
    let _ = env_logger::try_init();

    let mut prices = price_model(QuoteModel::empty(), 2);
    let mut signals = SignalModel::default();
    let t0 = Instant::now();

    let mut fired = Vec::new();
    for second in 0..10u64 {
        prices.update();
        let now = t0 + Duration::from_secs(second);
        if let Some(signal) = signals.on_pivot(prices.pivot(), now) {
            fired.push((second, signal));
        }
    }

    // the first full window is at second 4; the signal then stays pending
    assert_eq!(fired, vec![(4, Signal::Exit)]);
    assert!(!signals.record_reaction(ReactionKey::Exit, t0 + Duration::from_secs(10)));
    assert!(!signals.results()[0].success);
}

#[test]
fn test_prompt_reactions_tighten_window() {
    let mut prices = price_model(QuoteModel::from_json(WALK_JSON).unwrap(), 3);
    let mut signals = SignalModel::default();
    let t0 = Instant::now();

    for second in 0..2_000u64 {
        prices.update();
        let now = t0 + Duration::from_secs(second);

        if let Some(signal) = signals.on_pivot(prices.pivot(), now) {
            let expected = match prices.pivot() {
                Some(Pivot::Low) => Signal::Entry,
                _ => Signal::Exit,
            };
            assert_eq!(signal, expected);

            let key = signal.expected_key();
            assert!(signals.record_reaction(key, now + Duration::from_millis(100)));
        }
    }

    let stats = signals.stats();
    assert!(stats.attempts >= 40, "only {} pivots", stats.attempts);
    assert_eq!(stats.successes, stats.attempts);
    assert!(signals.reaction_window() < 1.0);
    assert!(signals.reaction_window() >= 0.12);
}

//! NBBO tick generator driven by a [`QuoteModel`]
//!
//! Each simulated second draws a Poisson number of updates from the
//! regime intensity, then walks the bid by sampled price deltas. The sign
//! of each delta conditions the next draw.

use obr_core::{Regime, Sign, TICK_SIZE, Tick, Timestamp, round_to_cents};
use obr_quote_model::QuoteModel;
use rand::prelude::*;
use std::sync::Arc;

/// Stateful bid/ask walk over a shared, immutable model
pub struct QuoteGenerator {
    model: Arc<QuoteModel>,
    bid: f64,
    ask: f64,
    /// Seeded random number generator for reproducibility
    rng: StdRng,
}

impl QuoteGenerator {
    /// Create a generator at the given prices
    ///
    /// `seed = None` draws the RNG state from entropy.
    pub fn new(model: Arc<QuoteModel>, bid: f64, ask: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            model,
            bid,
            ask,
            rng,
        }
    }

    /// Unrounded current bid
    pub fn bid(&self) -> f64 {
        self.bid
    }

    /// Unrounded current ask
    pub fn ask(&self) -> f64 {
        self.ask
    }

    pub fn model(&self) -> &QuoteModel {
        &self.model
    }

    /// Generate the ticks of one second
    ///
    /// An empty vector means no NBBO change this second.
    pub fn step_second(&mut self, timestamp: Timestamp, regime: Regime, initial_sign: Sign) -> Vec<Tick> {
        let count = self.model.sample_update_count(regime, &mut self.rng);
        let mut ticks = Vec::with_capacity(count as usize);
        let mut sign = initial_sign;

        for _ in 0..count {
            let outcome = self.model.sample_outcome(regime, sign, &mut self.rng);

            self.bid += outcome.price_delta;
            // Never let the book lock or cross
            self.ask = (self.bid + outcome.spread).max(self.bid + TICK_SIZE);

            let half = outcome.size / 2;
            ticks.push(Tick {
                timestamp,
                bid_price: round_to_cents(self.bid),
                ask_price: round_to_cents(self.ask),
                bid_size: half,
                ask_size: half,
            });

            sign = Sign::of(outcome.price_delta);
        }

        log::trace!("{} updates at {} ({})", ticks.len(), timestamp, regime);
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use indexmap::IndexMap;
    use obr_core::{OutcomeBin, TransitionKey};

    fn at() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 3, 1, 14, 30, 0).unwrap()
    }

    /// One row per sign with a single bin, `rate` ticks per second
    fn single_bin_model(bin: OutcomeBin, rate: f64) -> Arc<QuoteModel> {
        let regime = Regime::default();
        let transition = [Sign::Up, Sign::Down, Sign::Flat]
            .into_iter()
            .map(|sign| {
                (
                    TransitionKey::new(regime, sign),
                    IndexMap::from([(bin, 1.0)]),
                )
            })
            .collect();
        Arc::new(QuoteModel::new(
            transition,
            IndexMap::from([(regime, rate)]),
            IndexMap::from([(regime, 1.0)]),
        ))
    }

    #[test]
    fn test_empty_model_produces_no_ticks() {
        let mut generator = QuoteGenerator::new(Arc::new(QuoteModel::empty()), 100.0, 100.02, Some(1));
        for _ in 0..100 {
            assert!(generator.step_second(at(), Regime::default(), Sign::Flat).is_empty());
        }
        assert_eq!(generator.bid(), 100.0);
        assert_eq!(generator.ask(), 100.02);
    }

    #[test]
    fn test_price_walk_and_sizes() {
        // dp +2 (= +0.01), spread 3 (= 0.03), size 4 (= 400)
        let model = single_bin_model(OutcomeBin::new(2, 3, 4), 20.0);
        let mut generator = QuoteGenerator::new(model, 100.0, 100.02, Some(7));

        let ticks = generator.step_second(at(), Regime::default(), Sign::Flat);
        assert!(!ticks.is_empty());

        for (i, tick) in ticks.iter().enumerate() {
            let expected_bid = round_to_cents(100.0 + 0.01 * (i + 1) as f64);
            assert_eq!(tick.bid_price, expected_bid);
            assert_eq!(tick.ask_price, round_to_cents(expected_bid + 0.03));
            assert_eq!(tick.bid_size, 200);
            assert_eq!(tick.ask_size, 200);
            assert_eq!(tick.timestamp, at());
        }
    }

    #[test]
    fn test_ask_never_locks_bid() {
        // zero and negative spreads are pushed out to one tick
        for spread in [0, -3] {
            let model = single_bin_model(OutcomeBin::new(-1, spread, 1), 30.0);
            let mut generator = QuoteGenerator::new(model, 50.0, 50.01, Some(3));

            for _ in 0..20 {
                for tick in generator.step_second(at(), Regime::default(), Sign::Flat) {
                    assert!(tick.ask_price >= tick.bid_price + TICK_SIZE - 1e-9);
                }
                assert!(generator.ask() >= generator.bid() + TICK_SIZE - 1e-9);
            }
        }
    }

    #[test]
    fn test_same_seed_same_ticks() {
        let model = single_bin_model(OutcomeBin::new(1, 1, 2), 5.0);
        let mut a = QuoteGenerator::new(Arc::clone(&model), 10.0, 10.01, Some(99));
        let mut b = QuoteGenerator::new(model, 10.0, 10.01, Some(99));

        for _ in 0..10 {
            assert_eq!(
                a.step_second(at(), Regime::default(), Sign::Flat),
                b.step_second(at(), Regime::default(), Sign::Flat)
            );
        }
    }
}

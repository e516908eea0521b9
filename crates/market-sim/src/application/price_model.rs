//! Per-second price simulation with retrospective pivot detection
//!
//! Each [`PriceModel::update`] call:
//! 1. Generates the NBBO ticks of the current second
//! 2. Fans the last tick out across venues
//! 3. Buffers the second's bid/ask/mid (the previous one when nothing moved)
//! 4. Labels the sample `window` seconds back once the buffer is full

use crate::application::generators::{ExchangeBookGenerator, QuoteGenerator};
use crate::domain::{MidSample, PivotDetector};
use crate::error::Result;
use crate::infrastructure::SimulationConfig;
use chrono::SubsecRound;
use obr_clock::SystemClock;
use obr_core::{Pivot, Quote, Regime, Sign, Timestamp};
use obr_ports::Clock;
use obr_quote_model::QuoteModel;
use std::sync::Arc;

/// Simulated instrument: NBBO walk, venue snapshot and pivot state
pub struct PriceModel {
    generator: QuoteGenerator,
    exchange_gen: ExchangeBookGenerator,
    detector: PivotDetector,
    clock: Arc<dyn Clock>,

    regime: Regime,
    initial_sign: Sign,
    /// Sample buffered while no tick has been produced yet
    base: MidSample,

    last_exchange_quotes: Vec<Quote>,
    pivot: Option<Pivot>,
    pivot_bid: f64,
    pivot_ask: f64,
    best_bid: f64,
    best_ask: f64,
}

impl PriceModel {
    /// Default configuration with the given model, spread and window
    pub fn new(model: Arc<QuoteModel>, spread: f64, window_seconds: usize) -> Result<Self> {
        let config = SimulationConfig {
            spread,
            window_seconds,
            ..Default::default()
        };
        Self::with_clock(model, &config, Arc::new(SystemClock::new()))
    }

    /// Build from configuration, loading the model file if one is named
    ///
    /// A missing or unreadable model file yields an empty model (flat
    /// prices) and a warning, not an error.
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        let model = QuoteModel::load_or_empty(config.model_path.as_deref());
        Self::with_clock(Arc::new(model), config, Arc::new(SystemClock::new()))
    }

    /// Build with an explicit time source
    pub fn with_clock(
        model: Arc<QuoteModel>,
        config: &SimulationConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;

        let base_bid = config.base_bid;
        let base_ask = config.base_ask();

        let generator = QuoteGenerator::new(model, base_bid, base_ask, config.quote_seed);
        let exchange_gen = ExchangeBookGenerator::from_config(&config.exchanges)?;
        let detector = PivotDetector::new(config.window_seconds);

        log::info!(
            "PriceModel ready: bid {:.2} ask {:.2}, window {}s, regime {}, clock {}",
            base_bid,
            base_ask,
            config.window_seconds,
            config.regime,
            clock.name()
        );

        Ok(Self {
            generator,
            exchange_gen,
            detector,
            clock,
            regime: config.regime,
            initial_sign: config.initial_sign,
            base: MidSample::new(base_bid, base_ask),
            last_exchange_quotes: Vec::new(),
            pivot: None,
            pivot_bid: base_bid,
            pivot_ask: base_ask,
            best_bid: base_bid,
            best_ask: base_ask,
        })
    }

    /// Advance the simulation by one second
    pub fn update(&mut self) {
        let second = self.clock.now().trunc_subsecs(0);
        self.update_at(second);
    }

    fn update_at(&mut self, second: Timestamp) {
        let ticks = self
            .generator
            .step_second(second, self.regime, self.initial_sign);

        let sample = match ticks.last() {
            Some(last) => {
                self.last_exchange_quotes = self.exchange_gen.generate(last);
                self.best_bid = last.bid_price;
                self.best_ask = last.ask_price;
                MidSample::new(last.bid_price, last.ask_price)
            }
            // No NBBO change: carry the previous second forward
            None => self.detector.latest().copied().unwrap_or(self.base),
        };

        if let Some(detection) = self.detector.push(sample) {
            self.pivot = detection.pivot;
            self.pivot_bid = detection.centre.bid;
            self.pivot_ask = detection.centre.ask;
        }

        log::debug!(
            "{} ticks={} bid={:.2} ask={:.2} venues={} pivot={:?}",
            second,
            ticks.len(),
            sample.bid,
            sample.ask,
            self.last_exchange_quotes.len(),
            self.pivot
        );
    }

    /// Venue snapshot of the last second that produced a tick
    pub fn last_exchange_quotes(&self) -> &[Quote] {
        &self.last_exchange_quotes
    }

    /// Label of the sample `window` seconds back
    ///
    /// `None` until `2 * window + 1` seconds have been buffered: the window
    /// starts empty rather than pre-filled with the base prices, so a flat
    /// start does not report a High on the very first update.
    pub fn pivot(&self) -> Option<Pivot> {
        self.pivot
    }

    pub fn pivot_bid(&self) -> f64 {
        self.pivot_bid
    }

    pub fn pivot_ask(&self) -> f64 {
        self.pivot_ask
    }

    pub fn best_bid(&self) -> f64 {
        self.best_bid
    }

    pub fn best_ask(&self) -> f64 {
        self.best_ask
    }

    /// Pivot lookback in seconds
    pub fn window(&self) -> usize {
        self.detector.window()
    }

    /// Seconds currently buffered (at most `2 * window + 1`)
    pub fn buffered(&self) -> usize {
        self.detector.len()
    }
}

//! Online learning of a [`QuoteModel`] from historical quotes
//!
//! Quotes are fed in time order through a [`FeatureBuilder`], grouped by
//! second by the caller, and each second's features are folded into a
//! [`QuoteLearner`].

use crate::model::QuoteModel;
use indexmap::IndexMap;
use obr_core::{Breakout, Momentum, OutcomeBin, Regime, Sign, Tick, TransitionKey};

/// EWMA of |Δp| above which the market counts as trending (one cent)
const MOMENTUM_THRESHOLD: f64 = 0.01;

/// Distance to a .00 / .50 level under which the mid counts as near it
const BREAKOUT_DISTANCE: f64 = 0.01;

/// Micro-features of one quote
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuoteFeatures {
    /// Mid-price change since the previous quote (0 for the first one)
    pub dp: f64,
    pub spread: f64,
    /// Displayed depth at NBBO, bid + ask
    pub size: u64,
    pub is_momentum: bool,
    pub is_breakout: bool,
}

/// Stateful quote -> features transform; must see quotes in time order
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    prev_mid: Option<f64>,
    ewma_abs_dp: f64,
    alpha: f64,
}

impl FeatureBuilder {
    /// `alpha` is the EWMA smoothing factor: lower reacts faster but is noisier
    pub fn new(alpha: f64) -> Self {
        Self {
            prev_mid: None,
            ewma_abs_dp: 0.0,
            alpha,
        }
    }

    pub fn transform(&mut self, quote: &Tick) -> QuoteFeatures {
        let mid = quote.mid();
        let dp = self.prev_mid.map_or(0.0, |prev| mid - prev);
        self.prev_mid = Some(mid);

        self.ewma_abs_dp = self.alpha * self.ewma_abs_dp + (1.0 - self.alpha) * dp.abs();

        QuoteFeatures {
            dp,
            spread: quote.spread(),
            size: quote.bid_size + quote.ask_size,
            is_momentum: self.ewma_abs_dp > MOMENTUM_THRESHOLD,
            is_breakout: (mid * 2.0).rem_euclid(1.0) < BREAKOUT_DISTANCE,
        }
    }
}

impl Default for FeatureBuilder {
    fn default() -> Self {
        Self::new(0.9)
    }
}

/// Accumulates tick counts and transition frequencies second by second
#[derive(Debug, Clone, Default)]
pub struct QuoteLearner {
    transition: IndexMap<TransitionKey, IndexMap<OutcomeBin, f64>>,
    ticks_per_regime: IndexMap<Regime, f64>,
    seconds_per_regime: IndexMap<Regime, f64>,
}

impl QuoteLearner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold in the time-ordered features of one second
    ///
    /// The second's regime is trending / near-level if any of its quotes is;
    /// every quote is recorded under the sign of the second's last move.
    pub fn update_second(&mut self, features: &[QuoteFeatures]) {
        let Some(last) = features.last() else {
            return;
        };

        let regime = Regime::new(
            if features.iter().any(|f| f.is_momentum) {
                Momentum::Trending
            } else {
                Momentum::Calm
            },
            if features.iter().any(|f| f.is_breakout) {
                Breakout::NearLevel
            } else {
                Breakout::Away
            },
        );
        let key = TransitionKey::new(regime, Sign::of(last.dp));

        *self.ticks_per_regime.entry(regime).or_insert(0.0) += features.len() as f64;
        *self.seconds_per_regime.entry(regime).or_insert(0.0) += 1.0;

        let row = self.transition.entry(key).or_default();
        for f in features {
            let bin = OutcomeBin::from_observation(f.dp, f.spread, f.size as f64);
            *row.entry(bin).or_insert(0.0) += 1.0;
        }
    }

    /// Total seconds folded in so far
    pub fn seconds_observed(&self) -> f64 {
        self.seconds_per_regime.values().sum()
    }

    /// Freeze the accumulated counts into a sampling model
    pub fn build(&self) -> QuoteModel {
        QuoteModel::new(
            self.transition.clone(),
            self.ticks_per_regime.clone(),
            self.seconds_per_regime.clone(),
        )
    }
}

//! Multi-exchange fan-out of a single NBBO tick
//!
//! Turns one consolidated tick into a plausible level-1 snapshot across
//! venues:
//!
//! 1. Choose how many venues participate (bounded by displayable round lots)
//! 2. Pick them by market share, without replacement
//! 3. Split bid and ask sizes with a Dirichlet(1, .., 1) draw in round lots
//! 4. Place each venue at a tick offset from the NBBO, at least one at 0
//! 5. Make sure the venue at the NBBO shows at least one round lot
//!
//! The sums of venue sizes always equal the tick's sizes.

use crate::error::{Result, SimError};
use crate::infrastructure::ExchangeBookConfig;
use indexmap::IndexMap;
use obr_core::{ExchangeId, Quote, ROUND_LOT, TICK_SIZE, Tick, round_to_cents};
use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;
use rand_distr::Exp1;

/// Upper bound on venues quoting one tick
const MAX_PARTICIPANTS: u64 = 7;

/// Minimum venue count once enough size is available
const MIN_SPREAD_PARTICIPANTS: usize = 3;

/// Seeded venue/size/offset sampler
pub struct ExchangeBookGenerator {
    exchanges: Vec<ExchangeId>,
    /// Normalised market shares, aligned with `exchanges`
    shares: Vec<f64>,
    /// Venues with a strictly positive share
    active_venues: usize,
    offsets: Vec<i32>,
    offset_index: WeightedIndex<f64>,
    rng: StdRng,
}

impl ExchangeBookGenerator {
    /// Create a generator
    ///
    /// # Errors
    /// [`SimError::Configuration`] when a share is negative or not finite,
    /// when shares sum to zero, or when the offset table cannot be sampled.
    pub fn new(
        shares: &IndexMap<ExchangeId, f64>,
        offsets: &IndexMap<i32, f64>,
        seed: Option<u64>,
    ) -> Result<Self> {
        if let Some((venue, share)) = shares.iter().find(|(_, s)| !s.is_finite() || **s < 0.0) {
            return Err(SimError::Configuration(format!(
                "market share of {} must be a non-negative number, got {}",
                venue, share
            )));
        }

        let total: f64 = shares.values().sum();
        if total <= 0.0 {
            return Err(SimError::Configuration(format!(
                "market shares must sum to a positive value, got {}",
                total
            )));
        }

        let offset_index = WeightedIndex::new(offsets.values().copied()).map_err(|e| {
            SimError::Configuration(format!("invalid offset probabilities: {}", e))
        })?;

        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let normalised: Vec<f64> = shares.values().map(|s| s / total).collect();
        let active_venues = normalised.iter().filter(|s| **s > 0.0).count();

        log::debug!(
            "Exchange book: {} venues ({} active), {} offsets, seed {:?}",
            shares.len(),
            active_venues,
            offsets.len(),
            seed
        );

        Ok(Self {
            exchanges: shares.keys().cloned().collect(),
            shares: normalised,
            active_venues,
            offsets: offsets.keys().copied().collect(),
            offset_index,
            rng,
        })
    }

    pub fn from_config(config: &ExchangeBookConfig) -> Result<Self> {
        Self::new(&config.shares, &config.offsets, config.seed)
    }

    /// Venue names in configuration order
    pub fn exchanges(&self) -> &[ExchangeId] {
        &self.exchanges
    }

    /// Expand one NBBO tick into per-venue quotes
    pub fn generate(&mut self, tick: &Tick) -> Vec<Quote> {
        let n = self.participant_count(tick.bid_size.min(tick.ask_size));
        let venues = self.pick_exchanges(n);
        let n = venues.len();

        let mut bid_sizes = self.split_size(tick.bid_size, n);
        let mut ask_sizes = self.split_size(tick.ask_size, n);

        let bid_offsets = self.draw_offsets(n);
        let ask_offsets = self.draw_offsets(n);

        cover_nbbo(&mut bid_sizes, &bid_offsets);
        cover_nbbo(&mut ask_sizes, &ask_offsets);

        venues
            .iter()
            .enumerate()
            .map(|(k, &venue)| Quote {
                timestamp: tick.timestamp,
                exchange: self.exchanges[venue].clone(),
                bid_price: round_to_cents(tick.bid_price + bid_offsets[k] as f64 * TICK_SIZE),
                bid_size: bid_sizes[k],
                ask_price: round_to_cents(tick.ask_price + ask_offsets[k] as f64 * TICK_SIZE),
                ask_size: ask_sizes[k],
            })
            .collect()
    }

    /// How many venues quote a tick whose smaller side is `min_size`
    fn participant_count(&mut self, min_size: u64) -> usize {
        let max_n = (min_size / ROUND_LOT).clamp(1, MAX_PARTICIPANTS) as usize;
        let n = if max_n >= MIN_SPREAD_PARTICIPANTS {
            let u: f64 = self.rng.r#gen();
            MIN_SPREAD_PARTICIPANTS + (u * (max_n - 2) as f64) as usize
        } else {
            1
        };
        n.min(self.active_venues)
    }

    /// Weighted sampling without replacement over market shares
    fn pick_exchanges(&mut self, n: usize) -> Vec<usize> {
        let mut weights = self.shares.clone();
        let mut picked = Vec::with_capacity(n);

        for _ in 0..n {
            let Ok(index) = WeightedIndex::new(&weights) else {
                break;
            };
            let venue = index.sample(&mut self.rng);
            weights[venue] = 0.0;
            picked.push(venue);
        }
        picked
    }

    /// Split `total` over `n` venues in round lots
    ///
    /// Every venue gets at least one lot when `n > 1`; the result always
    /// sums to `total`.
    fn split_size(&mut self, total: u64, n: usize) -> Vec<u64> {
        if n <= 1 {
            return vec![total; n];
        }

        let lot = i128::from(ROUND_LOT);
        let target = i128::from(total);

        let draws: Vec<f64> = (0..n).map(|_| self.rng.sample(Exp1)).collect();
        let sum: f64 = draws.iter().sum();

        let mut sizes: Vec<i128> = draws
            .iter()
            .map(|d| {
                let raw = if sum > 0.0 {
                    d / sum * total as f64
                } else {
                    total as f64 / n as f64
                };
                ((raw / lot as f64).floor() as i128 * lot).max(lot)
            })
            .collect();

        let mut diff = target - sizes.iter().sum::<i128>();

        // Surplus from lot bumps: trim the largest while it keeps a lot
        while diff < 0 {
            let largest = first_argmax(&sizes);
            let step = lot.min(-diff).min(sizes[largest] - lot);
            if step <= 0 {
                break;
            }
            sizes[largest] -= step;
            diff += step;
        }

        // Deficit from flooring: hand out to random venues
        while diff > 0 {
            let step = lot.min(diff);
            let venue = self.rng.gen_range(0..n);
            sizes[venue] += step;
            diff -= step;
        }

        sizes
            .into_iter()
            .map(|s| u64::try_from(s.max(0)).unwrap_or(u64::MAX))
            .collect()
    }

    /// Tick offsets from the NBBO, with at least one venue at the NBBO
    fn draw_offsets(&mut self, n: usize) -> Vec<i32> {
        let mut drawn = Vec::with_capacity(n);
        for _ in 0..n {
            drawn.push(self.offsets[self.offset_index.sample(&mut self.rng)]);
        }

        if n > 0 && !drawn.contains(&0) {
            let venue = self.rng.gen_range(0..n);
            drawn[venue] = 0;
        }
        drawn
    }
}

/// Give the smallest venue at the NBBO one round lot, taken from the
/// largest venue if it can spare it
fn cover_nbbo(sizes: &mut [u64], offsets: &[i32]) {
    let Some(target) = (0..sizes.len())
        .filter(|&i| offsets[i] == 0)
        .min_by_key(|&i| sizes[i])
    else {
        return;
    };
    if sizes[target] >= ROUND_LOT {
        return;
    }

    let deficit = ROUND_LOT - sizes[target];
    let donor = first_argmax(sizes);
    if donor != target && sizes[donor] >= deficit + ROUND_LOT {
        sizes[donor] -= deficit;
        sizes[target] += deficit;
    }
}

/// Index of the first maximum (0 for an empty slice)
fn first_argmax<T: PartialOrd + Copy>(values: &[T]) -> usize {
    let mut best = 0;
    for (i, v) in values.iter().enumerate().skip(1) {
        if *v > values[best] {
            best = i;
        }
    }
    best
}

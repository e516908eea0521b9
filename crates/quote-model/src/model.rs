//! Immutable sampling model built from a transition table

use crate::error::Result;
use crate::file::ModelFile;
use crate::poisson;
use indexmap::IndexMap;
use obr_core::{Outcome, OutcomeBin, Regime, Sign, TransitionKey};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use std::path::Path;

/// Outcome distribution of one (regime, sign) row
#[derive(Debug, Clone)]
struct Bucket {
    bins: Vec<OutcomeBin>,
    weights: Vec<f64>,
    /// `None` when every weight is zero: the row samples as the fallback
    index: Option<WeightedIndex<f64>>,
}

impl Bucket {
    fn new(entries: IndexMap<OutcomeBin, f64>) -> Self {
        let (bins, weights): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
        let index = WeightedIndex::new(weights.iter().copied()).ok();
        Self {
            bins,
            weights,
            index,
        }
    }
}

/// Learned regime intensity + transition table
///
/// Pure lookup and sampling: no method mutates the model, so one instance
/// can back any number of generators behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct QuoteModel {
    transition: IndexMap<TransitionKey, Bucket>,
    ticks_per_regime: IndexMap<Regime, f64>,
    seconds_per_regime: IndexMap<Regime, f64>,
}

impl QuoteModel {
    /// Model with no data: zero intensity everywhere, fallback outcomes
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from typed tables
    ///
    /// Negative and non-finite weights/counts must already be filtered out;
    /// see [`from_model_file`](Self::from_model_file) for the tolerant path.
    pub fn new(
        transition: IndexMap<TransitionKey, IndexMap<OutcomeBin, f64>>,
        ticks_per_regime: IndexMap<Regime, f64>,
        seconds_per_regime: IndexMap<Regime, f64>,
    ) -> Self {
        Self {
            transition: transition
                .into_iter()
                .map(|(key, entries)| (key, Bucket::new(entries)))
                .collect(),
            ticks_per_regime,
            seconds_per_regime,
        }
    }

    /// Build from the serialized representation
    ///
    /// Malformed keys and negative or non-finite weights are skipped with a
    /// warning instead of failing the whole model.
    pub fn from_model_file(file: &ModelFile) -> Self {
        let mut transition = IndexMap::with_capacity(file.transition.len());
        for (raw_key, raw_bucket) in &file.transition {
            let key: TransitionKey = match raw_key.parse() {
                Ok(key) => key,
                Err(e) => {
                    log::warn!("Skipping transition row '{}': {}", raw_key, e);
                    continue;
                }
            };

            let mut entries = IndexMap::with_capacity(raw_bucket.len());
            for (raw_bin, &weight) in raw_bucket {
                match raw_bin.parse::<OutcomeBin>() {
                    Ok(bin) if !bin.has_valid_size() => log::warn!(
                        "Skipping bin '{}' of '{}': size out of range",
                        raw_bin,
                        raw_key
                    ),
                    Ok(bin) if valid_count(weight) => {
                        *entries.entry(bin).or_insert(0.0) += weight;
                    }
                    Ok(_) => log::warn!(
                        "Skipping bin '{}' of '{}': invalid weight {}",
                        raw_bin,
                        raw_key,
                        weight
                    ),
                    Err(e) => log::warn!("Skipping bin '{}' of '{}': {}", raw_bin, raw_key, e),
                }
            }
            transition.insert(key, entries);
        }

        let model = Self::new(
            transition,
            parse_regime_counts(&file.ticks_per_regime, "ticks_per_regime"),
            parse_regime_counts(&file.seconds_per_regime, "seconds_per_regime"),
        );
        log::info!(
            "Quote model loaded: {} transition rows, {} regimes",
            model.transition.len(),
            model.ticks_per_regime.len()
        );
        model
    }

    /// Parse a model from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_model_file(&ModelFile::from_json(json)?))
    }

    /// Load a model from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_model_file(&ModelFile::from_file(path)?))
    }

    /// Load a model, falling back to the empty model on any failure
    ///
    /// A missing or unreadable model is not fatal: the simulation simply
    /// stays flat. The failure is reported as a warning.
    pub fn load_or_empty(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            log::warn!("No quote model configured, using empty model");
            return Self::empty();
        };

        match Self::from_file(path) {
            Ok(model) => model,
            Err(e) => {
                log::warn!("{}; using empty model", e);
                Self::empty()
            }
        }
    }

    /// Serialized representation, suitable for [`ModelFile::write_json`]
    pub fn to_model_file(&self) -> ModelFile {
        ModelFile {
            transition: self
                .transition
                .iter()
                .map(|(key, bucket)| {
                    let entries = bucket
                        .bins
                        .iter()
                        .zip(&bucket.weights)
                        .map(|(bin, &weight)| (bin.to_string(), weight))
                        .collect();
                    (key.to_string(), entries)
                })
                .collect(),
            ticks_per_regime: regime_counts_to_strings(&self.ticks_per_regime),
            seconds_per_regime: regime_counts_to_strings(&self.seconds_per_regime),
        }
    }

    /// True when the model has neither transitions nor intensities
    pub fn is_empty(&self) -> bool {
        self.transition.is_empty() && self.ticks_per_regime.is_empty()
    }

    /// Number of (regime, sign) rows
    pub fn transition_rows(&self) -> usize {
        self.transition.len()
    }

    /// Empirical updates per second: ticks / max(1, seconds)
    pub fn intensity(&self, regime: Regime) -> f64 {
        let ticks = self.ticks_per_regime.get(&regime).copied().unwrap_or(0.0);
        let seconds = self
            .seconds_per_regime
            .get(&regime)
            .copied()
            .unwrap_or(0.0)
            .max(1.0);
        ticks / seconds
    }

    /// Poisson draw of how many updates the coming second has
    pub fn sample_update_count<R: Rng + ?Sized>(&self, regime: Regime, rng: &mut R) -> u64 {
        poisson::sample(self.intensity(regime), rng)
    }

    /// Weighted draw of one (Δp, spread, size) outcome
    ///
    /// Unknown or empty rows return [`Outcome::FALLBACK`].
    pub fn sample_outcome<R: Rng + ?Sized>(&self, regime: Regime, sign: Sign, rng: &mut R) -> Outcome {
        let key = TransitionKey::new(regime, sign);
        let Some(bucket) = self.transition.get(&key) else {
            log::trace!("No transition row for {}, using fallback", key);
            return Outcome::FALLBACK;
        };
        match &bucket.index {
            Some(index) => bucket.bins[index.sample(rng)].decode(),
            None => Outcome::FALLBACK,
        }
    }
}

fn valid_count(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

fn parse_regime_counts(raw: &IndexMap<String, f64>, table: &str) -> IndexMap<Regime, f64> {
    let mut counts = IndexMap::with_capacity(raw.len());
    for (raw_key, &count) in raw {
        match raw_key.parse::<Regime>() {
            Ok(regime) if valid_count(count) => {
                *counts.entry(regime).or_insert(0.0) += count;
            }
            Ok(_) => log::warn!("Skipping {} '{}': invalid count {}", table, raw_key, count),
            Err(e) => log::warn!("Skipping {} '{}': {}", table, raw_key, e),
        }
    }
    counts
}

fn regime_counts_to_strings(counts: &IndexMap<Regime, f64>) -> IndexMap<String, f64> {
    counts
        .iter()
        .map(|(regime, &count)| (regime.to_string(), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use obr_core::{Breakout, Momentum};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const MODEL_JSON: &str = r#"{
        "transition": {
            "N,O,F": { "1,2,3": 3, "-1,1,2": 1 },
            "N,O,U": { "0,1,1": 0 },
            "bogus": { "1,1,1": 5 }
        },
        "ticks_per_regime": { "N,O": 120, "M,O": 10 },
        "seconds_per_regime": { "N,O": 60 }
    }"#;

    #[test]
    fn test_intensity() {
        let model = QuoteModel::from_json(MODEL_JSON).unwrap();
        assert_relative_eq!(model.intensity(Regime::default()), 2.0);
        // seconds missing: denominator floors at 1
        let trending = Regime::new(Momentum::Trending, Breakout::Away);
        assert_relative_eq!(model.intensity(trending), 10.0);
        // unknown regime: zero ticks
        let near = Regime::new(Momentum::Trending, Breakout::NearLevel);
        assert_eq!(model.intensity(near), 0.0);
    }

    #[test]
    fn test_malformed_rows_skipped() {
        let model = QuoteModel::from_json(MODEL_JSON).unwrap();
        assert_eq!(model.transition_rows(), 2);
    }

    #[test]
    fn test_out_of_range_size_bins_skipped() {
        let json = r#"{
            "transition": { "N,O,F": { "0,1,999999999999999999": 1, "0,1,-4": 1, "1,1,2": 1 } },
            "ticks_per_regime": { "N,O": 1 }
        }"#;
        let model = QuoteModel::from_json(json).unwrap();
        let mut rng = StdRng::seed_from_u64(9);

        for _ in 0..200 {
            let outcome = model.sample_outcome(Regime::default(), Sign::Flat, &mut rng);
            assert_eq!(outcome.size, 200);
        }
        assert_eq!(model.to_model_file().transition["N,O,F"].len(), 1);
    }

    #[test]
    fn test_empty_model_samples_safe_defaults() {
        let model = QuoteModel::empty();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(model.is_empty());
        for _ in 0..100 {
            assert_eq!(model.sample_update_count(Regime::default(), &mut rng), 0);
        }
        assert_eq!(
            model.sample_outcome(Regime::default(), Sign::Flat, &mut rng),
            Outcome::FALLBACK
        );
    }

    #[test]
    fn test_zero_weight_row_uses_fallback() {
        let model = QuoteModel::from_json(MODEL_JSON).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let outcome = model.sample_outcome(Regime::default(), Sign::Up, &mut rng);
        assert_eq!(outcome, Outcome::FALLBACK);
    }

    #[test]
    fn test_outcomes_come_from_row() {
        let model = QuoteModel::from_json(MODEL_JSON).unwrap();
        let mut rng = StdRng::seed_from_u64(9);
        for _ in 0..200 {
            let outcome = model.sample_outcome(Regime::default(), Sign::Flat, &mut rng);
            let expected = [OutcomeBin::new(1, 2, 3).decode(), OutcomeBin::new(-1, 1, 2).decode()];
            assert!(expected.contains(&outcome), "unexpected outcome {outcome:?}");
        }
    }

    #[test]
    fn test_model_file_round_trip() {
        let model = QuoteModel::from_json(MODEL_JSON).unwrap();
        let file = model.to_model_file();
        assert_eq!(file.transition["N,O,F"]["1,2,3"], 3.0);
        assert_eq!(file.ticks_per_regime["M,O"], 10.0);
        assert!(!file.transition.contains_key("bogus"));

        let reloaded = QuoteModel::from_model_file(&file);
        assert_eq!(reloaded.transition_rows(), model.transition_rows());
        assert_relative_eq!(
            reloaded.intensity(Regime::default()),
            model.intensity(Regime::default())
        );
    }

    #[test]
    fn test_load_or_empty_tolerates_missing_file() {
        let model = QuoteModel::load_or_empty(Some(Path::new("/nonexistent/model.json")));
        assert!(model.is_empty());
        assert!(QuoteModel::load_or_empty(None).is_empty());
    }
}

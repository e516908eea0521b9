//! Signal state machine and reaction scoring

use crate::config::ReactionConfig;
use crate::error::Result;
use obr_core::Pivot;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Trade signal shown to the trainee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Signal {
    Entry,
    Exit,
}

impl Signal {
    /// Signal a confirmed pivot calls for: buy the low, sell the high
    pub fn for_pivot(pivot: Pivot) -> Self {
        match pivot {
            Pivot::Low => Signal::Entry,
            Pivot::High => Signal::Exit,
        }
    }

    /// Key that answers this signal
    pub fn expected_key(&self) -> ReactionKey {
        match self {
            Signal::Entry => ReactionKey::Entry,
            Signal::Exit => ReactionKey::Exit,
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Entry => write!(f, "ENTRY"),
            Signal::Exit => write!(f, "EXIT"),
        }
    }
}

/// Key the trainee pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReactionKey {
    Entry,
    Exit,
}

/// One scored reaction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReactionResult {
    pub signal: Signal,
    pub key: ReactionKey,
    pub reaction_time: Duration,
    /// Window in force when the signal fired, in seconds
    pub window: f64,
    pub success: bool,
}

/// Aggregate over all recorded reactions
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ReactionStats {
    pub attempts: usize,
    pub successes: usize,
    pub mean_reaction_time: Duration,
}

impl ReactionStats {
    pub fn success_rate(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            self.successes as f64 / self.attempts as f64
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveSignal {
    signal: Signal,
    fired_at: Instant,
}

/// ENTRY/EXIT signal generator with an adaptive reaction window
#[derive(Debug, Clone)]
pub struct SignalModel {
    config: ReactionConfig,
    reaction_window: f64,
    active: Option<ActiveSignal>,
    results: Vec<ReactionResult>,
}

impl Default for SignalModel {
    fn default() -> Self {
        let config = ReactionConfig::default();
        Self {
            reaction_window: config.initial_window,
            config,
            active: None,
            results: Vec::new(),
        }
    }
}

impl SignalModel {
    pub fn new(config: ReactionConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            reaction_window: config.initial_window,
            config,
            active: None,
            results: Vec::new(),
        })
    }

    /// Show `signal` from `now`, replacing any signal still pending
    pub fn trigger(&mut self, signal: Signal, now: Instant) {
        if let Some(previous) = self.active {
            log::debug!("{} replaced by {} before any reaction", previous.signal, signal);
        }
        self.active = Some(ActiveSignal {
            signal,
            fired_at: now,
        });
    }

    /// Fire the signal matching a fresh pivot label
    ///
    /// Ignored while another signal awaits a reaction. Returns the signal
    /// fired, if any.
    pub fn on_pivot(&mut self, pivot: Option<Pivot>, now: Instant) -> Option<Signal> {
        let pivot = pivot?;
        if self.active.is_some() {
            return None;
        }
        let signal = Signal::for_pivot(pivot);
        self.trigger(signal, now);
        log::info!("{} signal on {}", signal, pivot);
        Some(signal)
    }

    /// Score a key press against the pending signal
    ///
    /// Success means the right key within the current window. The signal
    /// is consumed either way. Without a pending signal nothing is recorded
    /// and the press counts as a miss.
    pub fn record_reaction(&mut self, key: ReactionKey, now: Instant) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };

        let reaction_time = now.saturating_duration_since(active.fired_at);
        let success = key == active.signal.expected_key()
            && reaction_time.as_secs_f64() <= self.reaction_window;

        self.results.push(ReactionResult {
            signal: active.signal,
            key,
            reaction_time,
            window: self.reaction_window,
            success,
        });
        log::debug!(
            "{} answered with {:?} in {:.3}s (window {:.3}s): {}",
            active.signal,
            key,
            reaction_time.as_secs_f64(),
            self.reaction_window,
            if success { "hit" } else { "miss" }
        );

        self.adapt();
        success
    }

    /// Tighten the window when the last span of reactions went well
    fn adapt(&mut self) {
        let span = self.config.evaluation_span;
        if self.results.len() < span {
            return;
        }

        let recent = &self.results[self.results.len() - span..];
        let rate = recent.iter().filter(|r| r.success).count() as f64 / span as f64;
        if rate >= self.config.success_threshold {
            let tightened = (self.reaction_window * self.config.decrease_factor).max(self.config.min_window);
            if tightened < self.reaction_window {
                log::info!(
                    "Reaction window {:.3}s -> {:.3}s (success rate {:.0}%)",
                    self.reaction_window,
                    tightened,
                    rate * 100.0
                );
            }
            self.reaction_window = tightened;
        }
    }

    pub fn current_signal(&self) -> Option<Signal> {
        self.active.map(|a| a.signal)
    }

    /// Current reaction window in seconds
    pub fn reaction_window(&self) -> f64 {
        self.reaction_window
    }

    pub fn results(&self) -> &[ReactionResult] {
        &self.results
    }

    pub fn stats(&self) -> ReactionStats {
        let attempts = self.results.len();
        if attempts == 0 {
            return ReactionStats::default();
        }
        let total: Duration = self.results.iter().map(|r| r.reaction_time).sum();
        ReactionStats {
            attempts,
            successes: self.results.iter().filter(|r| r.success).count(),
            mean_reaction_time: total / attempts as u32,
        }
    }

    pub fn config(&self) -> &ReactionConfig {
        &self.config
    }
}

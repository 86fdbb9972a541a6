//! Baseline-gated patience monitor
//!
//! The core stop/continue state machine. A monitor tracks one named scalar
//! metric across epochs, remembers the best value seen, and counts epochs
//! without improvement against a patience budget. A configured baseline gates
//! the patience mechanism: until the metric has surpassed the baseline, a run
//! is not eligible to stop early (how strongly the gate bites is chosen by
//! [`BaselinePolicy`]).
//!
//! # Example
//!
//! ```rust
//! use paciencia::{EarlyStopping, EarlyStoppingConfig, StopSignal};
//!
//! let config = EarlyStoppingConfig {
//!     monitor: "val_loss".to_string(),
//!     patience: 2,
//!     baseline: Some(0.5),
//!     ..Default::default()
//! };
//! let mut monitor: EarlyStopping = EarlyStopping::new(config).unwrap();
//!
//! monitor.on_run_start();
//! assert_eq!(monitor.on_epoch_end(0, Some(0.8)), StopSignal::Continue);
//! ```

use serde::{Deserialize, Serialize};

use crate::direction::{Direction, Mode};
use crate::error::{ConfigError, Result};
use crate::snapshot::ParameterStore;

/// Decision returned to the host loop after each epoch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopSignal {
    /// Keep training
    Continue,
    /// Halt the run
    Stop,
}

impl StopSignal {
    /// True if the signal is [`StopSignal::Stop`]
    pub fn is_stop(self) -> bool {
        self == StopSignal::Stop
    }
}

/// How the baseline threshold gates the patience mechanism
///
/// Both policies agree that a configured baseline must be surpassed before a
/// run may stop early; they differ in what happens to the wait counter while
/// the metric has not yet cleared it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaselinePolicy {
    /// The wait counter is frozen until the baseline has been surpassed once;
    /// after that first crossing the gate latches open for the rest of the
    /// run. While the gate is open, any improvement resets the counter.
    GateWait,
    /// The wait counter runs every epoch past warm-up. It resets only when
    /// the metric both improves on the best value and clears the baseline at
    /// that same epoch, so runs that never reach the baseline still stop
    /// once patience is exhausted.
    #[default]
    GateReset,
}

/// Immutable monitor configuration
///
/// Mirrors the conventional early-stopping surface: a named metric, a
/// minimum improvement delta, a patience budget, a direction mode, and an
/// optional baseline with its gating policy.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EarlyStoppingConfig {
    /// Name of the metric to monitor
    pub monitor: String,
    /// Minimum change to count as an improvement (finite, >= 0)
    pub min_delta: f32,
    /// Epochs without a qualifying improvement tolerated before stopping
    pub patience: usize,
    /// Log improvements and gate decisions
    pub verbose: bool,
    /// Comparison direction (`auto` infers from the metric name)
    pub mode: Mode,
    /// Threshold the metric must surpass before stopping is allowed
    pub baseline: Option<f32>,
    /// Keep a snapshot of the best parameters and restore it on stop
    pub restore_best: bool,
    /// Ignore observations from epochs before this index
    pub start_from_epoch: usize,
    /// How the baseline gates the wait counter
    pub baseline_policy: BaselinePolicy,
}

impl Default for EarlyStoppingConfig {
    fn default() -> Self {
        Self {
            monitor: "val_loss".to_string(),
            min_delta: 0.0,
            patience: 0,
            verbose: false,
            mode: Mode::Auto,
            baseline: None,
            restore_best: false,
            start_from_epoch: 0,
            baseline_policy: BaselinePolicy::default(),
        }
    }
}

impl EarlyStoppingConfig {
    /// Validate construction-time constraints
    pub fn validate(&self) -> Result<()> {
        if !self.min_delta.is_finite() || self.min_delta < 0.0 {
            return Err(ConfigError::InvalidMinDelta(self.min_delta));
        }
        Ok(())
    }
}

/// Mutable per-run state, reset by [`EarlyStopping::on_run_start`]
#[derive(Clone, Debug, Default)]
pub struct RunState<S> {
    /// Best metric value accepted so far
    pub(crate) best: Option<f32>,
    /// Epoch at which `best` (or the tentative snapshot) was recorded
    pub(crate) best_epoch: usize,
    /// Epochs since the last qualifying improvement
    pub(crate) wait: usize,
    /// Epoch at which the run was stopped, if it was
    pub(crate) stopped_epoch: Option<usize>,
    /// Latch: the baseline has been surpassed at least once this run
    pub(crate) surpassed_baseline: bool,
    /// Snapshot of the parameters at the best epoch
    pub(crate) best_snapshot: Option<S>,
    /// Direction resolved at the first epoch call of the run
    pub(crate) direction: Option<Direction>,
}

impl<S> RunState<S> {
    fn reset(&mut self) {
        self.best = None;
        self.best_epoch = 0;
        self.wait = 0;
        self.stopped_epoch = None;
        self.surpassed_baseline = false;
        self.best_snapshot = None;
        self.direction = None;
    }
}

/// Baseline-gated patience monitor
///
/// `S` is the host's opaque parameter-snapshot type; it only matters when
/// `restore_best` is enabled and epochs are fed through
/// [`on_epoch_end_with`](EarlyStopping::on_epoch_end_with). Hosts that never
/// snapshot can use the default `S = ()`.
#[derive(Clone, Debug)]
pub struct EarlyStopping<S = ()> {
    config: EarlyStoppingConfig,
    state: RunState<S>,
}

impl<S> EarlyStopping<S> {
    /// Create a monitor from a validated configuration
    pub fn new(config: EarlyStoppingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: RunState {
                best: None,
                best_epoch: 0,
                wait: 0,
                stopped_epoch: None,
                surpassed_baseline: false,
                best_snapshot: None,
                direction: None,
            },
        })
    }

    /// Reset run state so the instance can be reused for a fresh run
    pub fn on_run_start(&mut self) {
        self.state.reset();
    }

    /// Feed the metric value for a completed epoch, without snapshotting
    ///
    /// `value` is `None` when the metric was not produced this epoch; the
    /// epoch is then skipped without touching any state. NaN values are
    /// treated the same way.
    pub fn on_epoch_end(&mut self, epoch: usize, value: Option<f32>) -> StopSignal {
        self.evaluate(epoch, value, None)
    }

    /// Feed the metric value for a completed epoch, with snapshot support
    ///
    /// When `restore_best` is set, the monitor captures `params` at each new
    /// best epoch (and once up front, so there is always something to
    /// restore) and restores the best snapshot into `params` when it signals
    /// [`StopSignal::Stop`].
    pub fn on_epoch_end_with(
        &mut self,
        epoch: usize,
        value: Option<f32>,
        params: &mut dyn ParameterStore<Snapshot = S>,
    ) -> StopSignal {
        self.evaluate(epoch, value, Some(params))
    }

    fn evaluate(
        &mut self,
        epoch: usize,
        value: Option<f32>,
        mut params: Option<&mut dyn ParameterStore<Snapshot = S>>,
    ) -> StopSignal {
        // A stopped run stays stopped; nothing mutates past this point.
        if self.state.stopped_epoch.is_some() {
            return StopSignal::Stop;
        }

        // Direction resolution is deferred to the first epoch call and
        // cached for the rest of the run.
        let direction = *self
            .state
            .direction
            .get_or_insert_with(|| self.config.mode.resolve(&self.config.monitor));

        let value = match value {
            Some(v) if !v.is_nan() => v,
            _ => return StopSignal::Continue,
        };
        if epoch < self.config.start_from_epoch {
            return StopSignal::Continue;
        }

        if self.config.restore_best && self.state.best_snapshot.is_none() {
            // No best has been recorded yet, so the current parameters are
            // the best available if the run stops before any improvement.
            if let Some(store) = params.as_mut() {
                self.state.best_snapshot = Some(store.capture());
                self.state.best_epoch = epoch;
            }
        }

        let improved = direction.is_improvement(value, self.state.best, self.config.min_delta);
        if improved {
            if self.config.verbose {
                match self.state.best {
                    Some(prev) => eprintln!(
                        "epoch {epoch}: {} improved from {prev:.5} to {value:.5}",
                        self.config.monitor
                    ),
                    None => eprintln!("epoch {epoch}: {} = {value:.5}", self.config.monitor),
                }
            }
            self.state.best = Some(value);
            self.state.best_epoch = epoch;
            if self.config.restore_best {
                if let Some(store) = params.as_mut() {
                    self.state.best_snapshot = Some(store.capture());
                }
            }
        }

        // An absent baseline leaves the gate permanently open.
        let surpassed_now = match self.config.baseline {
            None => true,
            Some(baseline) => direction.is_better(value, baseline),
        };

        match self.config.baseline_policy {
            BaselinePolicy::GateWait => {
                if surpassed_now || self.state.surpassed_baseline {
                    self.state.surpassed_baseline = true;
                    self.state.wait += 1;
                    if improved {
                        self.state.wait = 0;
                        return StopSignal::Continue;
                    }
                } else {
                    // Baseline never surpassed: patience does not count down.
                    if self.config.verbose {
                        eprintln!(
                            "epoch {epoch}: {} = {value:.5} has not surpassed baseline, \
                             patience gate closed",
                            self.config.monitor
                        );
                    }
                    return StopSignal::Continue;
                }
            }
            BaselinePolicy::GateReset => {
                if surpassed_now {
                    self.state.surpassed_baseline = true;
                }
                self.state.wait += 1;
                // An improvement that still fails to clear the baseline does
                // not buy patience back.
                if improved && surpassed_now {
                    self.state.wait = 0;
                }
            }
        }

        if self.state.wait >= self.config.patience && epoch > 0 {
            self.state.stopped_epoch = Some(epoch);
            let best = self
                .state
                .best
                .map_or_else(|| "n/a".to_string(), |b| format!("{b:.4}"));
            eprintln!(
                "Early stopping at epoch {epoch}: no {} improvement for {} epochs \
                 (best: {best} at epoch {})",
                self.config.monitor, self.config.patience, self.state.best_epoch
            );
            if self.config.restore_best {
                if let (Some(store), Some(snapshot)) =
                    (params.as_mut(), self.state.best_snapshot.as_ref())
                {
                    store.restore(snapshot);
                    if self.config.verbose {
                        eprintln!("restored parameters from epoch {}", self.state.best_epoch);
                    }
                }
            }
            return StopSignal::Stop;
        }
        StopSignal::Continue
    }

    /// The monitor's configuration
    pub fn config(&self) -> &EarlyStoppingConfig {
        &self.config
    }

    /// Best metric value accepted so far this run
    pub fn best(&self) -> Option<f32> {
        self.state.best
    }

    /// Epoch at which the best value was recorded
    pub fn best_epoch(&self) -> usize {
        self.state.best_epoch
    }

    /// Epochs since the last qualifying improvement
    pub fn wait(&self) -> usize {
        self.state.wait
    }

    /// Epoch at which the run stopped, if it has
    pub fn stopped_epoch(&self) -> Option<usize> {
        self.state.stopped_epoch
    }

    /// Whether the run has been stopped
    pub fn has_stopped(&self) -> bool {
        self.state.stopped_epoch.is_some()
    }

    /// Whether the baseline has been surpassed at least once this run
    pub fn surpassed_baseline(&self) -> bool {
        self.state.surpassed_baseline
    }

    /// Snapshot of the parameters at the best epoch, if one was taken
    pub fn best_snapshot(&self) -> Option<&S> {
        self.state.best_snapshot.as_ref()
    }

    /// Take ownership of the best-parameters snapshot, leaving none behind
    pub fn take_best_snapshot(&mut self) -> Option<S> {
        self.state.best_snapshot.take()
    }
}

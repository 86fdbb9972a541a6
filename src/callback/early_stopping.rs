//! Early stopping as a training callback
//!
//! Adapts the core [`EarlyStopping`] monitor to the [`TrainerCallback`]
//! hook surface: the monitor is reset when training begins and fed the
//! configured metric out of the per-epoch lookup. Hosts that want
//! best-weights restoration drive the monitor directly through
//! [`EarlyStopping::on_epoch_end_with`] instead, since the callback context
//! carries no parameter access.

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};
use crate::error::Result;
use crate::monitor::{EarlyStopping, EarlyStoppingConfig, StopSignal};

/// Gated patience early stopping, hooked into the callback dispatch
///
/// # Example
///
/// ```rust
/// use paciencia::callback::EarlyStoppingCallback;
/// use paciencia::EarlyStoppingConfig;
///
/// // Stop once val_loss has gone 5 epochs without improving by 0.001,
/// // but only after it has dipped below 0.5 at least once.
/// let callback = EarlyStoppingCallback::new(EarlyStoppingConfig {
///     patience: 5,
///     min_delta: 0.001,
///     baseline: Some(0.5),
///     ..Default::default()
/// }).unwrap();
/// ```
pub struct EarlyStoppingCallback {
    monitor: EarlyStopping<()>,
}

impl EarlyStoppingCallback {
    /// Create the callback from a validated configuration
    pub fn new(config: EarlyStoppingConfig) -> Result<Self> {
        Ok(Self {
            monitor: EarlyStopping::new(config)?,
        })
    }

    /// The wrapped monitor, for inspecting run state
    pub fn monitor(&self) -> &EarlyStopping<()> {
        &self.monitor
    }
}

impl TrainerCallback for EarlyStoppingCallback {
    fn on_train_begin(&mut self, _ctx: &CallbackContext) -> CallbackAction {
        // Allow instances to be reused across runs
        self.monitor.on_run_start();
        CallbackAction::Continue
    }

    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        let value = ctx.metric(&self.monitor.config().monitor);
        match self.monitor.on_epoch_end(ctx.epoch, value) {
            StopSignal::Stop => CallbackAction::Stop,
            StopSignal::Continue => CallbackAction::Continue,
        }
    }

    fn name(&self) -> &'static str {
        "EarlyStoppingCallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::BaselinePolicy;

    fn ctx_with(epoch: usize, name: &str, value: f32) -> CallbackContext {
        let mut ctx = CallbackContext {
            epoch,
            ..Default::default()
        };
        ctx.set_metric(name, value);
        ctx
    }

    #[test]
    fn test_callback_reads_configured_metric() {
        let cfg = EarlyStoppingConfig {
            monitor: "train_loss".to_string(),
            patience: 1,
            ..Default::default()
        };
        let mut cb = EarlyStoppingCallback::new(cfg).unwrap();
        cb.on_train_begin(&CallbackContext::default());

        cb.on_epoch_end(&ctx_with(0, "train_loss", 1.0));
        assert_eq!(cb.monitor().best(), Some(1.0));

        // A differently named metric is invisible to this callback
        let action = cb.on_epoch_end(&ctx_with(1, "val_loss", 0.1));
        assert_eq!(action, CallbackAction::Continue);
        assert_eq!(cb.monitor().best(), Some(1.0));
        assert_eq!(cb.monitor().wait(), 0);
    }

    #[test]
    fn test_callback_stops_after_patience() {
        let cfg = EarlyStoppingConfig {
            patience: 2,
            ..Default::default()
        };
        let mut cb = EarlyStoppingCallback::new(cfg).unwrap();
        cb.on_train_begin(&CallbackContext::default());

        assert_eq!(
            cb.on_epoch_end(&ctx_with(0, "val_loss", 1.0)),
            CallbackAction::Continue
        );
        assert_eq!(
            cb.on_epoch_end(&ctx_with(1, "val_loss", 1.0)),
            CallbackAction::Continue
        );
        assert_eq!(
            cb.on_epoch_end(&ctx_with(2, "val_loss", 1.0)),
            CallbackAction::Stop
        );
        assert_eq!(cb.monitor().stopped_epoch(), Some(2));
    }

    #[test]
    fn test_train_begin_resets_between_runs() {
        let cfg = EarlyStoppingConfig {
            patience: 1,
            ..Default::default()
        };
        let mut cb = EarlyStoppingCallback::new(cfg).unwrap();

        cb.on_train_begin(&CallbackContext::default());
        cb.on_epoch_end(&ctx_with(0, "val_loss", 1.0));
        cb.on_epoch_end(&ctx_with(1, "val_loss", 1.0));
        assert!(cb.monitor().has_stopped());

        // Second run starts clean
        cb.on_train_begin(&CallbackContext::default());
        assert!(!cb.monitor().has_stopped());
        assert_eq!(cb.monitor().best(), None);
        assert_eq!(
            cb.on_epoch_end(&ctx_with(0, "val_loss", 0.5)),
            CallbackAction::Continue
        );
    }

    #[test]
    fn test_callback_ignores_unlogged_epochs() {
        let cfg = EarlyStoppingConfig {
            patience: 1,
            ..Default::default()
        };
        let mut cb = EarlyStoppingCallback::new(cfg).unwrap();
        cb.on_train_begin(&CallbackContext::default());
        cb.on_epoch_end(&ctx_with(0, "val_loss", 1.0));

        // Epoch with no val_loss entry: skipped, not counted
        let mut ctx = CallbackContext::default();
        ctx.epoch = 1;
        assert_eq!(cb.on_epoch_end(&ctx), CallbackAction::Continue);
        assert_eq!(cb.monitor().wait(), 0);
    }

    #[test]
    fn test_callback_with_latch_gated_policy() {
        let cfg = EarlyStoppingConfig {
            patience: 1,
            baseline: Some(0.5),
            baseline_policy: BaselinePolicy::GateWait,
            ..Default::default()
        };
        let mut cb = EarlyStoppingCallback::new(cfg).unwrap();
        cb.on_train_begin(&CallbackContext::default());

        // Never clears the baseline: patience never counts down
        for epoch in 0..10 {
            let action = cb.on_epoch_end(&ctx_with(epoch, "val_loss", 0.9));
            assert_eq!(action, CallbackAction::Continue);
        }
        assert!(!cb.monitor().surpassed_baseline());
    }

    #[test]
    fn test_callback_name() {
        let cb = EarlyStoppingCallback::new(EarlyStoppingConfig::default()).unwrap();
        assert_eq!(cb.name(), "EarlyStoppingCallback");
    }
}

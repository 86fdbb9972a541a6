//! Progress callback for logging training progress

use super::traits::{CallbackAction, CallbackContext, TrainerCallback};

/// Progress callback for logging training progress
///
/// Prints the metrics the host logged for each epoch; within an epoch,
/// steps are reported every `log_interval` steps using the metric the
/// callback is configured to highlight.
#[derive(Clone, Debug)]
pub struct ProgressCallback {
    /// Log every N steps
    log_interval: usize,
    /// Metric to report at step granularity
    step_metric: String,
}

impl ProgressCallback {
    /// Create progress callback
    pub fn new(log_interval: usize) -> Self {
        Self {
            log_interval,
            step_metric: "loss".to_string(),
        }
    }

    /// Change the metric reported at step granularity
    pub fn step_metric(mut self, name: impl Into<String>) -> Self {
        self.step_metric = name.into();
        self
    }

    fn format_metrics(ctx: &CallbackContext) -> String {
        let mut entries: Vec<_> = ctx.metrics.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(b.0));
        entries
            .iter()
            .map(|(name, value)| format!("{name}: {value:.4}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for ProgressCallback {
    fn default() -> Self {
        Self::new(10)
    }
}

impl TrainerCallback for ProgressCallback {
    fn on_epoch_begin(&mut self, ctx: &CallbackContext) -> CallbackAction {
        println!("Epoch {}/{} starting", ctx.epoch + 1, ctx.max_epochs);
        CallbackAction::Continue
    }

    fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        println!(
            "Epoch {}/{}: {} ({:.1}s)",
            ctx.epoch + 1,
            ctx.max_epochs,
            Self::format_metrics(ctx),
            ctx.elapsed_secs
        );
        CallbackAction::Continue
    }

    fn on_step_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
        if self.log_interval > 0 && ctx.step > 0 && ctx.step % self.log_interval == 0 {
            if let Some(value) = ctx.metric(&self.step_metric) {
                println!(
                    "  Step {}/{}: {}: {value:.4}",
                    ctx.step, ctx.steps_per_epoch, self.step_metric
                );
            }
        }
        CallbackAction::Continue
    }

    fn name(&self) -> &'static str {
        "ProgressCallback"
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Progress callback should always continue
        #[test]
        fn progress_callback_never_stops(
            epoch in 0usize..100,
            step in 0usize..1000,
            loss in -100.0f32..100.0,
        ) {
            let mut progress = ProgressCallback::new(10);
            let mut ctx = CallbackContext {
                epoch,
                max_epochs: 100,
                step,
                steps_per_epoch: 100,
                ..Default::default()
            };
            ctx.set_metric("loss", loss);

            prop_assert_eq!(progress.on_train_begin(&ctx), CallbackAction::Continue);
            prop_assert_eq!(progress.on_epoch_begin(&ctx), CallbackAction::Continue);
            prop_assert_eq!(progress.on_step_begin(&ctx), CallbackAction::Continue);
            prop_assert_eq!(progress.on_step_end(&ctx), CallbackAction::Continue);
            prop_assert_eq!(progress.on_epoch_end(&ctx), CallbackAction::Continue);
        }
    }
}

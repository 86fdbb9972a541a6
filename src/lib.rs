//! Baseline-gated patience early stopping for training loops
//!
//! This crate provides:
//! - A gated patience monitor ([`EarlyStopping`]): tracks one named metric
//!   across epochs, keeps the best value seen, counts non-improving epochs
//!   against a patience budget, and gates the whole stopping decision behind
//!   an optional baseline the metric must first surpass
//! - Two baseline policies ([`BaselinePolicy`]): freeze the patience counter
//!   until the baseline is cleared, or let it run and gate only the reset
//! - A parameter-snapshot seam ([`ParameterStore`]) so hosts can restore the
//!   best weights when a run stops
//! - A callback layer ([`callback`]) for hosts that drive training through
//!   event hooks rather than calling the monitor directly
//!
//! # Example
//!
//! ```rust
//! use paciencia::{BaselinePolicy, EarlyStopping, EarlyStoppingConfig};
//!
//! let config = EarlyStoppingConfig {
//!     monitor: "val_loss".to_string(),
//!     patience: 3,
//!     baseline: Some(0.5),
//!     baseline_policy: BaselinePolicy::GateReset,
//!     ..Default::default()
//! };
//! let mut monitor: EarlyStopping = EarlyStopping::new(config).unwrap();
//!
//! monitor.on_run_start();
//! for (epoch, value) in [0.8_f32, 0.6, 0.45, 0.46, 0.46, 0.46].iter().enumerate() {
//!     if monitor.on_epoch_end(epoch, Some(*value)).is_stop() {
//!         println!("stopped at epoch {epoch}, best epoch {}", monitor.best_epoch());
//!         break;
//!     }
//! }
//! ```

pub mod callback;
mod direction;
mod error;
mod monitor;
mod snapshot;

pub use direction::{Direction, Mode};
pub use error::{ConfigError, Result};
pub use monitor::{BaselinePolicy, EarlyStopping, EarlyStoppingConfig, RunState, StopSignal};
pub use snapshot::{BufferStore, ParameterStore};

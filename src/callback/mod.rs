//! Callback system for training events
//!
//! Provides extensible hooks for training loop events:
//! - `on_train_begin` / `on_train_end`
//! - `on_epoch_begin` / `on_epoch_end`
//! - `on_step_begin` / `on_step_end`
//! - `on_validation`
//!
//! # Example
//!
//! ```rust
//! use paciencia::callback::{TrainerCallback, CallbackContext, CallbackAction};
//!
//! struct PrintCallback;
//!
//! impl TrainerCallback for PrintCallback {
//!     fn on_epoch_end(&mut self, ctx: &CallbackContext) -> CallbackAction {
//!         if let Some(loss) = ctx.metric("val_loss") {
//!             println!("Epoch {} finished with val_loss {loss:.4}", ctx.epoch);
//!         }
//!         CallbackAction::Continue
//!     }
//! }
//! ```

mod early_stopping;
mod manager;
mod progress;
mod traits;

// Re-export all public types
pub use early_stopping::EarlyStoppingCallback;
pub use manager::CallbackManager;
pub use progress::ProgressCallback;
pub use traits::{CallbackAction, CallbackContext, TrainerCallback};

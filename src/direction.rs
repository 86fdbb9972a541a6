//! Direction resolution and improvement comparison
//!
//! A monitored metric either improves by going down (losses, error rates) or
//! by going up (accuracies, scores). `Mode` is the user-facing setting, with
//! `Auto` inferring the direction from the metric's name; `Direction` is the
//! resolved comparison used by the monitor.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// User-facing direction setting for a monitored metric
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Infer the direction from the metric name at first use
    #[default]
    Auto,
    /// Lower values are better
    Min,
    /// Higher values are better
    Max,
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(Mode::Auto),
            "min" => Ok(Mode::Min),
            "max" => Ok(Mode::Max),
            other => Err(ConfigError::UnknownMode(other.to_string())),
        }
    }
}

impl Mode {
    /// Resolve to a concrete direction for the named metric
    ///
    /// `Auto` treats names suggestive of a loss or error rate as
    /// lower-is-better and everything else as higher-is-better.
    pub fn resolve(self, monitor: &str) -> Direction {
        match self {
            Mode::Min => Direction::Minimize,
            Mode::Max => Direction::Maximize,
            Mode::Auto => {
                let name = monitor.to_ascii_lowercase();
                if name.contains("loss") || name.contains("error") {
                    Direction::Minimize
                } else {
                    Direction::Maximize
                }
            }
        }
    }
}

/// Resolved comparison direction
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Lower values are better
    Minimize,
    /// Higher values are better
    Maximize,
}

impl Direction {
    /// Strict comparison: is `candidate` better than `reference`?
    ///
    /// Used for the baseline gate, which applies no tolerance.
    pub fn is_better(self, candidate: f32, reference: f32) -> bool {
        match self {
            Direction::Minimize => candidate < reference,
            Direction::Maximize => candidate > reference,
        }
    }

    /// Does `candidate` improve on `reference` by more than `min_delta`?
    ///
    /// An unset reference is the bootstrap case: any finite candidate counts
    /// as an improvement.
    pub fn is_improvement(self, candidate: f32, reference: Option<f32>, min_delta: f32) -> bool {
        match reference {
            None => candidate.is_finite(),
            Some(reference) => match self {
                Direction::Minimize => candidate < reference - min_delta,
                Direction::Maximize => candidate > reference + min_delta,
            },
        }
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// The two directions are mirror images of each other
        #[test]
        fn directions_are_symmetric(
            candidate in -100.0f32..100.0,
            reference in -100.0f32..100.0,
        ) {
            prop_assert_eq!(
                Direction::Minimize.is_better(candidate, reference),
                Direction::Maximize.is_better(-candidate, -reference),
            );
        }

        /// A larger min_delta never turns a non-improvement into one
        #[test]
        fn min_delta_is_monotone(
            candidate in -100.0f32..100.0,
            reference in -100.0f32..100.0,
            delta in 0.0f32..10.0,
        ) {
            let strict = Direction::Minimize.is_improvement(candidate, Some(reference), delta);
            let loose = Direction::Minimize.is_improvement(candidate, Some(reference), 0.0);
            prop_assert!(!strict || loose);
        }
    }
}

//! Fold assignment strategies
//!
//! An assigner maps every group of a [`GroupSummary`] to one of `n_splits`
//! folds. All strategies validate the fold count the same way and produce a
//! partition of the groups.
//!
//! # Available Assigners
//!
//! - [`BalancedAssigner`] - Greedy largest-group-first placement (default)
//! - [`RoundRobinAssigner`] - Per-type rotation over folds
//!
//! # Example
//!
//! ```rust
//! use typefold_core::folds::{create_assigner, AssignStrategy};
//! use typefold_core::summarize_groups;
//!
//! let groups = [0, 0, 1, 2, 2, 3];
//! let types = ['A', 'A', 'B', 'A', 'B', 'B'];
//! let summary = summarize_groups(&groups, &types).unwrap();
//!
//! let assigner = create_assigner::<i32, char>(AssignStrategy::Balanced, Some(7));
//! let assignment = assigner.assign(&summary, 2).unwrap();
//! assert_eq!(assignment.len(), 4);
//! ```

mod balanced;
mod round_robin;

pub use balanced::{assign_folds, BalancedAssigner};
pub use round_robin::RoundRobinAssigner;

use crate::error::FoldError;
use crate::folds::assignment::FoldAssignment;
use crate::summary::GroupSummary;

/// Trait for fold assignment strategies
pub trait Assigner<G, T>: Send + Sync {
    /// Map every group of `summary` to a fold in `[0, n_splits)`
    ///
    /// Fails with a configuration error when `n_splits < 2` or
    /// `n_splits` exceeds the number of groups.
    fn assign(&self, summary: &GroupSummary<G, T>, n_splits: usize) -> Result<FoldAssignment<G>, FoldError>;

    /// Name of the strategy
    fn name(&self) -> &'static str;

    /// Description of the strategy
    fn description(&self) -> &'static str {
        "Fold assignment strategy"
    }
}

/// Assignment strategy enum for configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignStrategy {
    /// Greedy type-balanced placement
    #[default]
    Balanced,
    /// Rotate groups of each type over the folds
    RoundRobin,
}

impl std::fmt::Display for AssignStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Balanced => write!(f, "balanced"),
            Self::RoundRobin => write!(f, "round-robin"),
        }
    }
}

impl std::str::FromStr for AssignStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "balanced" | "greedy" => Ok(Self::Balanced),
            "round-robin" | "round_robin" | "roundrobin" | "rr" => Ok(Self::RoundRobin),
            _ => Err(format!("Unknown assignment strategy: {}. Valid: balanced, round-robin", s)),
        }
    }
}

/// Create an assigner from a strategy
pub fn create_assigner<G, T>(strategy: AssignStrategy, seed: Option<u64>) -> Box<dyn Assigner<G, T>>
where
    G: Ord + Clone,
    T: Ord + Clone,
{
    match strategy {
        AssignStrategy::Balanced => Box::new(BalancedAssigner { seed }),
        AssignStrategy::RoundRobin => Box::new(RoundRobinAssigner { seed }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize_groups;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("balanced".parse::<AssignStrategy>().unwrap(), AssignStrategy::Balanced);
        assert_eq!("round-robin".parse::<AssignStrategy>().unwrap(), AssignStrategy::RoundRobin);
        assert_eq!("RR".parse::<AssignStrategy>().unwrap(), AssignStrategy::RoundRobin);
        assert!("random".parse::<AssignStrategy>().is_err());
    }

    #[test]
    fn test_strategy_display() {
        assert_eq!(AssignStrategy::Balanced.to_string(), "balanced");
        assert_eq!(AssignStrategy::RoundRobin.to_string(), "round-robin");
    }

    #[test]
    fn test_create_assigner() {
        let summary = summarize_groups(&[0, 1, 2], &['A', 'B', 'A']).unwrap();

        for strategy in [AssignStrategy::Balanced, AssignStrategy::RoundRobin] {
            let assigner = create_assigner::<i32, char>(strategy, None);
            assert_eq!(assigner.name(), strategy.to_string());

            let assignment = assigner.assign(&summary, 3).unwrap();
            assert!(assignment.covers(&summary));
            assert_eq!(assignment.groups_per_fold(), vec![1, 1, 1]);

            assert!(assigner.assign(&summary, 1).unwrap_err().is_config());
            assert!(assigner.assign(&summary, 4).unwrap_err().is_config());
        }
    }
}

//! Configuration for group-type k-fold splitting
//!
//! Defines all configurable parameters of a split.

use serde::{Deserialize, Serialize};

use super::strategy::AssignStrategy;
use crate::error::FoldError;
use crate::summary::ImpurityPolicy;

/// Configuration for [`GroupTypeKFold`](super::GroupTypeKFold)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    /// Number of folds (default: 5)
    pub n_splits: usize,

    /// Fold assignment strategy
    pub strategy: AssignStrategy,

    /// How groups with mixed group types are counted
    pub policy: ImpurityPolicy,

    /// Seed for shuffling tie order (None = fully deterministic order)
    pub seed: Option<u64>,

    /// Deviation from the global type distribution above which a fold is
    /// reported as unbalanced (diagnostics only)
    pub deviation_tolerance: f64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            n_splits: 5,
            strategy: AssignStrategy::default(),
            policy: ImpurityPolicy::default(),
            seed: None,
            deviation_tolerance: 0.15,
        }
    }
}

impl SplitConfig {
    /// Config reproducing plain per-type rotation over folds
    pub fn round_robin() -> Self {
        Self {
            strategy: AssignStrategy::RoundRobin,
            policy: ImpurityPolicy::Majority,
            ..Default::default()
        }
    }

    /// Set number of folds
    pub fn with_n_splits(mut self, n_splits: usize) -> Self {
        self.n_splits = n_splits;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set assignment strategy
    pub fn with_strategy(mut self, strategy: AssignStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set impurity policy
    pub fn with_policy(mut self, policy: ImpurityPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set deviation tolerance used by reports
    pub fn with_deviation_tolerance(mut self, tolerance: f64) -> Self {
        self.deviation_tolerance = tolerance;
        self
    }

    /// Check settings that do not depend on the data
    pub fn validate(&self) -> Result<(), FoldError> {
        if self.n_splits < 2 {
            return Err(FoldError::TooFewFolds { n_splits: self.n_splits });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SplitConfig::default();
        assert_eq!(config.n_splits, 5);
        assert_eq!(config.strategy, AssignStrategy::Balanced);
        assert_eq!(config.policy, ImpurityPolicy::Counts);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = SplitConfig::round_robin().with_n_splits(3).with_seed(7);
        assert_eq!(config.strategy, AssignStrategy::RoundRobin);
        assert_eq!(config.policy, ImpurityPolicy::Majority);
        assert_eq!(config.n_splits, 3);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_validate() {
        let config = SplitConfig::default().with_n_splits(1);
        assert!(config.validate().unwrap_err().is_config());
    }

    #[test]
    fn test_serde_defaults() {
        let config: SplitConfig =
            serde_json::from_str(r#"{"n_splits": 4, "strategy": "round-robin"}"#).unwrap();
        assert_eq!(config.n_splits, 4);
        assert_eq!(config.strategy, AssignStrategy::RoundRobin);
        assert_eq!(config.deviation_tolerance, 0.15);

        let json = serde_json::to_string(&SplitConfig::default()).unwrap();
        assert!(json.contains("\"policy\":\"counts\""));
    }
}

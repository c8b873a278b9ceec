//! Round-robin assigner
//!
//! Buckets groups by their dominant type, then deals each bucket over the
//! folds in turn. Simple and predictable, but blind to group sizes.
//!
//! The fold counter carries over from one type to the next instead of
//! restarting at fold 0, so every fold receives a group whenever
//! `n_splits` does not exceed the number of groups.

use std::collections::BTreeMap;

use rand::prelude::*;

use super::Assigner;
use crate::error::{check_n_splits, FoldError};
use crate::folds::assignment::FoldAssignment;
use crate::summary::{dominant_slot, GroupSummary};

/// Per-type rotation assigner
#[derive(Debug, Clone, Default)]
pub struct RoundRobinAssigner {
    pub(crate) seed: Option<u64>,
}

impl RoundRobinAssigner {
    /// Visit groups of each type in identifier order
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Shuffle groups within each type with `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl<G, T> Assigner<G, T> for RoundRobinAssigner
where
    G: Ord + Clone,
    T: Ord + Clone,
{
    fn assign(&self, summary: &GroupSummary<G, T>, n_splits: usize) -> Result<FoldAssignment<G>, FoldError> {
        check_n_splits(n_splits, summary.n_groups())?;

        let mut buckets: Vec<Vec<&G>> = vec![Vec::new(); summary.n_types()];
        for (group, vector) in summary.iter() {
            buckets[dominant_slot(vector)].push(group);
        }

        let mut rng = self.seed.map(StdRng::seed_from_u64);
        let mut folds = BTreeMap::new();
        let mut next = 0;

        for bucket in buckets.iter_mut() {
            if let Some(rng) = rng.as_mut() {
                bucket.shuffle(rng);
            }
            for &group in bucket.iter() {
                folds.insert(group.clone(), next % n_splits);
                next += 1;
            }
        }

        tracing::debug!(groups = folds.len(), n_splits, "Dealt groups over folds round-robin");

        Ok(FoldAssignment::new(n_splits, folds))
    }

    fn name(&self) -> &'static str {
        "round-robin"
    }

    fn description(&self) -> &'static str {
        "Deal groups of each type over the folds in turn"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize_groups;

    #[test]
    fn test_round_robin_basic() {
        // Types: A -> groups 0, 2, 4; B -> groups 1, 3
        let groups = vec![0, 1, 2, 3, 4];
        let types = vec!['A', 'B', 'A', 'B', 'A'];
        let summary = summarize_groups(&groups, &types).unwrap();

        let assignment = RoundRobinAssigner::new().assign(&summary, 2).unwrap();

        assert_eq!(assignment.fold_of(&0), Some(0));
        assert_eq!(assignment.fold_of(&2), Some(1));
        assert_eq!(assignment.fold_of(&4), Some(0));
        // Counter carries over into type B
        assert_eq!(assignment.fold_of(&1), Some(1));
        assert_eq!(assignment.fold_of(&3), Some(0));
    }

    #[test]
    fn test_round_robin_no_empty_folds() {
        // One group per type: a restarting counter would pile all into fold 0
        let groups = vec![0, 1, 2];
        let types = vec!['A', 'B', 'C'];
        let summary = summarize_groups(&groups, &types).unwrap();

        let assignment = RoundRobinAssigner::new().assign(&summary, 3).unwrap();

        assert_eq!(assignment.groups_per_fold(), vec![1, 1, 1]);
    }

    #[test]
    fn test_round_robin_uses_dominant_type() {
        let groups = vec![0, 0, 0, 1, 2];
        let types = vec!['B', 'B', 'A', 'A', 'B'];
        let summary = summarize_groups(&groups, &types).unwrap();

        let assignment = RoundRobinAssigner::new().assign(&summary, 2).unwrap();

        // A: [1]; B: [0, 2]
        assert_eq!(assignment.fold_of(&1), Some(0));
        assert_eq!(assignment.fold_of(&0), Some(1));
        assert_eq!(assignment.fold_of(&2), Some(0));
    }

    #[test]
    fn test_round_robin_seeded() {
        let groups: Vec<u32> = (0..30).collect();
        let types: Vec<u32> = (0..30).map(|g| g % 3).collect();
        let summary = summarize_groups(&groups, &types).unwrap();

        let a = RoundRobinAssigner::with_seed(5).assign(&summary, 3).unwrap();
        let b = RoundRobinAssigner::with_seed(5).assign(&summary, 3).unwrap();

        assert_eq!(a, b);
        assert!(a.covers(&summary));
        assert_eq!(a.groups_per_fold(), vec![10, 10, 10]);
        for counts in a.fold_counts(&summary) {
            assert!(counts.iter().all(|&c| c == 3 || c == 4), "{:?}", counts);
        }
    }
}

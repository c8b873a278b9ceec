//! Group-type k-fold splitter
//!
//! Splits grouped data into k folds so that every group sits entirely on one
//! side of each fold and every fold holds roughly the global proportion of
//! each group type.
//!
//! Groups ~ trials. Group types ~ trial types.

use super::assignment::FoldAssignment;
use super::config::SplitConfig;
use super::strategy::{create_assigner, AssignStrategy};
use crate::error::FoldError;
use crate::metrics::type_counts;
use crate::summary::{summarize_groups_with, GroupSummary, ImpurityPolicy};

/// One train/test split
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold<T> {
    /// Fold index in `[0, n_splits)`
    pub index: usize,
    /// Training row indices, in original row order
    pub train: Vec<usize>,
    /// Test row indices, in original row order
    pub test: Vec<usize>,
    /// Number of groups held out
    pub test_groups: usize,
    /// Group types present in the data but absent from the test rows
    pub missing_types: Vec<T>,
}

impl<T> Fold<T> {
    pub fn train_size(&self) -> usize {
        self.train.len()
    }

    pub fn test_size(&self) -> usize {
        self.test.len()
    }

    /// True if the test set cannot represent every group type
    pub fn is_degenerate(&self) -> bool {
        !self.missing_types.is_empty()
    }
}

/// Everything a split produced
#[derive(Debug, Clone)]
pub struct SplitOutcome<G, T> {
    pub summary: GroupSummary<G, T>,
    pub assignment: FoldAssignment<G>,
    pub folds: Vec<Fold<T>>,
}

/// Turn a group → fold mapping into per-fold row indices
pub fn materialize<G, T>(
    assignment: &FoldAssignment<G>,
    groups: &[G],
    group_types: &[T],
) -> Result<Vec<Fold<T>>, FoldError>
where
    G: Ord + Clone,
    T: Ord + Clone,
{
    if groups.len() != group_types.len() {
        return Err(FoldError::LengthMismatch {
            groups: groups.len(),
            group_types: group_types.len(),
        });
    }

    let row_folds = groups
        .iter()
        .enumerate()
        .map(|(row, group)| assignment.fold_of(group).ok_or(FoldError::UnknownGroup { row }))
        .collect::<Result<Vec<_>, _>>()?;

    let mut axis: Vec<T> = group_types.to_vec();
    axis.sort();
    axis.dedup();

    let groups_per_fold = assignment.groups_per_fold();

    let folds = (0..assignment.n_splits())
        .map(|index| {
            let (test, train): (Vec<usize>, Vec<usize>) =
                (0..groups.len()).partition(|&row| row_folds[row] == index);
            let present = type_counts(group_types, &test, &axis);
            let missing_types = axis
                .iter()
                .zip(&present)
                .filter(|(_, &count)| count == 0)
                .map(|(t, _)| t.clone())
                .collect();

            Fold {
                index,
                train,
                test,
                test_groups: groups_per_fold[index],
                missing_types,
            }
        })
        .collect();

    Ok(folds)
}

/// K-fold cross-validator balancing group types across folds
#[derive(Debug, Clone)]
pub struct GroupTypeKFold {
    n_splits: usize,
    strategy: AssignStrategy,
    policy: ImpurityPolicy,
    seed: Option<u64>,
}

impl GroupTypeKFold {
    /// Create a splitter with `n_splits` folds (at least 2, checked on split)
    pub fn new(n_splits: usize) -> Self {
        Self {
            n_splits,
            strategy: AssignStrategy::default(),
            policy: ImpurityPolicy::default(),
            seed: None,
        }
    }

    pub fn from_config(config: &SplitConfig) -> Self {
        Self {
            n_splits: config.n_splits,
            strategy: config.strategy,
            policy: config.policy,
            seed: config.seed,
        }
    }

    /// Set random seed
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

    pub fn get_n_splits(&self) -> usize {
        self.n_splits
    }

    pub fn strategy(&self) -> AssignStrategy {
        self.strategy
    }

    /// Assign the groups of a prepared summary to folds
    pub fn assign<G, T>(&self, summary: &GroupSummary<G, T>) -> Result<FoldAssignment<G>, FoldError>
    where
        G: Ord + Clone,
        T: Ord + Clone,
    {
        create_assigner::<G, T>(self.strategy, self.seed).assign(summary, self.n_splits)
    }

    /// Split samples into `n_splits` (train, test) folds
    pub fn split<G, T>(&self, groups: &[G], group_types: &[T]) -> Result<Vec<Fold<T>>, FoldError>
    where
        G: Ord + Clone,
        T: Ord + Clone,
    {
        self.split_detailed(groups, group_types).map(|outcome| outcome.folds)
    }

    /// Split and keep the intermediate summary and assignment
    pub fn split_detailed<G, T>(&self, groups: &[G], group_types: &[T]) -> Result<SplitOutcome<G, T>, FoldError>
    where
        G: Ord + Clone,
        T: Ord + Clone,
    {
        let summary = summarize_groups_with(groups, group_types, self.policy)?;
        let assignment = self.assign(&summary)?;
        let folds = materialize(&assignment, groups, group_types)?;

        for fold in folds.iter().filter(|f| f.is_degenerate()) {
            tracing::warn!(
                fold = fold.index,
                missing = fold.missing_types.len(),
                types = summary.n_types(),
                "Fold test set lacks some group types"
            );
        }

        tracing::info!(
            samples = groups.len(),
            groups = summary.n_groups(),
            n_splits = self.n_splits,
            strategy = %self.strategy,
            "Split into {} folds",
            folds.len()
        );

        Ok(SplitOutcome { summary, assignment, folds })
    }
}

impl Default for GroupTypeKFold {
    fn default() -> Self {
        Self::from_config(&SplitConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{max_abs_deviation, proportions};
    use rand::prelude::*;
    use std::collections::HashSet;

    /// 10 groups over 500 samples with per-sample types A, B, C
    fn scenario_data(seed: u64) -> (Vec<u32>, Vec<char>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let labels = ['A', 'B', 'C'];
        let mut groups = Vec::with_capacity(500);
        let mut types = Vec::with_capacity(500);
        for _ in 0..500 {
            groups.push(rng.gen_range(0..10u32));
            types.push(labels[rng.gen_range(0..3)]);
        }
        (groups, types)
    }

    #[test]
    fn test_scenario_ten_groups_five_folds() {
        let (groups, types) = scenario_data(42);
        let kfold = GroupTypeKFold::new(5);

        let outcome = kfold.split_detailed(&groups, &types).unwrap();
        assert_eq!(outcome.folds.len(), 5);

        // Every group held out exactly once
        let mut held_out = HashSet::new();
        for fold in 0..5 {
            for g in outcome.assignment.test_groups(fold) {
                assert!(held_out.insert(*g));
            }
        }
        assert_eq!(held_out.len(), 10);
        assert_eq!(outcome.assignment.groups_per_fold().iter().sum::<usize>(), 10);

        let axis = vec!['A', 'B', 'C'];
        let all: Vec<usize> = (0..types.len()).collect();
        let global = proportions(&type_counts(&types, &all, &axis));
        for fold in &outcome.folds {
            let test = proportions(&type_counts(&types, &fold.test, &axis));
            let deviation = max_abs_deviation(&test, &global);
            assert!(deviation < 0.2, "fold {}: deviation {:.3}", fold.index, deviation);
        }
    }

    #[test]
    fn test_group_integrity() {
        let (groups, types) = scenario_data(7);
        let folds = GroupTypeKFold::new(4).with_seed(3).split(&groups, &types).unwrap();

        for fold in &folds {
            let train_groups: HashSet<u32> = fold.train.iter().map(|&i| groups[i]).collect();
            let test_groups: HashSet<u32> = fold.test.iter().map(|&i| groups[i]).collect();
            assert!(train_groups.is_disjoint(&test_groups));
            assert_eq!(test_groups.len(), fold.test_groups);
            assert_eq!(fold.train_size() + fold.test_size(), groups.len());
        }
    }

    #[test]
    fn test_indices_preserve_row_order() {
        let groups = vec!["s1", "s2", "s1", "s3", "s2", "s3"];
        let types = vec![0, 1, 0, 1, 1, 0];
        let folds = GroupTypeKFold::new(3).split(&groups, &types).unwrap();

        let mut all_test = Vec::new();
        for fold in &folds {
            assert!(fold.test.windows(2).all(|w| w[0] < w[1]));
            assert!(fold.train.windows(2).all(|w| w[0] < w[1]));
            all_test.extend(fold.test.iter().copied());
        }
        all_test.sort_unstable();
        assert_eq!(all_test, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_error_scenarios() {
        let (groups, types) = scenario_data(1);

        let err = GroupTypeKFold::new(1).split(&groups, &types).unwrap_err();
        assert!(err.is_config());

        let err = GroupTypeKFold::new(11).split(&groups, &types).unwrap_err();
        assert_eq!(err, FoldError::TooManyFolds { n_splits: 11, n_groups: 10 });

        let err = GroupTypeKFold::new(5).split(&groups, &types[..499]).unwrap_err();
        assert_eq!(err, FoldError::LengthMismatch { groups: 500, group_types: 499 });
        assert!(err.is_input());
    }

    #[test]
    fn test_degenerate_fold_reports_missing_types() {
        // Type C lives in a single group, so two of three folds lack it
        let groups = vec![0, 0, 1, 1, 2, 2];
        let types = vec!['A', 'B', 'A', 'B', 'C', 'C'];
        let folds = GroupTypeKFold::new(3).split(&groups, &types).unwrap();

        let degenerate: Vec<_> = folds.iter().filter(|f| f.is_degenerate()).collect();
        assert_eq!(degenerate.len(), 3);
        let lacking_c = folds.iter().filter(|f| f.missing_types.contains(&'C')).count();
        assert_eq!(lacking_c, 2);
    }

    #[test]
    fn test_materialize_unknown_group() {
        let summary = summarize_groups_with(&[0, 1], &['A', 'B'], ImpurityPolicy::Counts).unwrap();
        let assignment = GroupTypeKFold::new(2).assign(&summary).unwrap();

        let err = materialize(&assignment, &[0, 1, 2], &['A', 'B', 'A']).unwrap_err();
        assert_eq!(err, FoldError::UnknownGroup { row: 2 });
    }

    #[test]
    fn test_from_config_round_robin() {
        let config = SplitConfig::round_robin().with_n_splits(2);
        let kfold = GroupTypeKFold::from_config(&config);
        assert_eq!(kfold.get_n_splits(), 2);
        assert_eq!(kfold.strategy(), AssignStrategy::RoundRobin);

        let groups = vec![0, 1, 2, 3];
        let types = vec!['A', 'A', 'B', 'B'];
        let folds = kfold.split(&groups, &types).unwrap();

        assert_eq!(folds[0].test, vec![0, 2]);
        assert_eq!(folds[1].test, vec![1, 3]);
    }

    #[test]
    fn test_leave_one_group_out_split() {
        let groups = vec![5, 5, 6, 7, 7, 8];
        let types = vec!['x', 'x', 'y', 'x', 'x', 'y'];
        let folds = GroupTypeKFold::new(4).split(&groups, &types).unwrap();

        assert_eq!(folds.len(), 4);
        assert!(folds.iter().all(|f| f.test_groups == 1));
    }
}

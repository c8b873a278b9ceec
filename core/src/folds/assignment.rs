//! Group → fold mapping produced by an assigner

use std::collections::BTreeMap;

use crate::summary::GroupSummary;

/// Mapping from every group to exactly one fold index in `[0, n_splits)`
///
/// Fold `i` is a view: its test groups are the groups mapped to `i`, its
/// train groups all the others.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoldAssignment<G> {
    n_splits: usize,
    folds: BTreeMap<G, usize>,
}

impl<G: Ord + Clone> FoldAssignment<G> {
    pub(crate) fn new(n_splits: usize, folds: BTreeMap<G, usize>) -> Self {
        Self { n_splits, folds }
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// Number of assigned groups
    pub fn len(&self) -> usize {
        self.folds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folds.is_empty()
    }

    /// Fold whose test set holds `group`
    pub fn fold_of(&self, group: &G) -> Option<usize> {
        self.folds.get(group).copied()
    }

    /// (group, fold) pairs in ascending group order
    pub fn iter(&self) -> impl Iterator<Item = (&G, usize)> {
        self.folds.iter().map(|(g, &f)| (g, f))
    }

    /// Groups held out by `fold`
    pub fn test_groups(&self, fold: usize) -> Vec<&G> {
        self.folds
            .iter()
            .filter(|(_, &f)| f == fold)
            .map(|(g, _)| g)
            .collect()
    }

    /// Groups used for training by `fold`
    pub fn train_groups(&self, fold: usize) -> Vec<&G> {
        self.folds
            .iter()
            .filter(|(_, &f)| f != fold)
            .map(|(g, _)| g)
            .collect()
    }

    /// Number of test groups in each fold
    pub fn groups_per_fold(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.n_splits];
        for &fold in self.folds.values() {
            sizes[fold] += 1;
        }
        sizes
    }

    /// Summed type-count vector of each fold's test groups
    pub fn fold_counts<T: Ord + Clone>(&self, summary: &GroupSummary<G, T>) -> Vec<Vec<usize>> {
        let mut counts = vec![vec![0; summary.n_types()]; self.n_splits];
        for (group, vector) in summary.iter() {
            if let Some(fold) = self.fold_of(group) {
                for (acc, &c) in counts[fold].iter_mut().zip(vector) {
                    *acc += c;
                }
            }
        }
        counts
    }

    /// True if every group of `summary` maps to a valid fold and nothing else is mapped
    pub fn covers<T: Ord + Clone>(&self, summary: &GroupSummary<G, T>) -> bool {
        self.folds.len() == summary.n_groups()
            && summary
                .groups()
                .all(|g| matches!(self.fold_of(g), Some(f) if f < self.n_splits))
    }

    pub fn into_map(self) -> BTreeMap<G, usize> {
        self.folds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::summarize_groups;

    fn sample_assignment() -> FoldAssignment<&'static str> {
        let mut folds = BTreeMap::new();
        folds.insert("a", 0);
        folds.insert("b", 1);
        folds.insert("c", 0);
        folds.insert("d", 2);
        FoldAssignment::new(3, folds)
    }

    #[test]
    fn test_views() {
        let assignment = sample_assignment();

        assert_eq!(assignment.len(), 4);
        assert_eq!(assignment.fold_of(&"c"), Some(0));
        assert_eq!(assignment.fold_of(&"z"), None);
        assert_eq!(assignment.test_groups(0), vec![&"a", &"c"]);
        assert_eq!(assignment.train_groups(0), vec![&"b", &"d"]);
        assert_eq!(assignment.groups_per_fold(), vec![2, 1, 1]);
    }

    #[test]
    fn test_fold_counts_and_coverage() {
        let groups = vec!["a", "a", "b", "c", "d", "d"];
        let types = vec![1, 2, 1, 2, 2, 2];
        let summary = summarize_groups(&groups, &types).unwrap();
        let assignment = sample_assignment();

        assert!(assignment.covers(&summary));
        assert_eq!(
            assignment.fold_counts(&summary),
            vec![vec![1, 2], vec![1, 0], vec![0, 2]]
        );

        let partial = summarize_groups(&["a", "e"], &[1, 1]).unwrap();
        assert!(!assignment.covers(&partial));
    }
}

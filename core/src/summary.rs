//! Group Summarizer
//!
//! Reduces per-sample group and group-type labels into one type-count vector
//! per group. All vectors share the same axis: the sorted distinct group-type
//! labels observed across the whole input, so they can be summed and
//! compared directly.
//!
//! # Example
//!
//! ```rust
//! use typefold_core::summarize_groups;
//!
//! let groups = ["t1", "t1", "t2", "t3", "t3"];
//! let types = ["go", "go", "stop", "go", "stop"];
//!
//! let summary = summarize_groups(&groups, &types).unwrap();
//! assert_eq!(summary.types(), &["go", "stop"]);
//! assert_eq!(summary.counts(&"t3"), Some(&[1, 1][..]));
//! assert_eq!(summary.global_counts(), vec![3, 2]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::FoldError;
use crate::metrics::proportions;

/// How groups whose samples carry more than one group type are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImpurityPolicy {
    /// Keep the per-type counts of every sample (multi-slot vector)
    #[default]
    Counts,
    /// Attribute the whole group to its most frequent type
    Majority,
}

impl std::fmt::Display for ImpurityPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Counts => write!(f, "counts"),
            Self::Majority => write!(f, "majority"),
        }
    }
}

impl std::str::FromStr for ImpurityPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "counts" | "count" | "multi" => Ok(Self::Counts),
            "majority" | "dominant" => Ok(Self::Majority),
            _ => Err(format!("Unknown impurity policy: {}. Valid: counts, majority", s)),
        }
    }
}

/// Per-group type-count vectors over a shared type axis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSummary<G, T> {
    types: Vec<T>,
    counts: BTreeMap<G, Vec<usize>>,
}

impl<G: Ord + Clone, T: Ord + Clone> GroupSummary<G, T> {
    /// Build a summary from precomputed count vectors.
    ///
    /// `types` labels the slots of every vector in `counts`. It does not need
    /// to be sorted; slots are reordered onto the sorted axis and duplicate
    /// labels are merged.
    pub fn from_counts(types: Vec<T>, counts: BTreeMap<G, Vec<usize>>) -> Result<Self, FoldError> {
        if counts.is_empty() {
            return Err(FoldError::EmptyData);
        }

        let mut axis = types.clone();
        axis.sort();
        axis.dedup();
        let slots: Vec<usize> = types
            .iter()
            .map(|t| axis.partition_point(|a| a < t))
            .collect();

        let mut reordered = BTreeMap::new();
        for (group, vector) in counts {
            if vector.len() != types.len() {
                return Err(FoldError::AxisMismatch {
                    expected: types.len(),
                    got: vector.len(),
                });
            }
            if vector.iter().sum::<usize>() == 0 {
                return Err(FoldError::EmptyGroup);
            }
            let mut merged = vec![0; axis.len()];
            for (i, &c) in vector.iter().enumerate() {
                merged[slots[i]] += c;
            }
            reordered.insert(group, merged);
        }

        Ok(Self { types: axis, counts: reordered })
    }

    /// Sorted distinct group types (the axis of every count vector)
    pub fn types(&self) -> &[T] {
        &self.types
    }

    pub fn n_types(&self) -> usize {
        self.types.len()
    }

    pub fn n_groups(&self) -> usize {
        self.counts.len()
    }

    /// Total number of samples across all groups
    pub fn n_samples(&self) -> usize {
        self.counts.values().flatten().sum()
    }

    /// Count vector of one group
    pub fn counts(&self, group: &G) -> Option<&[usize]> {
        self.counts.get(group).map(Vec::as_slice)
    }

    /// Number of samples in one group
    pub fn group_size(&self, group: &G) -> Option<usize> {
        self.counts.get(group).map(|v| v.iter().sum())
    }

    /// Groups in ascending identifier order
    pub fn groups(&self) -> impl Iterator<Item = &G> {
        self.counts.keys()
    }

    /// (group, count vector) pairs in ascending identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&G, &[usize])> {
        self.counts.iter().map(|(g, v)| (g, v.as_slice()))
    }

    /// Sum of all group vectors
    pub fn global_counts(&self) -> Vec<usize> {
        let mut total = vec![0; self.types.len()];
        for vector in self.counts.values() {
            for (t, &c) in total.iter_mut().zip(vector) {
                *t += c;
            }
        }
        total
    }

    /// Global type distribution, the balance target of every fold
    pub fn global_proportions(&self) -> Vec<f64> {
        proportions(&self.global_counts())
    }

    /// Most frequent type of a group (ties go to the smallest label)
    pub fn dominant_type(&self, group: &G) -> Option<&T> {
        let vector = self.counts.get(group)?;
        Some(&self.types[dominant_slot(vector)])
    }

    /// Groups whose samples carry more than one type
    pub fn impure_groups(&self) -> Vec<&G> {
        self.counts
            .iter()
            .filter(|(_, v)| v.iter().filter(|&&c| c > 0).count() > 1)
            .map(|(g, _)| g)
            .collect()
    }
}

/// Index of the largest count, first one on ties
pub(crate) fn dominant_slot(vector: &[usize]) -> usize {
    let mut best = 0;
    for (i, &c) in vector.iter().enumerate() {
        if c > vector[best] {
            best = i;
        }
    }
    best
}

/// Summarize groups, keeping full per-type counts for impure groups
pub fn summarize_groups<G, T>(groups: &[G], group_types: &[T]) -> Result<GroupSummary<G, T>, FoldError>
where
    G: Ord + Clone,
    T: Ord + Clone,
{
    summarize_groups_with(groups, group_types, ImpurityPolicy::Counts)
}

/// Summarize groups with an explicit impurity policy
pub fn summarize_groups_with<G, T>(
    groups: &[G],
    group_types: &[T],
    policy: ImpurityPolicy,
) -> Result<GroupSummary<G, T>, FoldError>
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
    if groups.is_empty() {
        return Err(FoldError::EmptyData);
    }

    let types: Vec<T> = group_types
        .iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .cloned()
        .collect();
    let n_types = types.len();

    let mut counts: BTreeMap<G, Vec<usize>> = BTreeMap::new();
    for (group, group_type) in groups.iter().zip(group_types) {
        let slot = types.partition_point(|t| t < group_type);
        match counts.get_mut(group) {
            Some(vector) => vector[slot] += 1,
            None => {
                let mut vector = vec![0; n_types];
                vector[slot] = 1;
                counts.insert(group.clone(), vector);
            }
        }
    }

    if policy == ImpurityPolicy::Majority {
        for vector in counts.values_mut() {
            let total: usize = vector.iter().sum();
            let slot = dominant_slot(vector);
            vector.iter_mut().for_each(|c| *c = 0);
            vector[slot] = total;
        }
    }

    tracing::debug!(
        samples = groups.len(),
        groups = counts.len(),
        types = n_types,
        %policy,
        "Summarized groups"
    );

    Ok(GroupSummary { types, counts })
}

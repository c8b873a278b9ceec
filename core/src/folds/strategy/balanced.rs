//! Balanced greedy assigner
//!
//! Groups are placed one at a time, largest first, into the fold that keeps
//! the type mix of every fold closest to the global distribution. This is a
//! multi-way balanced partitioning heuristic: the exact minimization of the
//! worst-case imbalance is NP-hard, so the greedy pass with a strict,
//! reproducible tie-break order is used instead.
//!
//! Candidate folds are compared lexicographically on:
//!
//! 1. **type overlap**: `Σₜ (cₜ / Yₜ) · (Fₜ / Yₜ)` with `c` the group's count
//!    vector, `F` the fold's running vector and `Y` the global vector. It is
//!    the increase in the across-fold variance of each type's share that the
//!    placement causes (up to terms equal for every fold).
//! 2. **balance deviation**: the largest absolute difference between the
//!    fold's resulting type proportions and the global proportions.
//! 3. fewest groups so far.
//! 4. lowest fold index.
//!
//! Ranking on deviation alone lets one well-mixed fold absorb every group,
//! since an empty fold always looks pure next to it. While there are no more
//! unassigned groups than empty folds, only empty folds are candidates, so
//! all `n_splits` test sets end up non-empty.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use rand::prelude::*;

use super::Assigner;
use crate::error::{check_n_splits, FoldError};
use crate::folds::assignment::FoldAssignment;
use crate::metrics::{count_deviation, proportions};
use crate::summary::GroupSummary;

/// Scores closer than this are ties
const TIE_EPSILON: f64 = 1e-9;

/// Greedy largest-group-first assigner
#[derive(Debug, Clone, Default)]
pub struct BalancedAssigner {
    pub(crate) seed: Option<u64>,
}

impl BalancedAssigner {
    /// Deterministic assigner: equally sized groups are visited by identifier
    pub fn new() -> Self {
        Self { seed: None }
    }

    /// Shuffle the visiting order of equally sized groups with `seed`
    pub fn with_seed(seed: u64) -> Self {
        Self { seed: Some(seed) }
    }
}

impl<G, T> Assigner<G, T> for BalancedAssigner
where
    G: Ord + Clone,
    T: Ord + Clone,
{
    fn assign(&self, summary: &GroupSummary<G, T>, n_splits: usize) -> Result<FoldAssignment<G>, FoldError> {
        assign_folds(summary, n_splits, self.seed)
    }

    fn name(&self) -> &'static str {
        "balanced"
    }

    fn description(&self) -> &'static str {
        "Greedy largest-group-first placement balancing group types across folds"
    }
}

/// Score of placing one group into one fold
#[derive(Debug, Clone, Copy)]
struct Candidate {
    fold: usize,
    overlap: f64,
    deviation: f64,
    groups: usize,
}

impl Candidate {
    fn compare(&self, other: &Self) -> Ordering {
        cmp_scores(self.overlap, other.overlap)
            .then_with(|| cmp_scores(self.deviation, other.deviation))
            .then(self.groups.cmp(&other.groups))
            .then(self.fold.cmp(&other.fold))
    }
}

fn cmp_scores(a: f64, b: f64) -> Ordering {
    if (a - b).abs() <= TIE_EPSILON {
        Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

/// Assign every group of `summary` to one of `n_splits` folds.
///
/// One pass produces all folds, so coverage and disjointness hold by
/// construction. Without a seed the result depends only on the summary and
/// `n_splits`; with a seed, identical seeds give identical results.
pub fn assign_folds<G, T>(
    summary: &GroupSummary<G, T>,
    n_splits: usize,
    seed: Option<u64>,
) -> Result<FoldAssignment<G>, FoldError>
where
    G: Ord + Clone,
    T: Ord + Clone,
{
    check_n_splits(n_splits, summary.n_groups())?;

    let global = summary.global_counts();
    let target = proportions(&global);
    let order = visiting_order(summary, seed);

    let mut fold_counts = vec![vec![0usize; global.len()]; n_splits];
    let mut fold_groups = vec![0usize; n_splits];
    let mut empty_folds = n_splits;
    let mut folds = BTreeMap::new();

    for (position, &(group, vector)) in order.iter().enumerate() {
        let only_empty = order.len() - position <= empty_folds;

        let best = (0..n_splits)
            .filter(|&fold| !only_empty || fold_groups[fold] == 0)
            .map(|fold| Candidate {
                fold,
                overlap: type_overlap(vector, &fold_counts[fold], &global),
                deviation: placed_deviation(vector, &fold_counts[fold], &target),
                groups: fold_groups[fold],
            })
            .min_by(Candidate::compare);

        // only_empty implies at least one empty fold, so there is always a candidate
        let fold = best.map_or(0, |c| c.fold);

        for (acc, &c) in fold_counts[fold].iter_mut().zip(vector) {
            *acc += c;
        }
        if fold_groups[fold] == 0 {
            empty_folds -= 1;
        }
        fold_groups[fold] += 1;
        folds.insert(group.clone(), fold);
    }

    tracing::debug!(
        groups = folds.len(),
        n_splits,
        seeded = seed.is_some(),
        "Assigned groups to folds: {:?}",
        fold_groups
    );

    Ok(FoldAssignment::new(n_splits, folds))
}

/// Groups by descending size; equal sizes by identifier, or shuffled with a seed
fn visiting_order<G, T>(summary: &GroupSummary<G, T>, seed: Option<u64>) -> Vec<(&G, &[usize])>
where
    G: Ord + Clone,
    T: Ord + Clone,
{
    let mut order: Vec<(&G, &[usize])> = summary.iter().collect();

    if let Some(seed) = seed {
        let mut rng = StdRng::seed_from_u64(seed);
        order.shuffle(&mut rng);
    }

    // Stable sort keeps identifier (or shuffled) order within equal sizes
    order.sort_by_key(|(_, vector)| std::cmp::Reverse(vector.iter().sum::<usize>()));
    order
}

fn type_overlap(group: &[usize], fold: &[usize], global: &[usize]) -> f64 {
    group
        .iter()
        .zip(fold)
        .zip(global)
        .filter(|(_, &total)| total > 0)
        .map(|((&c, &f), &total)| {
            let total = total as f64;
            (c as f64 / total) * (f as f64 / total)
        })
        .sum()
}

fn placed_deviation(group: &[usize], fold: &[usize], target: &[f64]) -> f64 {
    let combined: Vec<usize> = fold.iter().zip(group).map(|(f, c)| f + c).collect();
    count_deviation(&combined, target)
}

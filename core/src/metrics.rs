//! Type-proportion metrics for fold diagnostics
//!
//! Helpers shared by the assigner (balance deviation of a candidate fold)
//! and the split report (observed proportions of materialized folds).

/// Count labels at `indices` along a sorted type axis.
///
/// Labels missing from `axis` are ignored.
pub fn type_counts<T: Ord>(labels: &[T], indices: &[usize], axis: &[T]) -> Vec<usize> {
    let mut counts = vec![0; axis.len()];
    for &i in indices {
        if let Ok(slot) = axis.binary_search(&labels[i]) {
            counts[slot] += 1;
        }
    }
    counts
}

/// Normalize counts to proportions (all zeros if the total is zero)
pub fn proportions(counts: &[usize]) -> Vec<f64> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; counts.len()];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

/// Largest absolute per-type difference between two distributions.
///
/// Both slices are indexed by the same type axis; an absent type is a zero
/// proportion, never an error.
pub fn max_abs_deviation(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y).abs())
        .fold(0.0, f64::max)
}

/// Balance deviation of a count vector from a target distribution
pub fn count_deviation(counts: &[usize], target: &[f64]) -> f64 {
    max_abs_deviation(&proportions(counts), target)
}

//! Split report generation
//!
//! Observed per-type proportions of materialized folds, for diagnostics only.
//! Nothing here feeds back into fold assignment.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::kfold::Fold;
use super::strategy::AssignStrategy;
use crate::metrics::{max_abs_deviation, proportions, type_counts};

/// Proportion of one group type in the global data and in one fold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeProportion {
    pub label: String,
    pub global: f64,
    pub train: f64,
    pub test: f64,
}

/// Diagnostics for a single fold
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FoldSummary {
    pub fold: usize,
    pub train_samples: usize,
    pub test_samples: usize,
    pub test_groups: usize,
    pub proportions: Vec<TypeProportion>,
    /// Largest |test - global| over all types
    pub test_deviation: f64,
    /// Largest |test - train| over all types
    pub train_test_deviation: f64,
    /// Group types absent from the test set
    pub missing_types: Vec<String>,
}

/// Report recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Recommendation type (info, warning)
    pub level: String,
    /// Recommendation message
    pub message: String,
}

impl Recommendation {
    pub fn info(message: impl Into<String>) -> Self {
        Self { level: "info".to_string(), message: message.into() }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self { level: "warning".to_string(), message: message.into() }
    }

    pub fn is_warning(&self) -> bool {
        self.level == "warning"
    }
}

/// Complete split report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitReport {
    /// ok or warning
    pub status: String,
    pub strategy: String,
    pub n_splits: usize,
    pub n_samples: usize,
    pub n_groups: usize,
    /// Sorted group-type labels
    pub types: Vec<String>,
    /// Global proportion of each type, aligned with `types`
    pub global_proportions: Vec<f64>,
    /// Largest test-vs-global deviation over all folds
    pub max_deviation: f64,
    pub deviation_tolerance: f64,
    pub folds: Vec<FoldSummary>,
    pub recommendations: Vec<Recommendation>,
}

impl SplitReport {
    /// Build a report from materialized folds and the per-sample group types
    pub fn build<T>(
        folds: &[Fold<T>],
        group_types: &[T],
        strategy: AssignStrategy,
        deviation_tolerance: f64,
    ) -> Self
    where
        T: Ord + Clone + Display,
    {
        let mut axis: Vec<T> = group_types.to_vec();
        axis.sort();
        axis.dedup();
        let labels: Vec<String> = axis.iter().map(|t| t.to_string()).collect();

        let all: Vec<usize> = (0..group_types.len()).collect();
        let global = proportions(&type_counts(group_types, &all, &axis));

        let fold_summaries: Vec<FoldSummary> = folds
            .iter()
            .map(|fold| {
                let train = proportions(&type_counts(group_types, &fold.train, &axis));
                let test = proportions(&type_counts(group_types, &fold.test, &axis));
                FoldSummary {
                    fold: fold.index,
                    train_samples: fold.train.len(),
                    test_samples: fold.test.len(),
                    test_groups: fold.test_groups,
                    proportions: labels
                        .iter()
                        .enumerate()
                        .map(|(i, label)| TypeProportion {
                            label: label.clone(),
                            global: global[i],
                            train: train[i],
                            test: test[i],
                        })
                        .collect(),
                    test_deviation: max_abs_deviation(&test, &global),
                    train_test_deviation: max_abs_deviation(&test, &train),
                    missing_types: fold.missing_types.iter().map(|t| t.to_string()).collect(),
                }
            })
            .collect();

        let max_deviation = fold_summaries
            .iter()
            .map(|f| f.test_deviation)
            .fold(0.0, f64::max);

        let mut report = Self {
            status: "ok".to_string(),
            strategy: strategy.to_string(),
            n_splits: folds.len(),
            n_samples: group_types.len(),
            n_groups: folds.iter().map(|f| f.test_groups).sum(),
            types: labels,
            global_proportions: global,
            max_deviation,
            deviation_tolerance,
            folds: fold_summaries,
            recommendations: Vec::new(),
        };
        report.generate_recommendations();
        report
    }

    fn generate_recommendations(&mut self) {
        for fold in &self.folds {
            if !fold.missing_types.is_empty() {
                self.recommendations.push(Recommendation::warning(format!(
                    "Fold {} test set lacks group types: {}",
                    fold.fold,
                    fold.missing_types.join(", ")
                )));
            }
            if fold.test_deviation > self.deviation_tolerance {
                self.recommendations.push(Recommendation::warning(format!(
                    "Fold {} deviates {:.3} from the global type distribution (tolerance {:.2})",
                    fold.fold, fold.test_deviation, self.deviation_tolerance
                )));
            }
        }

        if self.recommendations.is_empty() {
            self.recommendations.push(Recommendation::info(format!(
                "All {} folds within {:.2} of the global type distribution",
                self.n_splits, self.deviation_tolerance
            )));
        } else {
            self.status = "warning".to_string();
            if self.folds.iter().any(|f| !f.missing_types.is_empty()) {
                self.recommendations.push(Recommendation::info(
                    "Some group types occur in too few groups for every fold to hold them; consider fewer folds",
                ));
            }
        }

        let sizes = self.folds.iter().map(|f| f.test_samples);
        if let (Some(min), Some(max)) = (sizes.clone().min(), sizes.max()) {
            if min > 0 && max > 2 * min {
                self.recommendations.push(Recommendation::info(format!(
                    "Test set sizes range from {} to {} samples",
                    min, max
                )));
            }
        }
    }

    /// True if no fold was flagged
    pub fn is_balanced(&self) -> bool {
        self.status == "ok"
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "{} folds over {} groups ({} samples, {} types), max deviation {:.3} [{}]",
            self.n_splits,
            self.n_groups,
            self.n_samples,
            self.types.len(),
            self.max_deviation,
            self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::folds::GroupTypeKFold;

    #[test]
    fn test_report_balanced() {
        // Four identical groups: every fold mirrors the global mix
        let groups = vec![0, 0, 1, 1, 2, 2, 3, 3];
        let types = vec!['A', 'B', 'A', 'B', 'A', 'B', 'A', 'B'];
        let folds = GroupTypeKFold::new(2).split(&groups, &types).unwrap();

        let report = SplitReport::build(&folds, &types, AssignStrategy::Balanced, 0.15);

        assert!(report.is_balanced());
        assert_eq!(report.n_groups, 4);
        assert_eq!(report.n_samples, 8);
        assert_eq!(report.types, vec!["A", "B"]);
        assert_eq!(report.max_deviation, 0.0);
        assert_eq!(report.folds[0].proportions[0].test, 0.5);
        assert_eq!(report.recommendations.len(), 1);
        assert!(!report.recommendations[0].is_warning());
    }

    #[test]
    fn test_report_flags_missing_types() {
        let groups = vec![0, 0, 1, 1, 2, 2];
        let types = vec!['A', 'B', 'A', 'B', 'C', 'C'];
        let folds = GroupTypeKFold::new(3).split(&groups, &types).unwrap();

        let report = SplitReport::build(&folds, &types, AssignStrategy::Balanced, 0.15);

        assert_eq!(report.status, "warning");
        assert!(!report.is_balanced());
        assert!(report
            .recommendations
            .iter()
            .any(|r| r.is_warning() && r.message.contains("lacks group types: C")));
    }

    #[test]
    fn test_report_serializes() {
        let groups = vec![0, 1, 2, 3];
        let types = vec![1, 2, 1, 2];
        let folds = GroupTypeKFold::new(2).split(&groups, &types).unwrap();

        let report = SplitReport::build(&folds, &types, AssignStrategy::RoundRobin, 0.15);
        let json = serde_json::to_string(&report).unwrap();

        assert!(json.contains("\"strategy\":\"round-robin\""));
        assert!(report.summary().starts_with("2 folds over 4 groups"));
    }
}

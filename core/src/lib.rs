//! typefold core - Group-Type Balanced Cross-Validation
//!
//! This crate partitions grouped, typed samples into k train/test folds:
//!
//! - **Group integrity**: all samples of a group land on the same side of
//!   every fold
//! - **Type balance**: each fold's test set approximates the global
//!   distribution of group types
//!
//! # Pipeline
//!
//! 1. [`summarize_groups`] reduces per-sample labels to one type-count
//!    vector per group
//! 2. [`assign_folds`] maps every group to one fold (greedy, largest group
//!    first)
//! 3. [`folds::materialize`] turns the mapping into per-fold row indices
//!
//! [`GroupTypeKFold`] runs all three steps.
//!
//! # Example
//!
//! ```rust
//! use typefold_core::{assign_folds, summarize_groups};
//!
//! let groups = [1, 1, 2, 2, 3, 3, 4, 4];
//! let types = ['A', 'A', 'B', 'B', 'A', 'A', 'B', 'B'];
//!
//! let summary = summarize_groups(&groups, &types).unwrap();
//! let assignment = assign_folds(&summary, 2, None).unwrap();
//!
//! // One group of each type per fold
//! assert_eq!(assignment.groups_per_fold(), vec![2, 2]);
//! assert_ne!(assignment.fold_of(&1), assignment.fold_of(&3));
//! ```

pub mod error;
pub mod folds;
pub mod metrics;
pub mod summary;

// Re-exports for convenience
pub use error::{ErrorKind, FoldError};
pub use folds::{assign_folds, materialize, AssignStrategy, Fold, FoldAssignment, GroupTypeKFold, SplitConfig, SplitReport};
pub use summary::{summarize_groups, summarize_groups_with, GroupSummary, ImpurityPolicy};

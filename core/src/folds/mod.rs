//! Group-Type K-Fold Module
//!
//! Provides grouped cross-validation with:
//! - Group integrity (a group is never split between train and test)
//! - Type balance (each fold mirrors the global group-type distribution)
//! - Pluggable assignment strategies (balanced greedy, round-robin)
//! - Per-fold diagnostics with degenerate-balance warnings
//!
//! # Example
//!
//! ```rust
//! use typefold_core::folds::{GroupTypeKFold, SplitReport, AssignStrategy};
//!
//! let groups = vec![0, 0, 1, 1, 2, 2, 3, 3];
//! let types = vec!["go", "stop", "go", "stop", "go", "go", "stop", "stop"];
//!
//! let kfold = GroupTypeKFold::new(2).with_seed(42);
//! let folds = kfold.split(&groups, &types)?;
//!
//! for fold in &folds {
//!     println!("fold {}: {} train / {} test rows", fold.index, fold.train.len(), fold.test.len());
//! }
//!
//! let report = SplitReport::build(&folds, &types, AssignStrategy::Balanced, 0.15);
//! println!("{}", report.summary());
//! # Ok::<(), typefold_core::FoldError>(())
//! ```

mod assignment;
mod config;
mod kfold;
mod report;
pub mod strategy;

// Re-exports
pub use assignment::FoldAssignment;
pub use config::SplitConfig;
pub use kfold::{materialize, Fold, GroupTypeKFold, SplitOutcome};
pub use report::{FoldSummary, Recommendation, SplitReport, TypeProportion};

// Strategy re-exports
pub use strategy::{assign_folds, create_assigner, AssignStrategy, Assigner, BalancedAssigner, RoundRobinAssigner};

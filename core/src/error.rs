//! Error types for fold generation
//!
//! Every failure is either a configuration problem (the fold count does not
//! fit the data) or an input problem (the label sequences are malformed).
//! Neither is retried: the computation is deterministic.

use thiserror::Error;

/// Broad class of a [`FoldError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid fold count for the given data
    Config,
    /// Malformed or inconsistent input sequences
    Input,
}

/// Errors that can occur while summarizing groups or assigning folds
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FoldError {
    #[error("Invalid number of folds: {n_splits} (must be at least 2)")]
    TooFewFolds { n_splits: usize },

    #[error("Cannot build {n_splits} folds from {n_groups} groups")]
    TooManyFolds { n_splits: usize, n_groups: usize },

    #[error("Length mismatch: {groups} group labels but {group_types} group-type labels")]
    LengthMismatch { groups: usize, group_types: usize },

    #[error("Empty data")]
    EmptyData,

    #[error("Count vector has {got} entries, expected {expected} (one per group type)")]
    AxisMismatch { expected: usize, got: usize },

    #[error("Group has no samples")]
    EmptyGroup,

    #[error("Row {row} belongs to a group missing from the fold assignment")]
    UnknownGroup { row: usize },
}

impl FoldError {
    /// Classify the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TooFewFolds { .. } | Self::TooManyFolds { .. } => ErrorKind::Config,
            Self::LengthMismatch { .. }
            | Self::EmptyData
            | Self::AxisMismatch { .. }
            | Self::EmptyGroup
            | Self::UnknownGroup { .. } => ErrorKind::Input,
        }
    }

    pub fn is_config(&self) -> bool {
        self.kind() == ErrorKind::Config
    }

    pub fn is_input(&self) -> bool {
        self.kind() == ErrorKind::Input
    }
}

/// Check a fold count against the number of groups available
pub(crate) fn check_n_splits(n_splits: usize, n_groups: usize) -> Result<(), FoldError> {
    if n_splits < 2 {
        return Err(FoldError::TooFewFolds { n_splits });
    }
    if n_splits > n_groups {
        return Err(FoldError::TooManyFolds { n_splits, n_groups });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert!(FoldError::TooFewFolds { n_splits: 1 }.is_config());
        assert!(FoldError::TooManyFolds { n_splits: 11, n_groups: 10 }.is_config());
        assert!(FoldError::LengthMismatch { groups: 500, group_types: 499 }.is_input());
        assert!(FoldError::EmptyData.is_input());
        assert_eq!(FoldError::UnknownGroup { row: 3 }.kind(), ErrorKind::Input);
    }

    #[test]
    fn test_check_n_splits() {
        assert_eq!(check_n_splits(1, 10), Err(FoldError::TooFewFolds { n_splits: 1 }));
        assert_eq!(
            check_n_splits(11, 10),
            Err(FoldError::TooManyFolds { n_splits: 11, n_groups: 10 })
        );
        assert!(check_n_splits(2, 10).is_ok());
        assert!(check_n_splits(10, 10).is_ok());
    }

    #[test]
    fn test_error_display() {
        let err = FoldError::LengthMismatch { groups: 500, group_types: 499 };
        assert_eq!(
            err.to_string(),
            "Length mismatch: 500 group labels but 499 group-type labels"
        );
    }
}

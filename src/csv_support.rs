//! CSV support for typefold CLI
//!
//! Reads one group id and one group type per row.
//!
//! ## Supported Layouts
//!
//! **With header (columns picked by name):**
//! ```csv
//! sample,trial,trial_type,value
//! 0,t01,go,0.12
//! 1,t01,go,0.40
//! 2,t02,stop,0.33
//! ```
//!
//! **Without header (columns picked by index, default 0 and 1):**
//! ```csv
//! t01,go
//! t01,go
//! t02,stop
//! ```

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Header names tried for the group column when none is given
const GROUP_COLUMNS: &[&str] = &["group", "group_id", "groups", "trial", "session", "subject"];

/// Header names tried for the group-type column when none is given
const TYPE_COLUMNS: &[&str] = &["group_type", "type", "trial_type", "label", "class"];

/// Column selector: header name or zero-based index
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnRef {
    Name(String),
    Index(usize),
}

impl FromStr for ColumnRef {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<usize>() {
            Ok(i) => Self::Index(i),
            Err(_) => Self::Name(s.trim().to_string()),
        })
    }
}

/// Group and group-type labels read from a CSV file
#[derive(Debug, Clone)]
pub struct LabeledRows {
    pub groups: Vec<String>,
    pub group_types: Vec<String>,
    /// Display name of the group column
    pub group_column: String,
    /// Display name of the group-type column
    pub type_column: String,
}

impl LabeledRows {
    pub fn len(&self) -> usize {
        self.groups.len()
    }
}

/// Read labeled rows from a file, or stdin when `path` is `-`
pub fn read_labeled_csv(
    path: &Path,
    has_header: bool,
    group_column: Option<&ColumnRef>,
    type_column: Option<&ColumnRef>,
) -> Result<LabeledRows> {
    if path.as_os_str() == "-" {
        return parse_labeled_csv(io::stdin().lock(), has_header, group_column, type_column);
    }

    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    parse_labeled_csv(file, has_header, group_column, type_column)
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Parse labeled rows from any reader
pub fn parse_labeled_csv<R: Read>(
    reader: R,
    has_header: bool,
    group_column: Option<&ColumnRef>,
    type_column: Option<&ColumnRef>,
) -> Result<LabeledRows> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(has_header)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = if has_header {
        Some(rdr.headers().context("Failed to read CSV header")?.clone())
    } else {
        None
    };

    let group_idx = resolve_column(group_column, headers.as_ref(), GROUP_COLUMNS, 0)?;
    let type_idx = resolve_column(type_column, headers.as_ref(), TYPE_COLUMNS, 1)?;
    if group_idx == type_idx {
        anyhow::bail!("Group and group-type columns must differ (both are column {})", group_idx);
    }

    let column_name = |idx: usize| {
        headers
            .as_ref()
            .and_then(|h| h.get(idx))
            .map(str::to_string)
            .unwrap_or_else(|| format!("column {}", idx))
    };

    let mut groups = Vec::new();
    let mut group_types = Vec::new();

    for (i, record) in rdr.records().enumerate() {
        let line = i + 1 + usize::from(has_header);
        let record = record.with_context(|| format!("Invalid CSV record at line {}", line))?;
        if record.iter().all(|f| f.is_empty()) {
            continue;
        }

        let group = record
            .get(group_idx)
            .with_context(|| format!("Line {} has no column {}", line, group_idx))?;
        let group_type = record
            .get(type_idx)
            .with_context(|| format!("Line {} has no column {}", line, type_idx))?;

        groups.push(group.to_string());
        group_types.push(group_type.to_string());
    }

    if groups.is_empty() {
        anyhow::bail!("No data rows found in CSV");
    }

    Ok(LabeledRows {
        groups,
        group_types,
        group_column: column_name(group_idx),
        type_column: column_name(type_idx),
    })
}

/// Resolve a column selector against the header row
fn resolve_column(
    selector: Option<&ColumnRef>,
    headers: Option<&csv::StringRecord>,
    defaults: &[&str],
    fallback: usize,
) -> Result<usize> {
    let find = |name: &str| headers.and_then(|h| h.iter().position(|c| c.eq_ignore_ascii_case(name)));

    match selector {
        Some(ColumnRef::Index(i)) => Ok(*i),
        Some(ColumnRef::Name(name)) => {
            let headers = headers
                .with_context(|| format!("Column '{}' selected by name but the CSV has no header", name))?;
            find(name).with_context(|| {
                format!(
                    "Column '{}' not found. Available: {}",
                    name,
                    headers.iter().collect::<Vec<_>>().join(", ")
                )
            })
        }
        None => Ok(defaults.iter().find_map(|name| find(name)).unwrap_or(fallback)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WITH_HEADER: &str = "sample,trial,trial_type,value\n\
                               0,t01,go,0.12\n\
                               1,t01,go,0.40\n\
                               2,t02,stop,0.33\n";

    #[test]
    fn test_column_ref_from_str() {
        assert_eq!("3".parse::<ColumnRef>().unwrap(), ColumnRef::Index(3));
        assert_eq!("trial".parse::<ColumnRef>().unwrap(), ColumnRef::Name("trial".into()));
    }

    #[test]
    fn test_default_columns_by_header() {
        let rows = parse_labeled_csv(WITH_HEADER.as_bytes(), true, None, None).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows.groups, vec!["t01", "t01", "t02"]);
        assert_eq!(rows.group_types, vec!["go", "go", "stop"]);
        assert_eq!(rows.group_column, "trial");
        assert_eq!(rows.type_column, "trial_type");
    }

    #[test]
    fn test_columns_by_name_and_index() {
        let group = ColumnRef::Name("TRIAL".into());
        let types = ColumnRef::Index(0);
        let rows = parse_labeled_csv(WITH_HEADER.as_bytes(), true, Some(&group), Some(&types)).unwrap();

        assert_eq!(rows.groups, vec!["t01", "t01", "t02"]);
        assert_eq!(rows.group_types, vec!["0", "1", "2"]);
    }

    #[test]
    fn test_no_header_fallback() {
        let content = "t01, go\nt01, go\n\nt02, stop\n";
        let rows = parse_labeled_csv(content.as_bytes(), false, None, None).unwrap();

        assert_eq!(rows.groups, vec!["t01", "t01", "t02"]);
        assert_eq!(rows.group_types, vec!["go", "go", "stop"]);
        assert_eq!(rows.group_column, "column 0");
    }

    #[test]
    fn test_unknown_column() {
        let group = ColumnRef::Name("subject_id".into());
        let err = parse_labeled_csv(WITH_HEADER.as_bytes(), true, Some(&group), None).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_same_column_rejected() {
        let col = ColumnRef::Index(1);
        assert!(parse_labeled_csv(WITH_HEADER.as_bytes(), true, Some(&col), Some(&col)).is_err());
    }

    #[test]
    fn test_empty_csv() {
        assert!(parse_labeled_csv("trial,trial_type\n".as_bytes(), true, None, None).is_err());
    }
}

//! Ordered aggregation of parsed build job records.

use serde::{Deserialize, Serialize};

use crate::record::BuildJobRecord;

/// Records in discovery order. Duplicates are kept.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct ResultSet(Vec<BuildJobRecord>);

/// Counts over a [`ResultSet`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ResultSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
    /// Sum of record times, in seconds.
    pub total_time: f64,
}

impl ResultSummary {
    /// Whether every record either passed or was skipped.
    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

impl ResultSet {
    pub fn records(&self) -> &[BuildJobRecord] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BuildJobRecord> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn summary(&self) -> ResultSummary {
        self.0.iter().fold(
            ResultSummary {
                total: self.0.len(),
                ..ResultSummary::default()
            },
            |mut acc, record| {
                if record.result.is_success() {
                    acc.passed += 1;
                } else if record.result.is_failure() {
                    acc.failed += 1;
                } else if record.result.is_skipped() {
                    acc.skipped += 1;
                } else if record.result.is_error() {
                    acc.errors += 1;
                }
                acc.total_time += record.time;
                acc
            },
        )
    }

    pub fn into_records(self) -> Vec<BuildJobRecord> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a BuildJobRecord;
    type IntoIter = std::slice::Iter<'a, BuildJobRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Collect records into a [`ResultSet`] without reordering or filtering.
pub fn aggregate(records: impl IntoIterator<Item = BuildJobRecord>) -> ResultSet {
    ResultSet(records.into_iter().collect())
}

//! Mismatch queries between the NCBI, ENA and MIxS vocabularies.
//!
//! Each query is an anti-join: rows of the left vocabulary whose key does not
//! occur among the keys of the right one. Keys are compared as exact strings.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::report::Report;

use super::term::VocabularyIndex;

/// A two-column result row.
pub type MismatchRow = (String, String);

/// Rows of `left` whose key is absent from every key produced by `right`.
///
/// The output is deduplicated and sorted.
pub fn anti_join<T, L, R, K>(
    left: L,
    right: R,
    left_key: impl Fn(&T) -> &str,
    right_keys: impl Fn(R::Item) -> K,
) -> BTreeSet<T>
where
    T: Ord,
    L: IntoIterator<Item = T>,
    R: IntoIterator,
    K: IntoIterator,
    K::Item: Into<String>,
{
    let keys: HashSet<String> = right.into_iter().flat_map(right_keys).map(Into::into).collect();
    left.into_iter().filter(|row| !keys.contains(left_key(row))).collect()
}

/// Result of one mismatch query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MismatchReport {
    pub title: String,
    pub columns: [String; 2],
    pub rows: BTreeSet<MismatchRow>,
}

impl MismatchReport {
    fn new(title: &str, columns: [&str; 2], rows: BTreeSet<MismatchRow>) -> Self {
        info!(query = title, mismatches = rows.len(), "term mismatch query");
        Self {
            title: title.to_string(),
            columns: columns.map(str::to_string),
            rows,
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether any row has `key` in its first column.
    pub fn reports(&self, key: &str) -> bool {
        self.rows.iter().any(|(k, _)| k == key)
    }

    pub fn to_report(&self) -> Report {
        let mut report = Report::new(self.title.clone(), self.columns.iter().cloned());
        for (a, b) in &self.rows {
            report.push_row([a.clone(), b.clone()]);
        }
        report
    }
}

/// NCBI attributes whose harmonized name is no MIxS label.
pub fn ncbi_vs_mixs(index: &VocabularyIndex) -> MismatchReport {
    let rows = anti_join(
        index.ncbi_pairs(),
        index.mixs_labels(),
        |(harmonized, _): &MismatchRow| harmonized.as_str(),
        std::iter::once,
    );
    MismatchReport::new("NCBI attributes missing from MIxS", ["ncbi_harmonized_name", "ncbi_name"], rows)
}

/// ENA fields whose label is no MIxS datatype title.
pub fn ena_vs_mixs(index: &VocabularyIndex) -> MismatchReport {
    let rows = anti_join(
        index.ena_pairs(),
        index.mixs_datatype_titles(),
        |(_, label): &MismatchRow| label.as_str(),
        std::iter::once,
    );
    MismatchReport::new("ENA fields missing from MIxS", ["ena_name", "ena_label"], rows)
}

/// MIxS datatype terms whose label no ENA field or NCBI attribute refers to.
pub fn mixs_vs_insdc(index: &VocabularyIndex) -> MismatchReport {
    let rows = anti_join(
        index.mixs_datatype_pairs(),
        index.insdc_values(),
        |(label, _): &MismatchRow| label.as_str(),
        std::iter::once,
    );
    MismatchReport::new("MIxS terms missing from INSDC", ["mixs_label", "title"], rows)
}

/// All three queries, in the order NCBI, ENA, MIxS.
pub fn match_all(index: &VocabularyIndex) -> [MismatchReport; 3] {
    [ncbi_vs_mixs(index), ena_vs_mixs(index), mixs_vs_insdc(index)]
}

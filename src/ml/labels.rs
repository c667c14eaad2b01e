//! Category label parsing and binarization.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::{LecternError, Result};

/// Split a raw category string on commas and whitespace.
///
/// Empty fragments are dropped and duplicates keep their first position,
/// so `"lecture, ,lecture algorithms"` yields `["lecture", "algorithms"]`.
pub fn parse_categories(raw: &str) -> Vec<String> {
    let mut seen = BTreeSet::new();
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|label| !label.is_empty())
        .filter(|label| seen.insert(*label))
        .map(str::to_string)
        .collect()
}

/// Binary membership matrix: one row per document, one column per class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelMatrix {
    n_classes: usize,
    rows: Vec<Vec<bool>>,
}

impl LabelMatrix {
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn rows(&self) -> &[Vec<bool>] {
        &self.rows
    }

    /// Membership of every document in one class.
    pub fn column(&self, class: usize) -> Vec<bool> {
        self.rows.iter().map(|row| row[class]).collect()
    }
}

/// Maps category names to column indices.
///
/// Classes are kept in sorted order, which fixes the column order of every
/// label matrix and score vector produced from a fitted codec.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCodec {
    classes: Vec<String>,
}

impl LabelCodec {
    /// Learn the class set from per-document label lists.
    pub fn fit<S: AsRef<str>>(label_sets: &[Vec<S>]) -> Result<Self> {
        let classes: BTreeSet<&str> = label_sets
            .iter()
            .flat_map(|labels| labels.iter().map(AsRef::as_ref))
            .collect();

        if classes.is_empty() {
            return Err(LecternError::invalid_training_data(
                "training data has no category labels",
            ));
        }

        Ok(LabelCodec {
            classes: classes.into_iter().map(str::to_string).collect(),
        })
    }

    /// Fit and encode in one step.
    pub fn fit_encode<S: AsRef<str>>(label_sets: &[Vec<S>]) -> Result<(Self, LabelMatrix)> {
        let codec = Self::fit(label_sets)?;
        let matrix = codec.encode(label_sets);
        Ok((codec, matrix))
    }

    /// Encode label lists as a membership matrix. Labels outside the fitted
    /// class set are ignored with a warning.
    pub fn encode<S: AsRef<str>>(&self, label_sets: &[Vec<S>]) -> LabelMatrix {
        let rows = label_sets
            .iter()
            .map(|labels| {
                let mut row = vec![false; self.classes.len()];
                for label in labels {
                    match self.index_of(label.as_ref()) {
                        Some(idx) => row[idx] = true,
                        None => log::warn!("Ignoring unknown category '{}'", label.as_ref()),
                    }
                }
                row
            })
            .collect();

        LabelMatrix {
            n_classes: self.classes.len(),
            rows,
        }
    }

    /// Category names of the set bits in a membership row.
    pub fn decode(&self, row: &[bool]) -> Vec<&str> {
        self.classes
            .iter()
            .zip(row)
            .filter(|(_, member)| **member)
            .map(|(class, _)| class.as_str())
            .collect()
    }

    pub fn index_of(&self, class: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|probe| probe.as_str().cmp(class))
            .ok()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

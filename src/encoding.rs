use std::collections::BTreeSet;
use thiserror::Error;

/// A label that was never seen while the encoder was fitted.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {column} category {label:?}")]
pub struct UnknownCategory {
    pub column: &'static str,
    pub label: String,
}

/// Maps text categories to integer codes.
///
/// Codes are positions in the sorted set of labels observed at fit time, so
/// the same column always yields the same mapping regardless of row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEncoder {
    column: &'static str,
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fits the encoder on every label observed in a column.
    pub fn fit<'a, I>(column: &'static str, labels: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes: BTreeSet<&str> = labels.into_iter().collect();
        LabelEncoder {
            column,
            classes: classes.into_iter().map(str::to_owned).collect(),
        }
    }

    /// Returns the integer code of a label seen at fit time.
    pub fn transform(&self, label: &str) -> Result<usize, UnknownCategory> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(label))
            .map_err(|_| UnknownCategory {
                column: self.column,
                label: label.to_owned(),
            })
    }

    /// Known labels, sorted; a label's code is its index here.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }
}

mod hierarchy_tests;

use std::collections::HashSet;

use crate::{IndexHierarchy, Label};

pub(crate) fn label_set(index: &IndexHierarchy) -> HashSet<Vec<Label>> {
    index.iter_labels().collect()
}

pub(crate) fn rows<const N: usize>(rows: &[[&str; N]]) -> Vec<Vec<Label>> {
    rows.iter()
        .map(|row| row.iter().map(|&s| Label::from(s)).collect())
        .collect()
}

use ahash::AHashSet;
use strata_common::{Result, error::Error};

use crate::{
    constructor::IndexConstructor,
    hierarchy::{IndexHierarchy, ShallowCopyKey},
};

/// Inputs of a set operation after sanitization.
pub(crate) struct ValidatedIndices<'a> {
    /// Non-empty inputs, one representative per structural alias, in input order.
    pub indices: Vec<&'a IndexHierarchy>,
    pub depth: usize,
    /// At least one input had zero rows.
    pub any_dropped: bool,
    /// At least one input was a structural alias of an earlier one.
    pub any_shallow_copies: bool,
    /// The name shared by every input, if they all share one.
    pub name: Option<String>,
    /// Per-depth constructors shared by every input, or defaults.
    pub index_constructors: Vec<IndexConstructor>,
}

impl ValidatedIndices<'_> {
    /// A fresh zero-row hierarchy with the unified depth, constructors and name.
    pub fn empty_result(&self) -> Result<IndexHierarchy> {
        IndexHierarchy::empty(&self.index_constructors, self.name.clone())
    }
}

/// Common sanitization for hierarchy set operations:
/// 1. drop empty inputs and structural aliases of earlier inputs;
/// 2. require every non-empty input to have the same depth;
/// 3. keep the name only if every input carries it;
/// 4. keep the per-depth constructors only if every input agrees on them.
pub(crate) fn validate_and_process<'a>(
    indices: &[&'a IndexHierarchy],
) -> Result<ValidatedIndices<'a>> {
    let Some(first) = indices.first() else {
        return Err(Error::invalid_arg(
            "indices",
            "at least one hierarchy is required",
        ));
    };

    let mut any_dropped = false;
    let mut any_shallow_copies = false;
    let mut name = first.name().map(str::to_owned);
    let mut index_constructors = first.index_constructors();

    let mut shallow_copy_keys = AHashSet::<ShallowCopyKey>::with_capacity(indices.len());
    let mut unique_non_empty = Vec::with_capacity(indices.len());
    let mut depth = None;

    for &index in indices {
        if name.is_some() && index.name() != name.as_deref() {
            name = None;
        }

        if !index_constructors.is_empty() && index.index_constructors() != index_constructors {
            index_constructors.clear();
        }

        if index.is_empty() {
            any_dropped = true;
            continue;
        }

        match depth {
            None => depth = Some(index.depth()),
            Some(expected) if expected != index.depth() => {
                return Err(Error::depth_mismatch(expected, index.depth()));
            }
            _ => (),
        }

        if shallow_copy_keys.insert(index.shallow_copy_key()) {
            unique_non_empty.push(index);
        } else {
            any_shallow_copies = true;
        }
    }

    let depth = depth.unwrap_or_else(|| first.depth());
    if index_constructors.is_empty() {
        index_constructors = IndexConstructor::defaults(depth);
    }

    Ok(ValidatedIndices {
        indices: unique_non_empty,
        depth,
        any_dropped,
        any_shallow_copies,
        name,
        index_constructors,
    })
}

use strata_common::{Result, error::Error};

use crate::{encoding::EncodedRows, hierarchy::IndexHierarchy};

use super::{SetOpConfig, union_basis::UnionBasis, validate::validate_and_process};

/// Union of `indices` with an explicit configuration.
///
/// Empty inputs contribute nothing. If nothing is added to the first input,
/// it is returned as is. Every basis label comes from a non-empty input, so
/// the result needs no compaction.
pub fn union_with_config(
    indices: &[&IndexHierarchy],
    config: &SetOpConfig,
) -> Result<IndexHierarchy> {
    config.verify()?;
    let Some(&lhs) = indices.first() else {
        return Err(Error::invalid_arg(
            "indices",
            "at least one hierarchy is required",
        ));
    };
    log::debug!("union of {} hierarchies", indices.len());

    let args = validate_and_process(indices)?;
    if args.indices.is_empty() {
        return Ok(lhs.clone());
    }

    let basis = UnionBasis::build(&args.indices, &args.index_constructors, args.depth, config)?;

    let parts = args
        .indices
        .iter()
        .map(|index| basis.encode(index))
        .collect::<Result<Vec<_>>>()?;
    let encodings = EncodedRows::concat(parts)?.into_unique();

    if encodings.len() == lhs.len() {
        // Union never drops rows: same size means nothing was added.
        return Ok(lhs.clone());
    }

    let columns = basis.decode(&encodings)?;
    Ok(IndexHierarchy::from_parts_unchecked(
        basis.into_levels(),
        columns,
        args.name,
    ))
}

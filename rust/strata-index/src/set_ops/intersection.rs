use strata_common::{Result, error::Error};

use crate::hierarchy::IndexHierarchy;

use super::{
    SetOpConfig, bloat::remove_union_bloat, union_basis::UnionBasis,
    validate::validate_and_process,
};

/// Intersection of `indices` with an explicit configuration.
///
/// - An empty first input is returned as is.
/// - Any other empty input yields a fresh empty result.
/// - If nothing is removed, the first input is returned as is.
///
/// The result is sorted only when the union basis equals the first input's
/// levels.
pub fn intersection_with_config(
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
    log::debug!("intersection of {} hierarchies", indices.len());

    if lhs.is_empty() {
        return Ok(lhs.clone());
    }

    let args = validate_and_process(indices)?;
    if args.any_dropped {
        log::debug!("intersection: empty input, result is empty");
        return args.empty_result();
    }

    let basis = UnionBasis::build(&args.indices, &args.index_constructors, args.depth, config)?;

    // Intersecting the smallest inputs first keeps the running set small and
    // reaches an empty result as early as possible. Sort descending and pop
    // from the back.
    let mut remaining = args.indices.clone();
    remaining.sort_by(|a, b| b.len().cmp(&a.len()));

    let Some(smallest) = remaining.pop() else {
        return Ok(lhs.clone());
    };
    let mut encodings = basis.encode(smallest)?;

    while let Some(next) = remaining.pop() {
        encodings = encodings.intersect(&basis.encode(next)?)?;
        if encodings.is_empty() {
            log::debug!("intersection: running set became empty");
            return args.empty_result();
        }
    }

    if encodings.len() == lhs.len() {
        // Intersection never adds rows: same size means nothing was removed.
        return Ok(lhs.clone());
    }

    let columns = basis.decode(&encodings)?;
    let (levels, columns) = remove_union_bloat(basis.into_levels(), columns)?;
    Ok(IndexHierarchy::from_parts_unchecked(levels, columns, args.name))
}

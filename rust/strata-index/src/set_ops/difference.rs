use strata_common::{Result, error::Error};

use crate::hierarchy::IndexHierarchy;

use super::{
    SetOpConfig, bloat::remove_union_bloat, union_basis::UnionBasis,
    validate::validate_and_process,
};

/// Difference of the first input and every other input, with an explicit
/// configuration.
///
/// - An empty first input is returned as is.
/// - If any input is a structural alias of another one, the result is empty
///   (a hierarchy minus itself is empty).
/// - If every other input is empty, or nothing is removed, the first input is
///   returned as is.
pub fn difference_with_config(
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
    log::debug!("difference of {} hierarchies", indices.len());

    if lhs.is_empty() {
        return Ok(lhs.clone());
    }

    let args = validate_and_process(indices)?;
    if args.any_shallow_copies {
        log::debug!("difference: aliased inputs, result is empty");
        return args.empty_result();
    }
    if args.indices.len() == 1 {
        return Ok(lhs.clone());
    }

    let basis = UnionBasis::build(&args.indices, &args.index_constructors, args.depth, config)?;

    // Subtracting the largest inputs first removes the most rows early.
    // Sort ascending and pop from the back.
    let mut subtrahends = args.indices[1..].to_vec();
    subtrahends.sort_by_key(|index| index.len());

    let mut encodings = basis.encode(lhs)?;
    while let Some(next) = subtrahends.pop() {
        encodings = encodings.difference(&basis.encode(next)?)?;
        if encodings.is_empty() {
            log::debug!("difference: running set became empty");
            return args.empty_result();
        }
    }

    if encodings.len() == lhs.len() {
        // Difference never adds rows: same size means nothing was removed.
        return Ok(lhs.clone());
    }

    let columns = basis.decode(&encodings)?;
    let (levels, columns) = remove_union_bloat(basis.into_levels(), columns)?;
    Ok(IndexHierarchy::from_parts_unchecked(levels, columns, args.name))
}

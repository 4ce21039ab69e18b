use strata_common::{Result, error::Error, verify_data};

use crate::{Position, flat_index::FlatIndex};

const UNREFERENCED: Position = Position::MAX;

/// Drops the labels of each union-basis level that no surviving row references,
/// remapping the position columns to the compacted levels.
///
/// Levels whose labels are all still referenced are returned untouched.
/// Surviving labels keep their relative order in the basis.
pub(crate) fn remove_union_bloat(
    levels: Vec<FlatIndex>,
    columns: Vec<Vec<Position>>,
) -> Result<(Vec<FlatIndex>, Vec<Vec<Position>>)> {
    verify_data!(columns, columns.len() == levels.len());
    let mut final_levels = Vec::with_capacity(levels.len());
    let mut final_columns = Vec::with_capacity(columns.len());

    for (depth, (level, column)) in levels.into_iter().zip(columns).enumerate() {
        let mut remap = vec![UNREFERENCED; level.len()];
        for &pos in &column {
            let Some(slot) = remap.get_mut(pos as usize) else {
                return Err(Error::position_out_of_bounds(depth, pos, level.len()));
            };
            *slot = 0;
        }

        let mut referenced = Vec::with_capacity(level.len());
        for (pos, slot) in remap.iter_mut().enumerate() {
            if *slot != UNREFERENCED {
                *slot = referenced.len() as Position;
                referenced.push(pos as Position);
            }
        }

        if referenced.len() == level.len() {
            final_levels.push(level);
            final_columns.push(column);
        } else {
            final_levels.push(level.extract_by_positions(&referenced)?);
            final_columns.push(column.iter().map(|&p| remap[p as usize]).collect());
        }
    }

    Ok((final_levels, final_columns))
}

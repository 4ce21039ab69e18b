//! Row lookup for a hierarchy, keyed by the encoding of each row relative to
//! the hierarchy's own levels.

use ahash::AHashMap;
use num_bigint::BigUint;
use strata_common::Result;

use crate::{
    Position,
    encoding::{EncodedRows, EncodingInvariants},
    flat_index::FlatIndex,
};

enum RowMap {
    Fixed(AHashMap<u64, usize>),
    Big(AHashMap<BigUint, usize>),
}

pub(crate) struct RowLookup {
    invariants: EncodingInvariants,
    map: RowMap,
}

impl RowLookup {
    /// Builds the lookup. The second element is the first row whose labels
    /// repeat an earlier row, if any; in that case the lookup keeps the
    /// earlier row.
    pub(crate) fn build(
        levels: &[FlatIndex],
        columns: &[&[Position]],
    ) -> Result<(RowLookup, Option<usize>)> {
        let cardinalities = levels.iter().map(FlatIndex::len).collect::<Vec<_>>();
        let invariants = EncodingInvariants::new(&cardinalities);
        let mut duplicate = None;
        let map = match invariants.encode(columns)? {
            EncodedRows::Fixed(values) => RowMap::Fixed(index_values(values, &mut duplicate)),
            EncodedRows::Big(values) => RowMap::Big(index_values(values, &mut duplicate)),
        };
        Ok((RowLookup { invariants, map }, duplicate))
    }

    /// Returns the row holding the given per-depth positions.
    pub(crate) fn get(&self, positions: &[Position]) -> Option<usize> {
        let columns = positions.iter().map(std::slice::from_ref).collect::<Vec<_>>();
        match (&self.map, self.invariants.encode(&columns).ok()?) {
            (RowMap::Fixed(map), EncodedRows::Fixed(values)) => map.get(values.first()?).copied(),
            (RowMap::Big(map), EncodedRows::Big(values)) => map.get(values.first()?).copied(),
            _ => None,
        }
    }
}

fn index_values<K>(values: Vec<K>, duplicate: &mut Option<usize>) -> AHashMap<K, usize>
where
    K: std::hash::Hash + Eq,
{
    let mut map = AHashMap::with_capacity(values.len());
    for (row, value) in values.into_iter().enumerate() {
        if map.contains_key(&value) {
            duplicate.get_or_insert(row);
        } else {
            map.insert(value, row);
        }
    }
    map
}

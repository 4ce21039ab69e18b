use std::borrow::Cow;

use strata_common::Result;

use crate::{
    Position,
    constructor::IndexConstructor,
    encoding::{EncodedRows, EncodingInvariants},
    flat_index::{FlatIndex, PositionRemap},
    hierarchy::IndexHierarchy,
};

use super::SetOpConfig;

/// Per-depth union of the levels of several hierarchies, together with the
/// encoding invariants derived from its cardinalities.
///
/// Every input is encoded relative to this basis, which makes the encodings of
/// different inputs comparable. A basis lives for one operation only.
pub(crate) struct UnionBasis {
    levels: Vec<FlatIndex>,
    invariants: EncodingInvariants,
}

impl UnionBasis {
    pub fn build(
        indices: &[&IndexHierarchy],
        index_constructors: &[IndexConstructor],
        depth: usize,
        config: &SetOpConfig,
    ) -> Result<UnionBasis> {
        let mut per_depth = Vec::with_capacity(indices.len());
        let levels = (0..depth)
            .map(|d| {
                per_depth.clear();
                per_depth.extend(indices.iter().map(|index| &index.levels()[d]));
                FlatIndex::union_many(&per_depth, index_constructors[d])
            })
            .collect::<Result<Vec<_>>>()?;

        let cardinalities = levels.iter().map(FlatIndex::len).collect::<Vec<_>>();
        let invariants =
            EncodingInvariants::with_fixed_width_limit(&cardinalities, config.fixed_width_limit)?;
        log::trace!(
            "union basis cardinalities {cardinalities:?}, {} bits, {:?}",
            invariants.total_bits(),
            invariants.encoding()
        );
        Ok(UnionBasis { levels, invariants })
    }

    /// Remaps `index`'s positions onto the basis and encodes its rows.
    /// The result is sorted.
    pub fn encode(&self, index: &IndexHierarchy) -> Result<EncodedRows> {
        let mut columns: Vec<Cow<'_, [Position]>> = Vec::with_capacity(self.levels.len());
        for (d, (level, union_level)) in index.levels().iter().zip(&self.levels).enumerate() {
            let column = index.positions_at(d).unwrap_or_default();
            columns.push(match level.position_remap(union_level)? {
                PositionRemap::Identity => Cow::Borrowed(column),
                remap => Cow::Owned(remap.apply_column(column)),
            });
        }
        let columns = columns.iter().map(|c| &**c).collect::<Vec<_>>();
        Ok(self.invariants.encode(&columns)?.into_unique())
    }

    pub fn decode(&self, encoded: &EncodedRows) -> Result<Vec<Vec<Position>>> {
        self.invariants.decode(encoded)
    }

    pub fn into_levels(self) -> Vec<FlatIndex> {
        self.levels
    }
}

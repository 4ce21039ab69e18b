//! Single-level, duplicate-free ordered label set with O(1) label lookup.
//!
//! A `FlatIndex` stores its labels in a [`SharedVec`] and its label→position
//! map behind an `Arc`, so clones are cheap and keep the buffer identity of
//! the original. Position `i` always refers to the `i`-th label.

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use strata_common::{Result, error::Error};
use strata_shared_vec::{BufferId, SharedVec};

use crate::{
    Position,
    constructor::IndexConstructor,
    label::{Label, LabelType},
};

#[derive(Clone)]
pub struct FlatIndex {
    labels: SharedVec<Label>,
    lookup: Arc<AHashMap<Label, Position>>,
    label_type: LabelType,
    constructor: IndexConstructor,
}

impl FlatIndex {
    /// Builds an index from `labels` using `constructor`'s rules.
    pub fn try_new(labels: Vec<Label>, constructor: IndexConstructor) -> Result<FlatIndex> {
        let mut lookup = AHashMap::with_capacity(labels.len());
        for (pos, label) in labels.iter().enumerate() {
            if lookup.insert(label.clone(), pos as Position).is_some() {
                return Err(Error::duplicate_label(format!("{label:?}")));
            }
        }
        Self::from_parts(labels, lookup, constructor)
    }

    /// Builds a plain index from anything convertible into labels.
    pub fn from_labels<L: Into<Label>>(labels: impl IntoIterator<Item = L>) -> Result<FlatIndex> {
        Self::try_new(
            labels.into_iter().map(Into::into).collect(),
            IndexConstructor::Plain,
        )
    }

    pub fn empty(constructor: IndexConstructor) -> FlatIndex {
        FlatIndex {
            labels: SharedVec::empty(),
            lookup: Default::default(),
            label_type: constructor.empty_type(),
            constructor,
        }
    }

    fn from_parts(
        labels: Vec<Label>,
        lookup: AHashMap<Label, Position>,
        constructor: IndexConstructor,
    ) -> Result<FlatIndex> {
        debug_assert_eq!(labels.len(), lookup.len());
        let label_type = constructor.resolve_type(&labels)?;
        Ok(FlatIndex {
            labels: SharedVec::from_vec(labels),
            lookup: Arc::new(lookup),
            label_type,
            constructor,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn labels(&self) -> &[Label] {
        self.labels.as_slice()
    }

    pub fn label_at(&self, pos: Position) -> Option<&Label> {
        self.labels.get(pos as usize)
    }

    pub fn position_of(&self, label: &Label) -> Option<Position> {
        self.lookup.get(label).copied()
    }

    pub fn contains(&self, label: &Label) -> bool {
        self.lookup.contains_key(label)
    }

    pub fn label_type(&self) -> LabelType {
        self.label_type
    }

    pub fn constructor(&self) -> IndexConstructor {
        self.constructor
    }

    pub fn buffer_id(&self) -> BufferId {
        self.labels.buffer_id()
    }

    /// Returns `true` if both indices view the same label buffer.
    pub fn is_alias_of(&self, other: &FlatIndex) -> bool {
        self.labels.same_view(&other.labels)
    }

    /// Ordered label equality.
    pub fn equals(&self, other: &FlatIndex) -> bool {
        self.is_alias_of(other) || self.labels() == other.labels()
    }

    /// Builds the mapping from positions in `self` to positions in `target`.
    ///
    /// Every label of `self` must be present in `target`. When `target`
    /// starts with exactly the labels of `self` (which is what a union basis
    /// built with `self` first looks like), the mapping is the identity and no
    /// table is allocated.
    pub fn position_remap(&self, target: &FlatIndex) -> Result<PositionRemap> {
        if self.is_alias_of(target)
            || (target.len() >= self.len() && &target.labels()[..self.len()] == self.labels())
        {
            return Ok(PositionRemap::Identity);
        }
        let table = self
            .labels
            .iter()
            .map(|label| {
                target
                    .position_of(label)
                    .ok_or_else(|| Error::label_not_found(format!("{label:?}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PositionRemap::Table(table))
    }

    /// Builds a new index holding the labels at `positions`, in that order.
    pub fn extract_by_positions(&self, positions: &[Position]) -> Result<FlatIndex> {
        let labels = positions
            .iter()
            .map(|&pos| {
                self.label_at(pos)
                    .cloned()
                    .ok_or_else(|| Error::position_out_of_bounds(0, pos, self.len()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::try_new(labels, self.constructor)
    }

    /// Many-to-one union of `indices`, built with `constructor`.
    ///
    /// If every input holds the same labels as the first one, the first index
    /// is returned as is (provided it was built by `constructor`). Otherwise
    /// the result lists the first index's labels followed by every label not
    /// yet seen, in order of appearance across the remaining inputs.
    pub fn union_many(indices: &[&FlatIndex], constructor: IndexConstructor) -> Result<FlatIndex> {
        let Some((first, rest)) = indices.split_first() else {
            return Ok(constructor.empty());
        };

        if rest.iter().all(|other| first.equals(other)) {
            if first.constructor == constructor {
                return Ok((*first).clone());
            }
            return constructor.build(first.labels.to_vec());
        }

        let capacity = indices.iter().map(|index| index.len()).max().unwrap_or(0);
        let mut labels = Vec::with_capacity(capacity);
        labels.extend_from_slice(first.labels());
        let mut lookup = AHashMap::clone(&first.lookup);
        lookup.reserve(capacity.saturating_sub(first.len()));

        for other in rest {
            if first.is_alias_of(other) {
                continue;
            }
            for label in other.labels() {
                if !lookup.contains_key(label) {
                    lookup.insert(label.clone(), labels.len() as Position);
                    labels.push(label.clone());
                }
            }
        }
        Self::from_parts(labels, lookup, constructor)
    }
}

impl fmt::Debug for FlatIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatIndex")
            .field("type", &self.label_type)
            .field("labels", &self.labels())
            .finish()
    }
}

/// Mapping from positions of one flat index to positions of another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionRemap {
    /// Every position maps to itself.
    Identity,
    /// `table[source_pos]` is the target position.
    Table(Vec<Position>),
}

impl PositionRemap {
    #[inline]
    pub fn apply(&self, pos: Position) -> Position {
        match self {
            PositionRemap::Identity => pos,
            PositionRemap::Table(table) => table[pos as usize],
        }
    }

    pub fn apply_column(&self, column: &[Position]) -> Vec<Position> {
        match self {
            PositionRemap::Identity => column.to_vec(),
            PositionRemap::Table(table) => column.iter().map(|&p| table[p as usize]).collect(),
        }
    }

    pub fn is_identity(&self) -> bool {
        matches!(self, PositionRemap::Identity)
    }
}

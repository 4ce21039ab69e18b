//! Hierarchical (multi-level) index.
//!
//! An `IndexHierarchy` of depth `D` is made of `D` flat indices (one per
//! level) and `D` position columns of equal length. Row `r`'s label is the
//! tuple `(levels[0][columns[0][r]], ..., levels[D-1][columns[D-1][r]])`, and
//! no two rows share a tuple.
//!
//! Values are immutable. Cloning is cheap and shares every buffer, so a clone
//! is a structural alias of the original (see [`IndexHierarchy::shallow_copy_key`]).

use std::fmt;
use std::sync::{Arc, OnceLock};

use ahash::AHashMap;
use strata_common::{Result, error::Error, verify_arg};
use strata_shared_vec::{BufferIdentity, SharedVec};

use crate::{
    Position,
    constructor::IndexConstructor,
    flat_index::FlatIndex,
    label::Label,
    row_lookup::RowLookup,
    set_ops,
};

#[derive(Clone)]
pub struct IndexHierarchy {
    levels: Arc<[FlatIndex]>,
    columns: Arc<[SharedVec<Position>]>,
    name: Option<String>,
    lookup: Arc<OnceLock<RowLookup>>,
}

/// Fingerprint of the position buffers behind a hierarchy.
///
/// Two hierarchies with equal keys read the very same physical positions and
/// are treated as one input by the set operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShallowCopyKey(Vec<BufferIdentity>);

impl IndexHierarchy {
    /// Builds a hierarchy from its levels and per-depth position columns.
    ///
    /// Fails if the depth is zero, if the number of columns differs from the
    /// number of levels, if columns differ in length, if a position points
    /// past its level, or if two rows carry the same labels.
    pub fn new(
        levels: Vec<FlatIndex>,
        columns: Vec<Vec<Position>>,
        name: Option<String>,
    ) -> Result<IndexHierarchy> {
        verify_arg!(levels, !levels.is_empty());
        if levels.len() != columns.len() {
            return Err(Error::depth_mismatch(levels.len(), columns.len()));
        }
        let rows = columns[0].len();
        verify_arg!(columns, columns.iter().all(|c| c.len() == rows));
        for (depth, (level, column)) in levels.iter().zip(&columns).enumerate() {
            if let Some(&pos) = column.iter().find(|&&p| p as usize >= level.len()) {
                return Err(Error::position_out_of_bounds(depth, pos, level.len()));
            }
        }

        let column_refs = columns.iter().map(Vec::as_slice).collect::<Vec<_>>();
        let (lookup, duplicate) = RowLookup::build(&levels, &column_refs)?;
        let hierarchy = Self::from_parts_unchecked(levels, columns, name);
        if let Some(row) = duplicate {
            return Err(Error::duplicate_row(format!(
                "{:?}",
                hierarchy.labels_at(row).unwrap_or_default()
            )));
        }
        let _ = hierarchy.lookup.set(lookup);
        Ok(hierarchy)
    }

    /// Assembles a hierarchy whose rows are known to be unique and in bounds.
    pub(crate) fn from_parts_unchecked(
        levels: Vec<FlatIndex>,
        columns: Vec<Vec<Position>>,
        name: Option<String>,
    ) -> IndexHierarchy {
        debug_assert_eq!(levels.len(), columns.len());
        IndexHierarchy {
            levels: levels.into(),
            columns: columns.into_iter().map(SharedVec::from_vec).collect(),
            name,
            lookup: Default::default(),
        }
    }

    /// Builds a hierarchy from label tuples with default constructors.
    ///
    /// Each level lists its labels in order of first appearance. At least one
    /// row is required to know the depth; use [`IndexHierarchy::empty`] for
    /// zero rows.
    pub fn from_labels<R, L>(rows: impl IntoIterator<Item = R>) -> Result<IndexHierarchy>
    where
        R: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        Self::from_labels_with(rows, None, None)
    }

    /// Builds a hierarchy from label tuples with explicit per-depth
    /// constructors and name.
    pub fn from_labels_with<R, L>(
        rows: impl IntoIterator<Item = R>,
        constructors: Option<&[IndexConstructor]>,
        name: Option<String>,
    ) -> Result<IndexHierarchy>
    where
        R: IntoIterator<Item = L>,
        L: Into<Label>,
    {
        let mut rows = rows.into_iter().peekable();
        if rows.peek().is_none() {
            return match constructors {
                Some(constructors) => Self::empty(constructors, name),
                None => Err(Error::invalid_arg(
                    "rows",
                    "cannot infer the depth of a hierarchy without rows",
                )),
            };
        }

        let mut depth = constructors.map(<[_]>::len);
        let mut labels: Vec<Vec<Label>> = Vec::new();
        let mut lookups: Vec<AHashMap<Label, Position>> = Vec::new();
        let mut columns: Vec<Vec<Position>> = Vec::new();

        for row in rows {
            let row = row.into_iter().map(Into::into).collect::<Vec<Label>>();
            let expected = *depth.get_or_insert(row.len());
            if row.len() != expected {
                return Err(Error::depth_mismatch(expected, row.len()));
            }
            if columns.is_empty() {
                labels.resize_with(expected, Vec::new);
                lookups.resize_with(expected, AHashMap::new);
                columns.resize_with(expected, Vec::new);
            }
            for (d, label) in row.into_iter().enumerate() {
                let next = labels[d].len() as Position;
                let pos = *lookups[d].entry(label.clone()).or_insert_with(|| {
                    labels[d].push(label);
                    next
                });
                columns[d].push(pos);
            }
        }

        let depth = columns.len();
        let defaults = IndexConstructor::defaults(depth);
        let constructors = constructors.unwrap_or(&defaults);
        let levels = labels
            .into_iter()
            .zip(constructors)
            .map(|(labels, ctor)| ctor.build(labels))
            .collect::<Result<Vec<_>>>()?;
        Self::new(levels, columns, name)
    }

    /// Cartesian product of `levels`; the first level varies slowest.
    pub fn from_product(levels: Vec<FlatIndex>, name: Option<String>) -> Result<IndexHierarchy> {
        verify_arg!(levels, !levels.is_empty());
        let rows = levels.iter().map(FlatIndex::len).product::<usize>();
        let mut columns = Vec::with_capacity(levels.len());
        let mut repeat = rows;
        for level in &levels {
            let len = level.len();
            if len == 0 {
                columns.push(Vec::new());
                continue;
            }
            repeat /= len;
            let column = (0..rows)
                .map(|row| ((row / repeat) % len) as Position)
                .collect();
            columns.push(column);
        }
        Ok(Self::from_parts_unchecked(levels, columns, name))
    }

    /// Zero rows; one empty level per constructor.
    pub fn empty(constructors: &[IndexConstructor], name: Option<String>) -> Result<IndexHierarchy> {
        verify_arg!(constructors, !constructors.is_empty());
        let levels = constructors.iter().map(IndexConstructor::empty).collect();
        let columns = vec![Vec::new(); constructors.len()];
        Ok(Self::from_parts_unchecked(levels, columns, name))
    }

    /// Returns a renamed view sharing every buffer with `self`.
    pub fn with_name(&self, name: Option<String>) -> IndexHierarchy {
        IndexHierarchy {
            name,
            ..self.clone()
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.columns[0].len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn index_constructors(&self) -> Vec<IndexConstructor> {
        self.levels.iter().map(FlatIndex::constructor).collect()
    }

    pub fn levels(&self) -> &[FlatIndex] {
        &self.levels
    }

    pub fn level(&self, depth: usize) -> Option<&FlatIndex> {
        self.levels.get(depth)
    }

    pub fn positions_at(&self, depth: usize) -> Option<&[Position]> {
        self.columns.get(depth).map(SharedVec::as_slice)
    }

    /// Position columns for several depths, in the requested order.
    pub fn positions_at_depths(&self, depths: &[usize]) -> Result<Vec<&[Position]>> {
        depths
            .iter()
            .map(|&d| {
                self.positions_at(d)
                    .ok_or_else(|| Error::invalid_arg("depths", format!("no depth {d}")))
            })
            .collect()
    }

    pub fn labels_at(&self, row: usize) -> Option<Vec<Label>> {
        if row >= self.len() {
            return None;
        }
        self.levels
            .iter()
            .zip(self.columns.iter())
            .map(|(level, column)| level.label_at(column[row]).cloned())
            .collect()
    }

    pub fn iter_labels(&self) -> impl Iterator<Item = Vec<Label>> + '_ {
        (0..self.len()).filter_map(|row| self.labels_at(row))
    }

    /// Returns the row holding `labels`, if any.
    pub fn position_of(&self, labels: &[Label]) -> Option<usize> {
        if labels.len() != self.depth() {
            return None;
        }
        let positions = self
            .levels
            .iter()
            .zip(labels)
            .map(|(level, label)| level.position_of(label))
            .collect::<Option<Vec<_>>>()?;
        self.row_lookup()?.get(&positions)
    }

    pub fn contains(&self, labels: &[Label]) -> bool {
        self.position_of(labels).is_some()
    }

    fn row_lookup(&self) -> Option<&RowLookup> {
        if let Some(lookup) = self.lookup.get() {
            return Some(lookup);
        }
        let columns = self.columns.iter().map(SharedVec::as_slice).collect::<Vec<_>>();
        let (lookup, _) = RowLookup::build(&self.levels, &columns).ok()?;
        Some(self.lookup.get_or_init(|| lookup))
    }

    /// Ordered equality of the row labels (names are ignored).
    pub fn equals(&self, other: &IndexHierarchy) -> bool {
        if self.is_alias_of(other) {
            return true;
        }
        self.depth() == other.depth()
            && self.len() == other.len()
            && self.iter_labels().eq(other.iter_labels())
    }

    pub fn shallow_copy_key(&self) -> ShallowCopyKey {
        ShallowCopyKey(self.columns.iter().map(SharedVec::identity).collect())
    }

    /// Returns `true` if both hierarchies read the same position buffers.
    pub fn is_alias_of(&self, other: &IndexHierarchy) -> bool {
        self.shallow_copy_key() == other.shallow_copy_key()
    }

    pub fn intersection(&self, other: &IndexHierarchy) -> Result<IndexHierarchy> {
        set_ops::intersection(&[self, other])
    }

    pub fn union(&self, other: &IndexHierarchy) -> Result<IndexHierarchy> {
        set_ops::union(&[self, other])
    }

    pub fn difference(&self, other: &IndexHierarchy) -> Result<IndexHierarchy> {
        set_ops::difference(&[self, other])
    }
}

impl fmt::Debug for IndexHierarchy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexHierarchy")
            .field("name", &self.name)
            .field("depth", &self.depth())
            .field("rows", &self.iter_labels().collect::<Vec<_>>())
            .finish()
    }
}

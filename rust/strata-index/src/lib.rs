//! Hierarchical index encoding and set algebra.
//!
//! A hierarchical index labels each row with a tuple of values, one per
//! depth. Each depth stores its distinct labels once in a [`FlatIndex`]; rows
//! hold positions into those levels. Set operations across several
//! hierarchies (see [`set_ops`]) build a common per-depth basis, pack every
//! row into one integer relative to that basis, and operate on the integers
//! instead of on label tuples.

pub mod constructor;
pub mod encoding;
pub mod flat_index;
pub mod hierarchy;
pub mod label;
mod row_lookup;
pub mod set_ops;

#[cfg(test)]
mod tests;

/// Zero-based position of a label within one level.
pub type Position = u64;

pub use constructor::IndexConstructor;
pub use encoding::{EncodedRows, Encoding, EncodingInvariants};
pub use flat_index::{FlatIndex, PositionRemap};
pub use hierarchy::{IndexHierarchy, ShallowCopyKey};
pub use label::{Label, LabelType};
pub use set_ops::{SetOpConfig, difference, intersection, union};

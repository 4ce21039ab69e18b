//! Set algebra (intersection, union, difference) across hierarchical indices.
//!
//! All three operations share one scheme:
//! 1. sanitize the inputs (see `validate`);
//! 2. build a per-depth union basis of the inputs' levels;
//! 3. remap each input's positions onto the basis and pack every row into a
//!    single integer;
//! 4. run the set operation on the sorted integer sets;
//! 5. unpack the surviving integers into position columns, drop basis labels
//!    nobody references any more, and assemble a fresh hierarchy.
//!
//! Whenever the outcome equals the first input, that input is returned as a
//! view (a clone sharing its buffers, see [`IndexHierarchy::is_alias_of`])
//! instead of a rebuilt copy. Fresh results are ordered by their encodings;
//! callers must not rely on any particular row order.

mod bloat;
mod difference;
mod intersection;
mod union;
mod union_basis;
mod validate;

use strata_common::{Result, verify_arg};

use crate::{encoding::NATIVE_WORD_BITS, hierarchy::IndexHierarchy};

pub use difference::difference_with_config;
pub use intersection::intersection_with_config;
pub use union::union_with_config;

/// Tunables of the set-operation engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOpConfig {
    /// Largest total encoding width (in bits) that may use the fixed-width
    /// `u64` path. Wider encodings switch to arbitrary precision.
    pub fixed_width_limit: u32,
}

impl Default for SetOpConfig {
    fn default() -> Self {
        SetOpConfig {
            fixed_width_limit: NATIVE_WORD_BITS,
        }
    }
}

impl SetOpConfig {
    pub fn with_fixed_width_limit(&self, bits: u32) -> Self {
        let mut config = self.clone();
        config.fixed_width_limit = bits;
        config
    }

    pub fn verify(&self) -> Result<()> {
        let limit = self.fixed_width_limit;
        verify_arg!(fixed_width_limit, (1..=NATIVE_WORD_BITS).contains(&limit));
        Ok(())
    }
}

/// Rows present in every input.
///
/// Equivalent to folding pairwise intersections from the first input.
pub fn intersection(indices: &[&IndexHierarchy]) -> Result<IndexHierarchy> {
    intersection_with_config(indices, &SetOpConfig::default())
}

/// Rows present in at least one input.
pub fn union(indices: &[&IndexHierarchy]) -> Result<IndexHierarchy> {
    union_with_config(indices, &SetOpConfig::default())
}

/// Rows of the first input absent from every other input.
pub fn difference(indices: &[&IndexHierarchy]) -> Result<IndexHierarchy> {
    difference_with_config(indices, &SetOpConfig::default())
}

//! Packing of per-depth position columns into one comparable integer per row.
//!
//! Depth `d` occupies `bits_needed(cardinality_d)` bits starting at
//! `offsets[d]`; depth 0 sits in the least significant bits. When the total
//! width does not fit the fixed-width limit, the same bit layout is produced
//! with arbitrary-precision integers instead, so the two paths always agree
//! on the numeric value of an encoding.
//!
//! An encoding is only meaningful relative to the invariants that produced
//! it. Encodings built from different union bases must never be compared.

use itertools::{EitherOrBoth, Itertools};
use num_bigint::BigUint;
use num_traits::Zero;
use strata_common::{Result, error::Error, verify_arg};

use crate::Position;

/// Width of the native word used by the fixed-width path.
pub const NATIVE_WORD_BITS: u32 = u64::BITS;

/// Number of bits reserved for a depth with `cardinality` distinct labels.
///
/// This is `max(1, ceil(log2(cardinality)))`: enough to hold the largest
/// position `cardinality - 1`, and never zero so every depth keeps a slot.
#[inline]
pub fn bits_needed(cardinality: usize) -> u32 {
    if cardinality <= 2 {
        1
    } else {
        u64::BITS - ((cardinality - 1) as u64).leading_zeros()
    }
}

/// Representation chosen for the encoded values of one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Values fit in a `u64`; `bits` is the total width in use.
    Fixed { bits: u32 },
    /// Values need arbitrary precision.
    Big,
}

/// Bit offsets and the encoding choice derived from per-depth cardinalities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodingInvariants {
    offsets: Vec<u32>,
    widths: Vec<u32>,
    total_bits: u32,
    encoding: Encoding,
}

impl EncodingInvariants {
    /// Computes invariants with the native 64-bit word as the fixed-width limit.
    pub fn new(cardinalities: &[usize]) -> EncodingInvariants {
        Self::compute(cardinalities, NATIVE_WORD_BITS)
    }

    /// Computes invariants, switching to [`Encoding::Big`] when the total
    /// width exceeds `limit` bits.
    pub fn with_fixed_width_limit(
        cardinalities: &[usize],
        limit: u32,
    ) -> Result<EncodingInvariants> {
        verify_arg!(limit, (1..=NATIVE_WORD_BITS).contains(&limit));
        Ok(Self::compute(cardinalities, limit))
    }

    fn compute(cardinalities: &[usize], limit: u32) -> EncodingInvariants {
        let widths = cardinalities
            .iter()
            .map(|&n| bits_needed(n))
            .collect::<Vec<_>>();
        let mut offsets = Vec::with_capacity(widths.len());
        let mut total_bits = 0u32;
        for &width in &widths {
            offsets.push(total_bits);
            total_bits += width;
        }
        let encoding = if total_bits > limit {
            Encoding::Big
        } else {
            Encoding::Fixed { bits: total_bits }
        };
        EncodingInvariants {
            offsets,
            widths,
            total_bits,
            encoding,
        }
    }

    pub fn depth(&self) -> usize {
        self.offsets.len()
    }

    pub fn offsets(&self) -> &[u32] {
        &self.offsets
    }

    pub fn widths(&self) -> &[u32] {
        &self.widths
    }

    pub fn total_bits(&self) -> u32 {
        self.total_bits
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// `true` when the fixed-width path cannot hold every possible row.
    pub fn can_overflow(&self) -> bool {
        self.encoding == Encoding::Big
    }

    /// Packs `columns` (one column per depth, all of equal length) into one
    /// value per row.
    ///
    /// Every position in column `d` must be below the cardinality the
    /// invariants were computed from; larger values collide with other depths.
    pub fn encode(&self, columns: &[&[Position]]) -> Result<EncodedRows> {
        verify_arg!(columns, columns.len() == self.depth());
        let rows = columns.first().map_or(0, |c| c.len());
        verify_arg!(columns, columns.iter().all(|c| c.len() == rows));

        let encoded = match self.encoding {
            Encoding::Fixed { .. } => {
                let mut values = vec![0u64; rows];
                for ((column, &offset), &width) in columns.iter().zip(&self.offsets).zip(&self.widths)
                {
                    debug_assert!(column.iter().all(|&p| width >= 64 || p >> width == 0));
                    for (value, &pos) in values.iter_mut().zip(column.iter()) {
                        *value |= pos << offset;
                    }
                }
                EncodedRows::Fixed(values)
            }
            Encoding::Big => {
                let mut values = vec![BigUint::zero(); rows];
                for (column, &offset) in columns.iter().zip(&self.offsets) {
                    for (value, &pos) in values.iter_mut().zip(column.iter()) {
                        if pos != 0 {
                            *value |= BigUint::from(pos) << offset;
                        }
                    }
                }
                EncodedRows::Big(values)
            }
        };
        Ok(encoded)
    }

    /// Unpacks encoded values back into one position column per depth.
    pub fn decode(&self, encoded: &EncodedRows) -> Result<Vec<Vec<Position>>> {
        let columns = match (self.encoding, encoded) {
            (Encoding::Fixed { .. }, EncodedRows::Fixed(values)) => self
                .offsets
                .iter()
                .zip(&self.widths)
                .map(|(&offset, &width)| {
                    let mask = low_bits_mask(width);
                    values.iter().map(|&v| (v >> offset) & mask).collect()
                })
                .collect(),
            (Encoding::Big, EncodedRows::Big(values)) => self
                .offsets
                .iter()
                .zip(&self.widths)
                .map(|(&offset, &width)| {
                    let mask = low_bits_mask(width);
                    values
                        .iter()
                        .map(|v| {
                            let shifted = v >> offset;
                            shifted.iter_u64_digits().next().unwrap_or(0) & mask
                        })
                        .collect()
                })
                .collect(),
            _ => {
                return Err(Error::invalid_operation(
                    "decode: encoded rows do not match the encoding invariants",
                ));
            }
        };
        Ok(columns)
    }
}

#[inline]
fn low_bits_mask(width: u32) -> u64 {
    if width >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// One encoded value per row, in the representation chosen by the invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodedRows {
    Fixed(Vec<u64>),
    Big(Vec<BigUint>),
}

impl EncodedRows {
    pub fn len(&self) -> usize {
        match self {
            EncodedRows::Fixed(values) => values.len(),
            EncodedRows::Big(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorts the values and drops duplicates.
    pub fn into_unique(self) -> EncodedRows {
        match self {
            EncodedRows::Fixed(values) => EncodedRows::Fixed(sorted_unique(values)),
            EncodedRows::Big(values) => EncodedRows::Big(sorted_unique(values)),
        }
    }

    /// Values present in both sets. Both inputs must come from
    /// [`EncodedRows::into_unique`].
    pub fn intersect(&self, other: &EncodedRows) -> Result<EncodedRows> {
        match (self, other) {
            (EncodedRows::Fixed(a), EncodedRows::Fixed(b)) => {
                Ok(EncodedRows::Fixed(intersect_sorted(a, b)))
            }
            (EncodedRows::Big(a), EncodedRows::Big(b)) => Ok(EncodedRows::Big(intersect_sorted(a, b))),
            _ => Err(mixed_encodings("intersect")),
        }
    }

    /// Values of `self` absent from `other`. Both inputs must come from
    /// [`EncodedRows::into_unique`].
    pub fn difference(&self, other: &EncodedRows) -> Result<EncodedRows> {
        match (self, other) {
            (EncodedRows::Fixed(a), EncodedRows::Fixed(b)) => {
                Ok(EncodedRows::Fixed(difference_sorted(a, b)))
            }
            (EncodedRows::Big(a), EncodedRows::Big(b)) => {
                Ok(EncodedRows::Big(difference_sorted(a, b)))
            }
            _ => Err(mixed_encodings("difference")),
        }
    }

    /// Concatenates several sets of the same representation. The result may
    /// contain duplicates.
    pub fn concat(parts: Vec<EncodedRows>) -> Result<EncodedRows> {
        let mut parts = parts.into_iter();
        let Some(mut acc) = parts.next() else {
            return Ok(EncodedRows::Fixed(Vec::new()));
        };
        for part in parts {
            match (&mut acc, part) {
                (EncodedRows::Fixed(a), EncodedRows::Fixed(b)) => a.extend(b),
                (EncodedRows::Big(a), EncodedRows::Big(b)) => a.extend(b),
                _ => return Err(mixed_encodings("concat")),
            }
        }
        Ok(acc)
    }
}

#[cold]
fn mixed_encodings(op: &str) -> Error {
    Error::invalid_operation(format!(
        "{op}: fixed-width and arbitrary-precision encodings cannot be combined"
    ))
}

fn sorted_unique<T: Ord>(mut values: Vec<T>) -> Vec<T> {
    values.sort_unstable();
    values.dedup();
    values
}

fn intersect_sorted<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    debug_assert!(a.is_sorted() && b.is_sorted());
    a.iter()
        .merge_join_by(b.iter(), |x, y| x.cmp(y))
        .filter_map(|entry| match entry {
            EitherOrBoth::Both(x, _) => Some(x.clone()),
            _ => None,
        })
        .collect()
}

fn difference_sorted<T: Ord + Clone>(a: &[T], b: &[T]) -> Vec<T> {
    debug_assert!(a.is_sorted() && b.is_sorted());
    a.iter()
        .merge_join_by(b.iter(), |x, y| x.cmp(y))
        .filter_map(|entry| match entry {
            EitherOrBoth::Left(x) => Some(x.clone()),
            _ => None,
        })
        .collect()
}

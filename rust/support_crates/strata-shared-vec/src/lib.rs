//! An immutable, cheaply cloneable, and sliceable shared vector that knows
//! which allocation it views.
//!
//! `SharedVec<T>` wraps an `Arc<Vec<T>>` together with an offset and length.
//! Every buffer gets a [`BufferId`] when it is first wrapped; clones and slices
//! keep that id. Two `SharedVec` values with the same [`BufferIdentity`]
//! (id, offset, length) are views over the same physical data, which lets
//! containers detect aliasing by value instead of by memory address.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, RangeBounds};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_BUFFER_ID: AtomicU64 = AtomicU64::new(1);

/// Allocation token assigned once per wrapped buffer.
///
/// Ids are handed out from a process-wide monotonically increasing counter and
/// are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(u64);

impl BufferId {
    fn next() -> BufferId {
        BufferId(NEXT_BUFFER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Identity of a view: the buffer it reads from and the window it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferIdentity {
    pub id: BufferId,
    pub offset: usize,
    pub len: usize,
}

/// An immutable, cheaply cloneable, and sliceable shared vector slice.
///
/// Equality, ordering and hashing are value-based (they compare elements).
/// Use [`SharedVec::identity`] or [`SharedVec::same_view`] to compare by
/// allocation instead.
#[derive(Clone)]
pub struct SharedVec<T> {
    inner: Arc<Vec<T>>,
    id: BufferId,
    offset: usize,
    len: usize,
}

impl<T> SharedVec<T> {
    /// Creates a new `SharedVec` from a `Vec<T>`, owning the data under a
    /// fresh buffer id.
    pub fn from_vec(vec: Vec<T>) -> Self {
        let len = vec.len();
        SharedVec {
            inner: Arc::new(vec),
            id: BufferId::next(),
            offset: 0,
            len,
        }
    }

    /// Creates a new `SharedVec` from a slice by cloning the data.
    pub fn from_slice(slice: &[T]) -> Self
    where
        T: Clone,
    {
        SharedVec::from_vec(slice.to_vec())
    }

    /// Returns an empty `SharedVec` with its own buffer id.
    pub fn empty() -> Self {
        SharedVec::from_vec(Vec::new())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the element at the given index, or `None` if out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&T> {
        if index < self.len {
            Some(&self.inner[self.offset + index])
        } else {
            None
        }
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.inner[self.offset..self.offset + self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns a sub-slice of this view sharing the same buffer id.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn slice<R>(&self, range: R) -> Self
    where
        R: RangeBounds<usize>,
    {
        use std::ops::Bound::*;
        let start = match range.start_bound() {
            Included(&n) => n,
            Excluded(&n) => n + 1,
            Unbounded => 0,
        };
        let end = match range.end_bound() {
            Included(&n) => n + 1,
            Excluded(&n) => n,
            Unbounded => self.len,
        };
        assert!(start <= end && end <= self.len, "slice out of bounds");
        SharedVec {
            inner: self.inner.clone(),
            id: self.id,
            offset: self.offset + start,
            len: end - start,
        }
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.as_slice().to_vec()
    }

    #[inline]
    pub fn buffer_id(&self) -> BufferId {
        self.id
    }

    /// Returns the (buffer id, offset, length) triple of this view.
    #[inline]
    pub fn identity(&self) -> BufferIdentity {
        BufferIdentity {
            id: self.id,
            offset: self.offset,
            len: self.len,
        }
    }

    /// Returns `true` if both values view the same window of the same buffer.
    #[inline]
    pub fn same_view(&self, other: &SharedVec<T>) -> bool {
        self.identity() == other.identity()
    }
}

impl<T> Deref for SharedVec<T> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> std::ops::Index<usize> for SharedVec<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.inner[self.offset + index]
    }
}

impl<T> AsRef<[T]> for SharedVec<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> Borrow<[T]> for SharedVec<T> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for SharedVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedVec")
            .field("id", &self.id.0)
            .field("values", &self.as_slice())
            .finish()
    }
}

impl<T: PartialEq> PartialEq for SharedVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.same_view(other) || self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for SharedVec<T> {}

impl<T: Hash> Hash for SharedVec<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state)
    }
}

impl<T> Default for SharedVec<T> {
    fn default() -> Self {
        SharedVec::empty()
    }
}

impl<'a, T> IntoIterator for &'a SharedVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl<T> From<Vec<T>> for SharedVec<T> {
    fn from(vec: Vec<T>) -> Self {
        SharedVec::from_vec(vec)
    }
}

impl<T: Clone> From<&[T]> for SharedVec<T> {
    fn from(slice: &[T]) -> Self {
        SharedVec::from_slice(slice)
    }
}

impl<T> FromIterator<T> for SharedVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        SharedVec::from_vec(iter.into_iter().collect())
    }
}

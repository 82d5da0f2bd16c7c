//! A generic gap buffer.
//!
//! ## Layout
//!
//! ```text
//!  [ items-before-gap | gap (defaults) | items-after-gap ]
//!    0..gap_start       gap_start..gap_end  gap_end..storage.len()
//! ```
//!
//! The logical sequence is `storage[..gap_start]` followed by
//! `storage[gap_end..]`. Every edit first moves the gap to the edit site, so
//! a run of edits at the same or nearby index only shifts the few elements
//! the gap travels over.
//!
//! ## Learning: `T: Default` instead of `MaybeUninit`
//!
//! Gap slots hold `T::default()` rather than uninitialized memory. Moving the
//! gap swaps real elements with those defaults, and removing elements takes
//! them out with `std::mem::take`, so a vacated slot never keeps a stale value
//! (or the resources it owns) alive. No `unsafe` is needed anywhere.

use std::iter::Chain;
use std::ops::{Index, IndexMut};
use std::slice;

/// Borrowing iterator over a [`GapSequence`] in logical order.
pub type Iter<'a, T> = Chain<slice::Iter<'a, T>, slice::Iter<'a, T>>;

/// A resizable sequence with one relocatable gap.
///
/// Insertion and removal at the gap are O(1) amortized; moving the gap costs
/// one element move per position travelled.
#[derive(Debug, Clone)]
pub struct GapSequence<T> {
    /// Items and gap slots
    storage: Vec<T>,

    /// First slot of the gap
    gap_start: usize,

    /// First slot after the gap
    gap_end: usize,

    /// Total element moves caused by gap travel and growth
    moved: usize,
}

impl<T: Default> GapSequence<T> {
    /// Creates an empty sequence without allocating.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty sequence whose gap spans `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut storage = Vec::with_capacity(capacity);
        storage.resize_with(capacity, T::default);
        Self {
            storage,
            gap_start: 0,
            gap_end: capacity,
            moved: 0,
        }
    }

    // ==================== Measurements ====================

    /// Number of logical elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.storage.len() - self.gap_len()
    }

    /// Returns true if the sequence holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots in the backing storage (elements plus gap).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of free slots in the gap.
    #[inline]
    pub fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Total element moves performed by gap relocation and growth so far.
    ///
    /// Used to check that clustered edits stay cheap.
    #[inline]
    pub fn moved_elements(&self) -> usize {
        self.moved
    }

    // ==================== Element Access ====================

    #[inline]
    fn physical(&self, index: usize) -> usize {
        if index < self.gap_start {
            index
        } else {
            index + self.gap_len()
        }
    }

    /// Returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn get(&self, index: usize) -> &T {
        assert!(
            index < self.len(),
            "get: index {index} out of range (len {})",
            self.len()
        );
        &self.storage[self.physical(index)]
    }

    /// Returns the element at `index` mutably.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        assert!(
            index < self.len(),
            "get_mut: index {index} out of range (len {})",
            self.len()
        );
        let physical = self.physical(index);
        &mut self.storage[physical]
    }

    /// Replaces the element at `index`.
    pub fn set(&mut self, index: usize, value: T) {
        *self.get_mut(index) = value;
    }

    /// Returns the two contiguous runs of elements, before and after the gap.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        (
            &self.storage[..self.gap_start],
            &self.storage[self.gap_end..],
        )
    }

    /// Iterates the elements in logical order, wherever the gap currently is.
    pub fn iter(&self) -> Iter<'_, T> {
        let (head, tail) = self.as_slices();
        head.iter().chain(tail.iter())
    }

    // ==================== Mutations ====================

    /// Appends an element at the end.
    pub fn push(&mut self, value: T) {
        self.insert(self.len(), value);
    }

    /// Inserts an element at `index`, shifting later elements up by one.
    pub fn insert(&mut self, index: usize, value: T) {
        self.insert_range(index, std::iter::once(value));
    }

    /// Inserts `items` at `index`, keeping their order.
    ///
    /// # Panics
    ///
    /// Panics if `index > self.len()`.
    pub fn insert_range<I>(&mut self, index: usize, items: I)
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        assert!(
            index <= self.len(),
            "insert_range: index {index} out of range (len {})",
            self.len()
        );

        let items = items.into_iter();
        let count = items.len();
        if count == 0 {
            return;
        }

        self.place_gap_start(index);
        self.ensure_gap(count);

        for item in items.take(count) {
            self.storage[self.gap_start] = item;
            self.gap_start += 1;
        }
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn remove_at(&mut self, index: usize) -> T {
        assert!(
            index < self.len(),
            "remove_at: index {index} out of range (len {})",
            self.len()
        );
        self.place_gap_start(index);
        let value = std::mem::take(&mut self.storage[self.gap_end]);
        self.gap_end += 1;
        value
    }

    /// Removes `count` elements starting at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index + count > self.len()`.
    pub fn remove_range(&mut self, index: usize, count: usize) {
        assert!(
            index + count <= self.len(),
            "remove_range: {index}..{} out of range (len {})",
            index + count,
            self.len()
        );
        if count == 0 {
            return;
        }

        self.place_gap_start(index);
        for slot in &mut self.storage[self.gap_end..self.gap_end + count] {
            *slot = T::default();
        }
        self.gap_end += count;
    }

    /// Removes every element, keeping the allocation as gap.
    pub fn clear(&mut self) {
        for slot in &mut self.storage {
            *slot = T::default();
        }
        self.gap_start = 0;
        self.gap_end = self.storage.len();
    }

    // ==================== Gap Management ====================

    /// Moves the gap so that it starts at logical index `target`.
    ///
    /// Only the elements between the old and new gap position move, one
    /// swap each, so the cost is bounded by the distance travelled rather
    /// than by the size of the sequence.
    ///
    /// # Panics
    ///
    /// Panics if `target > self.len()`.
    pub fn place_gap_start(&mut self, target: usize) {
        assert!(
            target <= self.len(),
            "place_gap_start: index {target} out of range (len {})",
            self.len()
        );

        if target == self.gap_start {
            return;
        }

        let gap = self.gap_len();
        if gap == 0 {
            self.gap_start = target;
            self.gap_end = target;
            return;
        }

        if target < self.gap_start {
            // Shift [target, gap_start) into the tail of the gap. Walking
            // backwards means every destination is either a gap slot or a
            // slot this loop already vacated.
            let count = self.gap_start - target;
            for k in (0..count).rev() {
                self.storage.swap(target + k, target + k + gap);
            }
            self.moved += count;
        } else {
            // Shift [gap_end, gap_end + count) down into the gap.
            let count = target - self.gap_start;
            for k in 0..count {
                self.storage.swap(self.gap_start + k, self.gap_end + k);
            }
            self.moved += count;
        }

        self.gap_start = target;
        self.gap_end = target + gap;
    }

    /// Grows the storage so the gap holds at least `required` slots.
    ///
    /// Capacity doubles, or grows to exactly `len + required` when doubling
    /// is not enough.
    fn ensure_gap(&mut self, required: usize) {
        if self.gap_len() >= required {
            return;
        }

        let len = self.len();
        let old_capacity = self.storage.len();
        let new_capacity = (old_capacity * 2).max(len + required);
        let extra = new_capacity - old_capacity;

        self.storage.resize_with(new_capacity, T::default);
        // [gap_end, new_capacity) is now the tail items followed by `extra`
        // fresh defaults; rotating puts the defaults in front, widening the gap.
        self.storage[self.gap_end..].rotate_right(extra);
        self.gap_end += extra;
        self.moved += len;

        tracing::trace!(old_capacity, new_capacity, "gap sequence grew");
    }
}

impl<T: Default + Clone> GapSequence<T> {
    /// Copies the elements into a `Vec` in logical order.
    pub fn to_vec(&self) -> Vec<T> {
        self.iter().cloned().collect()
    }
}

impl<T: Default> Default for GapSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> From<Vec<T>> for GapSequence<T> {
    /// Takes ownership of `items`; the gap starts empty at the end.
    fn from(items: Vec<T>) -> Self {
        let len = items.len();
        Self {
            storage: items,
            gap_start: len,
            gap_end: len,
            moved: 0,
        }
    }
}

impl<T: Default> FromIterator<T> for GapSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: Default> Index<usize> for GapSequence<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        self.get(index)
    }
}

impl<T: Default> IndexMut<usize> for GapSequence<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.get_mut(index)
    }
}

impl<'a, T: Default> IntoIterator for &'a GapSequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Default + PartialEq> PartialEq for GapSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Default + Eq> Eq for GapSequence<T> {}

//! Generic gap buffer.
//!
//! A [`GapSequence`] keeps one contiguous unused region (the gap) at the last
//! edit point. Inserting or removing at the gap costs only the number of
//! elements touched; moving the gap costs the distance it travels.
//!
//! ```text
//!  [ before gap | gap (unused) | after gap ]
//!    0..gap_start  gap_start..gap_end  gap_end..data.len()
//! ```

use crate::error::{Error, Result};
use std::fmt;

const INITIAL_GAP_SIZE: usize = 64;

/// Growth factor applied to the backing store when the gap runs out.
const GAP_GROWTH_FACTOR: usize = 2;

/// Ordered sequence backed by a gap buffer.
#[derive(Clone)]
pub struct GapSequence<T> {
    data: Vec<T>,
    gap_start: usize,
    gap_end: usize,
}

impl<T: Copy + Default> GapSequence<T> {
    /// Create an empty sequence with the default gap size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_GAP_SIZE)
    }

    /// Create an empty sequence with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![T::default(); capacity],
            gap_start: 0,
            gap_end: capacity,
        }
    }

    /// Create a sequence holding a copy of `items`, gap at the end.
    #[must_use]
    pub fn from_slice(items: &[T]) -> Self {
        let len = items.len();
        let capacity = len + INITIAL_GAP_SIZE;
        let mut data = Vec::with_capacity(capacity);
        data.extend_from_slice(items);
        data.resize(capacity, T::default());
        Self {
            data,
            gap_start: len,
            gap_end: capacity,
        }
    }

    /// Number of logical elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Physical capacity (logical length plus gap).
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    #[inline]
    fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Logical position of the gap.
    #[must_use]
    pub fn gap_position(&self) -> usize {
        self.gap_start
    }

    #[inline]
    fn physical(&self, index: usize) -> usize {
        if index < self.gap_start {
            index
        } else {
            index + self.gap_len()
        }
    }

    /// Element at `index`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        Some(self.data[self.physical(index)])
    }

    /// Overwrite the element at `index`.
    pub fn set(&mut self, index: usize, value: T) -> Result<()> {
        let len = self.len();
        if index >= len {
            return Err(Error::OutOfRange { index, len });
        }
        let physical = self.physical(index);
        self.data[physical] = value;
        Ok(())
    }

    /// Move the gap so that it starts at logical `pos` (clamped to `len`).
    pub fn move_gap_to(&mut self, pos: usize) {
        let pos = pos.min(self.len());

        if pos < self.gap_start {
            let shift = self.gap_start - pos;
            self.data
                .copy_within(pos..self.gap_start, self.gap_end - shift);
            self.gap_start = pos;
            self.gap_end -= shift;
        } else if pos > self.gap_start {
            let shift = pos - self.gap_start;
            self.data
                .copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            self.gap_start += shift;
            self.gap_end += shift;
        }
    }

    /// Grow the gap in place to at least `min_size` without moving it.
    fn ensure_gap(&mut self, min_size: usize) {
        if self.gap_len() >= min_size {
            return;
        }

        let needed = min_size - self.gap_len();
        let growth = needed.max(self.data.len() * (GAP_GROWTH_FACTOR - 1)).max(INITIAL_GAP_SIZE);

        let old_len = self.data.len();
        let post_gap_len = old_len - self.gap_end;
        let new_size = old_len + growth;
        self.data.resize(new_size, T::default());

        if post_gap_len > 0 {
            self.data
                .copy_within(self.gap_end..old_len, new_size - post_gap_len);
        }
        self.gap_end = new_size - post_gap_len;
    }

    /// Insert a single element at `index`.
    pub fn insert(&mut self, index: usize, value: T) -> Result<()> {
        self.insert_range(index, &[value])
    }

    /// Insert `items` so that the first one lands at `index`.
    pub fn insert_range(&mut self, index: usize, items: &[T]) -> Result<()> {
        let len = self.len();
        if index > len {
            return Err(Error::OutOfRange { index, len });
        }
        if items.is_empty() {
            return Ok(());
        }
        self.move_gap_to(index);
        self.ensure_gap(items.len());
        self.data[self.gap_start..self.gap_start + items.len()].copy_from_slice(items);
        self.gap_start += items.len();
        Ok(())
    }

    /// Insert every element yielded by `items` starting at `index`.
    pub fn insert_iter<I>(&mut self, index: usize, items: I) -> Result<usize>
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.len();
        if index > len {
            return Err(Error::OutOfRange { index, len });
        }
        self.move_gap_to(index);
        let mut count = 0;
        for item in items {
            self.ensure_gap(1);
            self.data[self.gap_start] = item;
            self.gap_start += 1;
            count += 1;
        }
        Ok(count)
    }

    /// Forget `count` elements starting at `index` by widening the gap.
    pub fn remove_range(&mut self, index: usize, count: usize) -> Result<()> {
        let len = self.len();
        let end = index.checked_add(count).unwrap_or(usize::MAX);
        if end > len {
            return Err(Error::InvalidRange {
                begin: index,
                end,
                len,
            });
        }
        if count == 0 {
            return Ok(());
        }
        self.move_gap_to(index);
        self.gap_end += count;
        Ok(())
    }

    /// Drop every element, keeping the allocation.
    pub fn clear(&mut self) {
        self.gap_start = 0;
        self.gap_end = self.data.len();
    }

    /// The two contiguous halves of the logical content.
    #[must_use]
    pub fn as_slices(&self) -> (&[T], &[T]) {
        (&self.data[..self.gap_start], &self.data[self.gap_end..])
    }

    /// Iterate over every logical element.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = T> + '_ {
        let (front, back) = self.as_slices();
        front.iter().chain(back.iter()).copied()
    }

    /// Iterate over the logical elements in `start..end` (clamped).
    pub fn iter_range(&self, start: usize, end: usize) -> impl DoubleEndedIterator<Item = T> + '_ {
        let end = end.min(self.len());
        let start = start.min(end);
        let (front, back) = self.as_slices();
        let split = front.len();
        let front_part = &front[start.min(split)..end.min(split)];
        let back_part = &back[start.max(split) - split..end.max(split) - split];
        front_part.iter().chain(back_part.iter()).copied()
    }

    /// Copy `start..end` (clamped) out of the sequence.
    #[must_use]
    pub fn to_vec_range(&self, start: usize, end: usize) -> Vec<T> {
        self.iter_range(start, end).collect()
    }

    /// Apply `f` to every element at or after `index`.
    ///
    /// Walks the physical halves directly, so the gap is not moved.
    pub fn for_each_from_mut<F>(&mut self, index: usize, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let index = index.min(self.len());
        if index < self.gap_start {
            self.data[index..self.gap_start].iter_mut().for_each(&mut f);
            self.data[self.gap_end..].iter_mut().for_each(&mut f);
        } else {
            let physical = index + self.gap_len();
            self.data[physical..].iter_mut().for_each(&mut f);
        }
    }
}

impl<T: Copy + Default + Ord> GapSequence<T> {
    /// Binary search over sorted content.
    ///
    /// Returns `Ok(index)` when `value` is present, otherwise `Err(insertion
    /// point)`, like [`slice::binary_search`].
    pub fn binary_search(&self, value: &T) -> std::result::Result<usize, usize> {
        let (front, back) = self.as_slices();
        match front.last() {
            Some(last) if value <= last => front.binary_search(value),
            _ => match back.binary_search(value) {
                Ok(i) => Ok(front.len() + i),
                Err(i) => Err(front.len() + i),
            },
        }
    }

    /// Index of the first element for which `pred` is false, assuming the
    /// sequence is partitioned by `pred`.
    pub fn partition_point<P>(&self, mut pred: P) -> usize
    where
        P: FnMut(&T) -> bool,
    {
        let (front, back) = self.as_slices();
        let in_front = front.partition_point(&mut pred);
        if in_front < front.len() {
            in_front
        } else {
            front.len() + back.partition_point(pred)
        }
    }
}

impl<T: Copy + Default> Default for GapSequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default + fmt::Debug> fmt::Debug for GapSequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Copy + Default + PartialEq> PartialEq for GapSequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Copy + Default> FromIterator<T> for GapSequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: Vec<T> = iter.into_iter().collect();
        Self::from_slice(&items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(seq: &GapSequence<u32>) -> Vec<u32> {
        seq.iter().collect()
    }

    #[test]
    fn test_new_empty() {
        let seq: GapSequence<u32> = GapSequence::new();
        assert!(seq.is_empty());
        assert_eq!(seq.len(), 0);
        assert_eq!(seq.get(0), None);
        assert_eq!(seq.iter().count(), 0);
    }

    #[test]
    fn test_empty_operations_do_not_panic() {
        let mut seq: GapSequence<u32> = GapSequence::with_capacity(0);
        assert!(seq.remove_range(0, 0).is_ok());
        assert!(seq.insert_range(0, &[]).is_ok());
        seq.move_gap_to(10);
        assert_eq!(seq.binary_search(&5), Err(0));
        assert_eq!(seq.to_vec_range(0, 10), Vec::<u32>::new());
        seq.insert(0, 1).unwrap();
        assert_eq!(collect(&seq), vec![1]);
    }

    #[test]
    fn test_insert_range_middle() {
        let mut seq = GapSequence::from_slice(&[1, 2, 5, 6]);
        seq.insert_range(2, &[3, 4]).unwrap();
        assert_eq!(collect(&seq), vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(seq.gap_position(), 4);
    }

    #[test]
    fn test_insert_out_of_range() {
        let mut seq = GapSequence::from_slice(&[1, 2]);
        assert_eq!(
            seq.insert(3, 9),
            Err(Error::OutOfRange { index: 3, len: 2 })
        );
        assert_eq!(collect(&seq), vec![1, 2]);
    }

    #[test]
    fn test_get_set_across_gap() {
        let mut seq = GapSequence::from_slice(&[10, 20, 30, 40]);
        seq.move_gap_to(2);
        assert_eq!(seq.get(1), Some(20));
        assert_eq!(seq.get(2), Some(30));
        seq.set(3, 44).unwrap();
        assert_eq!(seq.get(3), Some(44));
        assert!(seq.set(4, 0).is_err());
    }

    #[test]
    fn test_remove_range() {
        let mut seq = GapSequence::from_slice(&[1, 2, 3, 4, 5]);
        seq.remove_range(1, 3).unwrap();
        assert_eq!(collect(&seq), vec![1, 5]);
        assert!(seq.remove_range(1, 2).is_err());
        assert_eq!(collect(&seq), vec![1, 5]);
    }

    #[test]
    fn test_growth_preserves_content() {
        let mut seq: GapSequence<u32> = GapSequence::with_capacity(2);
        for i in 0..1000 {
            seq.insert(seq.len() / 2, i).unwrap();
        }
        assert_eq!(seq.len(), 1000);
        let mut sorted = collect(&seq);
        sorted.sort_unstable();
        assert_eq!(sorted, (0..1000).collect::<Vec<_>>());
    }

    #[test]
    fn test_growth_is_geometric() {
        let mut seq: GapSequence<u32> = GapSequence::with_capacity(1);
        let mut reallocations = 0;
        let mut last_capacity = seq.capacity();
        for i in 0..10_000 {
            seq.insert(seq.len(), i).unwrap();
            if seq.capacity() != last_capacity {
                reallocations += 1;
                last_capacity = seq.capacity();
            }
        }
        assert!(reallocations < 20, "grew {reallocations} times");
    }

    #[test]
    fn test_iter_range_spanning_gap() {
        let mut seq = GapSequence::from_slice(&[0, 1, 2, 3, 4, 5]);
        seq.move_gap_to(3);
        assert_eq!(seq.to_vec_range(1, 5), vec![1, 2, 3, 4]);
        assert_eq!(seq.to_vec_range(4, 100), vec![4, 5]);
        assert_eq!(seq.to_vec_range(5, 2), Vec::<u32>::new());
        assert_eq!(seq.iter_range(0, 6).rev().collect::<Vec<_>>(), vec![5, 4, 3, 2, 1, 0]);
    }

    #[test]
    fn test_binary_search_across_gap() {
        let mut seq = GapSequence::from_slice(&[0, 4, 9, 15, 20]);
        for gap in 0..=5 {
            seq.move_gap_to(gap);
            assert_eq!(seq.binary_search(&0), Ok(0));
            assert_eq!(seq.binary_search(&9), Ok(2));
            assert_eq!(seq.binary_search(&20), Ok(4));
            assert_eq!(seq.binary_search(&10), Err(3));
            assert_eq!(seq.binary_search(&21), Err(5));
            assert_eq!(seq.partition_point(|&v| v <= 15), 4);
        }
    }

    #[test]
    fn test_for_each_from_mut() {
        let mut seq = GapSequence::from_slice(&[0, 1, 2, 3, 4]);
        seq.move_gap_to(2);
        seq.for_each_from_mut(1, |v| *v += 10);
        assert_eq!(collect(&seq), vec![0, 11, 12, 13, 14]);
        seq.for_each_from_mut(3, |v| *v += 1);
        assert_eq!(collect(&seq), vec![0, 11, 12, 14, 15]);
    }
}

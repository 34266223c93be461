//! A fixed-capacity bit set used for dominator sets.
//!
//! Each block of a function is identified by a dense index, so a set of blocks
//! fits in one bit per block. The dominator fixpoint only needs intersection,
//! membership and iteration, which is what this type provides.
//!
//! # Example
//!
//! ```rust
//! use ssagraph::utils::BitSet;
//!
//! let mut set = BitSet::new(70);
//! set.insert(3);
//! set.insert(10);
//! set.insert(65);
//! let mut other = BitSet::new(70);
//! other.insert(3);
//! other.insert(65);
//!
//! assert!(set.intersect_with(&other));
//! assert_eq!(set.iter().collect::<Vec<_>>(), vec![3, 65]);
//! assert!(set.is_subset(&other));
//! ```

use std::fmt;

const WORD_BITS: usize = 64;

/// A set of small integers stored as packed 64-bit words.
///
/// The capacity is fixed at construction. Operations taking an index panic if
/// the index is past the capacity; that is a programming error in the caller.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    words: Vec<u64>,
    len: usize,
}

impl BitSet {
    /// Creates an empty set able to hold indices `0..capacity`.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            words: vec![0; capacity.div_ceil(WORD_BITS)],
            len: capacity,
        }
    }

    /// Returns the capacity of this set.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no index is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    /// Adds `index` to the set.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn insert(&mut self, index: usize) {
        assert!(index < self.len, "bit index {index} out of bounds ({})", self.len);
        self.words[index / WORD_BITS] |= 1u64 << (index % WORD_BITS);
    }

    /// Returns `true` if `index` is in the set. Indices past the capacity are
    /// never contained.
    #[must_use]
    pub fn contains(&self, index: usize) -> bool {
        if index >= self.len {
            return false;
        }
        (self.words[index / WORD_BITS] & (1u64 << (index % WORD_BITS))) != 0
    }

    /// Returns the number of indices in the set.
    #[must_use]
    pub fn count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Intersects this set with `other` in place.
    ///
    /// Returns `true` if `self` changed.
    ///
    /// # Panics
    ///
    /// Panics if the capacities differ.
    pub fn intersect_with(&mut self, other: &Self) -> bool {
        assert_eq!(self.len, other.len, "bit sets must have the same capacity");
        let mut changed = false;
        for (a, b) in self.words.iter_mut().zip(other.words.iter()) {
            let old = *a;
            *a &= *b;
            changed |= old != *a;
        }
        changed
    }

    /// Returns `true` if every index of `self` is also in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.words
            .iter()
            .zip(other.words.iter().chain(std::iter::repeat(&0)))
            .all(|(a, b)| a & !b == 0)
    }

    /// Returns an iterator over the indices in ascending order.
    pub fn iter(&self) -> BitSetIter<'_> {
        BitSetIter {
            words: &self.words,
            word_idx: 0,
            current: self.words.first().copied().unwrap_or(0),
        }
    }
}

impl fmt::Debug for BitSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over the indices contained in a [`BitSet`].
pub struct BitSetIter<'a> {
    words: &'a [u64],
    word_idx: usize,
    current: u64,
}

impl Iterator for BitSetIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.current != 0 {
                let bit = self.current.trailing_zeros() as usize;
                self.current &= self.current - 1;
                return Some(self.word_idx * WORD_BITS + bit);
            }
            self.word_idx += 1;
            self.current = *self.words.get(self.word_idx)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bitset_basic() {
        let mut bs = BitSet::new(100);
        assert!(bs.is_empty());
        assert_eq!(bs.count(), 0);

        bs.insert(0);
        bs.insert(50);
        bs.insert(99);

        assert!(!bs.is_empty());
        assert_eq!(bs.count(), 3);
        assert!(bs.contains(50));
        assert!(!bs.contains(1));
        assert!(!bs.contains(1000));
    }

    #[test]
    fn test_bitset_intersect() {
        let mut a = BitSet::new(100);
        let mut b = BitSet::new(100);
        a.insert(0);
        a.insert(1);
        a.insert(2);
        b.insert(1);
        b.insert(2);
        b.insert(3);

        assert!(a.intersect_with(&b));
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1, 2]);
        assert!(!a.intersect_with(&b));
    }

    #[test]
    fn test_bitset_subset() {
        let mut a = BitSet::new(10);
        let mut b = BitSet::new(10);
        a.insert(2);
        b.insert(2);
        b.insert(7);

        assert!(a.is_subset(&b));
        assert!(!b.is_subset(&a));
        assert!(BitSet::new(10).is_subset(&a));
    }

    #[test]
    fn test_bitset_iter_across_words() {
        let mut bs = BitSet::new(200);
        bs.insert(5);
        bs.insert(64);
        bs.insert(199);

        assert_eq!(bs.iter().collect::<Vec<_>>(), vec![5, 64, 199]);
        assert_eq!(format!("{bs:?}"), "{5, 64, 199}");
    }

    #[test]
    fn test_bitset_empty_capacity() {
        let bs = BitSet::new(0);
        assert!(bs.is_empty());
        assert_eq!(bs.iter().next(), None);
    }
}

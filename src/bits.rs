use bitvec::prelude::*;
use num_traits::{NumCast, PrimInt};
use std::fmt;
use std::marker::PhantomData;

/// Dense set of small non-negative integers, one bit per possible element.
///
/// The backing storage grows on the first insert above the current high-water
/// mark and never shrinks.
#[derive(Clone)]
pub struct Bits<E = usize> {
    words: BitVec<usize, Lsb0>,
    _elem: PhantomData<E>,
}

impl<E: PrimInt> Default for Bits<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PrimInt> Bits<E> {
    pub fn new() -> Self {
        Self {
            words: BitVec::new(),
            _elem: PhantomData,
        }
    }

    /// Pre-sizes storage for elements in `0..bound`.
    pub fn with_bound(bound: usize) -> Self {
        Self {
            words: bitvec![usize, Lsb0; 0; bound],
            _elem: PhantomData,
        }
    }

    fn index(e: E) -> usize {
        assert!(e >= E::zero(), "negative element in bitset");
        e.to_usize().expect("bitset element does not fit in usize")
    }

    fn elem(i: usize) -> E {
        <E as NumCast>::from(i).expect("bitset index does not fit in element type")
    }

    /// Returns whether `e` was newly inserted.
    pub fn add(&mut self, e: E) -> bool {
        let i = Self::index(e);
        if i >= self.words.len() {
            let grown = (i + 1).next_multiple_of(usize::BITS as usize);
            self.words.resize(grown, false);
        }
        !self.words.replace(i, true)
    }

    pub fn contains(&self, e: E) -> bool {
        let i = Self::index(e);
        self.words.get(i).is_some_and(|b| *b)
    }

    /// Returns whether `e` was present.
    pub fn delete(&mut self, e: E) -> bool {
        let i = Self::index(e);
        i < self.words.len() && self.words.replace(i, false)
    }

    pub fn len(&self) -> usize {
        self.words.count_ones()
    }

    pub fn is_empty(&self) -> bool {
        self.words.not_any()
    }

    pub fn clear(&mut self) {
        self.words.fill(false);
    }

    /// Elements in ascending order.
    pub fn all(&self) -> impl DoubleEndedIterator<Item = E> + '_ {
        self.words.iter_ones().map(Self::elem)
    }

    pub fn descending(&self) -> impl Iterator<Item = E> + '_ {
        self.words.iter_ones().rev().map(Self::elem)
    }

    pub fn union_with(&mut self, other: &Self) {
        if other.words.len() > self.words.len() {
            self.words.resize(other.words.len(), false);
        }
        for i in other.words.iter_ones() {
            self.words.set(i, true);
        }
    }

    pub fn intersect_with(&mut self, other: &Self) {
        for i in self.words.iter_ones().collect::<Vec<_>>() {
            if !other.words.get(i).is_some_and(|b| *b) {
                self.words.set(i, false);
            }
        }
    }
}

impl<E: PrimInt> Extend<E> for Bits<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for e in iter {
            self.add(e);
        }
    }
}

impl<E: PrimInt> FromIterator<E> for Bits<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        let mut bits = Self::new();
        bits.extend(iter);
        bits
    }
}

impl<E: PrimInt + fmt::Debug> fmt::Debug for Bits<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.all()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_contains_delete() {
        let mut b = Bits::<i32>::new();
        assert!(b.is_empty());
        assert!(b.add(3));
        assert!(!b.add(3));
        assert!(b.add(200));
        assert!(b.contains(3));
        assert!(b.contains(200));
        assert!(!b.contains(4));
        assert!(!b.contains(10_000));
        assert_eq!(b.len(), 2);
        assert!(b.delete(3));
        assert!(!b.delete(3));
        assert!(!b.delete(99_999));
        assert_eq!(b.len(), 1);
    }

    #[test]
    fn iteration_order() {
        let b: Bits<u16> = [64, 1, 130, 0, 63].into_iter().collect();
        assert_eq!(b.all().collect::<Vec<_>>(), vec![0, 1, 63, 64, 130]);
        assert_eq!(b.descending().collect::<Vec<_>>(), vec![130, 64, 63, 1, 0]);
    }

    #[test]
    fn set_algebra() {
        let mut a: Bits = [1, 2, 3].into_iter().collect();
        let b: Bits = [2, 3, 500].into_iter().collect();
        let mut u = a.clone();
        u.union_with(&b);
        assert_eq!(u.all().collect::<Vec<_>>(), vec![1, 2, 3, 500]);
        a.intersect_with(&b);
        assert_eq!(a.all().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    #[should_panic(expected = "negative element")]
    fn negative_elements_are_fatal() {
        Bits::<i64>::new().add(-1);
    }
}

use crate::interval::{Bound, Interval, CO};
use std::fmt;

/// Union of integer intervals kept as sorted, non-empty, non-touching
/// half-open pieces.
#[derive(Clone, PartialEq, Eq, Hash, Default)]
pub struct IntervalSet<T> {
    pieces: Vec<CO<T>>,
}

impl<T: Bound> IntervalSet<T> {
    pub fn new() -> Self {
        Self { pieces: Vec::new() }
    }

    pub fn pieces(&self) -> &[CO<T>] {
        &self.pieces
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// At most one piece.
    pub fn continuous(&self) -> bool {
        self.pieces.len() <= 1
    }

    /// Total number of integers covered.
    pub fn len(&self) -> T {
        self.pieces.iter().fold(T::zero(), |acc, p| acc + p.len())
    }

    pub fn contains(&self, v: T) -> bool {
        let k = self.pieces.partition_point(|p| p.max <= v);
        self.pieces.get(k).is_some_and(|p| p.min <= v)
    }

    /// Merges `i` with every piece it overlaps or touches.
    pub fn add(&mut self, i: impl Interval<T>) {
        let i = i.to_co();
        if i.is_empty() {
            return;
        }
        let lo = self.pieces.partition_point(|p| p.max < i.min);
        let hi = self.pieces.partition_point(|p| p.min <= i.max);
        let merged = if lo < hi {
            CO {
                min: i.min.min(self.pieces[lo].min),
                max: i.max.max(self.pieces[hi - 1].max),
            }
        } else {
            i
        };
        self.pieces.splice(lo..hi, [merged]);
        debug_assert!(self.is_canonical(), "interval set out of order after add");
    }

    /// Clips the set to `i`.
    pub fn intersect(&mut self, i: impl Interval<T>) {
        let i = i.to_co();
        if i.is_empty() {
            self.pieces.clear();
            return;
        }
        let lo = self.pieces.partition_point(|p| p.max <= i.min);
        let hi = self.pieces.partition_point(|p| p.min < i.max).max(lo);
        self.pieces.truncate(hi);
        self.pieces.drain(..lo);
        if let Some(first) = self.pieces.first_mut() {
            first.min = first.min.max(i.min);
        }
        if let Some(last) = self.pieces.last_mut() {
            last.max = last.max.min(i.max);
        }
        debug_assert!(self.is_canonical(), "interval set out of order after intersect");
    }

    /// Removes every integer of `i` from the set.
    pub fn remove(&mut self, i: impl Interval<T>) {
        let i = i.to_co();
        if i.is_empty() {
            return;
        }
        let lo = self.pieces.partition_point(|p| p.max <= i.min);
        let hi = self.pieces.partition_point(|p| p.min < i.max);
        if lo >= hi {
            return;
        }
        let left = CO {
            min: self.pieces[lo].min,
            max: i.min,
        };
        let right = CO {
            min: i.max,
            max: self.pieces[hi - 1].max,
        };
        let keep = [left, right].into_iter().filter(|p| p.min < p.max);
        self.pieces.splice(lo..hi, keep);
        debug_assert!(self.is_canonical(), "interval set out of order after remove");
    }

    /// Every covered integer, ascending.
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.pieces.iter().flat_map(|p| p.iter())
    }

    fn is_canonical(&self) -> bool {
        self.pieces.iter().all(|p| p.min < p.max)
            && self.pieces.windows(2).all(|w| w[1].min > w[0].max)
    }
}

impl<T: Bound, I: Interval<T>> Extend<I> for IntervalSet<T> {
    fn extend<It: IntoIterator<Item = I>>(&mut self, iter: It) {
        for i in iter {
            self.add(i);
        }
    }
}

impl<T: Bound, I: Interval<T>> FromIterator<I> for IntervalSet<T> {
    fn from_iter<It: IntoIterator<Item = I>>(iter: It) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

impl<T: fmt::Debug> fmt::Debug for IntervalSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(&self.pieces).finish()
    }
}

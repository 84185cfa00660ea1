//! Binary min-heap with a pluggable `less` relation.
//!
//! Unlike [`std::collections::BinaryHeap`], elements can be re-prioritised in
//! place with [`Heap::fix`] and removed by index with [`Heap::remove`].

use std::fmt;

pub struct Heap<T, L = fn(&T, &T) -> bool> {
    items: Vec<T>,
    less: L,
}

impl<T: Ord> Heap<T> {
    /// Min-heap ordered by `Ord`.
    pub fn new() -> Self {
        Self::with_less(|a: &T, b: &T| a < b)
    }
}

impl<T: Ord> Default for Heap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, L: Fn(&T, &T) -> bool> Heap<T, L> {
    /// The element for which `less` holds against all others is popped first.
    pub fn with_less(less: L) -> Self {
        Self {
            items: Vec::new(),
            less,
        }
    }

    pub fn with_capacity(capacity: usize, less: L) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            less,
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear()
    }

    pub fn push(&mut self, v: T) {
        self.items.push(v);
        self.up(self.items.len() - 1);
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.items.is_empty() {
            return None;
        }
        let v = self.items.swap_remove(0);
        self.down(0);
        Some(v)
    }

    pub fn peek(&self) -> Option<&T> {
        self.items.first()
    }

    /// Elements in heap order, not sorted.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Mutable access to the element at `i`; call [`Heap::fix`] afterwards if its
    /// priority changed.
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        self.items.get_mut(i)
    }

    /// Restores the heap property after the element at `i` changed.
    pub fn fix(&mut self, i: usize) {
        assert!(i < self.items.len(), "heap index {} out of range", i);
        if i > 0 && (self.less)(&self.items[i], &self.items[(i - 1) / 2]) {
            self.up(i);
        } else {
            self.down(i);
        }
    }

    pub fn remove(&mut self, i: usize) -> T {
        assert!(i < self.items.len(), "heap index {} out of range", i);
        let v = self.items.swap_remove(i);
        if i < self.items.len() {
            self.fix(i);
        }
        v
    }

    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut out = Vec::with_capacity(self.items.len());
        while let Some(v) = self.pop() {
            out.push(v);
        }
        out
    }

    fn up(&mut self, mut i: usize) {
        while i > 0 {
            let parent = (i - 1) / 2;
            if !(self.less)(&self.items[i], &self.items[parent]) {
                break;
            }
            self.items.swap(i, parent);
            i = parent;
        }
    }

    fn down(&mut self, mut i: usize) {
        let n = self.items.len();
        loop {
            let left = 2 * i + 1;
            if left >= n {
                break;
            }
            let right = left + 1;
            let child = if right < n && (self.less)(&self.items[right], &self.items[left]) {
                right
            } else {
                left
            };
            if !(self.less)(&self.items[child], &self.items[i]) {
                break;
            }
            self.items.swap(i, child);
            i = child;
        }
    }

    #[cfg(test)]
    fn is_heap(&self) -> bool {
        (1..self.items.len()).all(|i| !(self.less)(&self.items[i], &self.items[(i - 1) / 2]))
    }
}

impl<T: Ord> FromIterator<T> for Heap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

impl<T, L: Fn(&T, &T) -> bool> Extend<T> for Heap<T, L> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.push(v);
        }
    }
}

impl<T: fmt::Debug, L> fmt::Debug for Heap<T, L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.items).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pops_in_order() {
        let h: Heap<i32> = [5, 1, 4, 1, 3, 9, 2].into_iter().collect();
        assert_eq!(h.peek(), Some(&1));
        assert_eq!(h.into_sorted_vec(), vec![1, 1, 2, 3, 4, 5, 9]);
    }

    #[test]
    fn custom_less_makes_a_max_heap() {
        let mut h = Heap::with_less(|a: &(u32, char), b: &(u32, char)| a.0 > b.0);
        h.push((2, 'b'));
        h.push((7, 'g'));
        h.push((4, 'd'));
        assert_eq!(h.pop(), Some((7, 'g')));
        assert_eq!(h.pop(), Some((4, 'd')));
        assert_eq!(h.pop(), Some((2, 'b')));
        assert_eq!(h.pop(), None);
    }

    #[test]
    fn fix_after_priority_change() {
        let mut h: Heap<i32> = (10..20).collect();
        let i = h.iter().position(|&v| v == 17).unwrap();
        *h.get_mut(i).unwrap() = 0;
        h.fix(i);
        assert!(h.is_heap());
        assert_eq!(h.pop(), Some(0));

        let i = h.iter().position(|&v| v == 10).unwrap();
        *h.get_mut(i).unwrap() = 100;
        h.fix(i);
        assert!(h.is_heap());
        assert_eq!(h.pop(), Some(11));
    }

    proptest! {
        #[test]
        fn heap_property_survives_every_operation(
            ops in prop::collection::vec((0u8..4, any::<i16>(), any::<prop::sample::Index>()), 1..200)
        ) {
            let mut h: Heap<i16> = Heap::new();
            let mut naive: Vec<i16> = Vec::new();
            for (op, v, at) in ops {
                match op {
                    0 | 1 => {
                        h.push(v);
                        naive.push(v);
                    }
                    2 => {
                        let popped = h.pop();
                        let min = naive.iter().copied().min();
                        prop_assert_eq!(popped, min);
                        if let Some(m) = min {
                            let j = naive.iter().position(|&x| x == m).unwrap();
                            naive.swap_remove(j);
                        }
                    }
                    _ => if !h.is_empty() {
                        let i = at.index(h.len());
                        let removed = h.remove(i);
                        let j = naive.iter().position(|&x| x == removed).unwrap();
                        naive.swap_remove(j);
                    }
                }
                prop_assert!(h.is_heap());
                prop_assert_eq!(h.len(), naive.len());
            }
        }
    }
}

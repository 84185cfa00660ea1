/// Insertion-ordered set of integers in `0..bound` with O(1) insert, lookup,
/// removal and clear.
///
/// `elems` holds the members in insertion order and `index[v]` points back into
/// it. Stale entries in `index` are harmless: membership is confirmed by the
/// round trip `elems[index[v]] == v`.
#[derive(Clone, Debug)]
pub struct Sparse {
    elems: Vec<usize>,
    index: Vec<usize>,
}

impl Sparse {
    pub fn new(bound: usize) -> Self {
        Self {
            elems: Vec::with_capacity(bound),
            index: vec![0; bound],
        }
    }

    pub fn bound(&self) -> usize {
        self.index.len()
    }

    pub fn contains(&self, v: usize) -> bool {
        self.index
            .get(v)
            .is_some_and(|&i| i < self.elems.len() && self.elems[i] == v)
    }

    /// Returns whether `v` was newly inserted.
    ///
    /// # Panics
    ///
    /// Panics if `v` is not below the bound.
    pub fn insert(&mut self, v: usize) -> bool {
        assert!(v < self.bound(), "element {} out of sparse set bound {}", v, self.bound());
        if self.contains(v) {
            return false;
        }
        self.index[v] = self.elems.len();
        self.elems.push(v);
        true
    }

    /// Returns whether `v` was present. The last inserted element takes the
    /// removed element's place in insertion order.
    pub fn remove(&mut self, v: usize) -> bool {
        if !self.contains(v) {
            return false;
        }
        let i = self.index[v];
        self.elems.swap_remove(i);
        if let Some(&moved) = self.elems.get(i) {
            self.index[moved] = i;
        }
        true
    }

    pub fn clear(&mut self) {
        self.elems.clear();
    }

    pub fn len(&self) -> usize {
        self.elems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elems.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.elems.iter().copied()
    }

    /// Ascending order, O(bound).
    pub fn sorted(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.bound()).filter(|&v| self.contains(v))
    }

    pub fn descending(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.bound()).rev().filter(|&v| self.contains(v))
    }
}

//! FIFO and LIFO queues plus a fixed-capacity ring buffer.

use std::fmt;

/// Growable FIFO over a wrap-around buffer.
///
/// `r` is the read index and `w` the write index. A full buffer is marked by
/// `w == s.len()`, so `r == w` always means empty.
pub struct Fifo<T> {
    s: Vec<Option<T>>,
    r: usize,
    w: usize,
}

impl<T> Default for Fifo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Fifo<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Up to `n` elements can be queued without reallocating.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            s: std::iter::repeat_with(|| None).take(n).collect(),
            r: 0,
            w: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.s.len()
    }

    fn is_full(&self) -> bool {
        self.w == self.s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.r == self.w
    }

    pub fn len(&self) -> usize {
        if self.is_full() {
            self.s.len()
        } else if self.w >= self.r {
            self.w - self.r
        } else {
            self.s.len() - self.r + self.w
        }
    }

    pub fn push(&mut self, v: T) {
        if self.is_full() {
            self.grow();
        }
        self.s[self.w] = Some(v);
        self.w += 1;
        if self.w == self.s.len() {
            self.w = 0;
        }
        if self.w == self.r {
            self.w = self.s.len();
        }
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.is_empty() {
            return None;
        }
        if self.is_full() {
            self.w = self.r;
        }
        let v = self.s[self.r].take();
        self.r += 1;
        if self.r == self.s.len() {
            self.r = 0;
        }
        v
    }

    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            self.s[self.r].as_ref()
        }
    }

    pub fn clear(&mut self) {
        while self.pop().is_some() {}
    }

    /// Queued elements, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let cap = self.s.len();
        (0..self.len()).filter_map(move |k| self.s[(self.r + k) % cap].as_ref())
    }

    // Only called when full: the contents are s[r..] followed by s[..r].
    fn grow(&mut self) {
        let cap = self.s.len();
        let grown_cap = (2 * cap).max(4);
        let mut grown = Vec::with_capacity(grown_cap);
        grown.extend(self.s.drain(self.r..));
        grown.extend(self.s.drain(..));
        grown.resize_with(grown_cap, || None);
        self.s = grown;
        self.r = 0;
        self.w = cap;
    }
}

impl<T> Extend<T> for Fifo<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for v in iter {
            self.push(v);
        }
    }
}

impl<T> FromIterator<T> for Fifo<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut q = Self::new();
        q.extend(iter);
        q
    }
}

impl<T: fmt::Debug> fmt::Debug for Fifo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[derive(Clone, Debug)]
pub struct Lifo<T>(Vec<T>);

impl<T> Default for Lifo<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T> Lifo<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self(Vec::with_capacity(n))
    }

    pub fn push(&mut self, v: T) {
        self.0.push(v)
    }

    pub fn pop(&mut self) -> Option<T> {
        self.0.pop()
    }

    pub fn peek(&self) -> Option<&T> {
        self.0.last()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn clear(&mut self) {
        self.0.clear()
    }
}

impl<T> Extend<T> for Lifo<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

/// Ring buffer of fixed capacity `N` that never grows.
pub struct Ring<T, const N: usize> {
    s: [Option<T>; N],
    r: usize,
    w: usize,
    full: bool,
}

impl<T, const N: usize> Default for Ring<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const N: usize> Ring<T, N> {
    pub fn new() -> Self {
        Self {
            s: std::array::from_fn(|_| None),
            r: 0,
            w: 0,
            full: false,
        }
    }

    pub fn is_full(&self) -> bool {
        self.full
    }

    pub fn is_empty(&self) -> bool {
        !self.full && self.r == self.w
    }

    pub fn len(&self) -> usize {
        if self.full {
            N
        } else if self.w >= self.r {
            self.w - self.r
        } else {
            N - self.r + self.w
        }
    }

    /// # Panics
    ///
    /// Panics if the buffer is full.
    pub fn push(&mut self, v: T) {
        assert!(!self.full && N > 0, "push onto full ring buffer");
        self.s[self.w] = Some(v);
        self.w = (self.w + 1) % N;
        self.full = self.w == self.r;
    }

    /// # Panics
    ///
    /// Panics if the buffer is empty.
    pub fn pop(&mut self) -> T {
        assert!(!self.is_empty(), "pop from empty ring buffer");
        let v = self.s[self.r].take();
        self.r = (self.r + 1) % N;
        self.full = false;
        v.expect("occupied ring slot")
    }

    pub fn peek(&self) -> Option<&T> {
        if self.is_empty() {
            None
        } else {
            self.s[self.r].as_ref()
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        (0..self.len()).filter_map(move |k| self.s[(self.r + k) % N].as_ref())
    }
}

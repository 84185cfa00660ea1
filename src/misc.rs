//! Odds and ends shared by the day solutions.

use itertools::Itertools;
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::io::{self, Write};

/// Comparator for [`crate::heap::Heap::with_less`] ordering by `key`.
pub fn less_by<T, K: PartialOrd>(key: impl Fn(&T) -> K) -> impl Fn(&T, &T) -> bool {
    move |a, b| key(a) < key(b)
}

/// Like [`less_by`], largest key first.
pub fn greater_by<T, K: PartialOrd>(key: impl Fn(&T) -> K) -> impl Fn(&T, &T) -> bool {
    move |a, b| key(a) > key(b)
}

/// Every unordered pair of distinct positions, in lexicographic order.
pub fn pairs<T>(items: &[T]) -> impl Iterator<Item = (&T, &T)> + '_ {
    items.iter().tuple_combinations()
}

/// Iterates `step` from `start` until a state repeats. Returns the index of
/// the first state on the cycle and the cycle length.
pub fn find_cycle<S: Clone + Eq + Hash>(start: S, step: impl Fn(&S) -> S) -> (usize, usize) {
    let mut seen = FxHashMap::default();
    let mut s = start;
    for i in 0.. {
        if let Some(first) = seen.insert(s.clone(), i) {
            return (first, i - first);
        }
        s = step(&s);
    }
    unreachable!("state space exhausted")
}

/// The state after `n` applications of `step`, skipping whole cycles.
pub fn nth_state<S: Clone + Eq + Hash>(start: S, step: impl Fn(&S) -> S, n: usize) -> S {
    let mut seen = FxHashMap::default();
    let mut history = Vec::new();
    let mut s = start;
    for i in 0..n {
        if let Some(&first) = seen.get(&s) {
            let period = i - first;
            return history.swap_remove(first + (n - first) % period);
        }
        seen.insert(s.clone(), i);
        history.push(s.clone());
        s = step(&s);
    }
    s
}

/// Writer that draws a box around everything written through it once
/// [`Framed::finish`] is called.
pub struct Framed<W: Write> {
    inner: W,
    buf: Vec<u8>,
}

impl<W: Write> Framed<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            buf: Vec::new(),
        }
    }

    pub fn finish(mut self) -> io::Result<W> {
        let text = String::from_utf8_lossy(&self.buf);
        let lines: Vec<&str> = text.lines().collect();
        let width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
        writeln!(self.inner, "┌{}┐", "─".repeat(width))?;
        for line in &lines {
            let pad = width - line.chars().count();
            writeln!(self.inner, "│{}{}│", line, " ".repeat(pad))?;
        }
        writeln!(self.inner, "└{}┘", "─".repeat(width))?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for Framed<W> {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::read_str;
    use crate::heap::Heap;

    #[test]
    fn ordering_helpers_drive_the_heap() {
        let mut h = Heap::with_less(less_by(|p: &(u32, char)| p.0));
        h.extend([(3, 'c'), (1, 'a'), (2, 'b')]);
        assert_eq!(h.pop(), Some((1, 'a')));

        let mut h = Heap::with_less(greater_by(|p: &(u32, char)| p.0));
        h.extend([(3, 'c'), (1, 'a'), (2, 'b')]);
        assert_eq!(h.pop(), Some((3, 'c')));
    }

    #[test]
    fn pairs_are_unordered() {
        let got: Vec<_> = pairs(&[1, 2, 3]).map(|(a, b)| (*a, *b)).collect();
        assert_eq!(got, vec![(1, 2), (1, 3), (2, 3)]);
        assert_eq!(pairs(&[1]).count(), 0);
    }

    #[test]
    fn cycles() {
        // 0 1 2 3 4 2 3 4 ...
        let step = |&s: &u32| if s == 4 { 2 } else { s + 1 };
        assert_eq!(find_cycle(0, step), (2, 3));
        assert_eq!(nth_state(0, step, 3), 3);
        assert_eq!(nth_state(0, step, 1_000_000_000), 2 + (1_000_000_000 - 2) % 3);
        assert_eq!(nth_state(7u32, |&s| s, 5), 7);
    }

    #[test]
    fn framed_grid() {
        let g = read_str("#.\n.#", Ok).unwrap();
        let mut out = Framed::new(Vec::new());
        write!(out, "{}", g).unwrap();
        let out = String::from_utf8(out.finish().unwrap()).unwrap();
        assert_eq!(out, "┌──┐\n│#.│\n│.#│\n└──┘\n");
    }
}

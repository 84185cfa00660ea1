use rustc_hash::FxHashSet;
use std::hash::Hash;

/// Hash set with the same verbs as [`crate::bits::Bits`], for elements that are
/// not small integers.
#[derive(Clone, Debug)]
pub struct Set<T>(FxHashSet<T>);

impl<T> Default for Set<T> {
    fn default() -> Self {
        Self(FxHashSet::default())
    }
}

impl<T: Eq + Hash> Set<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `v` was newly inserted.
    pub fn add(&mut self, v: T) -> bool {
        self.0.insert(v)
    }

    pub fn contains(&self, v: &T) -> bool {
        self.0.contains(v)
    }

    pub fn delete(&mut self, v: &T) -> bool {
        self.0.remove(v)
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

    pub fn all(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter()
    }

    pub fn is_subset(&self, other: &Self) -> bool {
        self.0.is_subset(&other.0)
    }
}

impl<T: Eq + Hash + Clone> Set<T> {
    pub fn union(&self, other: &Self) -> Self {
        self.0.union(&other.0).cloned().collect()
    }

    pub fn intersection(&self, other: &Self) -> Self {
        self.0.intersection(&other.0).cloned().collect()
    }

    pub fn difference(&self, other: &Self) -> Self {
        self.0.difference(&other.0).cloned().collect()
    }
}

impl<T: Eq + Hash> PartialEq for Set<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T: Eq + Hash> Eq for Set<T> {}

impl<T: Eq + Hash> FromIterator<T> for Set<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T: Eq + Hash> Extend<T> for Set<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.0.extend(iter)
    }
}

impl<T> IntoIterator for Set<T> {
    type Item = T;
    type IntoIter = std::collections::hash_set::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbs() {
        let mut s = Set::new();
        assert!(s.add("a"));
        assert!(!s.add("a"));
        assert!(s.add("b"));
        assert!(s.contains(&"b"));
        assert!(s.delete(&"b"));
        assert!(!s.contains(&"b"));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn algebra() {
        let a: Set<i32> = [1, 2, 3].into_iter().collect();
        let b: Set<i32> = [2, 3, 4].into_iter().collect();
        assert_eq!(a.union(&b), [1, 2, 3, 4].into_iter().collect::<Set<_>>());
        assert_eq!(a.intersection(&b), [2, 3].into_iter().collect::<Set<_>>());
        assert_eq!(a.difference(&b), [1].into_iter().collect::<Set<_>>());
        assert!(a.intersection(&b).is_subset(&a));
    }
}

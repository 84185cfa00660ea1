//! Byte-indexed prefix tree.
//!
//! Every node owns up to 256 children, one per byte value, so lookups cost one
//! array index per key byte. Iteration is lexicographic and reuses a single key
//! buffer; [`Cursor::next`] lends the key for one step only.

type Children<V> = Box<[Option<Box<Node<V>>>; 256]>;

struct Node<V> {
    value: Option<V>,
    children: Option<Children<V>>,
}

impl<V> Node<V> {
    fn new() -> Self {
        Self {
            value: None,
            children: None,
        }
    }

    fn child(&self, b: u8) -> Option<&Node<V>> {
        self.children.as_ref()?[b as usize].as_deref()
    }

    fn child_mut(&mut self, b: u8) -> Option<&mut Node<V>> {
        self.children.as_mut()?[b as usize].as_deref_mut()
    }

    fn child_or_insert(&mut self, b: u8) -> &mut Node<V> {
        let children = self
            .children
            .get_or_insert_with(|| Box::new(std::array::from_fn(|_| None)));
        children[b as usize].get_or_insert_with(|| Box::new(Node::new()))
    }

    fn is_empty(&self) -> bool {
        self.value.is_none() && self.children.is_none()
    }

    fn descend(&self, key: &[u8]) -> Option<&Node<V>> {
        key.iter().try_fold(self, |node, &b| node.child(b))
    }

    // Removes the value under `key` and prunes every node left without values.
    fn delete(&mut self, key: &[u8]) -> Option<V> {
        let Some((&b, rest)) = key.split_first() else {
            return self.value.take();
        };
        let child = self.child_mut(b)?;
        let removed = child.delete(rest)?;
        if child.is_empty() {
            if let Some(children) = self.children.as_mut() {
                children[b as usize] = None;
                if children.iter().all(Option::is_none) {
                    self.children = None;
                }
            }
        }
        Some(removed)
    }
}

pub struct RadixTree<V> {
    root: Node<V>,
    len: usize,
}

impl<V> Default for RadixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> RadixTree<V> {
    pub fn new() -> Self {
        Self {
            root: Node::new(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the previous value under `key`.
    pub fn set(&mut self, key: impl AsRef<[u8]>, v: V) -> Option<V> {
        let node = key
            .as_ref()
            .iter()
            .fold(&mut self.root, |node, &b| node.child_or_insert(b));
        let old = node.value.replace(v);
        if old.is_none() {
            self.len += 1;
        }
        old
    }

    pub fn get(&self, key: impl AsRef<[u8]>) -> Option<&V> {
        self.root.descend(key.as_ref())?.value.as_ref()
    }

    pub fn get_mut(&mut self, key: impl AsRef<[u8]>) -> Option<&mut V> {
        let mut node = &mut self.root;
        for &b in key.as_ref() {
            node = node.child_mut(b)?;
        }
        node.value.as_mut()
    }

    pub fn contains_key(&self, key: impl AsRef<[u8]>) -> bool {
        self.get(key).is_some()
    }

    pub fn delete(&mut self, key: impl AsRef<[u8]>) -> Option<V> {
        let removed = self.root.delete(key.as_ref());
        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// All entries in lexicographic key order.
    pub fn all(&self) -> Cursor<'_, V> {
        Cursor::new(Some(&self.root), Vec::new())
    }

    /// Entries whose key starts with `prefix`, in lexicographic order.
    pub fn with_prefix(&self, prefix: impl AsRef<[u8]>) -> Cursor<'_, V> {
        let prefix = prefix.as_ref();
        Cursor::new(self.root.descend(prefix), prefix.to_vec())
    }

    /// Entries whose key is a prefix of `s`, shortest first. Keys are
    /// sub-slices of `s`.
    pub fn prefixes_of<'s>(&self, s: &'s [u8]) -> Prefixes<'_, 's, V> {
        Prefixes {
            node: Some(&self.root),
            s,
            depth: 0,
        }
    }
}

impl<K: AsRef<[u8]>, V> FromIterator<(K, V)> for RadixTree<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        for (k, v) in iter {
            tree.set(k, v);
        }
        tree
    }
}

/// Depth-first walk over a subtree. The yielded key borrows the cursor's
/// buffer and is overwritten by the next step; copy it to keep it.
pub struct Cursor<'t, V> {
    // Node and the next child byte to visit; `None` until the node's own value
    // has been offered.
    stack: Vec<(&'t Node<V>, Option<usize>)>,
    key: Vec<u8>,
}

impl<'t, V> Cursor<'t, V> {
    fn new(start: Option<&'t Node<V>>, key: Vec<u8>) -> Self {
        Self {
            stack: start.into_iter().map(|n| (n, None)).collect(),
            key,
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<(&[u8], &'t V)> {
        loop {
            let top = self.stack.last_mut()?;
            let node = top.0;
            match top.1 {
                None => {
                    top.1 = Some(0);
                    if let Some(v) = node.value.as_ref() {
                        return Some((&self.key, v));
                    }
                }
                Some(from) => {
                    let next = node
                        .children
                        .as_ref()
                        .and_then(|c| (from..256).find(|&b| c[b].is_some()));
                    match next.and_then(|b| Some((b, node.child(b as u8)?))) {
                        Some((b, child)) => {
                            top.1 = Some(b + 1);
                            self.key.push(b as u8);
                            self.stack.push((child, None));
                        }
                        None => {
                            self.stack.pop();
                            if !self.stack.is_empty() {
                                self.key.pop();
                            }
                        }
                    }
                }
            }
        }
    }

    pub fn for_each(mut self, mut f: impl FnMut(&[u8], &'t V)) {
        while let Some((k, v)) = self.next() {
            f(k, v);
        }
    }

    /// Drains the cursor, copying every key.
    pub fn into_owned(mut self) -> Vec<(Vec<u8>, &'t V)> {
        let mut out = Vec::new();
        while let Some((k, v)) = self.next() {
            out.push((k.to_vec(), v));
        }
        out
    }
}

pub struct Prefixes<'t, 's, V> {
    node: Option<&'t Node<V>>,
    s: &'s [u8],
    depth: usize,
}

impl<'t, 's, V> Iterator for Prefixes<'t, 's, V> {
    type Item = (&'s [u8], &'t V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.node?;
            let depth = self.depth;
            self.node = self.s.get(depth).and_then(|&b| node.child(b));
            self.depth += 1;
            if let Some(v) = node.value.as_ref() {
                return Some((&self.s[..depth], v));
            }
        }
    }
}

/// Set of byte strings backed by a [`RadixTree`].
#[derive(Default)]
pub struct RadixSet(RadixTree<()>);

impl RadixSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether `key` was newly inserted.
    pub fn insert(&mut self, key: impl AsRef<[u8]>) -> bool {
        self.0.set(key, ()).is_none()
    }

    pub fn contains(&self, key: impl AsRef<[u8]>) -> bool {
        self.0.contains_key(key)
    }

    pub fn remove(&mut self, key: impl AsRef<[u8]>) -> bool {
        self.0.delete(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn all(&self) -> KeyCursor<'_> {
        KeyCursor(self.0.all())
    }

    pub fn with_prefix(&self, prefix: impl AsRef<[u8]>) -> KeyCursor<'_> {
        KeyCursor(self.0.with_prefix(prefix))
    }

    pub fn prefixes_of<'t, 's>(&'t self, s: &'s [u8]) -> impl Iterator<Item = &'s [u8]> + use<'t, 's> {
        self.0.prefixes_of(s).map(|(k, _)| k)
    }
}

impl<K: AsRef<[u8]>> FromIterator<K> for RadixSet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::new();
        for k in iter {
            set.insert(k);
        }
        set
    }
}

pub struct KeyCursor<'t>(Cursor<'t, ()>);

impl KeyCursor<'_> {
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Option<&[u8]> {
        self.0.next().map(|(k, _)| k)
    }

    pub fn into_owned(self) -> Vec<Vec<u8>> {
        self.0.into_owned().into_iter().map(|(k, _)| k).collect()
    }
}

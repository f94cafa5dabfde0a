//! OrderedMap: balanced multiway (B-tree) map with split-based insertion.
//!
//! A node holds a sorted run of entries and, unless it is a leaf, one
//! more child than it has entries: child `i` covers the keys below entry
//! `i`, the trailing child covers the keys above the last entry. A node
//! that reaches `M - 1` entries after an insert splits at once: entries
//! strictly below the median move into a freshly allocated left sibling,
//! the original node keeps the upper half in place, and the median is
//! promoted to the parent as a "floater" whose less-than child is the new
//! sibling. A floater escaping the root grows the tree by one level; this
//! is the only way height increases, so all leaves stay at equal depth.
//!
//! Deletion is not supported. The split-only balancing above has no
//! merge/steal counterpart, and entries are never removed.
//!
//! Ordered traversal goes through [`Cursor`](crate::cursor::Cursor),
//! which keeps the root-to-position path on an explicit growable stack;
//! nodes carry no parent links.

use core::borrow::Borrow;
use core::mem;

use crate::cursor::Cursor;

pub(crate) struct Node<K, V> {
    pub(crate) entries: Vec<(K, V)>,
    pub(crate) children: Vec<Box<Node<K, V>>>,
}

impl<K, V> Node<K, V> {
    pub(crate) fn leaf() -> Self {
        Node {
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn search<Q>(&self, q: &Q) -> Result<usize, usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.entries.binary_search_by(|(k, _)| k.borrow().cmp(q))
    }
}

// Outcome of one level of the insertion descent. The floater carries the
// promoted median together with the new left sibling; the caller places
// both at the child position it descended through.
enum Planted<K, V> {
    Replaced(V),
    Placed,
    Split {
        floater: (K, V),
        left: Box<Node<K, V>>,
    },
}

fn insert_rec<K, V, const M: usize>(node: &mut Node<K, V>, key: K, value: V) -> Planted<K, V>
where
    K: Ord,
{
    match node.entries.binary_search_by(|(k, _)| k.cmp(&key)) {
        Ok(i) => Planted::Replaced(mem::replace(&mut node.entries[i].1, value)),
        Err(i) => {
            if node.is_leaf() {
                node.entries.insert(i, (key, value));
                split_if_full::<K, V, M>(node)
            } else {
                match insert_rec::<K, V, M>(&mut node.children[i], key, value) {
                    Planted::Split { floater, left } => {
                        node.entries.insert(i, floater);
                        node.children.insert(i, left);
                        split_if_full::<K, V, M>(node)
                    }
                    other => other,
                }
            }
        }
    }
}

fn split_if_full<K, V, const M: usize>(node: &mut Node<K, V>) -> Planted<K, V> {
    if node.entries.len() < M - 1 {
        return Planted::Placed;
    }

    // Node just reached M - 1 entries. Median entry `mid` floats up; the
    // entries (and children) strictly below it move to a new left
    // sibling, and this node keeps the upper half in place so the
    // parent's existing child pointer stays valid as the right half.
    let mid = node.entries.len() / 2;
    let mut left = Box::new(Node::leaf());
    if !node.is_leaf() {
        left.children = node.children.drain(..=mid).collect();
    }
    left.entries = node.entries.drain(..mid).collect();
    let floater = node.entries.remove(0);
    Planted::Split { floater, left }
}

pub struct OrderedMap<K, V, const M: usize = 8> {
    root: Node<K, V>,
    len: usize,
}

impl<K, V, const M: usize> OrderedMap<K, V, M>
where
    K: Ord,
{
    /// Empty map with a single empty leaf root.
    ///
    /// The branching factor must be at least 4; smaller values cannot
    /// split a full node into two non-empty halves plus a median.
    pub fn new() -> Self {
        assert!(M >= 4, "OrderedMap branching factor M must be at least 4");
        OrderedMap {
            root: Node::leaf(),
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut node = &self.root;
        loop {
            match node.search(q) {
                Ok(i) => return Some(&node.entries[i].1),
                Err(i) => {
                    if node.is_leaf() {
                        return None;
                    }
                    node = &node.children[i];
                }
            }
        }
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut node = &mut self.root;
        loop {
            match node.search(q) {
                Ok(i) => return Some(&mut node.entries[i].1),
                Err(i) => {
                    if node.is_leaf() {
                        return None;
                    }
                    node = &mut node.children[i];
                }
            }
        }
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get(q).is_some()
    }

    /// Inserts `value` under `key`, returning the previous value if the
    /// key was already present. The tree only mutates for new keys beyond
    /// the value swap.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match insert_rec::<K, V, M>(&mut self.root, key, value) {
            Planted::Replaced(old) => Some(old),
            Planted::Placed => {
                self.len += 1;
                None
            }
            Planted::Split { floater, left } => {
                // Floater escaped the root: new root with the old root as
                // its greater-than child and the split sibling below.
                let old_root = mem::replace(&mut self.root, Node::leaf());
                self.root.entries.push(floater);
                self.root.children = vec![left, Box::new(old_root)];
                self.len += 1;
                None
            }
        }
    }

    /// Returns the value for `key`, inserting `default()` first if the
    /// key is absent. The closure runs only on a genuine insert.
    ///
    /// Needs `K: Clone`: a split relocates entries, so the slot has to be
    /// found again by a fresh descent after the insert.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        K: Clone,
        F: FnOnce() -> V,
    {
        let probe = key.clone();
        if !self.contains_key(&probe) {
            self.insert(key, default());
        }
        match self.get_mut(&probe) {
            Some(value) => value,
            None => unreachable!("entry was just inserted"),
        }
    }

    /// Cursor positioned exactly at `key`, or an empty cursor if absent.
    pub fn cursor<Q>(&self, q: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut cursor = Cursor::empty();
        if self.len > 0 && !cursor.seek(&self.root, q) {
            return Cursor::empty();
        }
        cursor
    }

    /// Cursor at the minimum key; empty if the map is empty.
    pub fn min_cursor(&self) -> Cursor<'_, K, V> {
        let mut cursor = Cursor::empty();
        if self.len > 0 {
            cursor.descend_min(&self.root);
        }
        cursor
    }

    /// Cursor at the maximum key; empty if the map is empty.
    pub fn max_cursor(&self) -> Cursor<'_, K, V> {
        let mut cursor = Cursor::empty();
        if self.len > 0 {
            cursor.descend_max(&self.root);
        }
        cursor
    }

    /// Cursor at the greatest key at or below `q`; empty if every key is
    /// greater.
    pub fn floor_cursor<Q>(&self, q: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut cursor = Cursor::empty();
        if self.len > 0 && !cursor.seek(&self.root, q) {
            cursor.back_off_to_floor();
        }
        cursor
    }

    /// Cursor at the least key at or above `q`; empty if every key is
    /// smaller.
    pub fn ceil_cursor<Q>(&self, q: &Q) -> Cursor<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut cursor = Cursor::empty();
        if self.len > 0 && !cursor.seek(&self.root, q) {
            cursor.back_off_to_ceil();
        }
        cursor
    }

    /// Ascending iterator over all entries (a cursor walk from the
    /// minimum).
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            cursor: self.min_cursor(),
        }
    }

    pub(crate) fn root(&self) -> &Node<K, V> {
        &self.root
    }
}

impl<K, V, const M: usize> Default for OrderedMap<K, V, M>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Ascending iterator over `OrderedMap` entries.
pub struct Iter<'a, K, V> {
    cursor: Cursor<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.cursor.entry()?;
        self.cursor.next();
        Some(entry)
    }
}

#[cfg(test)]
impl<K, V, const M: usize> OrderedMap<K, V, M>
where
    K: Ord,
{
    /// Test helper: walks the whole tree asserting the structural
    /// invariants (sorted nodes, child counts, key separation, equal leaf
    /// depth, node occupancy, entry count).
    pub(crate) fn check_invariants(&self) {
        fn walk<K: Ord, V>(
            node: &Node<K, V>,
            lower: Option<&K>,
            upper: Option<&K>,
            is_root: bool,
            max_entries: usize,
        ) -> (usize, usize) {
            assert!(
                node.entries.len() <= max_entries,
                "node exceeds resting occupancy"
            );
            if !is_root {
                assert!(!node.entries.is_empty(), "non-root node must not be empty");
            }
            for pair in node.entries.windows(2) {
                assert!(pair[0].0 < pair[1].0, "entries must be strictly sorted");
            }
            if let (Some(low), Some((first, _))) = (lower, node.entries.first()) {
                assert!(low < first, "entry below its subtree lower bound");
            }
            if let (Some(high), Some((last, _))) = (upper, node.entries.last()) {
                assert!(last < high, "entry above its subtree upper bound");
            }

            if node.is_leaf() {
                return (1, node.entries.len());
            }
            assert_eq!(
                node.children.len(),
                node.entries.len() + 1,
                "internal node must have entry_count + 1 children"
            );
            let mut count = node.entries.len();
            let mut depth = None;
            for (i, child) in node.children.iter().enumerate() {
                let low = if i == 0 { lower } else { Some(&node.entries[i - 1].0) };
                let high = if i == node.entries.len() {
                    upper
                } else {
                    Some(&node.entries[i].0)
                };
                let (child_depth, child_count) = walk(child, low, high, false, max_entries);
                match depth {
                    None => depth = Some(child_depth),
                    Some(d) => assert_eq!(d, child_depth, "leaves must sit at equal depth"),
                }
                count += child_count;
            }
            (depth.unwrap_or(0) + 1, count)
        }

        // Resting nodes hold at most M - 2 entries; a node that reaches
        // M - 1 splits before the operation returns.
        let (_, count) = walk(&self.root, None, None, true, M - 2);
        assert_eq!(count, self.len, "len must match the number of entries");
    }
}

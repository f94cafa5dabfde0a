//! Cursor: bidirectional position over an [`OrderedMap`].
//!
//! Tree nodes carry no parent links, so the cursor retains the whole
//! root-to-position path as an explicit, growable stack of
//! `(node, index)` frames. Frame discipline:
//!
//! - the top frame's index addresses the current entry inside its node;
//! - every frame below records which child the path descended into, so
//!   popping a frame recovers the in-order neighbor on that level:
//!   entry `c` comes right after child `c`, entry `c - 1` right before.
//!
//! Stepping past either end empties the cursor; an empty cursor stays
//! empty. The cursor borrows the map, which rules out structural
//! mutation while any cursor is alive.
//!
//! [`OrderedMap`]: crate::ordered_map::OrderedMap

use core::borrow::Borrow;

use crate::ordered_map::Node;

pub struct Cursor<'a, K, V> {
    frames: Vec<(&'a Node<K, V>, usize)>,
}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn empty() -> Self {
        Cursor { frames: Vec::new() }
    }

    fn top(&self) -> Option<(&'a Node<K, V>, usize)> {
        self.frames.last().copied()
    }

    fn set_top_index(&mut self, index: usize) {
        if let Some(frame) = self.frames.last_mut() {
            frame.1 = index;
        }
    }

    /// True once the cursor has stepped past either end (or never pointed
    /// anywhere).
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn key(&self) -> Option<&'a K> {
        self.top().map(|(node, i)| &node.entries[i].0)
    }

    pub fn value(&self) -> Option<&'a V> {
        self.top().map(|(node, i)| &node.entries[i].1)
    }

    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        self.top().map(|(node, i)| {
            let (key, value) = &node.entries[i];
            (key, value)
        })
    }

    // Leftmost descent: the minimum of `node`'s subtree becomes current.
    // Index 0 doubles as child 0 for the frames above the leaf.
    pub(crate) fn descend_min(&mut self, mut node: &'a Node<K, V>) {
        loop {
            self.frames.push((node, 0));
            if node.is_leaf() {
                return;
            }
            node = &node.children[0];
        }
    }

    // Rightmost descent: the maximum of `node`'s subtree becomes current.
    // Internal frames record the trailing child index.
    pub(crate) fn descend_max(&mut self, mut node: &'a Node<K, V>) {
        loop {
            if node.is_leaf() {
                self.frames.push((node, node.entries.len() - 1));
                return;
            }
            self.frames.push((node, node.entries.len()));
            node = &node.children[node.entries.len()];
        }
    }

    // Descends from `node` comparing keys, pushing one frame per level.
    // Returns true on an exact hit (top frame addresses the entry); on a
    // miss the top frame holds the leaf-level insertion point, which the
    // floor/ceil back-offs resolve to a neighbor.
    pub(crate) fn seek<Q>(&mut self, mut node: &'a Node<K, V>, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        loop {
            match node.search(q) {
                Ok(i) => {
                    self.frames.push((node, i));
                    return true;
                }
                Err(i) => {
                    self.frames.push((node, i));
                    if node.is_leaf() {
                        return false;
                    }
                    node = &node.children[i];
                }
            }
        }
    }

    // After a missed seek, settle on the nearest smaller entry: the one
    // just before the leaf gap, or the first ancestor entry whose child
    // we came out of on the right.
    pub(crate) fn back_off_to_floor(&mut self) {
        if let Some((_, i)) = self.top() {
            if i > 0 {
                self.set_top_index(i - 1);
                return;
            }
        }
        self.frames.pop();
        while let Some((_, c)) = self.top() {
            if c > 0 {
                self.set_top_index(c - 1);
                return;
            }
            self.frames.pop();
        }
    }

    // Mirror image of `back_off_to_floor`: the entry right after the leaf
    // gap, or the first ancestor entry whose child we came out of on the
    // left.
    pub(crate) fn back_off_to_ceil(&mut self) {
        if let Some((node, i)) = self.top() {
            if i < node.entries.len() {
                return;
            }
        }
        self.frames.pop();
        while let Some((node, c)) = self.top() {
            if c < node.entries.len() {
                return;
            }
            self.frames.pop();
        }
    }

    /// Advances to the next entry in key order; past the maximum the
    /// cursor becomes empty.
    pub fn next(&mut self) {
        let Some((node, i)) = self.top() else {
            return;
        };
        if !node.is_leaf() {
            // The successor is the minimum of the child after entry i.
            self.set_top_index(i + 1);
            self.descend_min(&node.children[i + 1]);
            return;
        }
        if i + 1 < node.entries.len() {
            self.set_top_index(i + 1);
            return;
        }
        // Leaf exhausted: pop until some ancestor still has an entry
        // after the child we came out of.
        self.frames.pop();
        while let Some((n, c)) = self.top() {
            if c < n.entries.len() {
                return;
            }
            self.frames.pop();
        }
    }

    /// Retreats to the previous entry in key order; past the minimum the
    /// cursor becomes empty.
    pub fn prev(&mut self) {
        let Some((node, i)) = self.top() else {
            return;
        };
        if !node.is_leaf() {
            // The predecessor is the maximum of the child before entry i.
            self.set_top_index(i);
            self.descend_max(&node.children[i]);
            return;
        }
        if i > 0 {
            self.set_top_index(i - 1);
            return;
        }
        self.frames.pop();
        while let Some((_, c)) = self.top() {
            if c > 0 {
                self.set_top_index(c - 1);
                return;
            }
            self.frames.pop();
        }
    }
}

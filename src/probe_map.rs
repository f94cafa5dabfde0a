//! ProbeMap: open-addressing hash table with linear probing and
//! backward-shift deletion.
//!
//! All entries live in one flat slot array whose capacity is always a
//! power of two. A key's probe sequence starts at `hash & (capacity - 1)`
//! and scans forward with wraparound. Removal never leaves tombstones:
//! the cluster following the vacated slot is re-probed entry by entry
//! from each entry's own home index, so every live key stays reachable
//! from its own hash. The table doubles before an insert would reach
//! [`HIGH_LOAD`] and halves after a removal leaves it at or below
//! [`LOW_LOAD`], never dropping under [`MIN_CAPACITY`].

use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;
use std::collections::hash_map::RandomState;

/// Smallest slot-array size; shrinking never goes below this.
pub const MIN_CAPACITY: usize = 16;

/// Grow (double and rehash) before an insert would reach this load factor.
pub const HIGH_LOAD: f64 = 0.75;

/// Shrink (halve and rehash) after a removal leaves the load at or below
/// this. Must stay strictly below [`HIGH_LOAD`].
pub const LOW_LOAD: f64 = 0.25;

#[derive(Debug)]
struct Slot<K, V> {
    key: K,
    value: V,
    hash: u64,
}

pub struct ProbeMap<K, V, S = RandomState> {
    hasher: S,
    slots: Vec<Option<Slot<K, V>>>,
    len: usize,
}

impl<K, V> ProbeMap<K, V>
where
    K: Eq + Hash,
{
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Sizes the table so `hint` entries fit without resizing: capacity is
    /// the smallest power of two at or above `hint / HIGH_LOAD`, floored
    /// at [`MIN_CAPACITY`].
    pub fn with_capacity(hint: usize) -> Self {
        Self::with_capacity_and_hasher(hint, Default::default())
    }
}

impl<K, V> Default for ProbeMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

fn empty_slots<K, V>(capacity: usize) -> Vec<Option<Slot<K, V>>> {
    let mut slots = Vec::with_capacity(capacity);
    slots.resize_with(capacity, || None);
    slots
}

impl<K, V, S> ProbeMap<K, V, S>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    pub fn with_hasher(hasher: S) -> Self {
        Self::with_capacity_and_hasher(0, hasher)
    }

    pub fn with_capacity_and_hasher(hint: usize, hasher: S) -> Self {
        let want = (hint as f64 / HIGH_LOAD).ceil() as usize;
        let mut capacity = MIN_CAPACITY;
        while capacity < want {
            capacity <<= 1;
        }
        ProbeMap {
            hasher,
            slots: empty_slots(capacity),
            len: 0,
        }
    }

    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current slot-array size. Always a power of two, at least
    /// [`MIN_CAPACITY`], and sized so that `len / capacity` stays inside
    /// the configured load-factor band.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Linear probe from the home index of `hash`: `Ok(index)` of the slot
    /// holding an equal key, or `Err(index)` of the first empty slot.
    /// Terminates because the load factor keeps at least one slot empty.
    fn probe<Q>(&self, hash: u64, q: &Q) -> Result<usize, usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let mask = self.slots.len() - 1;
        let mut i = (hash as usize) & mask;
        loop {
            match &self.slots[i] {
                None => return Err(i),
                Some(slot) if slot.hash == hash && slot.key.borrow() == q => return Ok(i),
                Some(_) => i = (i + 1) & mask,
            }
        }
    }

    // First empty slot probing from the home index of `hash`. Used when
    // the key is known absent: rehashes and backward shifts.
    fn first_empty_from(&self, hash: u64) -> usize {
        let mask = self.slots.len() - 1;
        let mut i = (hash as usize) & mask;
        while self.slots[i].is_some() {
            i = (i + 1) & mask;
        }
        i
    }

    // Full rehash into a fresh slot array, placing every entry by its
    // stored hash. `K: Hash` is not consulted here.
    fn rehash_into(&mut self, new_capacity: usize) {
        debug_assert!(new_capacity.is_power_of_two());
        debug_assert!(new_capacity >= MIN_CAPACITY);
        let old = mem::replace(&mut self.slots, empty_slots(new_capacity));
        for slot in old.into_iter().flatten() {
            let i = self.first_empty_from(slot.hash);
            self.slots[i] = Some(slot);
        }
    }

    // Called before placing a new entry, so the entry being inserted also
    // lands in the enlarged table.
    fn grow_if_needed(&mut self) {
        if (self.len + 1) as f64 >= HIGH_LOAD * self.slots.len() as f64 {
            let capacity = self.slots.len() * 2;
            self.rehash_into(capacity);
        }
    }

    fn shrink_if_sparse(&mut self) {
        while self.slots.len() > MIN_CAPACITY
            && self.len as f64 <= LOW_LOAD * self.slots.len() as f64
        {
            let capacity = self.slots.len() / 2;
            self.rehash_into(capacity);
        }
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        match self.probe(hash, q) {
            Ok(i) => self.slots[i].as_ref().map(|slot| &slot.value),
            Err(_) => None,
        }
    }

    pub fn get_mut<Q>(&mut self, q: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        match self.probe(hash, q) {
            Ok(i) => self.slots[i].as_mut().map(|slot| &mut slot.value),
            Err(_) => None,
        }
    }

    pub fn contains_key<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        self.probe(hash, q).is_ok()
    }

    /// Inserts `value` under `key`, returning the previous value if the
    /// key was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let hash = self.make_hash(&key);
        match self.probe(hash, &key) {
            Ok(i) => {
                // probe() only returns Ok for an occupied slot.
                let slot = self.slots[i].as_mut().unwrap();
                Some(mem::replace(&mut slot.value, value))
            }
            Err(_) => {
                self.grow_if_needed();
                let i = self.first_empty_from(hash);
                self.slots[i] = Some(Slot { key, value, hash });
                self.len += 1;
                None
            }
        }
    }

    /// Returns the value for `key`, inserting `default()` first if the key
    /// is absent. The closure runs only on a genuine insert.
    pub fn get_or_insert_with<F>(&mut self, key: K, default: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let hash = self.make_hash(&key);
        let i = match self.probe(hash, &key) {
            Ok(i) => i,
            Err(_) => {
                self.grow_if_needed();
                let i = self.first_empty_from(hash);
                self.slots[i] = Some(Slot {
                    key,
                    value: default(),
                    hash,
                });
                self.len += 1;
                i
            }
        };
        match &mut self.slots[i] {
            Some(slot) => &mut slot.value,
            None => unreachable!("slot was just located or filled"),
        }
    }

    /// Removes `key` if present and returns its value.
    ///
    /// Uses backward-shift cleanup: after vacating the slot, every entry in
    /// the cluster that follows is lifted out and re-probed from its own
    /// home index, which lets it slide back into the gap (or an earlier
    /// hole opened by this walk). The walk stops at the first empty slot.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let hash = self.make_hash(q);
        let i = match self.probe(hash, q) {
            Ok(i) => i,
            Err(_) => return None,
        };
        let removed = self.slots[i].take()?;
        self.len -= 1;

        let mask = self.slots.len() - 1;
        let mut j = (i + 1) & mask;
        while let Some(slot) = self.slots[j].take() {
            let dst = self.first_empty_from(slot.hash);
            self.slots[dst] = Some(slot);
            j = (j + 1) & mask;
        }

        self.shrink_if_sparse();
        Some(removed.value)
    }

    /// Lazy iteration over all entries in arbitrary order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            inner: self.slots.iter(),
        }
    }

    pub fn iter_mut(&mut self) -> IterMut<'_, K, V> {
        IterMut {
            inner: self.slots.iter_mut(),
        }
    }
}

/// Iterator over immutable entries in `ProbeMap`, in slot order.
pub struct Iter<'a, K, V> {
    inner: core::slice::Iter<'a, Option<Slot<K, V>>>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.inner.by_ref() {
            if let Some(slot) = slot {
                return Some((&slot.key, &slot.value));
            }
        }
        None
    }
}

/// Iterator over mutable entries in `ProbeMap`, in slot order.
pub struct IterMut<'a, K, V> {
    inner: core::slice::IterMut<'a, Option<Slot<K, V>>>,
}

impl<'a, K, V> Iterator for IterMut<'a, K, V> {
    type Item = (&'a K, &'a mut V);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        for slot in self.inner.by_ref() {
            if let Some(slot) = slot {
                return Some((&slot.key, &mut slot.value));
            }
        }
        None
    }
}

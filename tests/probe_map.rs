// ProbeMap integration suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Lookup: an inserted key is found with its stored value; absent keys
//   miss with None, never an error.
// - Deletion: backward-shift cleanup keeps every surviving key reachable
//   by probing from its own hash, with no tombstones.
// - Resizing: the load factor stays inside the configured band while the
//   capacity doubles and halves around a power-of-two floor.
// - Determinism: FixedState produces identical layouts across instances.
use mapkit::probe_map::{HIGH_LOAD, LOW_LOAD, MIN_CAPACITY};
use mapkit::{FixedState, ProbeMap};
use std::collections::HashSet;
use std::hash::{BuildHasher, Hasher};

// Maps a u64 key to itself, making home slots predictable: key & (cap - 1).
#[derive(Clone, Default)]
struct IdentityBuildHasher;
struct IdentityHasher(u64);
impl BuildHasher for IdentityBuildHasher {
    type Hasher = IdentityHasher;
    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher(0)
    }
}
impl Hasher for IdentityHasher {
    fn write(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.0 = (self.0 << 8) | b as u64;
        }
    }
    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }
    fn finish(&self) -> u64 {
        self.0
    }
}

// Test: insert followed by an immediate lookup (spec scenario: the value
// read back must be the one just stored, not a default).
#[test]
fn insert_then_immediate_search_returns_value() {
    let mut m: ProbeMap<String, u64> = ProbeMap::new();
    m.insert("k".to_string(), 123);
    assert_eq!(m.get("k"), Some(&123));
}

// Test: ten keys at minimum capacity where 17 probes from the same home
// slot as 1. Removing the collided key must leave all nine others
// reachable (removal must repair the probe chain it sits in).
#[test]
fn removing_collided_key_keeps_others_reachable() {
    let keys: [u64; 10] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 17];
    assert_eq!(17 & (MIN_CAPACITY as u64 - 1), 1, "17 must collide with 1");

    let mut m: ProbeMap<u64, u64, IdentityBuildHasher> =
        ProbeMap::with_hasher(IdentityBuildHasher);
    for k in keys {
        m.insert(k, k * 100);
    }
    assert_eq!(m.capacity(), MIN_CAPACITY);

    assert_eq!(m.remove(&17), Some(1700));
    assert_eq!(m.len(), 9);
    for k in keys.into_iter().filter(|&k| k != 17) {
        assert!(m.contains_key(&k), "survivor {} lost", k);
        assert_eq!(m.get(&k), Some(&(k * 100)));
    }
}

// Test: same setup, but removing the home-slot occupant instead. The
// displaced collider must shift backward into the vacated slot and stay
// reachable from its own hash.
#[test]
fn removing_home_occupant_shifts_collider_back() {
    let mut m: ProbeMap<u64, u64, IdentityBuildHasher> =
        ProbeMap::with_hasher(IdentityBuildHasher);
    for k in [1u64, 2, 3, 4, 5, 6, 7, 8, 9, 17] {
        m.insert(k, k);
    }

    assert_eq!(m.remove(&1), Some(1));
    assert_eq!(m.get(&17), Some(&17), "collider must remain reachable");
    for k in [2u64, 3, 4, 5, 6, 7, 8, 9] {
        assert!(m.contains_key(&k));
    }
}

// Test: long interleaving of inserts and removes checked against an
// independent reference set after every step.
// Verifies: probe-chain liveness and exact len tracking over time.
#[test]
fn interleaved_ops_track_reference_set() {
    let mut m: ProbeMap<u64, u64, IdentityBuildHasher> =
        ProbeMap::with_hasher(IdentityBuildHasher);
    let mut reference: HashSet<u64> = HashSet::new();

    // LCG-driven mix of inserts and removes over a small key space so
    // clusters form, break, and reform.
    let mut state: u64 = 0x9e3779b97f4a7c15;
    for _ in 0..2000 {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1);
        let k = (state >> 33) % 97;
        if state % 3 == 0 {
            assert_eq!(m.remove(&k).is_some(), reference.remove(&k));
        } else {
            m.insert(k, k);
            reference.insert(k);
        }
        assert_eq!(m.len(), reference.len());
    }
    for &k in &reference {
        assert!(m.contains_key(&k), "live key {} unreachable", k);
    }
    for k in 0..97u64 {
        assert_eq!(m.contains_key(&k), reference.contains(&k));
    }
}

// Test: load-factor band over a grow-then-shrink cycle.
// Verifies: capacity is a power of two >= MIN_CAPACITY; load < HIGH_LOAD
// after each insert; load > LOW_LOAD after each remove unless already at
// the floor.
#[test]
fn capacity_band_through_grow_and_shrink() {
    let mut m: ProbeMap<u64, u64> = ProbeMap::new();
    for k in 0..2000u64 {
        m.insert(k, k);
        let cap = m.capacity();
        assert!(cap.is_power_of_two() && cap >= MIN_CAPACITY);
        assert!((m.len() as f64) < HIGH_LOAD * cap as f64);
    }
    for k in 0..2000u64 {
        m.remove(&k);
        let cap = m.capacity();
        assert!(cap.is_power_of_two() && cap >= MIN_CAPACITY);
        if cap > MIN_CAPACITY {
            assert!((m.len() as f64) > LOW_LOAD * cap as f64);
        }
    }
    assert!(m.is_empty());
    assert_eq!(m.capacity(), MIN_CAPACITY);
}

// Test: FixedState determinism end to end.
// Verifies: two independently built tables with the same keys present
// their entries in the same slot order.
#[test]
fn fixed_state_layouts_are_reproducible() {
    let build = || {
        let mut m: ProbeMap<String, u32, FixedState> =
            ProbeMap::with_hasher(FixedState::default());
        for i in 0..100u32 {
            m.insert(format!("key-{}", i), i);
        }
        m
    };
    let a = build();
    let b = build();
    let order_a: Vec<String> = a.iter().map(|(k, _)| k.clone()).collect();
    let order_b: Vec<String> = b.iter().map(|(k, _)| k.clone()).collect();
    assert_eq!(order_a, order_b);
}

// Test: value overwrite and the get_or_insert_with entry path agree on
// what is stored.
#[test]
fn overwrite_and_entry_paths_agree() {
    let mut m: ProbeMap<String, u32> = ProbeMap::new();
    assert_eq!(m.insert("a".to_string(), 1), None);
    assert_eq!(m.insert("a".to_string(), 2), Some(1));

    let v = m.get_or_insert_with("a".to_string(), || unreachable!("present key"));
    assert_eq!(*v, 2);
    *v += 1;

    let w = m.get_or_insert_with("b".to_string(), || 10);
    assert_eq!(*w, 10);

    assert_eq!(m.get("a"), Some(&3));
    assert_eq!(m.get("b"), Some(&10));
    assert_eq!(m.len(), 2);
}

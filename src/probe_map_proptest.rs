#![cfg(test)]

// Property tests for ProbeMap kept inside the crate so they can observe
// capacity and the load-factor band directly.

use crate::probe_map::{ProbeMap, HIGH_LOAD, LOW_LOAD, MIN_CAPACITY};
use proptest::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::hash::{BuildHasher, Hasher};

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations to improve shrinking: indices shrink to earlier
// keys, pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    GetOrInsert(usize, i32),
    Remove(usize),
    Get(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=8).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::GetOrInsert(i, v)),
            idx.clone().prop_map(OpI::Remove),
            idx.clone().prop_map(OpI::Get),
            prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Shared state-machine body so the random-hasher and the all-colliding
// variants exercise identical invariants:
// - insert returns the model's previous value; overwrite keeps len;
// - get/contains parity with the model, including borrowed &str lookups;
// - remove returns the model's value and misses afterwards;
// - every model key stays reachable after each op (probe-chain liveness);
// - iter sees exactly the live key set;
// - capacity stays a power of two within the load-factor band.
fn run_state_machine<S>(pool: Vec<String>, ops: Vec<OpI>, sut: &mut ProbeMap<Key, i32, S>)
where
    S: BuildHasher,
{
    let mut model: HashMap<Key, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(&pool, i);
                let old = sut.insert(k.clone(), v);
                assert_eq!(old, model.insert(k, v), "insert must return the old value");
            }
            OpI::GetOrInsert(i, v) => {
                let k = key_from(&pool, i);
                let present = model.contains_key(&k);
                let mut ran = false;
                let got = *sut.get_or_insert_with(k.clone(), || {
                    ran = true;
                    v
                });
                let expected = *model.entry(k).or_insert(v);
                assert_eq!(got, expected);
                assert_eq!(ran, !present, "closure must run exactly on genuine insert");
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                assert_eq!(sut.remove(k.0.as_str()), model.remove(&k));
            }
            OpI::Get(i) => {
                let k = key_from(&pool, i);
                assert_eq!(sut.get(&k), model.get(&k));
            }
            OpI::Contains(s) => {
                let has_model = model.keys().any(|k| k.0 == s);
                assert_eq!(sut.contains_key(s.as_str()), has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                match (sut.get_mut(&k), model.get_mut(&k)) {
                    (Some(v), Some(mv)) => {
                        *v = v.saturating_add(d);
                        *mv = mv.saturating_add(d);
                    }
                    (None, None) => {}
                    _ => panic!("get_mut presence diverged from model"),
                }
            }
            OpI::Iterate => {
                let seen: BTreeSet<Key> = sut.iter().map(|(k, _)| k.clone()).collect();
                let expected: BTreeSet<Key> = model.keys().cloned().collect();
                assert_eq!(seen, expected);
            }
        }

        // Post-conditions after each op
        // 1) Size parity with the model
        assert_eq!(sut.len(), model.len());
        assert_eq!(sut.is_empty(), model.is_empty());
        // 2) Probe-chain liveness: every model key remains reachable
        for k in model.keys() {
            assert!(sut.contains_key(k.0.as_str()), "live key {:?} unreachable", k);
        }
        // 3) Capacity stays a power of two inside the load-factor band
        let capacity = sut.capacity();
        assert!(capacity.is_power_of_two());
        assert!(capacity >= MIN_CAPACITY);
        let load = sut.len() as f64 / capacity as f64;
        assert!(load < HIGH_LOAD, "load {} reached HIGH_LOAD", load);
        if capacity > MIN_CAPACITY {
            assert!(load > LOW_LOAD, "load {} at or below LOW_LOAD", load);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let mut sut: ProbeMap<Key, i32> = ProbeMap::new();
        run_state_machine(pool, ops, &mut sut);
    }
}

// Collision variant using a constant hasher: every key shares one home
// slot, so every operation runs through a single probe cluster and every
// removal backward-shifts it.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let mut sut: ProbeMap<Key, i32, ConstBuildHasher> =
            ProbeMap::with_hasher(ConstBuildHasher);
        run_state_machine(pool, ops, &mut sut);
    }
}

#![cfg(test)]

// Property tests for OrderedMap kept inside the crate so they can call
// the structural invariant checker after every operation.

use crate::ordered_map::OrderedMap;
use proptest::prelude::*;
use std::collections::BTreeMap;

// Small keyspace so scenarios revisit keys (overwrites) and splits happen
// often at the default branching factor.
#[derive(Clone, Debug)]
enum OpI {
    Insert(i32, i32),
    GetOrInsert(i32, i32),
    Get(i32),
    Floor(i32),
    Ceil(i32),
    CursorExact(i32),
    WalkAsc,
    WalkDesc,
}

fn arb_ops() -> impl Strategy<Value = Vec<OpI>> {
    let key = -4..68i32;
    let op = prop_oneof![
        (key.clone(), any::<i32>()).prop_map(|(k, v)| OpI::Insert(k, v)),
        (key.clone(), any::<i32>()).prop_map(|(k, v)| OpI::GetOrInsert(k, v)),
        key.clone().prop_map(OpI::Get),
        key.clone().prop_map(OpI::Floor),
        key.clone().prop_map(OpI::Ceil),
        key.clone().prop_map(OpI::CursorExact),
        Just(OpI::WalkAsc),
        Just(OpI::WalkDesc),
    ];
    proptest::collection::vec(op, 1..120)
}

// Property: State-machine equivalence against std::collections::BTreeMap.
// Invariants exercised across random operation sequences:
// - insert returns the previous value; overwrites keep len;
// - get/contains parity; get_or_insert_with laziness;
// - floor/ceil agree with the model's range queries, including past-end;
// - exact cursors hit iff the model contains the key;
// - full ascending/descending walks equal the model's orderings;
// - the structural invariants (sorted nodes, child counts, equal leaf
//   depth) hold after every operation.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine(ops in arb_ops()) {
        let mut sut: OrderedMap<i32, i32> = OrderedMap::new();
        let mut model: BTreeMap<i32, i32> = BTreeMap::new();

        for op in ops {
            match op {
                OpI::Insert(k, v) => {
                    prop_assert_eq!(sut.insert(k, v), model.insert(k, v));
                }
                OpI::GetOrInsert(k, v) => {
                    let present = model.contains_key(&k);
                    let mut ran = false;
                    let got = *sut.get_or_insert_with(k, || {
                        ran = true;
                        v
                    });
                    let expected = *model.entry(k).or_insert(v);
                    prop_assert_eq!(got, expected);
                    prop_assert_eq!(ran, !present, "closure must run exactly on genuine insert");
                }
                OpI::Get(k) => {
                    prop_assert_eq!(sut.get(&k), model.get(&k));
                    prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
                }
                OpI::Floor(k) => {
                    let expected = model.range(..=k).next_back().map(|(k, v)| (k, v));
                    prop_assert_eq!(sut.floor_cursor(&k).entry(), expected);
                }
                OpI::Ceil(k) => {
                    let expected = model.range(k..).next().map(|(k, v)| (k, v));
                    prop_assert_eq!(sut.ceil_cursor(&k).entry(), expected);
                }
                OpI::CursorExact(k) => {
                    let cursor = sut.cursor(&k);
                    match model.get_key_value(&k) {
                        Some(entry) => prop_assert_eq!(cursor.entry(), Some(entry)),
                        None => prop_assert!(cursor.is_empty()),
                    }
                }
                OpI::WalkAsc => {
                    let mut cursor = sut.min_cursor();
                    let mut seen = Vec::new();
                    while let Some((k, v)) = cursor.entry() {
                        seen.push((*k, *v));
                        cursor.next();
                    }
                    let expected: Vec<(i32, i32)> =
                        model.iter().map(|(k, v)| (*k, *v)).collect();
                    prop_assert_eq!(seen, expected);
                }
                OpI::WalkDesc => {
                    let mut cursor = sut.max_cursor();
                    let mut seen = Vec::new();
                    while let Some((k, v)) = cursor.entry() {
                        seen.push((*k, *v));
                        cursor.prev();
                    }
                    let expected: Vec<(i32, i32)> =
                        model.iter().rev().map(|(k, v)| (*k, *v)).collect();
                    prop_assert_eq!(seen, expected);
                }
            }

            // Post-conditions after each op
            prop_assert_eq!(sut.len(), model.len());
            prop_assert_eq!(sut.is_empty(), model.is_empty());
            sut.check_invariants();
        }
    }
}

// Same walk invariants at a wider branching factor, so multi-entry nodes
// carry more resting entries and split later.
proptest! {
    #![proptest_config(ProptestConfig { cases: 32, .. ProptestConfig::default() })]
    #[test]
    fn prop_wide_nodes_sorted_walks(keys in proptest::collection::vec(-500..500i32, 1..200)) {
        let mut sut: OrderedMap<i32, usize, 32> = OrderedMap::new();
        let mut model: BTreeMap<i32, usize> = BTreeMap::new();
        for (i, k) in keys.into_iter().enumerate() {
            sut.insert(k, i);
            model.insert(k, i);
            sut.check_invariants();
        }

        let walked: Vec<i32> = {
            let mut cursor = sut.min_cursor();
            let mut seen = Vec::new();
            while let Some(&k) = cursor.key() {
                seen.push(k);
                cursor.next();
            }
            seen
        };
        let expected: Vec<i32> = model.keys().copied().collect();
        prop_assert_eq!(walked, expected);
    }
}

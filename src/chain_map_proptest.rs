#![cfg(test)]

// Property tests for ChainMap kept inside the crate so they can check the
// bucket layout through crate-private state.

use crate::policy;
use crate::ChainMap;
use core::num::NonZeroUsize;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
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

// Pool-indexed operations to improve shrinking: indices shrink to earlier keys,
// pool length shrinks, and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize, i32),
    GetOrDefault(usize),
    GetOrInsertWith(usize, i32),
    Remove(usize),
    Find(usize),
    At(usize),
    Contains(String),
    Mutate(usize, i32),
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,5}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Insert(i, v)),
            2 => idx.clone().prop_map(OpI::GetOrDefault),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::GetOrInsertWith(i, v)),
            4 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Find),
            2 => idx.clone().prop_map(OpI::At),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,5}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            2 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::Mutate(i, d)),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..80).prop_map(move |ops| (pool.clone(), ops))
    })
}

fn check_layout<S: BuildHasher>(sut: &ChainMap<Key, i32, S>) -> Result<(), TestCaseError> {
    let count = sut.bucket_count();
    prop_assert!(count >= 1);
    let current = NonZeroUsize::new(count).unwrap();
    prop_assert!(policy::plan_rehash(sut.len(), current).is_none(), "bucket count outside policy window");

    // Every entry reachable by traversal sits in its hash bucket and is found there.
    let mut c = sut.begin();
    let mut seen = BTreeSet::new();
    while !c.is_end() {
        let k = c.key().unwrap();
        let expected = (sut.hasher().hash_one(k) % count as u64) as usize;
        prop_assert_eq!(c.position().bucket(), expected);
        prop_assert_eq!(sut.find(k).position(), c.position());
        prop_assert!(seen.insert(k.clone()), "key visited twice: {:?}", k);
        c.move_next();
    }
    prop_assert_eq!(seen.len(), sut.len());
    prop_assert_eq!(c, sut.end());
    Ok(())
}

// State-machine equivalence against std::collections::HashMap.
// Invariants exercised across random operation sequences:
// - First write wins on insert; get_or_* only inserts on a miss.
// - `find`/`contains_key`/`at` parity with the model.
// - `remove` returns the model's value and leaves the key absent.
// - Traversal yields each live entry exactly once.
// - Bucket count stays inside the policy window and entries sit in their hash bucket.
fn run_scenario<S: BuildHasher>(
    mut sut: ChainMap<Key, i32, S>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError> {
    let mut model: HashMap<Key, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Insert(i, v) => {
                let k = key_from(&pool, i);
                let already = model.contains_key(&k);
                prop_assert_eq!(sut.insert(k.clone(), v), !already);
                model.entry(k).or_insert(v);
            }
            OpI::GetOrDefault(i) => {
                let k = key_from(&pool, i);
                let got = *sut.get_or_default(k.clone());
                let m = *model.entry(k).or_default();
                prop_assert_eq!(got, m);
            }
            OpI::GetOrInsertWith(i, v) => {
                let k = key_from(&pool, i);
                let already = model.contains_key(&k);
                let mut ran = false;
                let got = *sut.get_or_insert_with(k.clone(), || {
                    ran = true;
                    v
                });
                prop_assert_eq!(ran, !already, "default must run only on a miss");
                prop_assert_eq!(got, *model.entry(k).or_insert(v));
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                prop_assert_eq!(sut.remove(&k), model.remove(&k));
                prop_assert!(sut.find(&k).is_end());
            }
            OpI::Find(i) => {
                let k = key_from(&pool, i);
                let c = sut.find(&k);
                prop_assert_eq!(c.value(), model.get(&k));
                prop_assert_eq!(c.is_end(), !model.contains_key(&k));
            }
            OpI::At(i) => {
                let k = key_from(&pool, i);
                match model.get(&k) {
                    Some(v) => {
                        prop_assert_eq!(sut.at(&k), Ok(v));
                    }
                    None => {
                        prop_assert_eq!(sut.at(&k), Err(crate::AccessError::KeyNotFound));
                    }
                }
            }
            OpI::Contains(s) => {
                let has = sut.contains_key(s.as_str());
                let has_model = model.keys().any(|k| k.0 == s);
                prop_assert_eq!(has, has_model);
            }
            OpI::Mutate(i, d) => {
                let k = key_from(&pool, i);
                if let Some(vr) = sut.get_mut(&k) {
                    *vr = vr.saturating_add(d);
                    let mv = model.get_mut(&k).expect("present in model");
                    *mv = mv.saturating_add(d);
                } else {
                    prop_assert!(!model.contains_key(&k));
                }
            }
            OpI::Iterate => {
                let s: HashMap<Key, i32> = sut.iter().map(|(k, v)| (k.clone(), *v)).collect();
                prop_assert_eq!(&s, &model);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
                prop_assert_eq!(sut.bucket_count(), 1);
                prop_assert!(sut.begin().is_end());
            }
        }

        // Post-conditions after each op
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        check_layout(&sut)?;
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_scenario(ChainMap::new(), pool, ops)?;
    }
}

// Collision variant using a constant hasher: every entry shares bucket 0,
// stressing chain unlinking and equality resolution.
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
        run_scenario(ChainMap::with_hasher(ConstBuildHasher), pool, ops)?;
    }
}

// Building from pairs equals inserting them one by one, first write winning.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_from_iter_matches_sequential_insert(pairs in proptest::collection::vec((0u8..32, any::<i32>()), 0..100)) {
        let built: ChainMap<u8, i32> = pairs.iter().copied().collect();
        let mut seq: ChainMap<u8, i32> = ChainMap::new();
        let mut model: HashMap<u8, i32> = HashMap::new();
        for &(k, v) in &pairs {
            seq.insert(k, v);
            model.entry(k).or_insert(v);
        }
        prop_assert_eq!(&built, &seq);
        prop_assert_eq!(built.len(), model.len());
        for (k, v) in &model {
            prop_assert_eq!(built.at(k), Ok(v));
        }
        let current = NonZeroUsize::new(built.bucket_count()).unwrap();
        prop_assert!(policy::plan_rehash(built.len(), current).is_none());
    }
}

#![cfg(test)]

// Property tests for both SimpleSet implementations, kept inside the crate
// so the capacity model can use the same configuration types.

use crate::chained_hash_set::ChainedHashSet;
use crate::config::SetConfig;
use crate::open_hash_set::OpenHashSet;
use crate::simple_set::SimpleSet;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::BTreeSet;

// Pool-indexed operations so shrinking converges on short key pools.
#[derive(Clone, Debug)]
enum OpI {
    Add(usize),
    Delete(usize),
    Contains(String),
    Iterate,
}

fn arb_config() -> impl Strategy<Value = SetConfig> {
    let factors = prop::sample::select(vec![
        (0.75f32, 0.25f32),
        (0.6, 0.4),
        (1.0, 0.0),
        (0.95, 0.05),
        (1.0, 0.5),
    ]);
    let capacity = prop::sample::select(vec![1usize, 2, 4, 16]);
    (factors, capacity).prop_map(|((upper, lower), cap)| {
        SetConfig::new()
            .with_initial_capacity(cap)
            .with_load_factors(upper, lower)
    })
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z0-9]{0,4}", 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            3 => idx.clone().prop_map(OpI::Add),
            2 => idx.clone().prop_map(OpI::Delete),
            1 => "[a-z0-9]{0,4}".prop_map(OpI::Contains),
            1 => Just(OpI::Iterate),
        ];
        proptest::collection::vec(op, 1..200).prop_map(move |ops| (pool.clone(), ops))
    })
}

/// Capacity the set must have after a successful add or delete, computed
/// from the load thresholds directly.
struct CapacityModel {
    capacity: usize,
    upper: f64,
    lower: f64,
}

impl CapacityModel {
    fn new(config: &SetConfig) -> Self {
        Self {
            capacity: config.initial_capacity,
            upper: f64::from(config.upper_load_factor),
            lower: f64::from(config.lower_load_factor),
        }
    }

    fn added(&mut self, size: usize) {
        if size as f64 / self.capacity as f64 > self.upper {
            self.capacity *= 2;
        }
    }

    fn deleted(&mut self, size: usize) {
        if self.capacity > 1 && (size as f64 / self.capacity as f64) < self.lower {
            let half = self.capacity / 2;
            if size as f64 / half as f64 <= self.upper {
                self.capacity = half;
            }
        }
    }
}

// Property: state-machine equivalence against a BTreeSet model.
// - add/delete return values match model membership changes;
// - contains parity for pool keys and arbitrary probes;
// - iter yields each live key exactly once;
// - size parity and the exact capacity sequence after every op.
fn run_scenario<S: SimpleSet>(
    sut: &mut S,
    config: &SetConfig,
    pool: &[String],
    ops: Vec<OpI>,
    keys: impl Fn(&S) -> Vec<String>,
) -> Result<(), TestCaseError> {
    let mut model: BTreeSet<String> = BTreeSet::new();
    let mut cap = CapacityModel::new(config);

    for op in ops {
        match op {
            OpI::Add(i) => {
                let k = &pool[i];
                let fresh = model.insert(k.clone());
                prop_assert_eq!(sut.add(k), fresh, "add({:?})", k);
                if fresh {
                    cap.added(model.len());
                }
            }
            OpI::Delete(i) => {
                let k = &pool[i];
                let present = model.remove(k);
                prop_assert_eq!(sut.delete(k), present, "delete({:?})", k);
                if present {
                    cap.deleted(model.len());
                }
            }
            OpI::Contains(s) => {
                prop_assert_eq!(sut.contains(&s), model.contains(&s));
            }
            OpI::Iterate => {
                let listed = keys(sut);
                let unique: BTreeSet<String> = listed.iter().cloned().collect();
                prop_assert_eq!(listed.len(), unique.len(), "iteration repeated a key");
                prop_assert_eq!(&unique, &model);
            }
        }

        prop_assert_eq!(sut.size(), model.len());
        prop_assert_eq!(sut.capacity(), cap.capacity);
        prop_assert!(sut.capacity().is_power_of_two());
        for k in pool {
            prop_assert_eq!(sut.contains(k), model.contains(k));
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_open_state_machine(config in arb_config(), (pool, ops) in arb_scenario()) {
        let mut sut = OpenHashSet::with_config(config).unwrap();
        run_scenario(&mut sut, &config, &pool, ops, |s| s.iter().map(str::to_owned).collect())?;
    }

    #[test]
    fn prop_chained_state_machine(config in arb_config(), (pool, ops) in arb_scenario()) {
        let mut sut = ChainedHashSet::with_config(config).unwrap();
        run_scenario(&mut sut, &config, &pool, ops, |s| s.iter().map(str::to_owned).collect())?;
    }
}

// Property: both strategies agree with each other on every observable
// result, including capacity, for the same operation sequence.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_strategies_agree(config in arb_config(), (pool, ops) in arb_scenario()) {
        let mut open = OpenHashSet::with_config(config).unwrap();
        let mut chained = ChainedHashSet::with_config(config).unwrap();
        for op in ops {
            match op {
                OpI::Add(i) => prop_assert_eq!(open.add(&pool[i]), chained.add(&pool[i])),
                OpI::Delete(i) => prop_assert_eq!(open.delete(&pool[i]), chained.delete(&pool[i])),
                OpI::Contains(s) => prop_assert_eq!(open.contains(&s), chained.contains(&s)),
                OpI::Iterate => {
                    let a: BTreeSet<&str> = open.iter().collect();
                    let b: BTreeSet<&str> = chained.iter().collect();
                    prop_assert_eq!(a, b);
                }
            }
            prop_assert_eq!(open.size(), chained.size());
            prop_assert_eq!(open.capacity(), chained.capacity());
        }
    }
}

// Copyright 2026 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Property-based agreement tests: for every random sequence of inserts and
//! deletes on distinct keys, each engine's `select` must agree with a
//! `BTreeMap` reference at every step.

use classic::MapEngine;
use proptest::collection::vec;
use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
enum Op {
    Insert(i32, i32),
    Delete(i32),
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    vec(
        (0..200i32, 0..200i32, any::<bool>()).prop_map(|(k, v, is_delete)| {
            if is_delete {
                Op::Delete(k)
            } else {
                Op::Insert(k, v)
            }
        }),
        0..300,
    )
}

fn cmp_i32(a: &i32, b: &i32) -> std::cmp::Ordering {
    a.cmp(b)
}

fn hash_i32(k: &i32) -> u64 {
    *k as u64
}

fn check_against_oracle(ops: &[Op], mut engine: MapEngine<i32, i32>) {
    let mut oracle: BTreeMap<i32, i32> = BTreeMap::new();
    for op in ops {
        match *op {
            Op::Insert(k, v) => {
                let was_present = oracle.contains_key(&k);
                let outcome = engine.insert(k, v);
                assert_eq!(outcome.is_inserted(), !was_present);
                oracle.entry(k).or_insert(v);
            }
            Op::Delete(k) => {
                let was_present = oracle.remove(&k).is_some();
                assert_eq!(engine.delete(&k), was_present);
            }
        }
        for (k, v) in &oracle {
            assert_eq!(engine.select(k), Some(v));
        }
        assert_eq!(engine.len(), oracle.len());
    }

    if engine.sorted() {
        let mut seen = Vec::new();
        engine.foreach(|k, _| {
            seen.push(*k);
            true
        });
        let expected: Vec<i32> = oracle.keys().copied().collect();
        assert_eq!(seen, expected);
    }
}

fn geometric_levels() -> impl FnMut() -> usize {
    let mut rng = StdRng::seed_from_u64(0xA5A5A5A5A5A5A5A5);
    move || {
        let mut level = 1;
        while rng.gen_bool(0.5) && level < 32 {
            level += 1;
        }
        level
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn avl_agrees_with_reference(ops in ops_strategy()) {
        check_against_oracle(&ops, MapEngine::avl(cmp_i32));
    }

    #[test]
    fn red_black_agrees_with_reference(ops in ops_strategy()) {
        check_against_oracle(&ops, MapEngine::red_black(cmp_i32));
    }

    #[test]
    fn weight_balanced_agrees_with_reference(ops in ops_strategy()) {
        check_against_oracle(&ops, MapEngine::weight_balanced(cmp_i32));
    }

    #[test]
    fn path_reduction_agrees_with_reference(ops in ops_strategy()) {
        check_against_oracle(&ops, MapEngine::path_reduction(cmp_i32));
    }

    #[test]
    fn splay_agrees_with_reference(ops in ops_strategy()) {
        check_against_oracle(&ops, MapEngine::splay(cmp_i32));
    }

    #[test]
    fn treap_agrees_with_reference(ops in ops_strategy()) {
        check_against_oracle(&ops, MapEngine::treap(cmp_i32, |k: &i32| (*k as u64).wrapping_mul(2654435761)));
    }

    #[test]
    fn skip_list_agrees_with_reference(ops in ops_strategy()) {
        check_against_oracle(&ops, MapEngine::skip_list(cmp_i32, 16, geometric_levels()).unwrap());
    }

    #[test]
    fn chained_agrees_with_reference(ops in ops_strategy()) {
        check_against_oracle(&ops, MapEngine::chained(cmp_i32, hash_i32, 11).unwrap());
    }

    #[test]
    fn open_addressing_agrees_with_reference(ops in ops_strategy()) {
        check_against_oracle(&ops, MapEngine::open_addressing(cmp_i32, hash_i32, 11).unwrap());
    }
}

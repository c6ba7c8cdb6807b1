// Copyright 2026 Vivian Voss. Licensed under the Apache License, Version 2.0.
// SPDX-License-Identifier: Apache-2.0

//! Insert/delete cost across the nine engines on the same input distribution.

use classic::MapEngine;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

fn cmp_u32(a: &u32, b: &u32) -> std::cmp::Ordering {
    a.cmp(b)
}

fn hash_u32(k: &u32) -> u64 {
    *k as u64
}

fn shuffled(n: u32) -> Vec<u32> {
    let mut v: Vec<u32> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(0x9e3779b97f4a7c15);
    v.shuffle(&mut rng);
    v
}

fn engines(size: u32) -> Vec<(&'static str, MapEngine<u32, u32>)> {
    vec![
        ("avl", MapEngine::avl(cmp_u32)),
        ("red_black", MapEngine::red_black(cmp_u32)),
        ("weight_balanced", MapEngine::weight_balanced(cmp_u32)),
        ("path_reduction", MapEngine::path_reduction(cmp_u32)),
        ("splay", MapEngine::splay(cmp_u32)),
        ("treap", MapEngine::treap(cmp_u32, |k: &u32| (*k as u64).wrapping_mul(2654435761))),
        (
            "skip_list",
            MapEngine::skip_list(cmp_u32, 16, {
                let mut rng = StdRng::seed_from_u64(0x2545F4914F6CDD1D);
                move || {
                    let mut level = 1usize;
                    while rng.gen_bool(0.5) && level < 16 {
                        level += 1;
                    }
                    level
                }
            })
            .unwrap(),
        ),
        ("chained", MapEngine::chained(cmp_u32, hash_u32, size).unwrap()),
        ("open_addressing", MapEngine::open_addressing(cmp_u32, hash_u32, size).unwrap()),
    ]
}

fn bench_insert(c: &mut Criterion) {
    let size = 2000u32;
    let keys = shuffled(size);
    let mut group = c.benchmark_group("insert");
    for (name, mut engine) in engines(size) {
        group.bench_with_input(BenchmarkId::from_parameter(name), &keys, |b, keys| {
            b.iter(|| {
                engine.clear();
                for &k in keys {
                    black_box(engine.insert(k, k));
                }
            });
        });
    }
    group.finish();
}

fn bench_delete(c: &mut Criterion) {
    let size = 2000u32;
    let keys = shuffled(size);
    let mut group = c.benchmark_group("delete");
    for (name, mut engine) in engines(size) {
        group.bench_with_input(BenchmarkId::from_parameter(name), &keys, |b, keys| {
            b.iter_batched(
                || {
                    for &k in keys {
                        engine.insert(k, k);
                    }
                },
                |()| {
                    for &k in keys {
                        black_box(engine.delete(&k));
                    }
                },
                criterion::BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_insert, bench_delete);
criterion_main!(benches);

// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! Benchmarks for `SlidingWindowMatcher::detect`.
//!
//! Measures a full scan of the built-in pattern set at multiple stream
//! sizes. Counters are reset inside the timed loop so every iteration
//! does the same amount of work.
#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sentinel::common::token::{axis_token, Level, BIAS_AXES};
use sentinel::pattern::builtin::register_builtin_patterns_with;
use sentinel::{MatchCap, MatchInfo, PatternDef, PatternRegistry};

fn make_stream(len: usize) -> Vec<String> {
    let levels = [Level::Low, Level::Medium, Level::High];
    (0..len)
        .map(|i| axis_token(levels[i % 3], BIAS_AXES[(i / 3) % BIAS_AXES.len()]))
        .collect()
}

fn silent(_: &str, _: &[String], _: MatchInfo) {}

fn bench_detect_builtins(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_builtins");

    for &n in &[100_usize, 1_000, 10_000, 100_000, 1_000_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let stream = make_stream(n);
            let mut registry = PatternRegistry::new();
            register_builtin_patterns_with(&mut registry, |_| silent).unwrap();
            b.iter(|| {
                registry.reset_all();
                registry.detect(black_box(&stream));
            });
        });
    }

    group.finish();
}

fn bench_detect_unlimited_overlap(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_unlimited_overlap");

    for &n in &[100_usize, 10_000, 1_000_000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            // Every window matches: worst case for callback dispatch.
            let stream = vec!["dup".to_string(); n];
            let mut registry = PatternRegistry::new();
            registry
                .register(
                    PatternDef::new("cascade", ["dup", "dup", "dup"], silent)
                        .max_matches(MatchCap::Unlimited),
                )
                .unwrap();
            b.iter(|| registry.detect(black_box(&stream)));
        });
    }

    group.finish();
}

fn bench_detect_many_patterns(c: &mut Criterion) {
    let mut group = c.benchmark_group("detect_many_patterns");
    let stream = make_stream(10_000);

    for &p in &[1_usize, 10, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(p), &p, |b, &p| {
            let mut registry = PatternRegistry::new();
            for i in 0..p {
                registry
                    .register(
                        PatternDef::new(
                            format!("p{i}"),
                            [
                                axis_token(Level::High, BIAS_AXES[i % BIAS_AXES.len()]),
                                axis_token(Level::Low, BIAS_AXES[(i + 1) % BIAS_AXES.len()]),
                            ],
                            silent,
                        )
                        .priority((i % 4) as i32)
                        .max_matches(MatchCap::Unlimited),
                    )
                    .unwrap();
            }
            b.iter(|| registry.detect(black_box(&stream)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_detect_builtins,
    bench_detect_unlimited_overlap,
    bench_detect_many_patterns
);
criterion_main!(benches);

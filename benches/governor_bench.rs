// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! Benchmarks for uncontended and contended `CallGovernor` admission.
//!
//! Capacity is set far above the iteration count so no call ever sleeps;
//! the numbers isolate the cost of the locked check-and-record step.
#![allow(missing_docs)]

use std::hint::black_box;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sentinel::CallGovernor;

const NEVER_FULL: usize = 100_000_000;

fn bench_acquire_uncontended(c: &mut Criterion) {
    let governor = CallGovernor::new(NEVER_FULL, Duration::from_millis(10)).unwrap();
    c.bench_function("acquire_uncontended", |b| {
        b.iter(|| governor.acquire());
    });
}

fn bench_wrap_overhead(c: &mut Criterion) {
    let governor = Arc::new(CallGovernor::new(NEVER_FULL, Duration::from_millis(10)).unwrap());
    let gated = governor.wrap(|x: u64| x.wrapping_mul(31));
    c.bench_function("wrap_call", |b| {
        b.iter(|| gated(black_box(7)));
    });
}

fn bench_acquire_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("acquire_contended");

    for &threads in &[2_usize, 4, 8] {
        let per_thread = 1_000;
        group.throughput(Throughput::Elements((threads * per_thread) as u64));
        group.bench_with_input(BenchmarkId::from_parameter(threads), &threads, |b, &threads| {
            b.iter(|| {
                let governor =
                    Arc::new(CallGovernor::new(NEVER_FULL, Duration::from_millis(10)).unwrap());
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let governor = Arc::clone(&governor);
                        thread::spawn(move || {
                            for _ in 0..per_thread {
                                governor.acquire();
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_acquire_uncontended,
    bench_wrap_overhead,
    bench_acquire_contended
);
criterion_main!(benches);

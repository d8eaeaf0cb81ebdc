// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use understory_dirty_flags::DirtyFlags;

#[derive(Clone)]
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next_u32(&mut self) -> u32 {
        // Numerical Recipes LCG parameters.
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 32) as u32
    }
}

fn tracked(n: u32, seed: u64) -> DirtyFlags<u32> {
    let mut flags = DirtyFlags::with_capacity(n as usize);
    let mut rng = Lcg::new(seed);
    for key in 0..n {
        flags.mark(key);
        if rng.next_u32() % 2 == 0 {
            flags.clean(&key);
        }
    }
    flags
}

fn bench_flags(c: &mut Criterion) {
    let mut group = c.benchmark_group("dirty_flags");

    for n in [64_u32, 1024, 16384] {
        group.bench_function(BenchmarkId::new("mark_fresh", n), |b| {
            b.iter_batched(
                || DirtyFlags::<u32>::with_capacity(n as usize),
                |mut flags| {
                    for key in 0..n {
                        flags.mark(key);
                    }
                    black_box(flags)
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(BenchmarkId::new("remark", n), |b| {
            let mut flags = tracked(n, 7);
            b.iter(|| {
                for key in 0..n {
                    flags.mark(key);
                }
                flags.clean_all();
            });
        });

        group.bench_function(BenchmarkId::new("iter_dirty", n), |b| {
            let flags = tracked(n, 11);
            b.iter(|| black_box(flags.dirty().count()));
        });

        group.bench_function(BenchmarkId::new("forget_half", n), |b| {
            b.iter_batched(
                || tracked(n, 13),
                |mut flags| {
                    for key in (0..n).step_by(2) {
                        flags.forget(&key);
                    }
                    black_box(flags)
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_flags);
criterion_main!(benches);

// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for `understory_dto`.

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::sync::Once;

use understory_dto::{
    ConstrainedPropertyStore, Constraints, Key, PropertyStore, Value, ValueKind,
};

fn keyed(n: u32) -> Vec<(String, Value)> {
    (0..n)
        .map(|i| (format!("field_{i}"), Value::from(i)))
        .collect()
}

fn filled(n: u32) -> PropertyStore {
    let mut store = PropertyStore::new();
    store.fill(keyed(n), false).unwrap();
    store
}

fn bench_store(c: &mut Criterion) {
    static PRINT_SIZES: Once = Once::new();
    PRINT_SIZES.call_once(|| {
        eprintln!(
            "sizes: PropertyStore={} Value={} Key={}",
            size_of::<PropertyStore>(),
            size_of::<Value>(),
            size_of::<Key>(),
        );
    });

    let mut group = c.benchmark_group("dto/store");

    group.bench_function("set_new", |b| {
        b.iter_batched(
            PropertyStore::new,
            |mut store| {
                store.set("name", "William").unwrap();
                black_box(store)
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("set_same", |b| {
        let mut store = filled(16);
        b.iter(|| {
            store.set("field_7", 7).unwrap();
        });
    });

    group.bench_function("set_changed", |b| {
        let mut store = filled(16);
        let mut i = 0_i64;
        b.iter(|| {
            i += 1;
            store.set("field_7", i).unwrap();
        });
    });

    group.bench_function("get_hit", |b| {
        let store = filled(16);
        let key = Key::from("field_7");
        b.iter(|| black_box(store.get(&key).unwrap()));
    });

    group.bench_function("get_miss", |b| {
        let store = filled(16);
        let key = Key::from("absent");
        b.iter(|| black_box(store.get(&key).unwrap()));
    });

    for n in [8_u32, 64, 512] {
        group.bench_function(BenchmarkId::new("fill", n), |b| {
            let data = keyed(n);
            b.iter_batched(
                || data.clone(),
                |data| {
                    let mut store = PropertyStore::new();
                    store.fill(data, false).unwrap();
                    black_box(store)
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(BenchmarkId::new("changed_properties", n), |b| {
            let mut store = filled(n);
            store.clean_all();
            for i in (0..n).step_by(4) {
                store.set(format!("field_{i}"), -1).unwrap();
            }
            b.iter(|| black_box(store.changed_properties()));
        });

        group.bench_function(BenchmarkId::new("clean_all", n), |b| {
            b.iter_batched(
                || filled(n),
                |mut store| {
                    store.clean_all();
                    black_box(store)
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_constrained(c: &mut Criterion) {
    let mut group = c.benchmark_group("dto/constrained");

    let constraints = Constraints::new()
        .kind("age", ValueKind::Integer)
        .predicate("name", |v| v.as_str().is_some_and(|s| !s.is_empty()));

    group.bench_function("kind_accept", |b| {
        let mut store = ConstrainedPropertyStore::new(&constraints);
        let mut i = 0_i64;
        b.iter(|| {
            i += 1;
            store.set("age", i).unwrap();
        });
    });

    group.bench_function("kind_reject", |b| {
        let mut store = ConstrainedPropertyStore::new(&constraints);
        b.iter(|| {
            store.set("age", "old").unwrap();
        });
    });

    group.bench_function("predicate_accept", |b| {
        let mut store = ConstrainedPropertyStore::new(&constraints);
        b.iter(|| {
            store.set("name", "William").unwrap();
        });
    });

    group.bench_function("unconstrained", |b| {
        let mut store = ConstrainedPropertyStore::new(&constraints);
        b.iter(|| {
            store.set("nick", "w").unwrap();
        });
    });

    group.finish();
}

criterion_group!(benches, bench_store, bench_constrained);
criterion_main!(benches);

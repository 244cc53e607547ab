//! Basic benchmarks for the `binder` package.

#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::collections::HashMap;
use std::hint::black_box;

use binder::{Binder, TableCapacityStrategy};
use criterion::{Criterion, criterion_group, criterion_main};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

const KEY_COUNT: u32 = 100;
const KEY_CAPACITY: usize = 100;
const VALUES_PER_KEY: u32 = 10;

fn entrypoint(c: &mut Criterion) {
    let mut group = c.benchmark_group("binder_bind");

    group.bench_function("binder_hundred_keys", |b| {
        b.iter(|| {
            let mut binder =
                Binder::<u32, u32>::new(TableCapacityStrategy::shared(), KEY_CAPACITY)
                    .unwrap();
            for key in 0..KEY_COUNT {
                let binding = binder.bind(black_box(key)).unwrap();
                for value in 0..VALUES_PER_KEY {
                    binding.to(black_box(value)).unwrap();
                }
            }
            binder
        });
    });

    group.bench_function("hashmap_hundred_keys", |b| {
        b.iter(|| {
            let mut map = HashMap::<u32, Vec<u32>>::with_capacity(KEY_CAPACITY);
            for key in 0..KEY_COUNT {
                let values = map.entry(black_box(key)).or_default();
                for value in 0..VALUES_PER_KEY {
                    values.push(black_box(value));
                }
            }
            map
        });
    });

    group.finish();

    let mut lookup_group = c.benchmark_group("binder_lookup");

    let mut binder =
        Binder::<u32, u32>::new(TableCapacityStrategy::shared(), KEY_CAPACITY).unwrap();
    for key in 0..KEY_COUNT {
        binder.bind(key).unwrap().to(key).unwrap();
    }

    lookup_group.bench_function("get_binding_hit", |b| {
        b.iter(|| binder.get_binding(black_box(&42_u32)).unwrap().is_some());
    });

    lookup_group.bench_function("get_binding_miss", |b| {
        b.iter(|| binder.get_binding(black_box(&KEY_COUNT)).unwrap().is_some());
    });

    lookup_group.finish();
}

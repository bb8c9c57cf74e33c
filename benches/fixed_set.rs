use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use fks_fixed_set::FixedSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const LOOKUPS_PER_ITER: u64 = 10_000;

fn make_keys(count: usize, seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count).map(|_| rng.gen_range(-1_000_000_000..=1_000_000_000)).collect()
}

// ============================================================================
// 1. Build
// ============================================================================

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_set/build");
    for n in [1_000usize, 10_000, 100_000] {
        let keys = make_keys(n, 0xdead_beef);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &keys, |b, keys| {
            let mut set = FixedSet::with_seed(1);
            b.iter(|| {
                set.initialize(keys.iter().copied()).unwrap();
                black_box(set.len())
            });
        });
    }
    group.finish();
}

// ============================================================================
// 2. Lookups vs std HashSet
// ============================================================================

fn bench_contains(c: &mut Criterion) {
    let mut group = c.benchmark_group("fixed_set/contains");
    group.throughput(Throughput::Elements(LOOKUPS_PER_ITER));

    for n in [1_000usize, 100_000, 1_000_000] {
        let keys = make_keys(n, 0xfeed_face);
        let mut set = FixedSet::with_seed(2);
        set.initialize(keys.iter().copied()).unwrap();
        let std_set: HashSet<i64> = keys.iter().copied().collect();

        // Half hits, half random probes.
        let mut probes = make_keys(LOOKUPS_PER_ITER as usize / 2, 0x1234);
        probes.extend(keys.iter().take(LOOKUPS_PER_ITER as usize / 2));

        group.bench_with_input(BenchmarkId::new("fks", n), &probes, |b, probes| {
            b.iter(|| probes.iter().filter(|&&k| set.contains(black_box(k))).count());
        });
        group.bench_with_input(BenchmarkId::new("std_hashset", n), &probes, |b, probes| {
            b.iter(|| probes.iter().filter(|&&k| std_set.contains(&black_box(k))).count());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build, bench_contains);
criterion_main!(benches);

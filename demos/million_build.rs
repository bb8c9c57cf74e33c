use fks_fixed_set::{FixedSet, FixedSetError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

const N_KEYS: usize = 1_000_000;
const N_QUERIES: usize = 1_000_000;
const GEN_SEED: u64 = 42;

fn main() -> Result<(), FixedSetError> {
    env_logger::init();

    println!("--- fks_fixed_set build ---");
    println!("n = {N_KEYS}");

    // 1) Generate keys (duplicates allowed, the set collapses them)
    let t0 = Instant::now();
    let keys = gen_keys(N_KEYS, GEN_SEED);
    let gen_s = t0.elapsed().as_secs_f64();
    println!(
        "gen:    {:>8.3} s   ({:.1} M keys/s)",
        gen_s,
        N_KEYS as f64 / gen_s / 1e6
    );

    // 2) Build
    let t1 = Instant::now();
    let mut set = FixedSet::with_seed(GEN_SEED);
    let stats = set.initialize(keys.iter().copied())?;
    let build_s = t1.elapsed().as_secs_f64();
    println!(
        "build:  {:>8.3} s   ({:.1} M keys/s)",
        build_s,
        N_KEYS as f64 / build_s / 1e6
    );
    println!(
        "        distinct={} outer_attempts={} inner_attempts={} worst_bucket={} slots={} ({:.2}/key)",
        stats.keys,
        stats.outer_attempts,
        stats.inner_attempts,
        stats.max_inner_attempts,
        stats.slots,
        stats.slots as f64 / stats.keys as f64
    );

    // 3) Lookup all keys
    let t2 = Instant::now();
    let mut hits = 0usize;
    for chunk in keys.chunks(32_768) {
        for &k in chunk {
            hits += set.contains(k) as usize;
        }
    }
    let lookup_s = t2.elapsed().as_secs_f64();
    println!(
        "hits:   {:>8.3} s   ({:.1} M lookups/s)   (hits={hits})",
        lookup_s,
        N_KEYS as f64 / lookup_s / 1e6
    );

    // 4) Random probes, mostly misses
    let mut rng = StdRng::seed_from_u64(GEN_SEED + 1);
    let probes: Vec<i64> = (0..N_QUERIES).map(|_| rng.gen_range(-1_000_000_000..=1_000_000_000)).collect();
    let t3 = Instant::now();
    let found = probes.iter().filter(|&&k| set.contains(k)).count();
    let probe_s = t3.elapsed().as_secs_f64();
    println!(
        "probe:  {:>8.3} s   ({:.1} M lookups/s)   (found={found})",
        probe_s,
        N_QUERIES as f64 / probe_s / 1e6
    );

    println!("----------------------------------------------");
    println!(
        "Total (gen + build + lookup + probe): {:.3} s",
        gen_s + build_s + lookup_s + probe_s
    );

    Ok(())
}

/// N keys in [-1e9, 1e9], deterministically.
fn gen_keys(n: usize, seed: u64) -> Vec<i64> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(-1_000_000_000..=1_000_000_000)).collect()
}

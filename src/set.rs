use crate::error::FixedSetError;
use crate::hash::{AffineHash, MODULUS, is_valid_modulus};
use crate::inner::InnerTable;
use crate::outer::{OuterTable, Partition};
use hashbrown::HashSet;
use rand::rngs::{SmallRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};

/// Build parameters.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Prime modulus of the affine hash family. Must exceed the spread of the
    /// keys (`max - min`) or some keys can never be separated.
    pub modulus: u128,
    /// Outer hashes to try before giving up.
    pub max_outer_attempts: u32,
    /// Inner hashes to try per bucket before giving up.
    pub max_inner_attempts: u32,
    /// Minimum bucket count for building inner tables on the rayon pool.
    /// Ignored without the `parallel` feature.
    pub parallel_threshold: usize,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            modulus: MODULUS,
            max_outer_attempts: 128,
            max_inner_attempts: 128,
            parallel_threshold: 4096,
        }
    }
}

/// Counters from the most recent build.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildStats {
    /// Distinct keys.
    pub keys: usize,
    /// Outer buckets (equal to `keys`).
    pub buckets: usize,
    pub outer_attempts: u32,
    /// Inner attempts summed over all non-empty buckets.
    pub inner_attempts: u64,
    /// Worst single bucket.
    pub max_inner_attempts: u32,
    /// Sum of squared bucket sizes; at most `4 * keys`.
    pub sum_of_squares: usize,
    /// Total inner slots; equal to `sum_of_squares`.
    pub slots: usize,
}

/// Static set of `i64` keys with two-level (FKS) perfect hashing.
///
/// `initialize` rebuilds from scratch; `contains` costs two hash evaluations and
/// does not depend on the number of keys. The random source is owned by the set
/// and reused across rebuilds.
#[derive(Debug, Clone)]
pub struct FixedSet<R = StdRng> {
    rng: R,
    cfg: BuildConfig,
    outer: Option<OuterTable>,
    inner: Vec<InnerTable>,
    stats: BuildStats,
}

impl FixedSet<StdRng> {
    /// Empty set with an entropy-seeded generator.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Empty set with a deterministic generator.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for FixedSet<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> FixedSet<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            cfg: BuildConfig::default(),
            outer: None,
            inner: Vec::new(),
            stats: BuildStats::default(),
        }
    }

    pub fn with_config(mut self, cfg: BuildConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Replace the contents with `keys`. Duplicates are collapsed.
    ///
    /// On error the set is left empty.
    pub fn initialize<I>(&mut self, keys: I) -> Result<BuildStats, FixedSetError>
    where
        I: IntoIterator<Item = i64>,
    {
        self.clear();
        if !is_valid_modulus(self.cfg.modulus) {
            return Err(FixedSetError::InvalidModulus(self.cfg.modulus));
        }

        let distinct = distinct_keys(keys);
        if distinct.is_empty() {
            log::debug!("fixed set built with no keys");
            return Ok(self.stats);
        }

        let outer = OuterTable::build(
            &distinct,
            &mut self.rng,
            self.cfg.modulus,
            self.cfg.max_outer_attempts,
        )?;
        drop(distinct);

        let seeds: Vec<u64> = (0..outer.partition.bucket_count())
            .map(|_| self.rng.next_u64())
            .collect();
        let built = build_inner_tables(&outer.partition, &seeds, &self.cfg)?;

        let mut stats = BuildStats {
            keys: outer.partition.bucket_count(),
            buckets: outer.partition.bucket_count(),
            outer_attempts: outer.attempts,
            sum_of_squares: outer.sum_of_squares,
            ..BuildStats::default()
        };
        let mut inner = Vec::with_capacity(built.len());
        for (table, attempts) in built {
            stats.inner_attempts += attempts as u64;
            stats.max_inner_attempts = stats.max_inner_attempts.max(attempts);
            stats.slots += table.slot_count();
            inner.push(table);
        }
        debug_assert_eq!(stats.slots, stats.sum_of_squares);

        log::debug!(
            "fixed set built: {} keys, {} outer attempts, {} inner attempts (worst bucket {}), {} slots",
            stats.keys,
            stats.outer_attempts,
            stats.inner_attempts,
            stats.max_inner_attempts,
            stats.slots
        );

        self.outer = Some(outer.table);
        self.inner = inner;
        self.stats = stats;
        Ok(stats)
    }
}

impl<R> FixedSet<R> {
    /// Drop all keys. The generator and configuration are kept.
    pub fn clear(&mut self) {
        self.outer = None;
        self.inner = Vec::new();
        self.stats = BuildStats::default();
    }

    /// O(1) membership: route through the outer hash, then probe one inner slot.
    #[inline]
    pub fn contains(&self, key: i64) -> bool {
        match &self.outer {
            Some(outer) => self.inner[outer.route(key)].contains(key),
            None => false,
        }
    }

    /// Number of distinct keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.stats.keys
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Distinct keys in storage order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.inner.iter().flat_map(|table| table.keys())
    }

    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    pub fn config(&self) -> &BuildConfig {
        &self.cfg
    }

    /// The accepted first-level hash, if any keys are stored.
    pub fn outer_hash(&self) -> Option<&AffineHash> {
        self.outer.as_ref().map(OuterTable::hash)
    }
}

/// Deduplicate, keeping first occurrences.
fn distinct_keys<I: IntoIterator<Item = i64>>(keys: I) -> Vec<i64> {
    let keys = keys.into_iter();
    let mut seen = HashSet::with_capacity(keys.size_hint().0);
    keys.filter(|&k| seen.insert(k)).collect()
}

/// Build one inner table per bucket. Bucket `i` draws from its own generator
/// seeded with `seeds[i]`, so the result does not depend on scheduling.
fn build_inner_tables(
    partition: &Partition,
    seeds: &[u64],
    cfg: &BuildConfig,
) -> Result<Vec<(InnerTable, u32)>, FixedSetError> {
    let build_one = |i: usize| {
        let keys = partition.bucket(i);
        if keys.is_empty() {
            return Ok((InnerTable::default(), 0));
        }
        let mut rng = SmallRng::seed_from_u64(seeds[i]);
        InnerTable::build(keys, &mut rng, cfg.modulus, cfg.max_inner_attempts, i)
    };

    #[cfg(feature = "parallel")]
    {
        if partition.bucket_count() >= cfg.parallel_threshold {
            use rayon::prelude::*;
            return (0..partition.bucket_count())
                .into_par_iter()
                .map(build_one)
                .collect();
        }
    }
    (0..partition.bucket_count()).map(build_one).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_keys_keeps_first_occurrence() {
        let keys = distinct_keys([3, -1, 3, 7, -1, 3]);
        assert_eq!(keys, vec![3, -1, 7]);
        assert!(distinct_keys(std::iter::empty()).is_empty());
    }

    #[test]
    fn empty_set_answers_false() {
        let set = FixedSet::with_seed(0);
        assert!(set.is_empty());
        assert!(!set.contains(0));
        assert!(set.outer_hash().is_none());
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn stats_describe_the_build() {
        let mut set = FixedSet::with_seed(1);
        let stats = set.initialize((0..500).map(|i| i * 3 - 700)).unwrap();
        assert_eq!(stats.keys, 500);
        assert_eq!(stats.buckets, 500);
        assert!(stats.outer_attempts >= 1);
        assert!(stats.sum_of_squares <= 4 * 500);
        assert_eq!(stats.slots, stats.sum_of_squares);
        assert!(stats.inner_attempts as usize >= stats.max_inner_attempts as usize);
        assert_eq!(*set.stats(), stats);
        assert_eq!(set.len(), 500);
    }

    #[test]
    fn iter_yields_each_key_once() {
        let mut set = FixedSet::with_seed(2);
        set.initialize([5, 1, 5, -9, 1, 0]).unwrap();
        let mut keys: Vec<i64> = set.iter().collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![-9, 0, 1, 5]);
    }

    #[test]
    fn same_seed_same_hashes() {
        let keys: Vec<i64> = (0..300).map(|i| i * i - 40_000).collect();
        let mut a = FixedSet::with_seed(9);
        let mut b = FixedSet::with_seed(9);
        a.initialize(keys.iter().copied()).unwrap();
        b.initialize(keys.iter().copied()).unwrap();
        assert_eq!(a.outer_hash(), b.outer_hash());
        assert_eq!(a.stats(), b.stats());
    }

    #[test]
    fn parallel_and_sequential_builds_agree() {
        let keys: Vec<i64> = (0..5_000).map(|i| i * 7_919 - 1_000_000).collect();
        let sequential = BuildConfig {
            parallel_threshold: usize::MAX,
            ..BuildConfig::default()
        };
        let parallel = BuildConfig {
            parallel_threshold: 0,
            ..BuildConfig::default()
        };
        let mut a = FixedSet::with_seed(4).with_config(sequential);
        let mut b = FixedSet::with_seed(4).with_config(parallel);
        let sa = a.initialize(keys.iter().copied()).unwrap();
        let sb = b.initialize(keys.iter().copied()).unwrap();
        assert_eq!(sa, sb);
        assert_eq!(a.iter().collect::<Vec<_>>(), b.iter().collect::<Vec<_>>());
    }

    #[test]
    fn clear_keeps_config() {
        let cfg = BuildConfig {
            max_inner_attempts: 64,
            ..BuildConfig::default()
        };
        let mut set = FixedSet::with_seed(5).with_config(cfg);
        set.initialize([1, 2, 3]).unwrap();
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(1));
        assert_eq!(set.config().max_inner_attempts, 64);
    }

    #[test]
    fn invalid_modulus_is_rejected() {
        let cfg = BuildConfig {
            modulus: 1,
            ..BuildConfig::default()
        };
        let mut set = FixedSet::with_seed(6).with_config(cfg);
        let err = set.initialize([1, 2]).unwrap_err();
        assert!(matches!(err, FixedSetError::InvalidModulus(1)));
        assert!(!set.contains(1));
    }

    #[test]
    fn failed_build_leaves_set_empty() {
        // Keys congruent modulo a tiny prime can never be separated.
        let cfg = BuildConfig {
            modulus: 5,
            max_outer_attempts: 8,
            max_inner_attempts: 8,
            ..BuildConfig::default()
        };
        let mut set = FixedSet::with_seed(7).with_config(cfg);
        assert!(set.initialize([0, 5, 10, 15, 20]).is_err());
        assert!(set.is_empty());
        assert!(!set.contains(0));
    }
}

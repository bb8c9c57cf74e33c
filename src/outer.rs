use crate::error::{BuildStage, FixedSetError};
use crate::hash::AffineHash;
use crate::retry::retry;
use rand::Rng;

/// First-level router: `n` keys into `n` buckets.
#[derive(Clone, Copy, Debug)]
pub(crate) struct OuterTable {
    hash: AffineHash,
    bucket_count: usize,
}

/// Keys grouped by bucket in one flat array.
///
/// CSR layout: bucket `i` is `keys[offsets[i]..offsets[i + 1]]`.
#[derive(Debug)]
pub(crate) struct Partition {
    keys: Vec<i64>,
    offsets: Vec<usize>,
}

impl Partition {
    #[inline]
    pub(crate) fn bucket(&self, i: usize) -> &[i64] {
        &self.keys[self.offsets[i]..self.offsets[i + 1]]
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.offsets.len() - 1
    }
}

/// An accepted outer hash together with the per-key routing it produced.
pub(crate) struct Accepted {
    table: OuterTable,
    routes: Vec<usize>,
    sizes: Vec<usize>,
    sum_of_squares: usize,
}

/// Result of a successful outer build.
#[derive(Debug)]
pub(crate) struct OuterBuild {
    pub(crate) table: OuterTable,
    pub(crate) partition: Partition,
    pub(crate) attempts: u32,
    pub(crate) sum_of_squares: usize,
}

impl OuterTable {
    /// One routing attempt with a freshly sampled hash.
    ///
    /// Accepted iff the sum of squared bucket sizes stays within `4n`, which a
    /// universal family achieves with probability at least 1/2. The tally stops
    /// as soon as the bound is crossed.
    pub(crate) fn attempt<R: Rng + ?Sized>(keys: &[i64], rng: &mut R, p: u128) -> Option<Accepted> {
        let n = keys.len();
        debug_assert!(n > 0);
        let limit = 4 * n;
        let hash = AffineHash::sample(rng, p);
        let mut sizes = vec![0usize; n];
        let mut routes = Vec::with_capacity(n);
        let mut sum_of_squares = 0usize;
        for &key in keys {
            let b = hash.bucket(key, n);
            // (s + 1)^2 - s^2 = 2s + 1
            sum_of_squares += 2 * sizes[b] + 1;
            if sum_of_squares > limit {
                return None;
            }
            sizes[b] += 1;
            routes.push(b);
        }
        Some(Accepted {
            table: OuterTable {
                hash,
                bucket_count: n,
            },
            routes,
            sizes,
            sum_of_squares,
        })
    }

    /// Resample until [`OuterTable::attempt`] accepts, then group the keys by
    /// bucket. `keys` must be distinct and non-empty.
    pub(crate) fn build<R: Rng + ?Sized>(
        keys: &[i64],
        rng: &mut R,
        p: u128,
        max_attempts: u32,
    ) -> Result<OuterBuild, FixedSetError> {
        let (accepted, attempts) = retry(BuildStage::Outer, max_attempts, || {
            Self::attempt(keys, &mut *rng, p)
        })?;
        let Accepted {
            table,
            routes,
            sizes,
            sum_of_squares,
        } = accepted;
        Ok(OuterBuild {
            table,
            partition: partition(keys, &routes, &sizes),
            attempts,
            sum_of_squares,
        })
    }

    #[inline]
    pub(crate) fn route(&self, key: i64) -> usize {
        self.hash.bucket(key, self.bucket_count)
    }

    #[inline]
    pub(crate) fn hash(&self) -> &AffineHash {
        &self.hash
    }
}

/// Counting sort of `keys` into buckets.
fn partition(keys: &[i64], routes: &[usize], sizes: &[usize]) -> Partition {
    let mut offsets = vec![0usize; sizes.len() + 1];
    for (i, &s) in sizes.iter().enumerate() {
        offsets[i + 1] = offsets[i] + s;
    }
    let mut cur = offsets.clone();
    let mut grouped = vec![0i64; keys.len()];
    for (&key, &b) in keys.iter().zip(routes) {
        grouped[cur[b]] = key;
        cur[b] += 1;
    }
    Partition {
        keys: grouped,
        offsets,
    }
}

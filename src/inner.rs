use crate::error::{BuildStage, FixedSetError};
use crate::hash::AffineHash;
use crate::retry::retry;
use rand::Rng;

/// Collision-free table for the keys of one outer bucket.
///
/// A bucket of `k` keys gets `k * k` slots, which makes a random affine hash
/// injective on the bucket with probability at least 1/2. An empty bucket has
/// no hash and no slots.
#[derive(Clone, Debug, Default)]
pub(crate) struct InnerTable {
    hash: Option<AffineHash>,
    slots: Box<[Option<i64>]>,
}

impl InnerTable {
    /// One placement attempt with a freshly sampled hash.
    /// `None` as soon as two keys claim the same slot.
    pub(crate) fn attempt<R: Rng + ?Sized>(keys: &[i64], rng: &mut R, p: u128) -> Option<Self> {
        if keys.is_empty() {
            return Some(Self::default());
        }
        let slot_count = keys.len() * keys.len();
        let hash = AffineHash::sample(rng, p);
        let mut slots = vec![None; slot_count].into_boxed_slice();
        for &key in keys {
            let slot = &mut slots[hash.bucket(key, slot_count)];
            if slot.is_some() {
                return None;
            }
            *slot = Some(key);
        }
        Some(Self {
            hash: Some(hash),
            slots,
        })
    }

    /// Resample until a collision-free hash is found. Returns the table and the
    /// number of attempts used.
    pub(crate) fn build<R: Rng + ?Sized>(
        keys: &[i64],
        rng: &mut R,
        p: u128,
        max_attempts: u32,
        bucket: usize,
    ) -> Result<(Self, u32), FixedSetError> {
        if keys.is_empty() {
            return Ok((Self::default(), 0));
        }
        let stage = BuildStage::Inner {
            bucket,
            len: keys.len(),
        };
        retry(stage, max_attempts, || Self::attempt(keys, &mut *rng, p))
    }

    #[inline]
    pub(crate) fn contains(&self, key: i64) -> bool {
        match &self.hash {
            Some(hash) => self.slots[hash.bucket(key, self.slots.len())] == Some(key),
            None => false,
        }
    }

    #[inline]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Stored keys in slot order.
    pub(crate) fn keys(&self) -> impl Iterator<Item = i64> + '_ {
        self.slots.iter().flatten().copied()
    }
}

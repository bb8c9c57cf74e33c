//! fks_fixed_set — static integer set with FKS two-level perfect hashing.
//!
//! - Build once from any list of `i64` keys (duplicates are collapsed).
//! - O(1) worst-case lookups: one outer hash picks a bucket, one inner hash picks a slot.
//! - Linear space: the outer hash is resampled until the squared bucket sizes sum to at most `4n`,
//!   and each bucket of `k` keys gets a collision-free table of `k²` slots.
//! - Randomized: hashes `(a·x + b) mod p` are drawn from a generator owned by the set.

pub mod hash;

mod error;
mod inner;
mod outer;
mod retry;
mod set;

pub use error::{BuildStage, FixedSetError};
pub use hash::{AffineHash, MODULUS};
pub use set::{BuildConfig, BuildStats, FixedSet};

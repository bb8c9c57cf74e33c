use std::fmt;
use thiserror::Error;

/// Which retry loop gave up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildStage {
    /// Searching for an outer hash with a bounded sum of squared bucket sizes.
    Outer,
    /// Searching for a collision-free hash for one bucket.
    Inner { bucket: usize, len: usize },
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildStage::Outer => f.write_str("outer"),
            BuildStage::Inner { bucket, len } => write!(f, "inner (bucket {bucket}, {len} keys)"),
        }
    }
}

#[derive(Debug, Error)]
pub enum FixedSetError {
    #[error("no acceptable {stage} hash after {attempts} attempts")]
    RetryLimit { stage: BuildStage, attempts: u32 },
    #[error("modulus {0} is outside (1, 2^65]")]
    InvalidModulus(u128),
}

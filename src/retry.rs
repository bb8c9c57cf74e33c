use crate::error::{BuildStage, FixedSetError};

/// Attempts past this count are logged as a warning: with a sound random source
/// each attempt succeeds with probability at least 1/2.
const WARN_ATTEMPTS: u32 = 16;

/// Run `attempt` until it yields a value, at most `limit` times.
///
/// Every attempt starts from scratch; nothing is carried between rounds.
/// Returns the value and the number of attempts it took.
pub(crate) fn retry<T>(
    stage: BuildStage,
    limit: u32,
    mut attempt: impl FnMut() -> Option<T>,
) -> Result<(T, u32), FixedSetError> {
    for round in 1..=limit {
        if let Some(value) = attempt() {
            return Ok((value, round));
        }
        log::trace!("{stage} attempt {round} rejected");
        if round == WARN_ATTEMPTS {
            log::warn!("{stage} hash still rejected after {round} attempts; check the random source");
        }
    }
    log::error!("no acceptable {stage} hash after {limit} attempts");
    Err(FixedSetError::RetryLimit {
        stage,
        attempts: limit,
    })
}

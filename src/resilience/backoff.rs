//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
/// capped at `max`, plus up to 10% jitter.
pub fn calculate_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    let capped = capped_backoff(attempt, base, max);
    let jitter_ceiling = capped.as_millis() as u64 / 10;
    let jitter = if jitter_ceiling > 0 {
        rand::thread_rng().gen_range(0..jitter_ceiling)
    } else {
        0
    };

    capped + Duration::from_millis(jitter)
}

/// Largest delay `calculate_backoff` can return for `attempt`, jitter included.
pub fn backoff_ceiling(attempt: u32, base: Duration, max: Duration) -> Duration {
    let capped = capped_backoff(attempt, base, max);
    capped.saturating_add(capped / 10)
}

fn capped_backoff(attempt: u32, base: Duration, max: Duration) -> Duration {
    if attempt == 0 {
        return Duration::ZERO;
    }
    let factor = 2u32.saturating_pow(attempt - 1);
    base.saturating_mul(factor).min(max)
}

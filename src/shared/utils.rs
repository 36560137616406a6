//! Utility functions and helpers

use rust_decimal::Decimal;
use std::time::Duration;

/// Calculate percentage change, `None` when the old value is zero or the result
/// doesn't fit in a `Decimal`
pub fn calculate_percentage_change(old_value: Decimal, new_value: Decimal) -> Option<Decimal> {
    new_value
        .checked_sub(old_value)?
        .checked_mul(Decimal::ONE_HUNDRED)?
        .checked_div(old_value)
}

/// Delay before retry number `retry` (1-based): `backoff_factor * 2^(retry - 1)` seconds,
/// capped at `max_delay`
pub fn backoff_delay(backoff_factor: f64, retry: u32, max_delay: Duration) -> Duration {
    if retry == 0 || backoff_factor <= 0.0 {
        return Duration::ZERO;
    }
    let secs = backoff_factor * 2_f64.powi(retry.min(1024) as i32 - 1);
    if !secs.is_finite() || secs >= max_delay.as_secs_f64() {
        return max_delay;
    }
    Duration::from_secs_f64(secs)
}

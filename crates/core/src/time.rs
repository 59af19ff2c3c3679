use chrono::{DateTime, Duration, Utc};

/// Milliseconds from `earlier` to `later` at microsecond resolution; negative
/// when `later` precedes `earlier`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn millis_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    let delta = later - earlier;
    match delta.num_microseconds() {
        Some(micros) => micros as f64 / 1000.0,
        // only spans of roughly 292k years overflow microseconds
        None => delta.num_milliseconds() as f64,
    }
}

/// Deterministic timestamp for tests and examples (2023-11-14T22:13:20Z).
pub const FIXED_TEST_TIMESTAMP: i64 = 1_700_000_000;

/// Returns a deterministic `DateTime<Utc>` for tests and doc examples.
///
/// # Panics
///
/// Panics if the fixed timestamp cannot be represented.
#[must_use]
pub fn fixed_now() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(FIXED_TEST_TIMESTAMP, 0)
        .expect("fixed timestamp should be valid")
}

/// `fixed_now()` shifted by `offset_ms` milliseconds.
#[must_use]
pub fn fixed_at_ms(offset_ms: i64) -> DateTime<Utc> {
    fixed_now() + Duration::milliseconds(offset_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn millis_between_is_signed() {
        assert_eq!(millis_between(fixed_at_ms(1000), fixed_at_ms(1300)), 300.0);
        assert_eq!(millis_between(fixed_at_ms(1300), fixed_at_ms(1000)), -300.0);
    }

    #[test]
    fn millis_between_keeps_sub_millisecond_gaps() {
        let earlier = fixed_now() + Duration::microseconds(400);
        let later = fixed_now() + Duration::microseconds(1200);
        assert_eq!(millis_between(earlier, later), 0.8);
    }
}

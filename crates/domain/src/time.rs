//! Time and timestamp helpers.

use chrono::{DateTime, Utc};

/// UTC timestamp used for `created_at`, `approved_at`, settings `updated_at`, etc.
pub type Timestamp = DateTime<Utc>;

/// Return the current UTC time.
#[must_use]
pub fn now() -> Timestamp {
    Utc::now()
}

/// `at` moved back by `span`, saturating at the earliest representable time.
#[must_use]
pub fn earlier_by(at: Timestamp, span: std::time::Duration) -> Timestamp {
    chrono::Duration::from_std(span)
        .ok()
        .and_then(|span| at.checked_sub_signed(span))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_return_current_utc_time() {
        let before = Utc::now();
        let ts = now();
        let after = Utc::now();
        assert!(ts >= before);
        assert!(ts <= after);
    }

    #[test]
    fn should_move_timestamp_back() {
        let at = DateTime::from_timestamp(1_772_352_000, 0).unwrap();
        let earlier = earlier_by(at, std::time::Duration::from_secs(70));
        assert_eq!(earlier.timestamp(), 1_772_351_930);
    }

    #[test]
    fn should_saturate_when_moving_back_too_far() {
        let earlier = earlier_by(now(), std::time::Duration::MAX);
        assert_eq!(earlier, DateTime::<Utc>::MIN_UTC);
    }
}

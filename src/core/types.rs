//! Common time types used across casewatch modules.

use std::sync::Arc;

/// Timestamp wrapper for consistent serialization.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Get current UTC timestamp.
pub fn now() -> Timestamp {
    chrono::Utc::now()
}

/// Source of "now" for a tick.
pub trait Clock: Send + Sync {
    /// Current instant.
    fn now(&self) -> Timestamp;
}

/// Wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        now()
    }
}

/// A clock frozen at one instant. Used for reproducible snapshots.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

/// Shared clock handle.
pub type SharedClock = Arc<dyn Clock>;

/// `at - span`, clamped to the earliest representable instant.
pub fn saturating_sub(at: Timestamp, span: chrono::Duration) -> Timestamp {
    at.checked_sub_signed(span)
        .unwrap_or(chrono::DateTime::<chrono::Utc>::MIN_UTC)
}

/// `at + span`, clamped to the latest representable instant.
pub fn saturating_add(at: Timestamp, span: chrono::Duration) -> Timestamp {
    at.checked_add_signed(span)
        .unwrap_or(chrono::DateTime::<chrono::Utc>::MAX_UTC)
}

/// Whole hours elapsed from `earlier` to `later`, floored. Negative when
/// `later` precedes `earlier`.
pub fn whole_hours_between(earlier: Timestamp, later: Timestamp) -> i64 {
    (later - earlier).num_hours()
}

/// Whole days elapsed from `earlier` to `later`, floored.
pub fn whole_days_between(earlier: Timestamp, later: Timestamp) -> i64 {
    (later - earlier).num_days()
}

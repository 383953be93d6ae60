//! Soft limit on unusually small or large amounts. An out-of-range value doesn't block the
//! user outright: it routes the submit through a confirmation step, which can also silence the
//! check for a while.

use crate::config::GuardRailConfig;
use crate::storage;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GuardRail {
    config: GuardRailConfig,
    storage_key: &'static str,
}

/// What the confirmation step asked the user and what they picked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardChoice {
    ProceedOnce,
    ProceedAndSuppress,
    Cancel,
}

impl GuardRail {
    pub fn new(config: GuardRailConfig, storage_key: &'static str) -> Self {
        Self {
            config,
            storage_key,
        }
    }

    /// Both bounds are inclusive.
    pub fn in_range(&self, value: f64) -> bool {
        value >= self.config.min && value <= self.config.max
    }

    pub fn out_of_range(&self, values: impl IntoIterator<Item = f64>) -> Vec<f64> {
        values.into_iter().filter(|v| !self.in_range(*v)).collect()
    }

    /// `until` is the stored expiry; the check stays off up to and including that instant.
    pub fn is_suppressed(until: Option<i64>, now_ms: i64) -> bool {
        matches!(until, Some(until) if now_ms <= until)
    }

    pub fn suppress_until(&self, now_ms: i64) -> i64 {
        now_ms.saturating_add(self.config.suppress_for_ms)
    }

    /// Pure decision: does this submission need the confirmation step?
    pub fn needs_confirmation(
        &self,
        values: impl IntoIterator<Item = f64>,
        suppressed_until: Option<i64>,
        now_ms: i64,
    ) -> bool {
        if Self::is_suppressed(suppressed_until, now_ms) {
            return false;
        }
        !self.out_of_range(values).is_empty()
    }

    /// Same as [`needs_confirmation`](Self::needs_confirmation) but reads the persisted expiry.
    pub fn check(&self, values: impl IntoIterator<Item = f64>, now_ms: i64) -> bool {
        self.needs_confirmation(values, storage::load_i64(self.storage_key), now_ms)
    }

    pub fn suppress(&self, now_ms: i64) {
        let until = self.suppress_until(now_ms);
        log::info!("guard-rail {} suppressed until {}", self.storage_key, until);
        storage::save_i64(self.storage_key, until);
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.config.min, self.config.max)
    }
}

pub fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOUR: i64 = 60 * 60 * 1000;

    fn rail() -> GuardRail {
        GuardRail::new(GuardRailConfig::default(), "test-key")
    }

    #[test]
    fn bounds_are_inclusive() {
        let rail = rail();
        assert!(rail.in_range(10_000.0));
        assert!(rail.in_range(900_000.0));
        assert!(!rail.in_range(9_999.0));
        assert!(!rail.in_range(900_001.0));
    }

    #[test]
    fn any_out_of_range_line_triggers_confirmation() {
        let rail = rail();
        assert!(!rail.needs_confirmation([10_000.0, 500_000.0], None, 0));
        assert!(rail.needs_confirmation([10_000.0, 9_999.0], None, 0));
        assert!(rail.needs_confirmation([900_001.0], None, 0));
        assert_eq!(rail.out_of_range([5.0, 20_000.0, 1e7]), vec![5.0, 1e7]);
    }

    #[test]
    fn empty_submission_never_triggers() {
        assert!(!rail().needs_confirmation(Vec::<f64>::new(), None, 0));
    }

    #[test]
    fn suppression_lasts_exactly_one_day() {
        let rail = rail();
        let set_at = 1_700_000_000_000;
        let until = rail.suppress_until(set_at);
        assert_eq!(until, set_at + 24 * HOUR);

        assert!(!rail.needs_confirmation([1.0], Some(until), set_at));
        assert!(!rail.needs_confirmation([1.0], Some(until), set_at + 24 * HOUR));
        assert!(rail.needs_confirmation([1.0], Some(until), set_at + 24 * HOUR + 1));
    }

    #[test]
    fn expired_or_missing_suppression_is_inactive() {
        assert!(!GuardRail::is_suppressed(None, 5));
        assert!(!GuardRail::is_suppressed(Some(4), 5));
        assert!(GuardRail::is_suppressed(Some(5), 5));
    }
}

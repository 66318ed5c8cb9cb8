//! Date-based retention.
//!
//! An entry qualifies for deletion iff its age in whole days is greater than
//! or equal to the threshold; with no threshold every entry qualifies (full
//! empty). The boundary is deliberately inclusive: an entry aged exactly
//! `days` days is deleted, one aged a day less is retained.

use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy)]
pub struct RetentionPolicy {
    max_age_days: Option<i64>,
}

impl RetentionPolicy {
    pub fn older_than_days(days: i64) -> Self {
        Self {
            max_age_days: Some(days),
        }
    }

    pub fn delete_everything() -> Self {
        Self { max_age_days: None }
    }

    pub fn from_days(days: Option<i64>) -> Self {
        Self { max_age_days: days }
    }

    pub fn should_delete(&self, deleted_at: NaiveDateTime, now: NaiveDateTime) -> bool {
        match self.max_age_days {
            None => true,
            Some(days) => now.signed_duration_since(deleted_at).num_days() >= days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn exact_age_is_deleted() {
        let policy = RetentionPolicy::older_than_days(30);
        assert!(policy.should_delete(now() - Duration::days(30), now()));
    }

    #[test]
    fn one_day_younger_is_retained() {
        let policy = RetentionPolicy::older_than_days(30);
        assert!(!policy.should_delete(now() - Duration::days(29), now()));
        // A few hours short of the full 30 days still counts as 29 days.
        assert!(!policy.should_delete(now() - Duration::days(30) + Duration::hours(3), now()));
    }

    #[test]
    fn older_entries_are_deleted() {
        let policy = RetentionPolicy::older_than_days(30);
        assert!(policy.should_delete(now() - Duration::days(45), now()));
    }

    #[test]
    fn no_threshold_deletes_everything() {
        let policy = RetentionPolicy::delete_everything();
        assert!(policy.should_delete(now(), now()));
        assert!(policy.should_delete(now() - Duration::seconds(1), now()));
    }

    #[test]
    fn future_dated_entries_are_retained() {
        let policy = RetentionPolicy::older_than_days(1);
        assert!(!policy.should_delete(now() + Duration::days(2), now()));
    }

    #[test]
    fn zero_threshold_deletes_today() {
        let policy = RetentionPolicy::older_than_days(0);
        assert!(policy.should_delete(now(), now()));
    }
}

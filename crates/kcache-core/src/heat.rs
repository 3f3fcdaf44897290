//! Heat scoring.
//!
//! ```text
//! recency = max(0, 1 - days_since(last_used or created_at) / decay_days)
//! heat    = use_count * 2 + recency * 3
//! ```
//!
//! Usage weighs roughly twice as much as freshness per unit, and freshness
//! bottoms out at zero once `decay_days` pass without use.

use chrono::{DateTime, Utc};

use crate::types::{Entry, ScoredEntry};
use crate::utils::days_since;

/// Weight applied to each recorded use.
pub const USAGE_WEIGHT: f64 = 2.0;

/// Weight applied to the recency factor.
pub const RECENCY_WEIGHT: f64 = 3.0;

/// Recency assumed when an entry carries no readable timestamp.
pub const UNKNOWN_RECENCY: f64 = 0.5;

/// Pure scoring model parameterised by the decay window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatModel {
    decay_days: u32,
}

impl HeatModel {
    pub fn new(decay_days: u32) -> Self {
        Self { decay_days }
    }

    pub fn decay_days(&self) -> u32 {
        self.decay_days
    }

    /// Whole days since the entry was last used (or created), if known.
    pub fn days_idle(&self, entry: &Entry, now: &DateTime<Utc>) -> Option<i64> {
        entry.last_activity().map(|then| days_since(&then, now))
    }

    /// Freshness in `[0, ..)`; `UNKNOWN_RECENCY` when no timestamp parses.
    pub fn recency_factor(&self, entry: &Entry, now: &DateTime<Utc>) -> f64 {
        match self.days_idle(entry, now) {
            Some(days) => (1.0 - days as f64 / f64::from(self.decay_days)).max(0.0),
            None => UNKNOWN_RECENCY,
        }
    }

    pub fn heat(&self, entry: &Entry, now: &DateTime<Utc>) -> f64 {
        f64::from(entry.use_count) * USAGE_WEIGHT + self.recency_factor(entry, now) * RECENCY_WEIGHT
    }

    /// Idle for longer than the decay window, or no readable timestamp at all.
    pub fn is_stale(&self, entry: &Entry, now: &DateTime<Utc>) -> bool {
        match self.days_idle(entry, now) {
            Some(days) => days > i64::from(self.decay_days),
            None => true,
        }
    }

    pub fn score(&self, entry: Entry, now: &DateTime<Utc>) -> ScoredEntry {
        let heat = self.heat(&entry, now);
        let is_stale = self.is_stale(&entry, now);
        ScoredEntry {
            entry,
            heat,
            is_stale,
        }
    }

    /// Score and sort hottest first. Equal heat keeps input order.
    pub fn rank(&self, entries: Vec<Entry>, now: &DateTime<Utc>) -> Vec<ScoredEntry> {
        let mut scored: Vec<ScoredEntry> = entries
            .into_iter()
            .map(|entry| self.score(entry, now))
            .collect();
        scored.sort_by(|a, b| b.heat.total_cmp(&a.heat));
        scored
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn entry_used(days_ago: i64, use_count: u32) -> Entry {
        let created = now() - Duration::days(60);
        let mut entry = Entry::new("e", "content", "", vec![], Source::Auto, &created);
        entry.use_count = use_count;
        entry.last_used = Some((now() - Duration::days(days_ago)).to_rfc3339());
        entry
    }

    #[test]
    fn test_fresh_entry_heat() {
        let model = HeatModel::new(14);
        let entry = Entry::new("e", "c", "", vec![], Source::Auto, &now());
        assert_eq!(model.heat(&entry, &now()), 3.0);
        assert!(!model.is_stale(&entry, &now()));
    }

    #[test]
    fn test_heat_combines_usage_and_recency() {
        let model = HeatModel::new(14);
        // 7 of 14 days idle -> recency 0.5
        let entry = entry_used(7, 2);
        assert!((model.heat(&entry, &now()) - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_decay_is_monotonic_and_floors() {
        let model = HeatModel::new(14);
        let mut previous = f64::INFINITY;
        for days in 0..30 {
            let heat = model.heat(&entry_used(days, 4), &now());
            assert!(heat <= previous, "heat rose at day {days}");
            previous = heat;
            if days >= 14 {
                assert_eq!(heat, 8.0);
            }
        }
    }

    #[test]
    fn test_last_used_preferred_over_created() {
        let model = HeatModel::new(14);
        let entry = entry_used(0, 0);
        assert_eq!(model.days_idle(&entry, &now()), Some(0));
        assert_eq!(model.recency_factor(&entry, &now()), 1.0);
    }

    #[test]
    fn test_unknown_timestamp_fallbacks() {
        let model = HeatModel::new(14);
        let entry: Entry = serde_json::from_str(r#"{"id": "x", "use_count": 1}"#).unwrap();
        assert_eq!(model.recency_factor(&entry, &now()), UNKNOWN_RECENCY);
        assert_eq!(model.heat(&entry, &now()), 3.5);
        assert!(model.is_stale(&entry, &now()));
    }

    #[test]
    fn test_stale_boundary() {
        let model = HeatModel::new(14);
        assert!(!model.is_stale(&entry_used(14, 0), &now()));
        assert!(model.is_stale(&entry_used(15, 0), &now()));
    }

    #[test]
    fn test_rank_is_stable_on_ties() {
        let model = HeatModel::new(14);
        let mut a = entry_used(1, 1);
        a.id = "a".into();
        let mut b = entry_used(1, 1);
        b.id = "b".into();
        let mut c = entry_used(1, 5);
        c.id = "c".into();

        let ranked = model.rank(vec![a, b, c], &now());
        let ids: Vec<&str> = ranked.iter().map(|s| s.entry.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }
}

//! Tier transition rules.
//!
//! Pure functions over in-memory tier collections. The cache loads a tier,
//! applies one of these, and writes the result back; nothing here touches
//! the filesystem.

use chrono::{DateTime, Utc};

use crate::heat::HeatModel;
use crate::types::Entry;

/// What rotation does with a stale hot entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleAction {
    /// Well used in the past: back to recent
    Demote,
    /// Rarely used: straight to archive
    Archive,
}

/// A hot tier split by the staleness rule
#[derive(Debug, Default)]
pub struct StaleSplit {
    pub keep: Vec<Entry>,
    pub demote: Vec<Entry>,
    pub archive: Vec<Entry>,
}

/// A hot tier split by the capacity rule
#[derive(Debug, Default)]
pub struct CapacitySplit {
    /// Hottest entries, hottest first
    pub keep: Vec<Entry>,
    /// Remainder, hottest first
    pub demote: Vec<Entry>,
}

/// Usage-driven promotion check for an entry living in recent.
pub fn should_promote(entry: &Entry, promote_threshold: u32) -> bool {
    entry.use_count >= promote_threshold
}

/// Decide the fate of a hot entry during rotation. `None` means it stays.
pub fn stale_action(
    entry: &Entry,
    model: &HeatModel,
    now: &DateTime<Utc>,
    promote_threshold: u32,
) -> Option<StaleAction> {
    if !model.is_stale(entry, now) {
        return None;
    }
    if entry.use_count >= promote_threshold {
        Some(StaleAction::Demote)
    } else {
        Some(StaleAction::Archive)
    }
}

/// Apply the staleness rule to every hot entry, preserving relative order.
pub fn split_stale(
    hot: Vec<Entry>,
    model: &HeatModel,
    now: &DateTime<Utc>,
    promote_threshold: u32,
) -> StaleSplit {
    let mut split = StaleSplit::default();
    for entry in hot {
        match stale_action(&entry, model, now, promote_threshold) {
            None => split.keep.push(entry),
            Some(StaleAction::Demote) => split.demote.push(entry),
            Some(StaleAction::Archive) => split.archive.push(entry),
        }
    }
    split
}

/// Keep the `max_hot` hottest entries. Equal heat keeps stored order.
///
/// When the tier is within capacity it is returned untouched, in stored order.
pub fn split_over_capacity(
    hot: Vec<Entry>,
    max_hot: usize,
    model: &HeatModel,
    now: &DateTime<Utc>,
) -> CapacitySplit {
    if hot.len() <= max_hot {
        return CapacitySplit {
            keep: hot,
            demote: Vec::new(),
        };
    }

    let mut keep: Vec<Entry> = model
        .rank(hot, now)
        .into_iter()
        .map(|scored| scored.entry)
        .collect();
    let demote = keep.split_off(max_hot);
    CapacitySplit { keep, demote }
}

/// Trim recent to `max_recent`, returning the overflow oldest-last as it sat
/// at the tail (ready to append to archive).
pub fn take_recent_overflow(recent: &mut Vec<Entry>, max_recent: usize) -> Vec<Entry> {
    if recent.len() <= max_recent {
        return Vec::new();
    }
    recent.split_off(max_recent)
}

/// Put `entries` at the front of `tier`, keeping their order.
pub fn prepend(tier: &mut Vec<Entry>, entries: Vec<Entry>) {
    if entries.is_empty() {
        return;
    }
    tier.splice(0..0, entries);
}

/// Remove the first entry with `id`.
pub fn take_by_id(tier: &mut Vec<Entry>, id: &str) -> Option<Entry> {
    let index = tier.iter().position(|e| e.id == id)?;
    Some(tier.remove(index))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Source;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
    }

    fn entry(id: &str, use_count: u32, idle_days: i64) -> Entry {
        let mut e = Entry::new(id, id, "", vec![], Source::Auto, &(now() - Duration::days(90)));
        e.use_count = use_count;
        e.last_used = Some((now() - Duration::days(idle_days)).to_rfc3339());
        e
    }

    fn ids(entries: &[Entry]) -> Vec<&str> {
        entries.iter().map(|e| e.id.as_str()).collect()
    }

    #[test]
    fn test_should_promote_at_threshold() {
        assert!(!should_promote(&entry("a", 2, 0), 3));
        assert!(should_promote(&entry("a", 3, 0), 3));
        assert!(should_promote(&entry("a", 7, 0), 3));
    }

    #[test]
    fn test_stale_action() {
        let model = HeatModel::new(14);
        assert_eq!(stale_action(&entry("fresh", 0, 2), &model, &now(), 3), None);
        assert_eq!(
            stale_action(&entry("used", 5, 20), &model, &now(), 3),
            Some(StaleAction::Demote)
        );
        assert_eq!(
            stale_action(&entry("idle", 1, 20), &model, &now(), 3),
            Some(StaleAction::Archive)
        );
    }

    #[test]
    fn test_split_stale_preserves_order() {
        let model = HeatModel::new(14);
        let hot = vec![
            entry("k1", 1, 1),
            entry("d1", 4, 30),
            entry("a1", 0, 30),
            entry("k2", 9, 3),
            entry("d2", 3, 16),
        ];
        let split = split_stale(hot, &model, &now(), 3);
        assert_eq!(ids(&split.keep), vec!["k1", "k2"]);
        assert_eq!(ids(&split.demote), vec!["d1", "d2"]);
        assert_eq!(ids(&split.archive), vec!["a1"]);
    }

    #[test]
    fn test_split_over_capacity_keeps_hottest() {
        let model = HeatModel::new(14);
        let hot = vec![
            entry("cold", 0, 10),
            entry("warm", 2, 1),
            entry("hot", 8, 0),
            entry("tie-a", 1, 1),
            entry("tie-b", 1, 1),
        ];
        let split = split_over_capacity(hot, 3, &model, &now());
        assert_eq!(ids(&split.keep), vec!["hot", "warm", "tie-a"]);
        assert_eq!(ids(&split.demote), vec!["tie-b", "cold"]);
    }

    #[test]
    fn test_split_within_capacity_is_untouched() {
        let model = HeatModel::new(14);
        let hot = vec![entry("cold", 0, 10), entry("hot", 8, 0)];
        let split = split_over_capacity(hot, 2, &model, &now());
        assert_eq!(ids(&split.keep), vec!["cold", "hot"]);
        assert!(split.demote.is_empty());
    }

    #[test]
    fn test_take_recent_overflow() {
        let mut recent = vec![entry("c4", 0, 0), entry("c3", 0, 0), entry("c2", 0, 0), entry("c1", 0, 0), entry("c0", 0, 0)];
        let overflow = take_recent_overflow(&mut recent, 3);
        assert_eq!(ids(&recent), vec!["c4", "c3", "c2"]);
        assert_eq!(ids(&overflow), vec!["c1", "c0"]);

        assert!(take_recent_overflow(&mut recent, 3).is_empty());
    }

    #[test]
    fn test_prepend_and_take() {
        let mut tier = vec![entry("x", 0, 0)];
        prepend(&mut tier, vec![entry("a", 0, 0), entry("b", 0, 0)]);
        assert_eq!(ids(&tier), vec!["a", "b", "x"]);

        let taken = take_by_id(&mut tier, "b").unwrap();
        assert_eq!(taken.id, "b");
        assert_eq!(ids(&tier), vec!["a", "x"]);
        assert!(take_by_id(&mut tier, "missing").is_none());
    }
}

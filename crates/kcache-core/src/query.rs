//! Read-only views over the cache.
//!
//! Every query scans tiers hot first, then recent, then archive, so results
//! are deterministic even if the same id ever shows up twice.

use crate::cache::KnowledgeCache;
use crate::types::{Entry, ScoredEntry, Tier};

impl KnowledgeCache {
    /// Hot then recent in stored order, then archive when asked for.
    pub fn list(&self, include_archive: bool) -> Vec<Entry> {
        self.list_with_tiers(include_archive)
            .into_iter()
            .map(|(_, entry)| entry)
            .collect()
    }

    /// Same order as [`list`](Self::list), each entry paired with its tier.
    pub fn list_with_tiers(&self, include_archive: bool) -> Vec<(Tier, Entry)> {
        let tiers: &[Tier] = if include_archive {
            &Tier::QUERY_ORDER
        } else {
            &[Tier::Hot, Tier::Recent]
        };
        tiers
            .iter()
            .flat_map(|tier| {
                self.store()
                    .load(*tier)
                    .into_iter()
                    .map(move |entry| (*tier, entry))
            })
            .collect()
    }

    /// Entries of a single tier in stored order
    pub fn list_tier(&self, tier: Tier) -> Vec<Entry> {
        self.store().load(tier)
    }

    /// First entry with `id`, searching hot, recent, archive.
    pub fn get_by_id(&self, id: &str) -> Option<Entry> {
        self.locate(id).map(|(_, entry)| entry)
    }

    /// Like [`get_by_id`](Self::get_by_id), also reporting the tier.
    pub fn locate(&self, id: &str) -> Option<(Tier, Entry)> {
        Tier::QUERY_ORDER.into_iter().find_map(|tier| {
            self.store()
                .load(tier)
                .into_iter()
                .find(|e| e.id == id)
                .map(|entry| (tier, entry))
        })
    }

    /// Entry with `id` annotated with its current heat.
    pub fn get_with_score(&self, id: &str) -> Option<ScoredEntry> {
        let entry = self.get_by_id(id)?;
        Some(self.model().score(entry, &self.now()))
    }

    /// Case-insensitive substring search over content, context and tags.
    pub fn search(&self, query: &str) -> Vec<Entry> {
        let needle = query.to_lowercase();
        Tier::QUERY_ORDER
            .into_iter()
            .flat_map(|tier| self.store().load(tier))
            .filter(|e| e.matches(&needle))
            .collect()
    }

    /// Hot entries scored and sorted hottest first.
    pub fn get_ranked_hot(&self) -> Vec<ScoredEntry> {
        self.model().rank(self.store().load(Tier::Hot), &self.now())
    }
}

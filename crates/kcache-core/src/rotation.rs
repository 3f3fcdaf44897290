//! Rotation: the maintenance pass that restores tier invariants.
//!
//! A pass runs three steps, each a separate read-modify-write:
//!
//! 1. stale hot entries are demoted (well used) or archived (rarely used)
//! 2. hot over capacity keeps its hottest entries and demotes the rest
//! 3. recent over capacity archives its oldest entries
//!
//! Running a pass twice with no mutation in between moves nothing the second
//! time. [`RotationGate`] lets a periodic caller skip passes that would run
//! more often than the configured interval.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cache::KnowledgeCache;
use crate::error::Result;
use crate::policy;
use crate::store::write_json_atomic;
use crate::types::{RotationResult, Tier};

/// File under the store root holding the gate state
pub const ROTATION_STATE_FILE: &str = "rotation-state.json";

impl KnowledgeCache {
    /// Run one rotation pass.
    pub fn rotate(&self) -> Result<RotationResult> {
        let now = self.now();
        let config = self.config();
        let store = self.store();
        let mut result = RotationResult::default();

        // Step 1: staleness
        let hot = store.load(Tier::Hot);
        let stale = policy::split_stale(hot, self.model(), &now, config.promote_threshold);
        if !stale.demote.is_empty() || !stale.archive.is_empty() {
            result.hot_demoted += stale.demote.len();
            result.hot_archived += stale.archive.len();

            if !stale.archive.is_empty() {
                let mut archive = store.load(Tier::Archive);
                archive.extend(stale.archive);
                store.save(Tier::Archive, &archive)?;
            }
            if !stale.demote.is_empty() {
                let mut recent = store.load(Tier::Recent);
                policy::prepend(&mut recent, stale.demote);
                store.save(Tier::Recent, &recent)?;
            }
            store.save(Tier::Hot, &stale.keep)?;
        }

        // Step 2: hot capacity
        let hot = store.load(Tier::Hot);
        let capacity = policy::split_over_capacity(hot, config.max_hot, self.model(), &now);
        if !capacity.demote.is_empty() {
            result.hot_demoted += capacity.demote.len();

            let mut recent = store.load(Tier::Recent);
            policy::prepend(&mut recent, capacity.demote);
            store.save(Tier::Recent, &recent)?;
            store.save(Tier::Hot, &capacity.keep)?;
        }

        // Step 3: recent capacity
        let recent = store.load(Tier::Recent);
        if recent.len() > config.max_recent {
            result.recent_archived += self.write_recent_with_overflow(recent)?;
        }

        if result.is_noop() {
            debug!("Rotation moved nothing");
        } else {
            info!(
                hot_demoted = result.hot_demoted,
                hot_archived = result.hot_archived,
                recent_archived = result.recent_archived,
                "Rotation complete"
            );
        }
        Ok(result)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RotationState {
    #[serde(default)]
    last_run: Option<DateTime<Utc>>,
}

/// Persists the time of the last rotation so callers can run it at most once
/// per interval.
#[derive(Debug, Clone)]
pub struct RotationGate {
    path: PathBuf,
    interval: Duration,
}

impl RotationGate {
    /// Gate stored at `<root>/rotation-state.json`
    pub fn new(root: &Path, interval_hours: u64) -> Self {
        let interval = i64::try_from(interval_hours)
            .ok()
            .and_then(Duration::try_hours)
            .unwrap_or(Duration::MAX);
        Self {
            path: root.join(ROTATION_STATE_FILE),
            interval,
        }
    }

    /// Gate for `cache`, using its root and configured interval
    pub fn for_cache(cache: &KnowledgeCache) -> Self {
        Self::new(cache.root(), cache.config().rotation_interval_hours)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When rotation last ran. Missing or unreadable state reads as never.
    pub fn last_run(&self) -> Option<DateTime<Utc>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Rotation state unreadable");
                return None;
            }
        };
        match serde_json::from_str::<RotationState>(&content) {
            Ok(state) => state.last_run,
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Rotation state corrupt, treating as never run");
                None
            }
        }
    }

    /// Earliest time the next pass is due, `None` if it is due already
    /// because rotation never ran.
    pub fn next_due(&self) -> Option<DateTime<Utc>> {
        self.last_run()
            .and_then(|last| last.checked_add_signed(self.interval))
    }

    pub fn is_due(&self, now: &DateTime<Utc>) -> bool {
        match self.last_run() {
            Some(last) => *now - last >= self.interval,
            None => true,
        }
    }

    /// Record a completed pass at `now`.
    pub fn record(&self, now: &DateTime<Utc>) -> Result<()> {
        let state = RotationState {
            last_run: Some(*now),
        };
        write_json_atomic(&self.path, &state)
    }

    /// Rotate `cache` if the interval has elapsed, recording the run.
    pub fn run_if_due(&self, cache: &KnowledgeCache) -> Result<Option<RotationResult>> {
        let now = cache.now();
        if !self.is_due(&now) {
            debug!(next_due = ?self.next_due(), "Rotation not due");
            return Ok(None);
        }

        let result = cache.rotate()?;
        self.record(&now)?;
        Ok(Some(result))
    }
}

//! Concurrent expiration registry

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use match_events::MatchSide;

/// One armed clock: which side of which match runs out, and when.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpirationEntry {
    pub match_id: Uuid,
    pub side_to_act: MatchSide,
    pub exp_time_utc: DateTime<Utc>,
}

struct VersionedEntry {
    entry: ExpirationEntry,
    version: u64,
}

/// Deadline map keyed by match id. At most one entry per match: a match has
/// exactly one running clock, so a new deadline always replaces the old one.
///
/// Entries carry a version so that [`ExpirationRegistry::sweep`] only
/// removes what it actually read; an entry replaced or cleared between the
/// scan and the removal survives untouched.
pub struct ExpirationRegistry {
    entries: DashMap<Uuid, VersionedEntry>,
    next_version: AtomicU64,
}

impl Default for ExpirationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpirationRegistry {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            next_version: AtomicU64::new(0),
        }
    }

    /// Arm (or re-arm) the deadline for a match.
    pub fn upsert(&self, match_id: Uuid, side_to_act: MatchSide, exp_time_utc: DateTime<Utc>) {
        let version = self.next_version.fetch_add(1, Ordering::Relaxed);
        self.entries.insert(
            match_id,
            VersionedEntry {
                entry: ExpirationEntry {
                    match_id,
                    side_to_act,
                    exp_time_utc,
                },
                version,
            },
        );
    }

    /// Drop the deadline for a match that finished through another path.
    pub fn clear(&self, match_id: Uuid) -> bool {
        self.entries.remove(&match_id).is_some()
    }

    /// Remove and return every entry due at `now`, each exactly once.
    /// Removal is conditioned on the version read during the scan, so a
    /// concurrent `upsert`/`clear` never loses a fresh entry.
    pub fn sweep(&self, now: DateTime<Utc>) -> Vec<ExpirationEntry> {
        let due: Vec<(Uuid, u64)> = self
            .entries
            .iter()
            .filter(|r| r.value().entry.exp_time_utc <= now)
            .map(|r| (*r.key(), r.value().version))
            .collect();

        let mut drained = Vec::with_capacity(due.len());
        for (match_id, version) in due {
            if let Some((_, versioned)) = self
                .entries
                .remove_if(&match_id, |_, v| v.version == version)
            {
                drained.push(versioned.entry);
            }
        }

        if !drained.is_empty() {
            debug!("Swept {} due deadline(s)", drained.len());
        }
        drained
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, match_id: Uuid) -> bool {
        self.entries.contains_key(&match_id)
    }

    /// Re-arm from scratch, e.g. from the store's in-progress matches after
    /// a restart.
    pub fn rebuild<I>(&self, entries: I)
    where
        I: IntoIterator<Item = ExpirationEntry>,
    {
        self.entries.clear();
        for entry in entries {
            self.upsert(entry.match_id, entry.side_to_act, entry.exp_time_utc);
        }
    }
}

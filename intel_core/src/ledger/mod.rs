//! Dedup Ledger - remembers recently seen messages.
//!
//! Besides the fingerprint set used for deduplication, the ledger keeps a
//! short history per entry (room, status, locations) so the parser can look
//! back for a request that a bare "clear" answers.
//!
//! The ledger is bounded two ways: entries older than the retention window
//! (measured against the newest recorded message) are pruned, and the
//! number of entries never exceeds the capacity.

use chrono::{DateTime, Duration, Utc};
use std::collections::{BTreeSet, HashSet, VecDeque};

use star_map::LocationId;

use crate::message::{Message, MessageKey, MessageStatus};

/// What the ledger remembers about a recorded message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub key: MessageKey,
    pub status: MessageStatus,
    pub locations: BTreeSet<LocationId>,
}

#[derive(Debug, Clone)]
pub struct DedupLedger {
    entries: VecDeque<LedgerEntry>,
    keys: HashSet<MessageKey>,
    retention: Duration,
    capacity: usize,
}

impl DedupLedger {
    pub fn new(retention: Duration, capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            keys: HashSet::new(),
            retention,
            capacity: capacity.max(1),
        }
    }

    pub fn contains(&self, key: &MessageKey) -> bool {
        self.keys.contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record a message. Returns `false` if it was already known.
    pub fn record(&mut self, message: &Message) -> bool {
        let key = message.key();
        if !self.keys.insert(key.clone()) {
            return false;
        }
        self.entries.push_back(LedgerEntry {
            key,
            status: message.status,
            locations: message.locations.clone(),
        });
        self.prune(message.timestamp);
        true
    }

    /// Most recent entries of `room`, newest first, at most `limit`.
    pub fn recent_in_room<'a>(
        &'a self,
        room: &'a str,
        limit: usize,
    ) -> impl Iterator<Item = &'a LedgerEntry> + 'a {
        self.entries
            .iter()
            .rev()
            .filter(move |entry| entry.key.room == room)
            .take(limit)
    }

    /// Drop entries older than the retention window and trim to capacity.
    fn prune(&mut self, newest: DateTime<Utc>) {
        let cutoff = newest - self.retention;
        while let Some(front) = self.entries.front() {
            if front.key.timestamp >= cutoff && self.entries.len() <= self.capacity {
                break;
            }
            if let Some(evicted) = self.entries.pop_front() {
                self.keys.remove(&evicted.key);
            }
        }
    }
}

impl Default for DedupLedger {
    fn default() -> Self {
        Self::new(Duration::minutes(20), 4096)
    }
}

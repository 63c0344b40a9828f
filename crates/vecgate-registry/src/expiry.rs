//! TTL expiry policy.
//!
//! Expiry is lazy: readers filter with [`is_expired`] and never delete. The
//! [`ExpiryQueue`] orders TTL-bound records by the block at which they lapse so
//! an explicit sweep can reclaim them without scanning live entries.

use crate::types::{BlockHeight, GlobalId};
use std::collections::BTreeSet;

/// First block at which a record is absent. `ttl_blocks == 0` never expires.
pub fn expires_at(registered_at: BlockHeight, ttl_blocks: u64) -> Option<BlockHeight> {
    if ttl_blocks == 0 {
        None
    } else {
        Some(registered_at.saturating_add(ttl_blocks))
    }
}

/// A record is absent for every read at or after its expiry block.
pub fn is_expired(expires_at: Option<BlockHeight>, block: BlockHeight) -> bool {
    matches!(expires_at, Some(at) if block >= at)
}

/// Records with a TTL, ordered by `(expires_at, global_id)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpiryQueue {
    entries: BTreeSet<(BlockHeight, GlobalId)>,
}

impl ExpiryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn schedule(&mut self, expires_at: BlockHeight, id: GlobalId) {
        self.entries.insert((expires_at, id));
    }

    pub(crate) fn cancel(&mut self, expires_at: BlockHeight, id: GlobalId) -> bool {
        self.entries.remove(&(expires_at, id))
    }

    /// Ids already expired at `block`, earliest expiry first.
    pub fn due(&self, block: BlockHeight) -> impl Iterator<Item = GlobalId> + '_ {
        self.entries
            .iter()
            .take_while(move |(at, _)| *at <= block)
            .map(|(_, id)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

//! Per-domain membership over the arena.
//!
//! Domain membership is a lookup (`domain -> global_id -> slot`), not a
//! separate store, so one record lives in exactly one place and every engine
//! iterates members in ascending id order.

use crate::expiry::ExpiryQueue;
use crate::types::{BlockHeight, Domain, GlobalId};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DomainEntries {
    members: BTreeMap<GlobalId, usize>,
    expiry: ExpiryQueue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainIndex {
    domains: BTreeMap<Domain, DomainEntries>,
}

impl DomainIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(
        &mut self,
        domain: Domain,
        id: GlobalId,
        slot: usize,
        expires_at: Option<BlockHeight>,
    ) {
        let entries = self.domains.entry(domain).or_default();
        entries.members.insert(id, slot);
        if let Some(at) = expires_at {
            entries.expiry.schedule(at, id);
        }
    }

    pub(crate) fn remove(
        &mut self,
        domain: Domain,
        id: GlobalId,
        expires_at: Option<BlockHeight>,
    ) -> Option<usize> {
        let entries = self.domains.get_mut(&domain)?;
        if let Some(at) = expires_at {
            entries.expiry.cancel(at, id);
        }
        let slot = entries.members.remove(&id);
        if entries.members.is_empty() {
            self.domains.remove(&domain);
        }
        slot
    }

    /// `(global_id, slot)` pairs of a domain in ascending id order.
    pub fn members(&self, domain: Domain) -> impl Iterator<Item = (GlobalId, usize)> + '_ {
        self.domains
            .get(&domain)
            .into_iter()
            .flat_map(|e| e.members.iter().map(|(id, slot)| (*id, *slot)))
    }

    /// Ids in `domain` already expired at `block`, earliest expiry first.
    pub fn due(&self, domain: Domain, block: BlockHeight) -> impl Iterator<Item = GlobalId> + '_ {
        self.domains
            .get(&domain)
            .into_iter()
            .flat_map(move |e| e.expiry.due(block))
    }

    /// Physically indexed entries in a domain, expired or not.
    pub fn len(&self, domain: Domain) -> usize {
        self.domains.get(&domain).map_or(0, |e| e.members.len())
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    pub fn contains(&self, domain: Domain, id: GlobalId) -> bool {
        self.domains
            .get(&domain)
            .is_some_and(|e| e.members.contains_key(&id))
    }
}

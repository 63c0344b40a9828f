//! Per-registrant quota ledger.
//!
//! Only register (debit) and sweep (credit) touch balances. Entries are
//! materialized lazily with the configured default limit.

use crate::types::Identity;
use crate::{Error, Result};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuotaEntry {
    pub limit: u128,
    pub used: u128,
}

impl QuotaEntry {
    pub fn remaining(&self) -> u128 {
        self.limit.saturating_sub(self.used)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaLedger {
    default_limit: u128,
    entries: BTreeMap<Identity, QuotaEntry>,
}

impl QuotaLedger {
    pub fn new(default_limit: u128) -> Self {
        Self {
            default_limit,
            entries: BTreeMap::new(),
        }
    }

    pub fn entry(&self, who: &Identity) -> QuotaEntry {
        self.entries.get(who).copied().unwrap_or(QuotaEntry {
            limit: self.default_limit,
            used: 0,
        })
    }

    pub fn remaining(&self, who: &Identity) -> u128 {
        self.entry(who).remaining()
    }

    pub fn used(&self, who: &Identity) -> u128 {
        self.entry(who).used
    }

    /// Fail without touching the ledger if `cost` exceeds what is left.
    pub fn check(&self, who: &Identity, cost: u128) -> Result<()> {
        let remaining = self.remaining(who);
        if cost > remaining {
            return Err(Error::QuotaExceeded {
                required: cost,
                remaining,
            });
        }
        Ok(())
    }

    /// Debit `cost`, returning the remaining quota.
    pub(crate) fn debit(&mut self, who: Identity, cost: u128) -> Result<u128> {
        self.check(&who, cost)?;
        let mut entry = self.entry(&who);
        entry.used += cost;
        self.entries.insert(who, entry);
        Ok(entry.remaining())
    }

    /// Credit `cost` back, returning the remaining quota.
    pub(crate) fn credit(&mut self, who: Identity, cost: u128) -> u128 {
        let mut entry = self.entry(&who);
        entry.used = entry.used.saturating_sub(cost);
        self.entries.insert(who, entry);
        entry.remaining()
    }

    /// Set a registrant's limit. Never drops below what is already used.
    pub(crate) fn set_limit(&mut self, who: Identity, limit: u128) -> QuotaEntry {
        let mut entry = self.entry(&who);
        entry.limit = limit.max(entry.used);
        self.entries.insert(who, entry);
        entry
    }
}

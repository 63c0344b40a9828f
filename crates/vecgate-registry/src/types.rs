//! Core registry types.

use crate::expiry;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Unique, strictly increasing record identifier. Zero is never assigned.
pub type GlobalId = u64;

/// Block height supplied by the host for every call.
pub type BlockHeight = u64;

/// A 20-byte account identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Identity(pub [u8; 20]);

impl Identity {
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x")?;
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// A 32-byte opaque tag attached to a vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Tag(pub [u8; 32]);

/// Semantic partition of the registry.
///
/// The byte values are part of the calling convention shared with every
/// consumer and must never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Domain {
    General = 0,
    Gaming = 1,
    Social = 2,
    Finance = 3,
    Content = 4,
    Training = 5,
}

impl Domain {
    /// Every domain, in enumeration order.
    pub const ALL: [Domain; 6] = [
        Domain::General,
        Domain::Gaming,
        Domain::Social,
        Domain::Finance,
        Domain::Content,
        Domain::Training,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            Domain::General => "general",
            Domain::Gaming => "gaming",
            Domain::Social => "social",
            Domain::Finance => "finance",
            Domain::Content => "content",
            Domain::Training => "training",
        }
    }
}

impl TryFrom<u8> for Domain {
    type Error = Error;

    fn try_from(v: u8) -> Result<Self> {
        Domain::ALL
            .get(v as usize)
            .copied()
            .ok_or_else(|| Error::InvalidParameter(format!("unknown domain {}", v)))
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A registered vector. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorRecord {
    pub global_id: GlobalId,
    pub domain: Domain,
    pub owner: Identity,
    /// Fixed-point components at scale 1e18.
    pub components: Vec<i128>,
    pub tags: BTreeSet<Tag>,
    pub registered_at: BlockHeight,
    /// Zero means permanent.
    pub ttl_blocks: u64,
    /// Quota debited at registration, credited back on eviction.
    pub quota_cost: u128,
}

impl VectorRecord {
    pub fn dimension(&self) -> u32 {
        self.components.len() as u32
    }

    /// First block at which the record is absent, or `None` if permanent.
    pub fn expires_at(&self) -> Option<BlockHeight> {
        expiry::expires_at(self.registered_at, self.ttl_blocks)
    }

    /// Whether reads at `block` see this record.
    pub fn is_live_at(&self, block: BlockHeight) -> bool {
        !expiry::is_expired(self.expires_at(), block)
    }
}

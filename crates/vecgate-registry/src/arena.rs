//! Append-only vector arena.
//!
//! Slot `n` holds the record with global id `n + 1`, so lookup by id is a
//! single index. Reclaiming a record empties its slot; slots are never reused
//! and ids never repeat.

use crate::types::{GlobalId, VectorRecord};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VectorArena {
    slots: Vec<Option<VectorRecord>>,
    occupied: usize,
}

impl VectorArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next appended record will receive.
    pub fn next_id(&self) -> GlobalId {
        self.slots.len() as GlobalId + 1
    }

    /// Map an id to its slot. Id 0 has no slot.
    pub fn slot_of(id: GlobalId) -> Option<usize> {
        id.checked_sub(1).map(|s| s as usize)
    }

    pub(crate) fn push(&mut self, record: VectorRecord) -> usize {
        debug_assert_eq!(record.global_id, self.next_id());
        let slot = self.slots.len();
        self.slots.push(Some(record));
        self.occupied += 1;
        slot
    }

    /// Physical lookup; does not apply TTL.
    pub fn get(&self, id: GlobalId) -> Option<&VectorRecord> {
        Self::slot_of(id).and_then(|slot| self.slot(slot))
    }

    pub fn slot(&self, slot: usize) -> Option<&VectorRecord> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub(crate) fn reclaim(&mut self, id: GlobalId) -> Option<VectorRecord> {
        let slot = Self::slot_of(id)?;
        let record = self.slots.get_mut(slot)?.take()?;
        self.occupied -= 1;
        Some(record)
    }

    /// Records physically present, expired or not.
    pub fn len(&self) -> usize {
        self.occupied
    }

    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Ids handed out so far.
    pub fn allocated(&self) -> usize {
        self.slots.len()
    }
}

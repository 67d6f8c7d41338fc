use std::collections::BTreeMap;

use crate::{
    StoreError,
    masked::{EntrySet, MaskedUpdate, Merge},
    payload::Payload,
    snapshot::StoreSnapshot,
    types::StoreAddress,
};

struct StoreSlot {
    payload: Payload,
    version: u64,
    dirty: EntrySet,
}

/// Canonical store contents owned by the coordinator.
///
/// Stores are created by their first publish and changed only through masked
/// merges afterwards. The table never removes a store.
pub(crate) struct StoreTable {
    stores: BTreeMap<StoreAddress, StoreSlot>,
}

impl StoreTable {
    pub(crate) fn new() -> Self {
        Self {
            stores: BTreeMap::new(),
        }
    }

    /// Publishes a full store state.
    ///
    /// The first publish creates the store with every entry dirty. Later
    /// publishes merge with an all-set mask.
    pub(crate) fn publish(
        &mut self,
        addr: StoreAddress,
        payload: Payload,
    ) -> Result<Merge, StoreError> {
        if self.stores.contains_key(&addr) {
            return self.write(addr, &MaskedUpdate::full(payload)?);
        }

        let mut dirty = EntrySet::new();
        for index in 0..payload.width() {
            dirty.set(index, true);
        }
        tracing::debug!(%addr, width = payload.width(), "store created");

        let slot = StoreSlot {
            payload: payload.clone(),
            version: 1,
            dirty,
        };
        self.stores.insert(addr, slot);
        Ok(Merge {
            payload,
            changed: dirty,
        })
    }

    /// Merges a masked update into an existing store.
    ///
    /// Nothing is committed unless the merge succeeds.
    pub(crate) fn write(
        &mut self,
        addr: StoreAddress,
        update: &MaskedUpdate,
    ) -> Result<Merge, StoreError> {
        let merge = self.preview(addr, update)?;
        self.commit(addr, merge)
    }

    /// Computes the merge of `update` into a store without committing it.
    pub(crate) fn preview(
        &self,
        addr: StoreAddress,
        update: &MaskedUpdate,
    ) -> Result<Merge, StoreError> {
        let slot = self
            .stores
            .get(&addr)
            .ok_or(StoreError::UnknownStore(addr))?;
        update.merge_into(&slot.payload)
    }

    /// Commits a merge computed by [`Self::preview`].
    pub(crate) fn commit(&mut self, addr: StoreAddress, merge: Merge) -> Result<Merge, StoreError> {
        let slot = self
            .stores
            .get_mut(&addr)
            .ok_or(StoreError::UnknownStore(addr))?;

        slot.payload = merge.payload.clone();
        slot.version += 1;
        slot.dirty = slot.dirty | merge.changed;
        tracing::trace!(
            %addr,
            version = slot.version,
            changed = merge.changed.len(),
            "store merged"
        );

        Ok(merge)
    }

    pub(crate) fn get(&self, addr: StoreAddress) -> Option<&Payload> {
        self.stores.get(&addr).map(|slot| &slot.payload)
    }

    pub(crate) fn version(&self, addr: StoreAddress) -> Option<u64> {
        self.stores.get(&addr).map(|slot| slot.version)
    }

    pub(crate) fn len(&self) -> usize {
        self.stores.len()
    }

    pub(crate) fn snapshot(&self) -> StoreSnapshot {
        self.stores
            .iter()
            .map(|(addr, slot)| (*addr, slot.payload.clone()))
            .collect()
    }

    /// Stores with changed entries, in address order.
    pub(crate) fn dirty(&self) -> impl Iterator<Item = (StoreAddress, &Payload, EntrySet)> + '_ {
        self.stores
            .iter()
            .filter(|(_, slot)| !slot.dirty.is_empty())
            .map(|(addr, slot)| (*addr, &slot.payload, slot.dirty))
    }

    pub(crate) fn iter_dirty<F>(&self, mut f: F) -> Result<(), StoreError>
    where
        F: FnMut(StoreAddress, &Payload, EntrySet) -> Result<(), StoreError>,
    {
        for (addr, payload, dirty) in self.dirty() {
            f(addr, payload, dirty)?;
        }
        Ok(())
    }

    pub(crate) fn is_dirty(&self, addr: StoreAddress) -> Result<bool, StoreError> {
        self.stores
            .get(&addr)
            .map(|slot| !slot.dirty.is_empty())
            .ok_or(StoreError::UnknownStore(addr))
    }

    pub(crate) fn any_dirty(&self) -> bool {
        self.stores.values().any(|slot| !slot.dirty.is_empty())
    }

    pub(crate) fn clear_dirty(&mut self, addr: StoreAddress) -> Result<(), StoreError> {
        let slot = self
            .stores
            .get_mut(&addr)
            .ok_or(StoreError::UnknownStore(addr))?;
        slot.dirty = EntrySet::new();
        Ok(())
    }

    pub(crate) fn clear_all_dirty(&mut self) {
        for slot in self.stores.values_mut() {
            slot.dirty = EntrySet::new();
        }
    }
}

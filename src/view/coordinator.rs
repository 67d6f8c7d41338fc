use crate::{
    StoreError,
    masked::EntrySet,
    payload::Payload,
    registry::StoreRegistry,
    table::StoreTable,
    types::{StoreAddress, StoreInfo},
};

/// Outcome of encoding every dirty store.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EncodeReport {
    /// Envelopes for each store that encoded, in address order.
    pub encoded: Vec<(StoreAddress, StoreInfo)>,
    /// Stores that could not be encoded, with the reason.
    pub failed: Vec<(StoreAddress, StoreError)>,
}

/// Coordinator-side view of a project's canonical stores.
///
/// Exposes versions and dirty tracking so the coordinator can redistribute
/// exactly the stores that changed since its last fan-out. Obtained through
/// [`Project::with_view`](crate::Project::with_view), which holds the
/// critical section for the view's lifetime.
pub struct CoordinatorView<'a> {
    table: &'a mut StoreTable,
    registry: &'a StoreRegistry,
}

impl core::fmt::Debug for CoordinatorView<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CoordinatorView")
            .field("stores", &self.table.len())
            .finish_non_exhaustive()
    }
}

impl<'a> CoordinatorView<'a> {
    pub(crate) fn new(table: &'a mut StoreTable, registry: &'a StoreRegistry) -> Self {
        Self { table, registry }
    }

    /// Current contents of a store.
    pub fn get(&self, addr: StoreAddress) -> Option<&Payload> {
        self.table.get(addr)
    }

    /// Number of committed updates to a store, starting at 1 on creation.
    pub fn version(&self, addr: StoreAddress) -> Option<u64> {
        self.table.version(addr)
    }

    /// Number of stores in the project.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Visits each store with changed entries, in address order.
    pub fn iter_dirty<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnMut(StoreAddress, &Payload, EntrySet) -> Result<(), StoreError>,
    {
        self.table.iter_dirty(f)
    }

    /// Encodes every dirty store into an envelope, ready for fan-out.
    ///
    /// A store that fails to encode is logged and recorded in
    /// [`EncodeReport::failed`]; the others are still encoded. Dirty flags are
    /// left as they are; call [`Self::clear_dirty`] once the envelopes have
    /// been delivered.
    pub fn encode_dirty(&self) -> EncodeReport {
        let mut report = EncodeReport::default();
        for (addr, payload, _) in self.table.dirty() {
            match self.registry.encode(addr.store_type, payload) {
                Ok(info) => report.encoded.push((addr, info)),
                Err(err) => {
                    tracing::warn!(%addr, error = %err, "cannot encode dirty store");
                    report.failed.push((addr, err));
                }
            }
        }
        report
    }

    pub fn is_dirty(&self, addr: StoreAddress) -> Result<bool, StoreError> {
        self.table.is_dirty(addr)
    }

    pub fn any_dirty(&self) -> bool {
        self.table.any_dirty()
    }

    /// Marks one store as redistributed.
    pub fn clear_dirty(&mut self, addr: StoreAddress) -> Result<(), StoreError> {
        self.table.clear_dirty(addr)
    }

    /// Marks every store as redistributed.
    pub fn clear_all_dirty(&mut self) {
        self.table.clear_all_dirty()
    }
}

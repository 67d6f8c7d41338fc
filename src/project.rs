use core::cell::RefCell;

use critical_section::Mutex;

use crate::{
    StoreError,
    masked::{MaskedUpdate, Merge},
    payload::Payload,
    registry::StoreRegistry,
    snapshot::StoreSnapshot,
    table::StoreTable,
    types::{StoreAddress, StoreInfo, StoreType},
    view::CoordinatorView,
};

/// What a sim sees of the project it belongs to.
///
/// This is the boundary between sims and whatever coordinator owns the
/// canonical stores. [`Project`] is the in-process implementation.
pub trait ProjectHandle {
    /// Project name, used as log context.
    fn name(&self) -> &str;

    /// Immutable copy of all stores as of now.
    fn stores(&self) -> StoreSnapshot;

    /// Requests a masked merge into the store at `addr`.
    fn write_store_at(&self, addr: StoreAddress, update: MaskedUpdate) -> Result<(), StoreError>;

    /// Requests a masked merge into instance 0 of `store_type`.
    fn write_store(
        &self,
        store_type: StoreType,
        value: Payload,
        mask: Payload,
    ) -> Result<(), StoreError> {
        self.write_store_at(
            StoreAddress::new(store_type, 0),
            MaskedUpdate::new(value, mask),
        )
    }
}

/// In-process coordinator for one simulated project.
///
/// Owns the canonical stores. Every mutation runs inside a critical section,
/// so merges into a store are serialized while any number of callers hold
/// snapshots taken earlier.
///
/// Hosts need a `critical-section` implementation, such as the `std` feature
/// of the `critical-section` crate.
pub struct Project {
    name: String,
    registry: StoreRegistry,
    table: Mutex<RefCell<StoreTable>>,
}

impl core::fmt::Debug for Project {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Project")
            .field("name", &self.name)
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}

impl Project {
    pub(crate) fn new(name: String, registry: StoreRegistry) -> Self {
        Self {
            name,
            registry,
            table: Mutex::new(RefCell::new(StoreTable::new())),
        }
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    /// Runs `f` with the coordinator view inside a critical section.
    ///
    /// # Panics
    /// Panics if `f` calls back into this project's store methods.
    pub fn with_view<R>(&self, f: impl FnOnce(&mut CoordinatorView<'_>) -> R) -> R {
        critical_section::with(|cs| {
            let mut table = self.table.borrow(cs).borrow_mut();
            let mut view = CoordinatorView::new(&mut *table, &self.registry);
            f(&mut view)
        })
    }

    fn with_table<R>(&self, f: impl FnOnce(&mut StoreTable) -> R) -> R {
        critical_section::with(|cs| {
            let mut table = self.table.borrow(cs).borrow_mut();
            f(&mut *table)
        })
    }

    /// Publishes the full state of a store, creating it on first publish.
    ///
    /// # Errors
    /// * [`StoreError::UnknownStoreType`] - the registry has no codec for the type
    /// * [`StoreError::StoreTypeMismatch`] - payload belongs to another store type
    /// * [`StoreError::MalformedPayload`] - the codec cannot encode the payload
    pub fn publish(&self, addr: StoreAddress, payload: Payload) -> Result<Merge, StoreError> {
        self.check_encodable(addr.store_type, &payload)?;
        self.with_table(|table| table.publish(addr, payload))
    }

    /// Decodes an inbound envelope and publishes it at `instance`.
    ///
    /// Decode errors leave every store as it was.
    pub fn ingest(&self, instance: u16, info: &StoreInfo) -> Result<StoreAddress, StoreError> {
        let payload = self.registry.decode(info)?;
        let addr = StoreAddress::new(payload.store_type(), instance);
        self.with_table(|table| table.publish(addr, payload))?;
        Ok(addr)
    }

    /// Like [`Self::ingest`] for framed envelope bytes.
    pub fn ingest_bytes(&self, instance: u16, bytes: &[u8]) -> Result<StoreAddress, StoreError> {
        self.ingest(instance, &StoreInfo::from_bytes(bytes)?)
    }

    /// Merges a masked update into an existing store.
    ///
    /// The merged store must still be encodable by its codec. A shape error
    /// means the publisher addressed the store wrongly; it is logged at error
    /// level. Nothing is committed on any error.
    pub fn write(&self, addr: StoreAddress, update: &MaskedUpdate) -> Result<Merge, StoreError> {
        self.with_table(|table| {
            let merge = table.preview(addr, update)?;
            self.check_encodable(addr.store_type, &merge.payload)?;
            table.commit(addr, merge)
        })
        .inspect_err(|err| match err {
            StoreError::ShapeMismatch { .. } | StoreError::StoreTypeMismatch { .. } => {
                tracing::error!(project = %self.name, %addr, error = %err, "rejected masked write");
            }
            _ => tracing::warn!(project = %self.name, %addr, error = %err, "masked write failed"),
        })
    }

    /// Current contents of one store.
    pub fn store(&self, addr: StoreAddress) -> Option<Payload> {
        self.with_table(|table| table.get(addr).cloned())
    }

    /// Committed update count of one store.
    pub fn version(&self, addr: StoreAddress) -> Option<u64> {
        self.with_table(|table| table.version(addr))
    }

    fn check_encodable(&self, store_type: StoreType, payload: &Payload) -> Result<(), StoreError> {
        self.registry.encode(store_type, payload).map(|_| ())
    }
}

impl ProjectHandle for Project {
    fn name(&self) -> &str {
        &self.name
    }

    fn stores(&self) -> StoreSnapshot {
        self.with_table(|table| table.snapshot())
    }

    fn write_store_at(&self, addr: StoreAddress, update: MaskedUpdate) -> Result<(), StoreError> {
        self.write(addr, &update).map(|_| ())
    }
}

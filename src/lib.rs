//! Store synchronization for simulated peripherals.
//!
//! Simulated peripherals ("sims") never talk to each other directly. They
//! share typed, fixed-shape blocks of state ("stores") owned by a project,
//! and change them only through masked writes.
//!
//! # Features
//!
//! - **Static codec registry** - each [`StoreType`] tag maps to one codec
//! - **Masked writes** - publishers claim exactly the entries they set in the mask
//! - **Immutable snapshots** - merges build new payloads, readers keep old ones
//! - **Dirty tracking** - per-entry change sets for fan-out to other processes
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐  StoreInfo  ┌──────────────────────┐  snapshot  ┌────────────┐
//! │  transport   │────────────▶│  Project             │───────────▶│  Sim       │
//! │  (bytes)     │  decode     │  registry + stores   │            │            │
//! │              │             │                      │◀───────────│  set_pin() │
//! │              │◀────────────│  encode_dirty()      │  masked    │            │
//! └──────────────┘  StoreInfo  └──────────────────────┘  write     └────────────┘
//! ```
//!
//! - **Inbound envelopes** are decoded by the registry and merged with an
//!   all-set mask
//! - **Sims** read snapshots and write back value/mask pairs
//! - **The coordinator view** encodes dirty stores for redistribution and
//!   clears them afterwards
//!
//! # Example
//!
//! ```rust,no_run
//! use periph_stores::prelude::*;
//!
//! let project = ProjectBuilder::new().name("smoke_pca9539r").build()?;
//! let mut harness = Harness::new(project);
//! harness.add_sim(Pca9539rSim::new(0));
//!
//! // An expander store arrives from the transport with every pin high.
//! let info = StoreInfo::new(StoreType::Pca9539r, &[1; 16])?;
//! harness.deliver(0, &info)?;
//!
//! // Drive GPIO B5 high from any sim.
//! harness
//!     .project()
//!     .publish(StoreAddress::new(StoreType::Gpio, 0), Payload::zeroed(StoreType::Gpio, 96)?)?;
//! Pca9539rSim::new(0).set_pin(harness.project(), 'B', 5, 1)?;
//! # Ok::<(), StoreError>(())
//! ```

#![deny(unsafe_code)]

pub mod builder;
pub mod codec;
pub mod error;
pub mod gpio;
pub mod harness;
pub mod masked;
pub mod payload;
pub mod project;
pub mod registry;
pub mod sim;
pub mod slice;
pub mod snapshot;
pub(crate) mod table;
pub mod types;
pub mod view;

#[cfg(test)]
mod test_support;

pub use builder::ProjectBuilder;
pub use codec::{EntryFormat, FixedCodec, StoreCodec};
pub use error::StoreError;
pub use gpio::{GpioPin, MaskMode, single_pin_update};
pub use harness::{DeliveryReport, Harness};
pub use masked::{EntrySet, MaskedUpdate, Merge, apply, merge};
pub use payload::Payload;
pub use project::{Project, ProjectHandle};
pub use registry::{DecodeReport, StoreRegistry};
pub use sim::{Ads1015Sim, Pca9539rSim, Sim};
pub use slice::{ROSlice, WOSlice};
pub use snapshot::StoreSnapshot;
pub use types::{StoreAddress, StoreInfo, StoreType};
pub use view::{CoordinatorView, EncodeReport};

pub mod prelude {
    pub use super::{
        Ads1015Sim, CoordinatorView, DecodeReport, DeliveryReport, EncodeReport, EntryFormat,
        EntrySet, FixedCodec, GpioPin, Harness, MaskMode, MaskedUpdate, Merge, Payload,
        Pca9539rSim, Project, ProjectBuilder, ProjectHandle, ROSlice, Sim, StoreAddress,
        StoreCodec, StoreError, StoreInfo, StoreRegistry, StoreSnapshot, StoreType, WOSlice,
        apply, merge, single_pin_update,
    };
}

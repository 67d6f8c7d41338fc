use thiserror::Error;

use crate::types::{StoreAddress, StoreType};

/// Errors raised while decoding, encoding, or merging stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Envelope tag has no registered codec.
    #[error("unknown store type tag {tag}")]
    UnknownStoreType {
        /// Raw tag carried by the envelope.
        tag: u32,
    },
    /// Payload bytes or entries do not match the codec's fixed shape.
    #[error("malformed {store_type} payload: {reason}")]
    MalformedPayload {
        /// Store type whose codec rejected the payload.
        store_type: StoreType,
        /// What the codec found wrong.
        reason: &'static str,
    },
    /// Envelope framing is truncated or oversized.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(&'static str),
    /// Value and mask widths disagree with the target store's width.
    #[error("shape mismatch: store has {expected} entries, value has {value}, mask has {mask}")]
    ShapeMismatch {
        /// Width of the store being written.
        expected: usize,
        /// Width of the submitted value.
        value: usize,
        /// Width of the submitted mask.
        mask: usize,
    },
    /// Value or mask belongs to a different store type than the target.
    #[error("store type mismatch: expected {expected}, found {found}")]
    StoreTypeMismatch {
        /// Type of the store being written.
        expected: StoreType,
        /// Type carried by the offending payload.
        found: StoreType,
    },
    /// A codec is already registered for this store type.
    #[error("codec for {0} is already registered")]
    DuplicateCodec(StoreType),
    /// The codec table has no free slots.
    #[error("codec registry is full")]
    RegistryFull,
    /// Port letter or pin number falls outside the GPIO bank.
    #[error("invalid gpio pin {port}{pin}")]
    InvalidPin {
        /// Port letter as given.
        port: char,
        /// Pin number as given.
        pin: u8,
    },
    /// A GPIO pin was driven to something other than 0 or 1.
    #[error("invalid gpio pin state {state}, expected 0 or 1")]
    InvalidPinState {
        /// State as given.
        state: u32,
    },
    /// Masked write targeted a store that was never published.
    #[error("no store published at {0}")]
    UnknownStore(StoreAddress),
}

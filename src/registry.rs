use core::fmt;

use heapless::FnvIndexMap;

use crate::{
    StoreError,
    codec::{ADS1015_CODEC, GPIO_CODEC, PCA9539R_CODEC, StoreCodec},
    payload::Payload,
    types::{StoreInfo, StoreType},
};

/// Maximum number of codecs one registry holds. Must be a power of two.
pub const REGISTRY_CAPACITY: usize = 8;

/// Codecs registered by [`StoreRegistry::standard`].
pub static BUILTIN_CODECS: [&(dyn StoreCodec + 'static); 3] =
    [&GPIO_CODEC, &ADS1015_CODEC, &PCA9539R_CODEC];

/// Lookup table from store type tag to payload codec.
///
/// Built once at startup; decoding never constructs type names or scans
/// modules, it only consults this table.
#[derive(Clone, Default)]
pub struct StoreRegistry {
    codecs: FnvIndexMap<u32, &'static dyn StoreCodec, REGISTRY_CAPACITY>,
}

impl fmt::Debug for StoreRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.codecs.values().map(|codec| codec.store_type()))
            .finish()
    }
}

/// Outcome of decoding a batch of envelopes.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeReport {
    /// Payloads decoded successfully, in input order.
    pub decoded: Vec<Payload>,
    /// Index into the batch and the error for every dropped envelope.
    pub dropped: Vec<(usize, StoreError)>,
}

impl StoreRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every built-in codec.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for codec in BUILTIN_CODECS {
            let registered = registry.register(codec);
            debug_assert!(registered.is_ok(), "built-in codecs are distinct");
        }
        registry
    }

    /// Associates a codec with its store type.
    ///
    /// # Errors
    /// * [`StoreError::DuplicateCodec`] - the type already has a codec
    /// * [`StoreError::RegistryFull`] - no free slots remain
    pub fn register(&mut self, codec: &'static dyn StoreCodec) -> Result<(), StoreError> {
        let store_type = codec.store_type();
        if self.codecs.contains_key(&store_type.tag()) {
            return Err(StoreError::DuplicateCodec(store_type));
        }
        self.codecs
            .insert(store_type.tag(), codec)
            .map_err(|_| StoreError::RegistryFull)?;

        tracing::debug!(%store_type, width = codec.width(), "registered store codec");
        Ok(())
    }

    /// Codec registered for `store_type`, if any.
    pub fn codec(&self, store_type: StoreType) -> Option<&'static dyn StoreCodec> {
        self.codecs.get(&store_type.tag()).copied()
    }

    /// Fixed entry count of `store_type`, if it has a codec.
    pub fn width(&self, store_type: StoreType) -> Option<usize> {
        self.codec(store_type).map(|codec| codec.width())
    }

    pub fn is_registered(&self, store_type: StoreType) -> bool {
        self.codecs.contains_key(&store_type.tag())
    }

    /// Decodes an envelope with the codec registered for its tag.
    ///
    /// # Errors
    /// * [`StoreError::UnknownStoreType`] - no codec for the tag
    /// * [`StoreError::MalformedPayload`] - the codec rejected the bytes
    pub fn decode(&self, info: &StoreInfo) -> Result<Payload, StoreError> {
        let codec = self
            .codecs
            .get(&info.tag)
            .ok_or(StoreError::UnknownStoreType { tag: info.tag })?;
        codec.decode(&info.payload)
    }

    /// Parses envelope framing and decodes the payload.
    pub fn decode_bytes(&self, bytes: &[u8]) -> Result<Payload, StoreError> {
        self.decode(&StoreInfo::from_bytes(bytes)?)
    }

    /// Encodes a payload into an envelope for `store_type`.
    pub fn encode(
        &self,
        store_type: StoreType,
        payload: &Payload,
    ) -> Result<StoreInfo, StoreError> {
        let codec = self
            .codec(store_type)
            .ok_or(StoreError::UnknownStoreType {
                tag: store_type.tag(),
            })?;
        codec.encode(payload)
    }

    /// Decodes every envelope, dropping the ones that fail.
    ///
    /// A bad envelope never stops the batch; its error is logged and recorded
    /// in [`DecodeReport::dropped`].
    pub fn decode_all<'a, I>(&self, envelopes: I) -> DecodeReport
    where
        I: IntoIterator<Item = &'a StoreInfo>,
    {
        let mut report = DecodeReport::default();
        for (index, info) in envelopes.into_iter().enumerate() {
            match self.decode(info) {
                Ok(payload) => report.decoded.push(payload),
                Err(err) => {
                    tracing::warn!(index, tag = info.tag, error = %err, "dropping envelope");
                    report.dropped.push((index, err));
                }
            }
        }
        report
    }
}

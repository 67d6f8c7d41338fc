//! Payload codecs: one per [`StoreType`], turning envelope bytes into a
//! [`Payload`] and back.

mod builtin;

pub use builtin::{ADS1015_CHANNELS, ADS1015_CODEC, GPIO_CODEC, PCA9539R_CODEC, PCA9539R_PINS};

use heapless::Vec;

use crate::{
    StoreError,
    payload::{Entries, Payload},
    slice::{ROSlice, WOSlice},
    types::{MAX_ENVELOPE_PAYLOAD, StoreInfo, StoreType},
};

/// Encoder/decoder pair for one store type's binary payload.
///
/// Implementations must be stateless; the registry hands out shared
/// references to them.
pub trait StoreCodec: Sync {
    /// Store type this codec handles.
    fn store_type(&self) -> StoreType;

    /// Number of entries in a decoded payload.
    fn width(&self) -> usize;

    /// Decodes envelope payload bytes.
    ///
    /// Fails with [`StoreError::MalformedPayload`] when the byte length or any
    /// entry does not fit the codec's layout.
    fn decode(&self, bytes: &[u8]) -> Result<Payload, StoreError>;

    /// Encodes a payload into an envelope tagged with this codec's type.
    fn encode(&self, payload: &Payload) -> Result<StoreInfo, StoreError>;
}

/// How a single entry is laid out on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFormat {
    /// One byte holding 0 or 1.
    Flag,
    /// Little-endian `u16`.
    U16Le,
}

impl EntryFormat {
    /// Bytes per entry.
    pub const fn size(self) -> usize {
        match self {
            EntryFormat::Flag => 1,
            EntryFormat::U16Le => 2,
        }
    }

    fn read(self, bytes: ROSlice<'_>, index: usize) -> Result<u32, &'static str> {
        let offset = index * self.size();
        match self {
            EntryFormat::Flag => match bytes.read_u8_at(offset) {
                Some(flag @ (0 | 1)) => Ok(u32::from(flag)),
                Some(_) => Err("flag entry is neither 0 nor 1"),
                None => Err("payload shorter than store width"),
            },
            EntryFormat::U16Le => bytes
                .read_u16_le_at(offset)
                .map(u32::from)
                .ok_or("payload shorter than store width"),
        }
    }

    fn write(self, out: &mut WOSlice<'_>, index: usize, entry: u32) -> Result<(), &'static str> {
        let offset = index * self.size();
        match self {
            EntryFormat::Flag => {
                let flag = u8::try_from(entry)
                    .ok()
                    .filter(|flag| *flag <= 1)
                    .ok_or("flag entry is neither 0 nor 1")?;
                out.write_u8_at(offset, flag);
            }
            EntryFormat::U16Le => {
                let code = u16::try_from(entry).map_err(|_| "entry does not fit in 16 bits")?;
                out.write_u16_le_at(offset, code);
            }
        }
        Ok(())
    }
}

/// Codec for stores made of `width` equally sized entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedCodec {
    store_type: StoreType,
    width: usize,
    format: EntryFormat,
}

impl FixedCodec {
    pub const fn new(store_type: StoreType, width: usize, format: EntryFormat) -> Self {
        Self {
            store_type,
            width,
            format,
        }
    }

    /// Exact payload length in bytes.
    pub const fn encoded_len(&self) -> usize {
        self.width * self.format.size()
    }

    fn malformed(&self, reason: &'static str) -> StoreError {
        StoreError::MalformedPayload {
            store_type: self.store_type,
            reason,
        }
    }
}

impl StoreCodec for FixedCodec {
    fn store_type(&self) -> StoreType {
        self.store_type
    }

    fn width(&self) -> usize {
        self.width
    }

    fn decode(&self, bytes: &[u8]) -> Result<Payload, StoreError> {
        if bytes.len() != self.encoded_len() {
            return Err(self.malformed("payload length does not match store width"));
        }

        let view = ROSlice::new(bytes);
        let mut entries = Entries::new();
        for index in 0..self.width {
            let entry = self
                .format
                .read(view, index)
                .map_err(|reason| self.malformed(reason))?;
            entries
                .push(entry)
                .map_err(|_| self.malformed("more entries than any store holds"))?;
        }

        Ok(Payload::from_entries(self.store_type, entries))
    }

    fn encode(&self, payload: &Payload) -> Result<StoreInfo, StoreError> {
        if payload.store_type() != self.store_type {
            return Err(StoreError::StoreTypeMismatch {
                expected: self.store_type,
                found: payload.store_type(),
            });
        }
        if payload.width() != self.width {
            return Err(self.malformed("entry count does not match store width"));
        }

        let mut buf: Vec<u8, MAX_ENVELOPE_PAYLOAD> = Vec::new();
        buf.resize(self.encoded_len(), 0)
            .map_err(|_| self.malformed("payload exceeds envelope capacity"))?;

        let mut out = WOSlice::new(&mut buf);
        for (index, &entry) in payload.entries().iter().enumerate() {
            self.format
                .write(&mut out, index, entry)
                .map_err(|reason| self.malformed(reason))?;
        }

        Ok(StoreInfo {
            tag: self.store_type.tag(),
            payload: buf,
        })
    }
}

use core::fmt;

use heapless::Vec;

use crate::{StoreError, slice::ROSlice};

/// Largest payload any built-in store carries, in bytes.
pub const MAX_ENVELOPE_PAYLOAD: usize = 128;

/// Size of the envelope tag prefix on the wire.
pub const ENVELOPE_TAG_LEN: usize = 4;

/// Class of peripheral state a store holds.
///
/// The set is closed for a given build; adding a peripheral means adding a
/// variant here and registering its codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u32)]
pub enum StoreType {
    /// Microcontroller GPIO banks A..F, 16 pins each.
    Gpio = 0,
    /// ADS1015 four-channel ADC conversion codes.
    Ads1015 = 1,
    /// PCA9539R 16-pin I2C I/O expander.
    Pca9539r = 2,
}

impl StoreType {
    /// Every built-in store type, in tag order.
    pub const ALL: [StoreType; 3] = [StoreType::Gpio, StoreType::Ads1015, StoreType::Pca9539r];

    /// Stable wire tag.
    #[inline]
    pub const fn tag(self) -> u32 {
        self as u32
    }

    /// Canonical upper-case name.
    pub const fn name(self) -> &'static str {
        match self {
            StoreType::Gpio => "GPIO",
            StoreType::Ads1015 => "ADS1015",
            StoreType::Pca9539r => "PCA9539R",
        }
    }
}

impl TryFrom<u32> for StoreType {
    type Error = StoreError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(StoreType::Gpio),
            1 => Ok(StoreType::Ads1015),
            2 => Ok(StoreType::Pca9539r),
            _ => Err(StoreError::UnknownStoreType { tag }),
        }
    }
}

impl fmt::Display for StoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies one simulated chip's store within a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StoreAddress {
    /// Class of state held.
    pub store_type: StoreType,
    /// Disambiguates several chips of the same type.
    pub instance: u16,
}

impl StoreAddress {
    pub const fn new(store_type: StoreType, instance: u16) -> Self {
        Self {
            store_type,
            instance,
        }
    }
}

impl fmt::Display for StoreAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.store_type, self.instance)
    }
}

/// Wire envelope carrying one store's encoded bytes.
///
/// The tag is kept raw so that envelopes from a newer peer still parse; the
/// registry decides whether the tag is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreInfo {
    pub tag: u32,
    pub payload: Vec<u8, MAX_ENVELOPE_PAYLOAD>,
}

impl StoreInfo {
    /// Builds an envelope for a known store type.
    pub fn new(store_type: StoreType, payload: &[u8]) -> Result<Self, StoreError> {
        let payload = Vec::from_slice(payload).map_err(|_| StoreError::MalformedPayload {
            store_type,
            reason: "payload exceeds envelope capacity",
        })?;
        Ok(Self {
            tag: store_type.tag(),
            payload,
        })
    }

    /// Resolves the raw tag to a store type.
    pub fn store_type(&self) -> Result<StoreType, StoreError> {
        StoreType::try_from(self.tag)
    }

    /// Parses `tag (u32 LE) ‖ payload` framing.
    ///
    /// The tag is not validated here; an unknown tag surfaces at decode time.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StoreError> {
        let frame = ROSlice::new(bytes);
        let tag = frame
            .read_u32_le_at(0)
            .ok_or(StoreError::MalformedEnvelope("shorter than its tag"))?;
        let payload = Vec::from_slice(&bytes[ENVELOPE_TAG_LEN..])
            .map_err(|_| StoreError::MalformedEnvelope("payload exceeds envelope capacity"))?;
        Ok(Self { tag, payload })
    }

    /// Serializes the envelope with its tag prefix.
    pub fn to_bytes(&self) -> std::vec::Vec<u8> {
        let mut out = std::vec::Vec::with_capacity(ENVELOPE_TAG_LEN + self.payload.len());
        out.extend_from_slice(&self.tag.to_le_bytes());
        out.extend_from_slice(&self.payload);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_resolve_to_their_type() {
        for ty in StoreType::ALL {
            assert_eq!(StoreType::try_from(ty.tag()), Ok(ty));
        }
        assert_eq!(
            StoreType::try_from(9999),
            Err(StoreError::UnknownStoreType { tag: 9999 })
        );
    }

    #[test]
    fn address_display() {
        let addr = StoreAddress::new(StoreType::Pca9539r, 3);
        assert_eq!(addr.to_string(), "PCA9539R#3");
    }

    #[test]
    fn envelope_framing() {
        let info = StoreInfo::new(StoreType::Pca9539r, &[1, 0, 1]).unwrap();
        let bytes = info.to_bytes();
        assert_eq!(&bytes[..4], &[2, 0, 0, 0]);
        assert_eq!(StoreInfo::from_bytes(&bytes).unwrap(), info);
    }

    #[test]
    fn envelope_keeps_unknown_tag() {
        let bytes = [0x0F, 0x27, 0, 0, 0xAA];
        let info = StoreInfo::from_bytes(&bytes).unwrap();
        assert_eq!(info.tag, 9999);
        assert_eq!(
            info.store_type(),
            Err(StoreError::UnknownStoreType { tag: 9999 })
        );
    }

    #[test]
    fn short_envelope_is_malformed() {
        assert_eq!(
            StoreInfo::from_bytes(&[1, 0]),
            Err(StoreError::MalformedEnvelope("shorter than its tag"))
        );
    }
}

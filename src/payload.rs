use core::ops::Index;

use heapless::Vec;

use crate::{StoreError, types::StoreType};

/// Widest store any built-in codec produces (GPIO: 6 ports x 16 pins).
pub const MAX_WIDTH: usize = 96;

/// Fixed-capacity entry storage backing a [`Payload`].
pub type Entries = Vec<u32, MAX_WIDTH>;

/// Decoded contents of one store: its type plus an ordered run of entries.
///
/// Payloads are immutable values. Merging produces a new payload; nothing
/// mutates a published one in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    store_type: StoreType,
    entries: Entries,
}

impl Payload {
    /// Builds a payload from raw entries.
    ///
    /// The entry count is not checked against the type's width here; codecs and
    /// the merge reject shapes they don't accept.
    pub fn new(store_type: StoreType, entries: &[u32]) -> Result<Self, StoreError> {
        let entries = Vec::from_slice(entries).map_err(|_| StoreError::MalformedPayload {
            store_type,
            reason: "more entries than any store holds",
        })?;
        Ok(Self {
            store_type,
            entries,
        })
    }

    /// All-zero payload of the given width.
    pub fn zeroed(store_type: StoreType, width: usize) -> Result<Self, StoreError> {
        Self::filled(store_type, width, 0)
    }

    /// Payload with every entry set to `value`.
    pub fn filled(store_type: StoreType, width: usize, value: u32) -> Result<Self, StoreError> {
        let mut entries = Entries::new();
        entries
            .resize(width, value)
            .map_err(|_| StoreError::MalformedPayload {
                store_type,
                reason: "more entries than any store holds",
            })?;
        Ok(Self {
            store_type,
            entries,
        })
    }

    pub(crate) fn from_entries(store_type: StoreType, entries: Entries) -> Self {
        Self {
            store_type,
            entries,
        }
    }

    #[inline]
    pub fn store_type(&self) -> StoreType {
        self.store_type
    }

    /// Number of entries.
    #[inline]
    pub fn width(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn entries(&self) -> &[u32] {
        &self.entries
    }

    /// Entry at `index`, or `None` past the end.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u32> {
        self.entries.get(index).copied()
    }

    /// Copy of this payload with entry `index` replaced.
    ///
    /// Returns `None` if `index` is past the end.
    pub fn with_entry(&self, index: usize, value: u32) -> Option<Self> {
        let mut entries = self.entries.clone();
        *entries.get_mut(index)? = value;
        Some(Self::from_entries(self.store_type, entries))
    }
}

impl Index<usize> for Payload {
    type Output = u32;

    fn index(&self, index: usize) -> &u32 {
        &self.entries[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeroed_and_filled_have_requested_width() {
        let zero = Payload::zeroed(StoreType::Gpio, 96).unwrap();
        assert_eq!(zero.width(), 96);
        assert!(zero.entries().iter().all(|&e| e == 0));

        let ones = Payload::filled(StoreType::Pca9539r, 16, 1).unwrap();
        assert_eq!(ones.width(), 16);
        assert!(ones.entries().iter().all(|&e| e == 1));
    }

    #[test]
    fn oversized_payload_is_rejected() {
        assert!(matches!(
            Payload::zeroed(StoreType::Gpio, MAX_WIDTH + 1),
            Err(StoreError::MalformedPayload { .. })
        ));
        assert!(matches!(
            Payload::new(StoreType::Gpio, &[0; MAX_WIDTH + 1]),
            Err(StoreError::MalformedPayload { .. })
        ));
    }

    #[test]
    fn with_entry_leaves_original_untouched() {
        let base = Payload::zeroed(StoreType::Pca9539r, 16).unwrap();
        let changed = base.with_entry(3, 1).unwrap();

        assert_eq!(base[3], 0);
        assert_eq!(changed[3], 1);
        assert_eq!(base.with_entry(16, 1), None);
    }
}

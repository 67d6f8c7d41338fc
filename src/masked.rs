//! Masked writes: entrywise merge of a `(value, mask)` pair into a store.
//!
//! A publisher claims exactly the entries it sets in the mask. Everything
//! outside the mask keeps its current value, so publishers owning disjoint
//! entries of one store never clobber each other:
//!
//! ```text
//! current  0 0 1 1 0 1
//! value    1 1 0 0 1 0
//! mask     0 1 0 1 0 0
//! result   0 1 1 0 0 1
//! ```
//!
//! When two masks overlap, the update applied last wins on the shared
//! entries. Ordering is the coordinator's business, not this module's.

use bitmaps::Bitmap;

use crate::{
    StoreError,
    payload::{Entries, MAX_WIDTH, Payload},
};

/// Set of entry indices within one store.
pub type EntrySet = Bitmap<MAX_WIDTH>;

/// A value/mask pair destined for one store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedUpdate {
    pub value: Payload,
    pub mask: Payload,
}

/// Result of merging an update into a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merge {
    /// The new store contents.
    pub payload: Payload,
    /// Entries whose value differs from before the merge.
    pub changed: EntrySet,
}

impl MaskedUpdate {
    pub fn new(value: Payload, mask: Payload) -> Self {
        Self { value, mask }
    }

    /// Update claiming every entry of `value`.
    pub fn full(value: Payload) -> Result<Self, StoreError> {
        let mask = Payload::filled(value.store_type(), value.width(), 1)?;
        Ok(Self { value, mask })
    }

    /// Indices this update claims.
    pub fn claimed(&self) -> EntrySet {
        let mut claimed = EntrySet::new();
        for (index, &bit) in self.mask.entries().iter().enumerate() {
            if bit != 0 {
                claimed.set(index, true);
            }
        }
        claimed
    }

    /// True when the two updates claim no common entry.
    ///
    /// Disjoint updates commute.
    pub fn is_disjoint(&self, other: &MaskedUpdate) -> bool {
        (self.claimed() & other.claimed()).is_empty()
    }

    /// Merges this update into `current`. See [`merge`].
    pub fn merge_into(&self, current: &Payload) -> Result<Merge, StoreError> {
        merge(current, &self.value, &self.mask)
    }
}

/// Entrywise select: `value[i]` where `mask[i]` is nonzero, else `current[i]`.
///
/// # Errors
/// * [`StoreError::StoreTypeMismatch`] - value or mask belongs to another store type
/// * [`StoreError::ShapeMismatch`] - value or mask width differs from `current`
///
/// On error nothing is produced; the caller's store is untouched.
pub fn apply(current: &Payload, value: &Payload, mask: &Payload) -> Result<Payload, StoreError> {
    merge(current, value, mask).map(|merge| merge.payload)
}

/// Like [`apply`], also reporting which entries changed.
pub fn merge(current: &Payload, value: &Payload, mask: &Payload) -> Result<Merge, StoreError> {
    check_shape(current, value, mask)?;

    let mut entries = Entries::new();
    let mut changed = EntrySet::new();
    let lanes = current
        .entries()
        .iter()
        .zip(value.entries())
        .zip(mask.entries());

    for (index, ((&old, &new), &bit)) in lanes.enumerate() {
        let entry = if bit != 0 { new } else { old };
        if entry != old {
            changed.set(index, true);
        }
        // Widths were checked against `current`, which already fits.
        let _ = entries.push(entry);
    }

    Ok(Merge {
        payload: Payload::from_entries(current.store_type(), entries),
        changed,
    })
}

fn check_shape(current: &Payload, value: &Payload, mask: &Payload) -> Result<(), StoreError> {
    for other in [value, mask] {
        if other.store_type() != current.store_type() {
            return Err(StoreError::StoreTypeMismatch {
                expected: current.store_type(),
                found: other.store_type(),
            });
        }
    }

    if value.width() != current.width() || mask.width() != current.width() {
        return Err(StoreError::ShapeMismatch {
            expected: current.width(),
            value: value.width(),
            mask: mask.width(),
        });
    }

    Ok(())
}

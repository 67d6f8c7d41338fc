use super::macros::{impl_read_primitive, impl_read_primitives, impl_slice_common};

/// Read-only view over untrusted payload bytes.
///
/// Every read is bounds-checked and returns `None` instead of panicking, so
/// decoders can turn short input into a decode error.
#[derive(Debug, Clone, Copy)]
pub struct ROSlice<'a>(&'a [u8]);

impl<'a> ROSlice<'a> {
    /// Creates a new read-only slice wrapper.
    #[inline]
    pub fn new(slice: &'a [u8]) -> Self {
        Self(slice)
    }

    impl_slice_common!();
    impl_read_primitives!();
}

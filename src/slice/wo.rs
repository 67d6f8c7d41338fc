use super::macros::{impl_slice_common, impl_write_primitive, impl_write_primitives};

/// Write-only view used by encoders to fill an envelope payload.
#[derive(Debug)]
pub struct WOSlice<'a>(&'a mut [u8]);

impl<'a> WOSlice<'a> {
    /// Creates a new write-only slice wrapper.
    #[inline]
    pub fn new(slice: &'a mut [u8]) -> Self {
        Self(slice)
    }

    impl_slice_common!();
    impl_write_primitives!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wo_slice_operations() {
        let mut data = [0u8; 4];

        WOSlice::new(&mut data).write_u8_at(1, 0xAA);
        assert_eq!(data, [0x00, 0xAA, 0x00, 0x00]);

        WOSlice::new(&mut data).write_u16_le_at(2, 0x1234);
        assert_eq!(data, [0x00, 0xAA, 0x34, 0x12]);

        WOSlice::new(&mut data).write_u16_le_at(0, 0x5678);
        assert_eq!(data, [0x78, 0x56, 0x34, 0x12]);
    }

    #[test]
    #[should_panic(expected = "write out of bounds")]
    fn write_out_of_bounds() {
        let mut data = [0u8; 4];
        WOSlice::new(&mut data).write_u16_le_at(3, 1);
    }
}

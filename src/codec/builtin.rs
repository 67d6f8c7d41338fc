use crate::{
    codec::{EntryFormat, FixedCodec},
    gpio::{NUM_PORTS, PINS_PER_PORT},
    types::StoreType,
};

/// Pins on a PCA9539R expander (two 8-bit ports).
pub const PCA9539R_PINS: usize = 16;

/// Channels on an ADS1015 ADC.
pub const ADS1015_CHANNELS: usize = 4;

/// All microcontroller GPIO pins, one flag byte each.
pub static GPIO_CODEC: FixedCodec = FixedCodec::new(
    StoreType::Gpio,
    NUM_PORTS * PINS_PER_PORT,
    EntryFormat::Flag,
);

/// PCA9539R pin states, one flag byte each.
pub static PCA9539R_CODEC: FixedCodec =
    FixedCodec::new(StoreType::Pca9539r, PCA9539R_PINS, EntryFormat::Flag);

/// ADS1015 raw conversion codes, little-endian `u16` per channel.
pub static ADS1015_CODEC: FixedCodec =
    FixedCodec::new(StoreType::Ads1015, ADS1015_CHANNELS, EntryFormat::U16Le);

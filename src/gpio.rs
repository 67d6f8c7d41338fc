//! Bit addressing for the GPIO store and single-pin masked updates.

use core::fmt;

use crate::{StoreError, masked::MaskedUpdate, payload::Payload, types::StoreType};

/// Ports `A..=F`.
pub const NUM_PORTS: usize = 6;

/// Pins per port.
pub const PINS_PER_PORT: usize = 16;

/// One pin of the GPIO store, addressed as port letter plus pin number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GpioPin {
    port: char,
    pin: u8,
}

impl GpioPin {
    /// Validates a port letter (either case) and pin number.
    ///
    /// # Errors
    /// [`StoreError::InvalidPin`] if the port is not `A..=F` or the pin is not
    /// below [`PINS_PER_PORT`].
    pub fn new(port: char, pin: u8) -> Result<Self, StoreError> {
        let upper = port.to_ascii_uppercase();
        let in_bank = ('A'..='F').contains(&upper) && usize::from(pin) < PINS_PER_PORT;
        if !in_bank {
            return Err(StoreError::InvalidPin { port, pin });
        }
        Ok(Self { port: upper, pin })
    }

    #[inline]
    pub fn port(&self) -> char {
        self.port
    }

    #[inline]
    pub fn pin(&self) -> u8 {
        self.pin
    }

    /// Entry index in the GPIO store: `(port - 'A') * 16 + pin`.
    #[inline]
    pub fn index(&self) -> usize {
        (self.port as usize - 'A' as usize) * PINS_PER_PORT + usize::from(self.pin)
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}{}", self.port, self.pin)
    }
}

/// How a single-pin write builds its mask.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum MaskMode {
    /// Mask is 1 at the written pin, whatever the state. Driving a pin low
    /// takes effect.
    #[default]
    Indicator,
    /// Mask entry equals the written state. Driving a pin low produces an
    /// empty mask and leaves the store unchanged; kept for harnesses that
    /// depend on that legacy behavior.
    MirrorState,
}

impl MaskMode {
    fn mask_entry(self, state: u32) -> u32 {
        match self {
            MaskMode::Indicator => 1,
            MaskMode::MirrorState => state,
        }
    }
}

/// Full-width GPIO update touching only `pin`.
///
/// Value and mask are zero everywhere except at `pin.index()`, so merging it
/// leaves every other pin of the store as it was.
///
/// # Errors
/// [`StoreError::InvalidPinState`] if `state` is neither 0 nor 1.
pub fn single_pin_update(
    pin: GpioPin,
    state: u32,
    mode: MaskMode,
) -> Result<MaskedUpdate, StoreError> {
    if state > 1 {
        return Err(StoreError::InvalidPinState { state });
    }
    let width = NUM_PORTS * PINS_PER_PORT;
    let zeros = Payload::zeroed(StoreType::Gpio, width)?;
    let invalid = StoreError::InvalidPin {
        port: pin.port,
        pin: pin.pin,
    };

    let value = zeros.with_entry(pin.index(), state).ok_or(invalid)?;
    let mask = zeros
        .with_entry(pin.index(), mode.mask_entry(state))
        .ok_or(invalid)?;

    Ok(MaskedUpdate::new(value, mask))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{masked::apply, test_support::gpio_payload};
    use rstest::rstest;

    #[rstest]
    #[case('A', 0, 0)]
    #[case('A', 15, 15)]
    #[case('B', 5, 21)]
    #[case('b', 5, 21)]
    #[case('C', 0, 32)]
    #[case('F', 15, 95)]
    fn index_follows_port_major_layout(#[case] port: char, #[case] pin: u8, #[case] index: usize) {
        assert_eq!(GpioPin::new(port, pin).unwrap().index(), index);
    }

    #[rstest]
    #[case('G', 0)]
    #[case('@', 0)]
    #[case('A', 16)]
    #[case('1', 3)]
    fn out_of_bank_pins_are_rejected(#[case] port: char, #[case] pin: u8) {
        assert_eq!(GpioPin::new(port, pin), Err(StoreError::InvalidPin { port, pin }));
    }

    #[test]
    fn display() {
        assert_eq!(GpioPin::new('c', 7).unwrap().to_string(), "PC7");
    }

    #[test]
    fn single_pin_update_b5_touches_only_index_21() {
        let pin = GpioPin::new('B', 5).unwrap();
        let update = single_pin_update(pin, 1, MaskMode::Indicator).unwrap();

        assert_eq!(update.value.width(), 96);
        assert_eq!(update.mask.width(), 96);
        assert_eq!(update.claimed().into_iter().collect::<Vec<_>>(), vec![21]);

        let before = gpio_payload(&[0, 20, 22, 95]);
        let after = apply(&before, &update.value, &update.mask).unwrap();
        for index in 0..96 {
            if index == 21 {
                assert_eq!(after[index], 1);
            } else {
                assert_eq!(after[index], before[index], "pin {index} moved");
            }
        }
    }

    #[rstest]
    #[case(MaskMode::Indicator, 1, 1)]
    #[case(MaskMode::Indicator, 0, 0)]
    #[case(MaskMode::MirrorState, 1, 1)]
    #[case(MaskMode::MirrorState, 0, 1)]
    fn driving_a_high_pin(#[case] mode: MaskMode, #[case] state: u32, #[case] expected: u32) {
        let pin = GpioPin::new('A', 3).unwrap();
        let before = gpio_payload(&[3]);
        let update = single_pin_update(pin, state, mode).unwrap();

        let after = update.merge_into(&before).unwrap().payload;
        assert_eq!(after[3], expected);
    }

    #[rstest]
    #[case(MaskMode::Indicator)]
    #[case(MaskMode::MirrorState)]
    fn states_other_than_zero_or_one_are_rejected(#[case] mode: MaskMode) {
        let pin = GpioPin::new('A', 0).unwrap();
        assert_eq!(
            single_pin_update(pin, 2, mode),
            Err(StoreError::InvalidPinState { state: 2 })
        );
    }

    #[test]
    fn mirror_state_low_write_claims_nothing() {
        let pin = GpioPin::new('D', 9).unwrap();
        let update = single_pin_update(pin, 0, MaskMode::MirrorState).unwrap();
        assert!(update.claimed().is_empty());
    }
}

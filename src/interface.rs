//! Hardware interface abstraction
//!
//! This module provides the [`Transport`] trait and the [`I2cTransport`] struct
//! for driving an HD44780U through an 8-bit I2C GPIO expander (PCF8574 and
//! compatibles).
//!
//! ## Hardware Requirements
//!
//! The expander's eight pins are wired to the LCD's parallel interface:
//! - **RS**, **RW**, **E**: control lines
//! - **BL**: backlight transistor
//! - **D4..D7**: upper half of the data bus (4-bit mode)
//!
//! Every write to the expander sets all eight pins at once, so one nibble
//! transfer is two bus writes: once with E high, once with E low. The
//! controller latches on the falling edge.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hd44780_i2c::command::{Command, Instruction};
//! use hd44780_i2c::{Framing, I2cTransport, Transport};
//! # use core::convert::Infallible;
//! # use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
//! # struct MockI2c;
//! # impl ErrorType for MockI2c { type Error = Infallible; }
//! # impl I2c<SevenBitAddress> for MockI2c {
//! #     fn transaction(
//! #         &mut self,
//! #         _address: u8,
//! #         _operations: &mut [Operation<'_>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! // Backpack at 0x27 with the common pin wiring
//! let mut transport = I2cTransport::new(MockI2c, 0x27);
//!
//! // Clear the display
//! let _ = transport.send(Instruction::command(Command::ClearDisplay), Framing::Full);
//!
//! // Write a character
//! let _ = transport.send(Instruction::data(b'A'), Framing::Full);
//! ```

use core::fmt::Debug;
use embedded_hal::i2c::I2c;
use log::trace;

use crate::command::Instruction;
use crate::config::BusMode;
use crate::error::BuilderError;

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// How much of an instruction byte is meaningful on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Framing {
    /// Only the upper nibble, sent as a single transfer
    ///
    /// Used while the bus width is still being negotiated: the controller
    /// may be in 8-bit mode and would take a second nibble as a new
    /// instruction.
    HighNibble,
    /// The whole byte (two transfers on a 4-bit bus, one on an 8-bit bus)
    Full,
}

/// Side-channel features handled by the transport rather than the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Feature {
    /// Panel backlight
    Backlight,
}

/// Trait for the link between [`Display`](crate::Display) and the LCD controller
///
/// This trait abstracts over the physical wiring, allowing the display logic
/// to stay the same whether the panel sits behind an I2C expander or is
/// driven some other way.
///
/// ## Implementing
///
/// For PCF8574-style backpacks use [`I2cTransport`]. Implement this trait on
/// your own type for other wiring.
pub trait Transport {
    /// Error type for transport operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Drive one instruction onto the bus
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying bus fails.
    fn send(
        &mut self,
        instruction: Instruction,
        framing: Framing,
    ) -> InterfaceResult<(), Self::Error>;

    /// Read one byte back from the device
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying bus fails.
    fn read(&mut self) -> InterfaceResult<u8, Self::Error>;

    /// Apply a change of a transport-side feature
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying bus fails.
    fn feature_changed(
        &mut self,
        feature: Feature,
        enabled: bool,
    ) -> InterfaceResult<(), Self::Error>;

    /// Whether this transport can carry the given bus width
    fn supports(&self, _bus_mode: BusMode) -> bool {
        true
    }
}

/// Default I2C address of PCF8574 backpacks (A0..A2 pulled high)
pub const DEFAULT_ADDRESS: u8 = 0x27;

/// Assignment of LCD functions to expander pins
///
/// Stored as bit masks. Masks are disjoint by construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinMap {
    rs: u8,
    rw: u8,
    en: u8,
    backlight: u8,
    data: [u8; 4],
}

impl Default for PinMap {
    /// The common backpack wiring: RS=P0, RW=P1, E=P2, BL=P3, D4..D7=P4..P7
    fn default() -> Self {
        Self {
            rs: 1 << 0,
            rw: 1 << 1,
            en: 1 << 2,
            backlight: 1 << 3,
            data: [1 << 4, 1 << 5, 1 << 6, 1 << 7],
        }
    }
}

impl PinMap {
    /// Create a pin map from expander pin indices
    ///
    /// `data` lists the pins for D4, D5, D6, D7 in that order.
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidPin` if an index is above 7 and
    /// `BuilderError::OverlappingPins` if an index is used twice.
    pub fn new(rs: u8, rw: u8, en: u8, backlight: u8, data: [u8; 4]) -> Result<Self, BuilderError> {
        let pins = [rs, rw, en, backlight, data[0], data[1], data[2], data[3]];
        let mut used = 0u8;
        for pin in pins {
            if pin > 7 {
                return Err(BuilderError::InvalidPin(pin));
            }
            let mask = 1u8 << pin;
            if used & mask != 0 {
                return Err(BuilderError::OverlappingPins);
            }
            used |= mask;
        }

        Ok(Self {
            rs: 1 << rs,
            rw: 1 << rw,
            en: 1 << en,
            backlight: 1 << backlight,
            data: data.map(|pin| 1u8 << pin),
        })
    }

    /// Mask of the register-select pin
    pub fn rs(&self) -> u8 {
        self.rs
    }

    /// Mask of the read/write pin
    pub fn rw(&self) -> u8 {
        self.rw
    }

    /// Mask of the enable pin
    pub fn en(&self) -> u8 {
        self.en
    }

    /// Mask of the backlight pin
    pub fn backlight(&self) -> u8 {
        self.backlight
    }

    /// Masks of D4..D7
    pub fn data(&self) -> [u8; 4] {
        self.data
    }

    /// Spread the low four bits of `nibble` over the data pins
    pub fn nibble(&self, nibble: u8) -> u8 {
        self.data
            .iter()
            .enumerate()
            .filter(|(bit, _)| nibble & (1u8 << bit) != 0)
            .fold(0, |byte, (_, mask)| byte | mask)
    }
}

/// Transport for PCF8574-style I2C backpacks
///
/// Implements [`Transport`] for any embedded-hal v1.0 [`I2c`] bus. The
/// expander only has room for four data lines, so only
/// [`BusMode::FourBit`] is supported.
///
/// ## Example
///
/// ```rust,no_run
/// use hd44780_i2c::{I2cTransport, PinMap};
/// # use core::convert::Infallible;
/// # use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
/// # struct MockI2c;
/// # impl ErrorType for MockI2c { type Error = Infallible; }
/// # impl I2c<SevenBitAddress> for MockI2c {
/// #     fn transaction(
/// #         &mut self,
/// #         _address: u8,
/// #         _operations: &mut [Operation<'_>],
/// #     ) -> Result<(), Self::Error> {
/// #         Ok(())
/// #     }
/// # }
/// // Backpack with data lines on P0..P3 and control lines on the upper pins
/// let pins = match PinMap::new(4, 5, 6, 7, [0, 1, 2, 3]) {
///     Ok(pins) => pins,
///     Err(_) => return,
/// };
/// let _transport = I2cTransport::with_pins(MockI2c, 0x3F, pins);
/// ```
pub struct I2cTransport<I2C> {
    /// I2C bus
    i2c: I2C,
    /// 7-bit expander address
    address: u8,
    /// Pin wiring
    pins: PinMap,
    /// Whether the backlight pin is held high
    backlight: bool,
}

impl<I2C> I2cTransport<I2C>
where
    I2C: I2c,
{
    /// Create a transport with the default pin wiring
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self::with_pins(i2c, address, PinMap::default())
    }

    /// Create a transport with custom pin wiring
    pub fn with_pins(i2c: I2C, address: u8, pins: PinMap) -> Self {
        Self {
            i2c,
            address,
            pins,
            backlight: false,
        }
    }

    /// Expander I2C address
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Pin wiring in use
    pub fn pins(&self) -> &PinMap {
        &self.pins
    }

    /// Whether the backlight pin is currently driven
    pub fn backlight(&self) -> bool {
        self.backlight
    }

    /// Give back the I2C bus
    pub fn release(self) -> I2C {
        self.i2c
    }

    /// Latch one expander byte into the LCD with an enable pulse
    fn pulse(&mut self, byte: u8) -> InterfaceResult<(), I2C::Error> {
        let mut value = byte | self.pins.en;
        if self.backlight {
            value |= self.pins.backlight;
        }
        trace!("pulse {:#04x}", value);

        self.i2c.write(self.address, &[value])?;
        self.i2c.write(self.address, &[value & !self.pins.en])?;
        Ok(())
    }
}

impl<I2C> Transport for I2cTransport<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn send(
        &mut self,
        instruction: Instruction,
        framing: Framing,
    ) -> InterfaceResult<(), Self::Error> {
        let mut control = 0;
        if instruction.register_select {
            control |= self.pins.rs;
        }
        if instruction.read_write {
            control |= self.pins.rw;
        }

        let high = self.pins.nibble(instruction.data >> 4);
        self.pulse(high | control)?;

        if framing == Framing::Full {
            let low = self.pins.nibble(instruction.data & 0x0F);
            self.pulse(low | control)?;
        }

        Ok(())
    }

    fn read(&mut self) -> InterfaceResult<u8, Self::Error> {
        let mut buffer = [0u8; 1];
        self.i2c.read(self.address, &mut buffer)?;
        Ok(buffer[0])
    }

    fn feature_changed(
        &mut self,
        feature: Feature,
        enabled: bool,
    ) -> InterfaceResult<(), Self::Error> {
        match feature {
            Feature::Backlight => {
                self.backlight = enabled;
                let value = if enabled { self.pins.backlight } else { 0 };
                self.i2c.write(self.address, &[value])
            }
        }
    }

    fn supports(&self, bus_mode: BusMode) -> bool {
        bus_mode == BusMode::FourBit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;
    use alloc::vec::Vec;
    use embedded_hal::i2c::{ErrorKind, ErrorType, NoAcknowledgeSource, Operation};

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct MockError;

    impl embedded_hal::i2c::Error for MockError {
        fn kind(&self) -> ErrorKind {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
        }
    }

    #[derive(Debug, Default)]
    struct MockI2c {
        writes: Vec<(u8, Vec<u8>)>,
        read_value: u8,
        fail: bool,
    }

    impl MockI2c {
        fn bytes(&self) -> Vec<u8> {
            self.writes.iter().flat_map(|(_, b)| b.clone()).collect()
        }
    }

    impl ErrorType for MockI2c {
        type Error = MockError;
    }

    impl I2c for MockI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(MockError);
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => self.writes.push((address, bytes.to_vec())),
                    Operation::Read(buffer) => buffer.fill(self.read_value),
                }
            }
            Ok(())
        }
    }

    fn transport() -> I2cTransport<MockI2c> {
        I2cTransport::new(MockI2c::default(), DEFAULT_ADDRESS)
    }

    #[test]
    fn test_default_pin_map() {
        let pins = PinMap::default();
        assert_eq!(pins.rs(), 0x01);
        assert_eq!(pins.rw(), 0x02);
        assert_eq!(pins.en(), 0x04);
        assert_eq!(pins.backlight(), 0x08);
        assert_eq!(pins.data(), [0x10, 0x20, 0x40, 0x80]);
        assert_eq!(PinMap::new(0, 1, 2, 3, [4, 5, 6, 7]), Ok(pins));
    }

    #[test]
    fn test_pin_map_rejects_invalid_pin() {
        assert_eq!(
            PinMap::new(0, 1, 2, 8, [4, 5, 6, 7]),
            Err(BuilderError::InvalidPin(8))
        );
    }

    #[test]
    fn test_pin_map_rejects_overlap() {
        assert_eq!(
            PinMap::new(0, 1, 2, 3, [4, 5, 6, 0]),
            Err(BuilderError::OverlappingPins)
        );
    }

    #[test]
    fn test_nibble_mapping() {
        let pins = PinMap::new(4, 5, 6, 7, [3, 2, 1, 0]).unwrap();
        // bit 0 -> P3, bit 3 -> P0
        assert_eq!(pins.nibble(0b0001), 0b1000);
        assert_eq!(pins.nibble(0b1000), 0b0001);
        assert_eq!(pins.nibble(0b1010), 0b0101);
        assert_eq!(pins.nibble(0), 0);
    }

    #[test]
    fn test_full_byte_sends_high_nibble_first() {
        let mut t = transport();
        t.send(Instruction::data(0xA5), Framing::Full).unwrap();

        // RS held on both nibbles, E set then cleared
        assert_eq!(t.i2c.bytes(), [0xA5, 0xA1, 0x55, 0x51]);
        assert!(t.i2c.writes.iter().all(|(addr, b)| *addr == 0x27 && b.len() == 1));
    }

    #[test]
    fn test_command_has_no_control_bits() {
        let mut t = transport();
        t.send(Instruction::command(Command::ClearDisplay), Framing::Full)
            .unwrap();
        assert_eq!(t.i2c.bytes(), [0x04, 0x00, 0x14, 0x10]);
    }

    #[test]
    fn test_read_write_bit() {
        let mut t = transport();
        t.send(Instruction::new(false, true, 0x00), Framing::Full)
            .unwrap();
        assert_eq!(t.i2c.bytes(), [0x06, 0x02, 0x06, 0x02]);
    }

    #[test]
    fn test_high_nibble_framing_sends_single_pulse() {
        let mut t = transport();
        t.send(Instruction::new(false, false, 0x30), Framing::HighNibble)
            .unwrap();
        assert_eq!(t.i2c.bytes(), [0x34, 0x30]);
    }

    #[test]
    fn test_custom_pins() {
        let pins = PinMap::new(4, 5, 6, 7, [0, 1, 2, 3]).unwrap();
        let mut t = I2cTransport::with_pins(MockI2c::default(), 0x3F, pins);
        t.send(Instruction::data(0xA5), Framing::Full).unwrap();
        assert_eq!(t.i2c.bytes(), [0x5A, 0x1A, 0x55, 0x15]);
        assert!(t.i2c.writes.iter().all(|(addr, _)| *addr == 0x3F));
    }

    #[test]
    fn test_backlight_held_on_every_pulse() {
        let mut t = transport();
        t.feature_changed(Feature::Backlight, true).unwrap();
        t.send(Instruction::data(0xA5), Framing::Full).unwrap();
        assert_eq!(t.i2c.bytes(), [0x08, 0xAD, 0xA9, 0x5D, 0x59]);
        assert!(t.backlight());
    }

    #[test]
    fn test_backlight_off_clears_pins() {
        let mut t = transport();
        t.feature_changed(Feature::Backlight, true).unwrap();
        t.feature_changed(Feature::Backlight, false).unwrap();
        assert_eq!(t.i2c.bytes(), [0x08, 0x00]);
        assert!(!t.backlight());
    }

    #[test]
    fn test_read_returns_raw_byte() {
        let mut t = transport();
        t.i2c.read_value = 0x9C;
        assert_eq!(t.read().unwrap(), 0x9C);
    }

    #[test]
    fn test_bus_errors_propagate() {
        let mut t = transport();
        t.i2c.fail = true;
        assert_eq!(
            t.send(Instruction::data(b'x'), Framing::Full),
            Err(MockError)
        );
        assert_eq!(t.read(), Err(MockError));
    }

    #[test]
    fn test_only_four_bit_supported() {
        let t = transport();
        assert!(t.supports(BusMode::FourBit));
        assert!(!t.supports(BusMode::EightBit));
    }

    #[test]
    fn test_release_returns_bus() {
        let mut t = transport();
        t.send(Instruction::data(b'x'), Framing::Full).unwrap();
        let i2c = t.release();
        assert_eq!(i2c.writes.len(), 4);
    }
}

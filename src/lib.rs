//! HD44780U Character LCD Driver
//!
//! A driver for Hitachi HD44780U-compatible character LCDs connected through
//! an 8-bit I2C GPIO expander such as the PCF8574 "backpack" boards.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - 2x16 and 4x20 panels
//! - Datasheet initialization sequence for 4-bit and 8-bit buses
//! - Justified line writes, cursor and backlight control
//! - Pluggable [`Transport`] for wiring other than an I2C expander
//! - I2C address scanning ([`probe`])
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};
//! use hd44780_i2c::{Builder, Display, Geometry, I2cTransport, Justification, Wrap};
//!
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
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let i2c = MockI2c;
//! # let mut delay = MockDelay;
//! let transport = I2cTransport::new(i2c, 0x27);
//! let config = match Builder::new().geometry(Geometry::Display4x20).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut lcd = match Display::new(transport, config) {
//!     Ok(lcd) => lcd,
//!     Err(_) => return,
//! };
//! let _ = lcd.init(&mut delay);
//! let _ = lcd.set_backlight(true);
//! let _ = lcd.write_line(0, b"Hello", Justification::Center, Wrap::No);
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// HD44780U instruction set
pub mod command;
/// Display configuration types and builder
pub mod config;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware interface abstraction
pub mod interface;
/// I2C bus scanning
pub mod probe;

pub use command::{Command, Direction, Instruction, ShiftTarget};
pub use config::{Builder, BusMode, CharacterLayout, Config, Geometry};
pub use display::{Display, Justification, State, Wrap};
pub use error::{BuilderError, Error};
pub use interface::{DEFAULT_ADDRESS, Feature, Framing, I2cTransport, PinMap, Transport};
pub use probe::{AddressSet, ProbeError};

//! I2C address probing
//!
//! Finds devices on a bus by writing a single `0x00` byte to each address
//! and checking whether the address is acknowledged. Handy for locating an
//! LCD backpack whose address jumpers are unknown (PCF8574 backpacks sit at
//! 0x20..=0x27, PCF8574A ones at 0x38..=0x3F).
//!
//! Writing `0x00` to a PCF8574 drives all of its pins low, which for an LCD
//! backpack only turns the backlight off.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hd44780_i2c::probe::scan;
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
//! let mut i2c = MockI2c;
//! if let Ok(found) = scan(&mut i2c, 0x20..=0x3F) {
//!     for address in found.iter() {
//!         log::info!("device at {address:#04x}");
//!     }
//! }
//! ```

use core::fmt::Debug;
use core::ops::RangeInclusive;
use embedded_hal::i2c::{Error as _, ErrorKind, I2c, NoAcknowledgeSource};
use log::{debug, trace};

/// Highest 7-bit I2C address
pub const MAX_ADDRESS: u8 = 0x7F;

/// Errors that can occur while probing
#[derive(Debug, PartialEq, Eq)]
pub enum ProbeError<E> {
    /// Bus error other than an unacknowledged address
    Bus(E),
    /// Address range reversed or beyond 7 bits
    InvalidRange {
        /// First address requested
        start: u8,
        /// Last address requested
        end: u8,
    },
}

impl<E: Debug> core::fmt::Display for ProbeError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "I2C error: {e:?}"),
            Self::InvalidRange { start, end } => write!(
                f,
                "Invalid address range {start:#04x}..={end:#04x} (must be within 0x00..=0x7f)"
            ),
        }
    }
}

impl<E: Debug> core::error::Error for ProbeError<E> {}

/// Set of 7-bit I2C addresses
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AddressSet(u128);

impl AddressSet {
    /// Empty set
    pub const fn new() -> Self {
        Self(0)
    }

    /// Add an address; anything above 0x7F is ignored
    pub fn insert(&mut self, address: u8) {
        if address <= MAX_ADDRESS {
            self.0 |= 1u128 << address;
        }
    }

    /// Whether `address` is in the set
    pub fn contains(&self, address: u8) -> bool {
        address <= MAX_ADDRESS && self.0 & (1u128 << address) != 0
    }

    /// Number of addresses
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Addresses in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..=MAX_ADDRESS).filter(|address| self.contains(*address))
    }
}

/// Check whether a device acknowledges `address`
///
/// # Errors
///
/// Returns `ProbeError::Bus` for bus failures other than a missing
/// acknowledge, and `ProbeError::InvalidRange` for addresses above 0x7F.
pub fn probe<I2C: I2c>(i2c: &mut I2C, address: u8) -> Result<bool, ProbeError<I2C::Error>> {
    if address > MAX_ADDRESS {
        return Err(ProbeError::InvalidRange {
            start: address,
            end: address,
        });
    }

    match i2c.write(address, &[0x00]) {
        Ok(()) => Ok(true),
        Err(e) => match e.kind() {
            ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address | NoAcknowledgeSource::Unknown) => {
                Ok(false)
            }
            _ => Err(ProbeError::Bus(e)),
        },
    }
}

/// Probe every address in `range`
///
/// # Errors
///
/// Returns `ProbeError::InvalidRange` if the range is empty or reaches past
/// 0x7F, and stops at the first `ProbeError::Bus`.
pub fn scan<I2C: I2c>(
    i2c: &mut I2C,
    range: RangeInclusive<u8>,
) -> Result<AddressSet, ProbeError<I2C::Error>> {
    let (start, end) = (*range.start(), *range.end());
    if start > end || end > MAX_ADDRESS {
        return Err(ProbeError::InvalidRange { start, end });
    }

    let mut found = AddressSet::new();
    for address in range {
        if probe(i2c, address)? {
            trace!("ack at {:#04x}", address);
            found.insert(address);
        }
    }
    debug!("scan {:#04x}..={:#04x}: {} device(s)", start, end, found.len());
    Ok(found)
}

//! HD44780U instruction set
//!
//! This module defines the instruction bytes understood by the HD44780U
//! controller and the [`Instruction`] type that carries one of them, tagged
//! with the state of the RS and RW lines, to a [`Transport`](crate::Transport).
//!
//! ## Instruction Structure
//!
//! Every transaction with the controller is one byte plus two control lines:
//! - **RS** low selects the instruction register, high selects the data register
//! - **RW** low writes, high reads
//!
//! The upper set bit of a command byte identifies the instruction family, the
//! bits below it are that family's flags. [`Command`] models each family as a
//! separate variant so unrelated flags can never be combined.
//!
//! ## Example
//!
//! ```
//! use hd44780_i2c::command::{Command, Instruction, ENTRY_MODE_SET};
//! use hd44780_i2c::Direction;
//!
//! let entry = Command::EntryModeSet { direction: Direction::Right, shift: false };
//! assert_eq!(entry.encode(), ENTRY_MODE_SET | 0x02);
//!
//! let instruction = Instruction::command(entry);
//! assert!(!instruction.register_select);
//! assert_eq!(instruction.data, 0x06);
//! ```

use crate::config::{BusMode, CharacterLayout};

// Instruction families

/// Clear display (0x01)
///
/// Writes spaces to all of DDRAM and sets the address counter to 0.
pub const CLEAR_DISPLAY: u8 = 0x01;

/// Return home (0x02)
///
/// Sets the address counter to 0 and undoes any display shift.
pub const RETURN_HOME: u8 = 0x02;

/// Entry mode set (0x04)
///
/// - Bit 1 (I/D): 1 = increment (cursor moves right), 0 = decrement
/// - Bit 0 (S): shift the display along with the cursor
pub const ENTRY_MODE_SET: u8 = 0x04;

/// Display on/off control (0x08)
///
/// - Bit 2 (D): display on
/// - Bit 1 (C): cursor visible
/// - Bit 0 (B): cursor blink
pub const DISPLAY_CONTROL: u8 = 0x08;

/// Cursor or display shift (0x10)
///
/// - Bit 3 (S/C): 1 = shift the display, 0 = move the cursor
/// - Bit 2 (R/L): 1 = right, 0 = left
pub const CURSOR_DISPLAY_SHIFT: u8 = 0x10;

/// Function set (0x20)
///
/// - Bit 4 (DL): 1 = 8-bit bus, 0 = 4-bit bus
/// - Bit 3 (N): 1 = two display lines
/// - Bit 2 (F): 1 = 5x10 dot font
pub const FUNCTION_SET: u8 = 0x20;

/// Set CGRAM address (0x40), 6-bit address in the low bits
pub const SET_CGRAM_ADDRESS: u8 = 0x40;

/// Set DDRAM address (0x80), 7-bit address in the low bits
pub const SET_DDRAM_ADDRESS: u8 = 0x80;

// Flags

const ENTRY_INCREMENT: u8 = 0x02;
const ENTRY_SHIFT: u8 = 0x01;

const DISPLAY_ON: u8 = 0x04;
const CURSOR_ON: u8 = 0x02;
const BLINK_ON: u8 = 0x01;

const SHIFT_DISPLAY: u8 = 0x08;
const SHIFT_RIGHT: u8 = 0x04;

const BUS_8BIT: u8 = 0x10;

const CGRAM_ADDRESS_MASK: u8 = 0x3F;
const DDRAM_ADDRESS_MASK: u8 = 0x7F;

/// Horizontal direction for cursor movement and display shifts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Direction {
    /// Towards lower addresses
    Left,
    /// Towards higher addresses
    #[default]
    Right,
}

/// What a cursor/display-shift instruction moves
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShiftTarget {
    /// Move the cursor, DDRAM contents stay put
    Cursor,
    /// Shift the whole display window, cursor follows
    Display,
}

/// One HD44780U instruction with its flags
///
/// Addresses wider than the field they occupy are masked by [`Command::encode`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Clear display
    ClearDisplay,
    /// Return home
    ReturnHome,
    /// Entry mode set
    EntryModeSet {
        /// Cursor movement after each data write
        direction: Direction,
        /// Shift the display instead of only moving the cursor
        shift: bool,
    },
    /// Display on/off control
    DisplayControl {
        /// Display on
        display: bool,
        /// Cursor visible
        cursor: bool,
        /// Cursor blinking
        blink: bool,
    },
    /// Cursor or display shift
    Shift {
        /// Cursor or display
        target: ShiftTarget,
        /// Shift direction
        direction: Direction,
    },
    /// Function set
    FunctionSet {
        /// Data bus width
        bus_mode: BusMode,
        /// Line count and font
        layout: CharacterLayout,
    },
    /// Set CGRAM address
    SetCgramAddress(u8),
    /// Set DDRAM address
    SetDdramAddress(u8),
}

impl Command {
    /// Encode the command into its instruction byte
    pub const fn encode(self) -> u8 {
        match self {
            Self::ClearDisplay => CLEAR_DISPLAY,
            Self::ReturnHome => RETURN_HOME,
            Self::EntryModeSet { direction, shift } => {
                let mut byte = ENTRY_MODE_SET;
                if matches!(direction, Direction::Right) {
                    byte |= ENTRY_INCREMENT;
                }
                if shift {
                    byte |= ENTRY_SHIFT;
                }
                byte
            }
            Self::DisplayControl {
                display,
                cursor,
                blink,
            } => {
                let mut byte = DISPLAY_CONTROL;
                if display {
                    byte |= DISPLAY_ON;
                }
                if cursor {
                    byte |= CURSOR_ON;
                }
                if blink {
                    byte |= BLINK_ON;
                }
                byte
            }
            Self::Shift { target, direction } => {
                let mut byte = CURSOR_DISPLAY_SHIFT;
                if matches!(target, ShiftTarget::Display) {
                    byte |= SHIFT_DISPLAY;
                }
                if matches!(direction, Direction::Right) {
                    byte |= SHIFT_RIGHT;
                }
                byte
            }
            Self::FunctionSet { bus_mode, layout } => {
                let width = match bus_mode {
                    BusMode::FourBit => 0,
                    BusMode::EightBit => BUS_8BIT,
                };
                FUNCTION_SET | width | layout.bits()
            }
            Self::SetCgramAddress(address) => SET_CGRAM_ADDRESS | (address & CGRAM_ADDRESS_MASK),
            Self::SetDdramAddress(address) => SET_DDRAM_ADDRESS | (address & DDRAM_ADDRESS_MASK),
        }
    }
}

/// A single RS/RW-tagged transaction with the controller
///
/// Constructed, handed to the transport once, and discarded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// RS line: `false` = instruction register, `true` = data register
    pub register_select: bool,
    /// RW line: `false` = write, `true` = read
    pub read_write: bool,
    /// Byte driven onto the data lines
    pub data: u8,
}

impl Instruction {
    /// Create an instruction from raw line states
    pub const fn new(register_select: bool, read_write: bool, data: u8) -> Self {
        Self {
            register_select,
            read_write,
            data,
        }
    }

    /// Instruction-register write carrying an encoded [`Command`]
    pub const fn command(command: Command) -> Self {
        Self::new(false, false, command.encode())
    }

    /// Data-register write of one character byte
    pub const fn data(byte: u8) -> Self {
        Self::new(true, false, byte)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(Command::ClearDisplay.encode(), 0x01);
        assert_eq!(Command::ReturnHome.encode(), 0x02);
    }

    #[test]
    fn test_entry_mode_cursor_right() {
        let cmd = Command::EntryModeSet {
            direction: Direction::Right,
            shift: false,
        };
        assert_eq!(cmd.encode(), 0x06);

        let cmd = Command::EntryModeSet {
            direction: Direction::Left,
            shift: true,
        };
        assert_eq!(cmd.encode(), 0x05);
    }

    #[test]
    fn test_display_control_flags() {
        let off = Command::DisplayControl {
            display: false,
            cursor: false,
            blink: false,
        };
        assert_eq!(off.encode(), 0x08);

        let on = Command::DisplayControl {
            display: true,
            cursor: false,
            blink: false,
        };
        assert_eq!(on.encode(), 0x0C);

        let all = Command::DisplayControl {
            display: true,
            cursor: true,
            blink: true,
        };
        assert_eq!(all.encode(), 0x0F);
    }

    #[test]
    fn test_shift() {
        let cursor_left = Command::Shift {
            target: ShiftTarget::Cursor,
            direction: Direction::Left,
        };
        assert_eq!(cursor_left.encode(), 0x10);

        let display_right = Command::Shift {
            target: ShiftTarget::Display,
            direction: Direction::Right,
        };
        assert_eq!(display_right.encode(), 0x1C);
    }

    #[test]
    fn test_function_set() {
        let negotiate = Command::FunctionSet {
            bus_mode: BusMode::EightBit,
            layout: CharacterLayout::OneLine5x8,
        };
        assert_eq!(negotiate.encode(), 0x30);

        let four_bit = Command::FunctionSet {
            bus_mode: BusMode::FourBit,
            layout: CharacterLayout::OneLine5x8,
        };
        assert_eq!(four_bit.encode(), 0x20);

        let configured = Command::FunctionSet {
            bus_mode: BusMode::FourBit,
            layout: CharacterLayout::TwoLine5x8,
        };
        assert_eq!(configured.encode(), 0x28);

        let tall_font = Command::FunctionSet {
            bus_mode: BusMode::EightBit,
            layout: CharacterLayout::OneLine5x10,
        };
        assert_eq!(tall_font.encode(), 0x34);
    }

    #[test]
    fn test_addresses_are_masked() {
        assert_eq!(Command::SetDdramAddress(0x19).encode(), 0x99);
        assert_eq!(Command::SetDdramAddress(0xFF).encode(), 0xFF);
        assert_eq!(Command::SetCgramAddress(0x08).encode(), 0x48);
        assert_eq!(Command::SetCgramAddress(0xFF).encode(), 0x7F);
    }

    #[test]
    fn test_instruction_constructors() {
        let cmd = Instruction::command(Command::ClearDisplay);
        assert_eq!(cmd, Instruction::new(false, false, 0x01));

        let data = Instruction::data(b'A');
        assert!(data.register_select);
        assert!(!data.read_write);
        assert_eq!(data.data, 0x41);
    }
}

//! Core display operations

use embedded_hal::delay::DelayNs;
use log::{debug, trace};

use crate::command::{Command, Direction, Instruction, ShiftTarget};
use crate::config::{BusMode, CharacterLayout, Config, Geometry};
use crate::error::{BuilderError, Error};
use crate::interface::{Feature, Framing, Transport};

type DisplayResult<I> = core::result::Result<(), Error<I>>;

/// Settle time after power-on before the first instruction
const POWER_ON_DELAY_MS: u32 = 100;

/// Waits after each of the three 8-bit function-set attempts
const BUS_RESET_DELAYS_MS: [u32; 3] = [50, 50, 20];

/// Blank used to erase a row before [`Display::write_line`] writes it
const BLANK: u8 = b' ';

/// Lifecycle of the controller
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum State {
    /// Constructed, nothing sent yet
    #[default]
    Uninitialized,
    /// Forcing the controller into a known bus width
    BusWidthNegotiating,
    /// Bus width fixed; function-set sent, display not yet enabled
    Configured,
    /// Initialization complete; all operations available
    Ready,
}

/// Horizontal placement for [`Display::write_line`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Justification {
    /// Start at column 0
    #[default]
    Left,
    /// Centre in the row, rounding towards the left
    Center,
    /// End at the last column
    Right,
}

/// Wrapping request for [`Display::write_line`]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Wrap {
    /// Never wrap
    #[default]
    No,
    /// Wrap onto following rows (unsupported)
    Yes,
}

impl Justification {
    /// First column of `len` characters justified in a row of `columns`
    ///
    /// Text that does not fit starts at column 0.
    pub fn start_column(self, columns: u8, len: usize) -> u8 {
        let Ok(len) = u8::try_from(len) else {
            return 0;
        };
        let Some(free) = columns.checked_sub(len) else {
            return 0;
        };
        match self {
            Self::Left => 0,
            Self::Center => free / 2,
            Self::Right => free,
        }
    }
}

/// Display-side flags, mirrored into display-control instructions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct DisplayState {
    backlight: bool,
    cursor_visible: bool,
    cursor_blink: bool,
    display_enabled: bool,
    bus_initialized: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            backlight: false,
            cursor_visible: false,
            cursor_blink: false,
            display_enabled: true,
            bus_initialized: false,
        }
    }
}

/// Core display driver for HD44780U
///
/// Encodes instructions, tracks display state and delegates every bus
/// transaction to a [`Transport`]. The transport is owned exclusively; share
/// the underlying bus outside the driver if needed.
pub struct Display<I>
where
    I: Transport,
{
    /// Hardware transport
    transport: I,
    /// Display configuration
    config: Config,
    /// Current flags
    flags: DisplayState,
    /// Initialization progress
    state: State,
}

impl<I> Display<I>
where
    I: Transport,
{
    /// Create a new Display instance
    ///
    /// Nothing is sent until [`init`](Self::init).
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::UnsupportedBusMode` if the transport cannot
    /// carry `config.bus_mode`.
    pub fn new(transport: I, config: Config) -> Result<Self, BuilderError> {
        if !transport.supports(config.bus_mode) {
            return Err(BuilderError::UnsupportedBusMode(config.bus_mode));
        }
        Ok(Self {
            transport,
            config,
            flags: DisplayState::default(),
            state: State::Uninitialized,
        })
    }

    /// Run the power-on initialization sequence
    ///
    /// Follows the "initializing by instruction" procedure of the HD44780U
    /// datasheet, which works whatever state the controller powered up in.
    /// Calling it again repeats the whole sequence including its delays.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        let geometry = self.config.geometry;
        debug!(
            "init {}x{} display, {:?} bus",
            geometry.rows(),
            geometry.columns(),
            self.config.bus_mode
        );

        self.flags.bus_initialized = false;
        self.state = State::BusWidthNegotiating;
        delay.delay_ms(POWER_ON_DELAY_MS);

        // Three 8-bit function-sets get the controller to 8-bit mode from
        // any starting state
        let reset = Command::FunctionSet {
            bus_mode: BusMode::EightBit,
            layout: CharacterLayout::OneLine5x8,
        };
        for wait in BUS_RESET_DELAYS_MS {
            self.send_command(reset)?;
            delay.delay_ms(wait);
        }

        if self.config.bus_mode == BusMode::FourBit {
            self.send_command(Command::FunctionSet {
                bus_mode: BusMode::FourBit,
                layout: CharacterLayout::OneLine5x8,
            })?;
        }

        self.flags.bus_initialized = true;
        self.state = State::Configured;
        debug!("bus width negotiated");

        // Line count and font are fixed from here on
        self.send_command(Command::FunctionSet {
            bus_mode: self.config.bus_mode,
            layout: geometry.layout(),
        })?;

        self.send_command(Command::DisplayControl {
            display: false,
            cursor: false,
            blink: false,
        })?;

        self.send_command(Command::ClearDisplay)?;

        self.send_command(Command::EntryModeSet {
            direction: Direction::Right,
            shift: false,
        })?;

        self.flags.display_enabled = true;
        self.refresh_display_control()?;

        self.state = State::Ready;
        debug!("display ready");
        Ok(())
    }

    /// Turn the backlight on or off
    ///
    /// Handled by the transport, so it works before [`init`](Self::init).
    /// Setting the current value again sends nothing.
    pub fn set_backlight(&mut self, enabled: bool) -> DisplayResult<I> {
        if self.flags.backlight == enabled {
            return Ok(());
        }
        self.flags.backlight = enabled;
        self.transport
            .feature_changed(Feature::Backlight, enabled)
            .map_err(Error::Transport)
    }

    /// Show or hide the cursor
    pub fn set_cursor_visible(&mut self, visible: bool) -> DisplayResult<I> {
        if self.flags.cursor_visible == visible {
            return Ok(());
        }
        self.ensure_ready()?;
        self.flags.cursor_visible = visible;
        self.refresh_display_control()
    }

    /// Enable or disable cursor blinking
    pub fn set_cursor_blink(&mut self, blink: bool) -> DisplayResult<I> {
        if self.flags.cursor_blink == blink {
            return Ok(());
        }
        self.ensure_ready()?;
        self.flags.cursor_blink = blink;
        self.refresh_display_control()
    }

    /// Turn the display on or off
    ///
    /// DDRAM contents are kept while the display is off.
    pub fn set_display_enabled(&mut self, enabled: bool) -> DisplayResult<I> {
        if self.flags.display_enabled == enabled {
            return Ok(());
        }
        self.ensure_ready()?;
        self.flags.display_enabled = enabled;
        self.refresh_display_control()
    }

    /// Clear the display and move the cursor to (0, 0)
    pub fn clear(&mut self) -> DisplayResult<I> {
        self.ensure_ready()?;
        self.send_command(Command::ClearDisplay)
    }

    /// Move the cursor to (0, 0) and undo display shifts
    pub fn return_home(&mut self) -> DisplayResult<I> {
        self.ensure_ready()?;
        self.send_command(Command::ReturnHome)
    }

    /// Move the cursor one cell without writing
    pub fn shift_cursor(&mut self, direction: Direction) -> DisplayResult<I> {
        self.ensure_ready()?;
        self.send_command(Command::Shift {
            target: ShiftTarget::Cursor,
            direction,
        })
    }

    /// Scroll the whole display one cell
    pub fn shift_display(&mut self, direction: Direction) -> DisplayResult<I> {
        self.ensure_ready()?;
        self.send_command(Command::Shift {
            target: ShiftTarget::Display,
            direction,
        })
    }

    /// Write one character at the cursor
    ///
    /// The byte is passed through as a character code; the cursor advances
    /// right.
    pub fn write_char(&mut self, ch: u8) -> DisplayResult<I> {
        self.ensure_ready()?;
        self.send_data(ch)
    }

    /// Write character codes at the cursor
    pub fn write_bytes(&mut self, bytes: &[u8]) -> DisplayResult<I> {
        self.ensure_ready()?;
        for &byte in bytes {
            self.send_data(byte)?;
        }
        Ok(())
    }

    /// Write a string at the cursor, one character per UTF-8 byte
    pub fn write_str(&mut self, s: &str) -> DisplayResult<I> {
        self.write_bytes(s.as_bytes())
    }

    /// Move the cursor to (row, column) and write there
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRange` without sending anything if the position
    /// lies outside the display.
    pub fn write_at(&mut self, row: u8, column: u8, bytes: &[u8]) -> DisplayResult<I> {
        self.set_cursor_position(row, column)?;
        self.write_bytes(bytes)
    }

    /// Replace a whole row with justified text
    ///
    /// The row is blanked first, then `text` is written at the column given
    /// by `justification`.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotSupported` if `wrap` is [`Wrap::Yes`] and the text
    /// is longer than a row, and `Error::OutOfRange` for a row outside the
    /// display. Text longer than a row without wrapping starts at column 0
    /// and is written in full.
    pub fn write_line(
        &mut self,
        row: u8,
        text: &[u8],
        justification: Justification,
        wrap: Wrap,
    ) -> DisplayResult<I> {
        self.ensure_ready()?;
        let columns = self.config.geometry.columns();
        if wrap == Wrap::Yes && text.len() > columns as usize {
            return Err(Error::NotSupported);
        }

        let start = justification.start_column(columns, text.len());
        trace!("write_line row={} start={} len={}", row, start, text.len());

        self.set_cursor_position(row, 0)?;
        for _ in 0..columns {
            self.send_data(BLANK)?;
        }

        self.write_at(row, start, text)
    }

    /// Move the cursor to (row, column)
    ///
    /// # Errors
    ///
    /// Returns `Error::OutOfRange` without sending anything if `row` or
    /// `column` lies outside the display.
    pub fn set_cursor_position(&mut self, row: u8, column: u8) -> DisplayResult<I> {
        self.ensure_ready()?;
        let address = self
            .config
            .geometry
            .ddram_address(row, column)
            .ok_or(Error::OutOfRange { row, column })?;
        self.send_command(Command::SetDdramAddress(address))
    }

    /// Read one byte back through the transport
    pub fn read(&mut self) -> core::result::Result<u8, Error<I>> {
        self.ensure_ready()?;
        self.transport.read().map_err(Error::Transport)
    }

    /// Whether the backlight is on
    pub fn backlight(&self) -> bool {
        self.flags.backlight
    }

    /// Whether the cursor is visible
    pub fn cursor_visible(&self) -> bool {
        self.flags.cursor_visible
    }

    /// Whether the cursor blinks
    pub fn cursor_blink(&self) -> bool {
        self.flags.cursor_blink
    }

    /// Whether the display is on
    pub fn display_enabled(&self) -> bool {
        self.flags.display_enabled
    }

    /// Data bus width
    pub fn bus_mode(&self) -> BusMode {
        self.config.bus_mode
    }

    /// Get display geometry
    pub fn geometry(&self) -> Geometry {
        self.config.geometry
    }

    /// Initialization progress
    pub fn state(&self) -> State {
        self.state
    }

    /// Access the underlying configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Consume the driver and give back the transport
    pub fn release(self) -> I {
        self.transport
    }

    fn ensure_ready(&self) -> DisplayResult<I> {
        if self.state == State::Ready {
            Ok(())
        } else {
            Err(Error::NotInitialized)
        }
    }

    fn refresh_display_control(&mut self) -> DisplayResult<I> {
        self.send_command(Command::DisplayControl {
            display: self.flags.display_enabled,
            cursor: self.flags.cursor_visible,
            blink: self.flags.cursor_blink,
        })
    }

    /// Send a command, framed by how far bus negotiation has got
    fn send_command(&mut self, command: Command) -> DisplayResult<I> {
        trace!("command {:?}", command);
        let framing = if self.flags.bus_initialized {
            Framing::Full
        } else {
            Framing::HighNibble
        };
        self.transport
            .send(Instruction::command(command), framing)
            .map_err(Error::Transport)
    }

    fn send_data(&mut self, byte: u8) -> DisplayResult<I> {
        self.transport
            .send(Instruction::data(byte), Framing::Full)
            .map_err(Error::Transport)
    }
}

impl<I> core::fmt::Write for Display<I>
where
    I: Transport,
{
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        Display::write_str(self, s).map_err(|_| core::fmt::Error)
    }
}

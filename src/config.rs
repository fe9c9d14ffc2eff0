//! Display configuration types and builder

pub use crate::error::BuilderError;

/// Width of the data bus between the host side and the LCD controller
///
/// Fixed for the lifetime of a [`Display`](crate::Display).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BusMode {
    /// D4..D7 only; every instruction travels as two nibbles
    #[default]
    FourBit,
    /// D0..D7; every instruction travels as one byte
    EightBit,
}

/// Display line count and character font, as selected by function-set
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CharacterLayout {
    /// One line, 5x8 dots
    OneLine5x8,
    /// One line, 5x10 dots
    OneLine5x10,
    /// Two lines, 5x8 dots
    TwoLine5x8,
}

impl CharacterLayout {
    /// Function-set N/F bits for this layout
    pub const fn bits(self) -> u8 {
        match self {
            Self::OneLine5x8 => 0x00,
            Self::OneLine5x10 => 0x04,
            Self::TwoLine5x8 => 0x08,
        }
    }
}

/// Supported display geometries
///
/// The DDRAM layout of an HD44780U panel depends on how the glass is wired to
/// the controller, so only known panels are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Geometry {
    /// 2 rows of 16 characters
    Display2x16,
    /// 4 rows of 20 characters
    Display4x20,
}

impl Geometry {
    /// Look up a geometry by its size
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::UnsupportedGeometry` for anything other than
    /// 2x16 or 4x20.
    pub fn new(rows: u8, columns: u8) -> Result<Self, BuilderError> {
        match (rows, columns) {
            (2, 16) => Ok(Self::Display2x16),
            (4, 20) => Ok(Self::Display4x20),
            _ => Err(BuilderError::UnsupportedGeometry { rows, columns }),
        }
    }

    /// Number of character rows
    pub const fn rows(self) -> u8 {
        match self {
            Self::Display2x16 => 2,
            Self::Display4x20 => 4,
        }
    }

    /// Number of characters per row
    pub const fn columns(self) -> u8 {
        match self {
            Self::Display2x16 => 16,
            Self::Display4x20 => 20,
        }
    }

    /// DDRAM address of column 0 for each row, in row order
    ///
    /// On 4-row panels rows 2 and 3 continue rows 0 and 1 in DDRAM.
    pub const fn row_offsets(self) -> &'static [u8] {
        match self {
            Self::Display2x16 => &[0x00, 0x40],
            Self::Display4x20 => &[0x00, 0x40, 0x14, 0x54],
        }
    }

    /// Line/font configuration sent in the final function-set
    pub const fn layout(self) -> CharacterLayout {
        match self {
            Self::Display2x16 | Self::Display4x20 => CharacterLayout::TwoLine5x8,
        }
    }

    /// DDRAM address of a cell, or `None` if it lies outside the panel
    pub fn ddram_address(self, row: u8, column: u8) -> Option<u8> {
        if row >= self.rows() || column >= self.columns() {
            return None;
        }
        self.row_offsets()
            .get(row as usize)
            .map(|offset| offset + column)
    }
}

/// Display configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Panel geometry
    pub geometry: Geometry,
    /// Data bus width
    pub bus_mode: BusMode,
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```
/// use hd44780_i2c::{BusMode, Builder, Geometry};
///
/// let geometry = match Geometry::new(4, 20) {
///     Ok(geometry) => geometry,
///     Err(_) => return,
/// };
/// let config = match Builder::new().geometry(geometry).bus_mode(BusMode::FourBit).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.geometry.columns(), 20);
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    /// Panel geometry (required)
    geometry: Option<Geometry>,
    /// Data bus width
    bus_mode: BusMode,
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set panel geometry (required)
    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set data bus width (defaults to 4-bit)
    pub fn bus_mode(mut self, bus_mode: BusMode) -> Self {
        self.bus_mode = bus_mode;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingGeometry` if geometry was not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            geometry: self.geometry.ok_or(BuilderError::MissingGeometry)?,
            bus_mode: self.bus_mode,
        })
    }
}

//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration or pin map construction
//! - [`Error`] - Runtime errors during display operations
//! - [`ProbeError`](crate::probe::ProbeError) - Errors while scanning the bus
//!
//! No operation is retried internally. A failure in the middle of a
//! multi-instruction operation such as
//! [`Display::write_line`](crate::Display::write_line) leaves whatever was
//! already sent on the panel.
//!
//! ## Example
//!
//! ```
//! use hd44780_i2c::{Builder, BuilderError, Geometry};
//!
//! // Missing geometry
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingGeometry)));
//!
//! // Unsupported geometry
//! let result = Geometry::new(3, 40);
//! assert!(result.is_err());
//! ```

use crate::config::BusMode;
use crate::interface::Transport;

/// Errors that can occur when interacting with the display
///
/// Generic over the transport type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<I: Transport> {
    /// Transport error (bus not acknowledged, timeout, device gone)
    ///
    /// Wraps the underlying error from the [`Transport`] implementation.
    Transport(I::Error),
    /// Row or column outside the configured geometry
    OutOfRange {
        /// Row requested
        row: u8,
        /// Column requested
        column: u8,
    },
    /// Text wrapping was requested for text longer than a row
    ///
    /// Wrapping is not implemented; split the text before writing it.
    NotSupported,
    /// The operation needs a completed [`Display::init`](crate::Display::init)
    NotInitialized,
}

impl<I: Transport> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Transport(_) => write!(f, "Transport error"),
            Self::OutOfRange { row, column } => {
                write!(f, "Position out of range: row={row}, column={column}")
            }
            Self::NotSupported => write!(f, "Text wrapping is not supported"),
            Self::NotInitialized => write!(f, "Display is not initialized"),
        }
    }
}

impl<I: Transport + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur before the display is created.
#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    /// Geometry was not specified
    ///
    /// [`Builder::geometry()`](crate::config::Builder::geometry) must be called before building.
    MissingGeometry,
    /// No supported geometry has this size
    ///
    /// See [`Geometry::new()`](crate::config::Geometry::new).
    UnsupportedGeometry {
        /// Rows requested
        rows: u8,
        /// Columns requested
        columns: u8,
    },
    /// The transport cannot carry this bus width
    UnsupportedBusMode(BusMode),
    /// Expander pin index above 7
    InvalidPin(u8),
    /// Two functions were assigned to the same expander pin
    OverlappingPins,
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingGeometry => write!(f, "Geometry must be specified"),
            Self::UnsupportedGeometry { rows, columns } => write!(
                f,
                "Unsupported geometry {rows}x{columns} (supported: 2x16, 4x20)"
            ),
            Self::UnsupportedBusMode(mode) => {
                write!(f, "Bus mode {mode:?} is not supported by this transport")
            }
            Self::InvalidPin(pin) => write!(f, "Invalid expander pin P{pin} (must be 0-7)"),
            Self::OverlappingPins => write!(f, "Expander pins must be distinct"),
        }
    }
}

impl core::error::Error for BuilderError {}

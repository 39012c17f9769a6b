//! Driver errors
//!
//! ```
//! use gde029::{Builder, BuilderError, Dimensions};
//!
//! assert_eq!(Builder::new().build().unwrap_err(), BuilderError::MissingDimensions);
//! assert!(Dimensions::new(400, 128).is_err());
//! ```

use core::fmt;

use crate::config::{MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS};
use crate::interface::DisplayInterface;

/// Failure of a panel operation
#[derive(Debug)]
pub enum Error<I: DisplayInterface> {
    /// Transport failure, including a BUSY timeout
    Interface(I::Error),
    /// A frame or scratch slice shorter than the operation needs
    BufferTooSmall { required: usize, provided: usize },
}

impl<I: DisplayInterface> fmt::Display for Error<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Interface(e) => write!(f, "panel interface: {e:?}"),
            Error::BufferTooSmall { required, provided } => {
                write!(f, "buffer holds {provided} bytes, need {required}")
            }
        }
    }
}

impl<I: DisplayInterface + fmt::Debug> core::error::Error for Error<I> {}

#[derive(Debug, PartialEq, Eq)]
pub enum BuilderError {
    MissingDimensions,
    InvalidDimensions { rows: u16, cols: u16 },
}

impl fmt::Display for BuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuilderError::MissingDimensions => f.write_str("panel dimensions not set"),
            BuilderError::InvalidDimensions { rows, cols } => write!(
                f,
                "unsupported panel {rows}x{cols}: at most {MAX_GATE_OUTPUTS}x{MAX_SOURCE_OUTPUTS}, columns in multiples of 8"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}

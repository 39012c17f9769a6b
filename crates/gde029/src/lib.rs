//! Driver for the GDEH029A1 2.9" e-paper panel
//!
//! The panel pairs a 296x128 black/white glass with an SSD1608-class
//! controller. This crate speaks the controller's command set over any
//! `embedded-hal` 1.0 SPI device plus DC/RST/BUSY pins, and ships four
//! waveform LUTs ranging from a clean full refresh to a fast partial one.
//!
//! ```rust,ignore
//! use gde029::{Builder, Dimensions, Display, Interface, Lut};
//!
//! let interface = Interface::new(spi_device, dc, rst, busy);
//! let config = Builder::new().dimensions(Dimensions::GDEH029A1).build()?;
//! let mut display = Display::new(interface, config);
//! display.reset(&mut delay)?;
//! display.update_landscape(&image, &mut scratch, Some(Lut::Normal), &mut delay)?;
//! ```

#![cfg_attr(not(any(test, feature = "std")), no_std)]

mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod interface;
pub mod layout;
pub mod lut;

pub use config::{AnalogSettings, Builder, Config, Dimensions};
pub use display::Display;
pub use error::{BuilderError, Error};
pub use interface::{DisplayInterface, Interface, InterfaceError};
pub use layout::{landscape_size, landscape_stride};
pub use lut::{Lut, LUT_LEN};

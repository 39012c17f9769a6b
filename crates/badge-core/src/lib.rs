//! Native-call adapter layer for the SHA2017 badge.
//!
//! Exposes the `badge` and `uos` modules as static name → function tables,
//! backed by a [`hal::Board`] and a 296x128 1bpp frame buffer. Works on the
//! ESP32 firmware, the desktop simulator and host tests.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![cfg_attr(
    not(test),
    deny(
        clippy::expect_used,
        clippy::panic,
        clippy::todo,
        clippy::unimplemented,
        clippy::unreachable,
        clippy::unwrap_used
    )
)]

extern crate alloc;

pub mod args;
pub mod badge_module;
pub mod console;
pub mod error;
pub mod fonts;
pub mod framebuffer;
pub mod hal;
#[cfg(any(test, feature = "std"))]
pub mod mock;
pub mod os_module;
pub mod pictures;
pub mod raster;
pub mod runtime;
pub mod table;
pub mod ugfx;
pub mod value;

pub use error::{BadgeError, Errno, HalError};
pub use hal::Board;
pub use runtime::Runtime;
pub use value::Value;

/// Panel width in landscape orientation.
pub const PANEL_WIDTH: u32 = 296;
/// Panel height in landscape orientation.
pub const PANEL_HEIGHT: u32 = 128;

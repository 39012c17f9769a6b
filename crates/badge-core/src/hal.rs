//! Hardware seams consumed by the adapter modules
//!
//! Each concern is a small trait so the firmware, the desktop simulator and
//! the mock board can plug their own backends behind the same call table.

extern crate alloc;

use alloc::string::String;

use crate::error::HalError;

/// Bit offset of the LUT selector inside [`DisplayFlags`].
pub const LUT_BIT: u32 = 4;
/// Width in bits of the LUT selector field.
pub const LUT_BITS: u32 = 4;

/// Panel update flags.
///
/// Bits `LUT_BIT..LUT_BIT + LUT_BITS` hold `lut + 1`; zero selects the
/// panel's default waveform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisplayFlags(pub u32);

impl DisplayFlags {
    pub const DEFAULT: DisplayFlags = DisplayFlags(0);

    /// Flags for a caller supplied LUT index.
    pub fn from_lut(lut: i64) -> Self {
        DisplayFlags((lut.wrapping_add(1) as u32) << LUT_BIT)
    }

    /// The raw selector field, `0` meaning "default".
    pub fn lut_field(self) -> u32 {
        (self.0 >> LUT_BIT) & ((1 << LUT_BITS) - 1)
    }
}

pub trait Panel {
    fn init(&mut self) -> Result<(), HalError>;

    /// Push a full landscape 1bpp image to the panel.
    fn display(&mut self, image: &[u8], flags: DisplayFlags) -> Result<(), HalError>;
}

pub trait Power {
    fn init(&mut self) -> Result<(), HalError>;
    fn battery_charging(&mut self) -> Result<bool, HalError>;
    /// Battery voltage in millivolts
    fn battery_millivolts(&mut self) -> Result<i32, HalError>;
    /// USB supply voltage in millivolts
    fn usb_millivolts(&mut self) -> Result<i32, HalError>;
}

pub trait Leds {
    fn init(&mut self) -> Result<(), HalError>;
}

pub trait Entropy {
    /// One 32-bit word from the hardware generator.
    fn next_u32(&mut self) -> u32;
}

/// Options for formatting and mounting a flash partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountConfig {
    pub max_files: u32,
    pub format_if_mount_failed: bool,
}

impl Default for MountConfig {
    fn default() -> Self {
        Self {
            max_files: 4,
            format_if_mount_failed: true,
        }
    }
}

/// Backend token for a mounted partition.
///
/// Not `Clone`: exactly one owner may release it, and releasing consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct MountHandle {
    raw: i32,
    path: String,
}

impl MountHandle {
    /// Wraps the backend's handle for the partition mounted at `path`.
    pub fn new(raw: i32, path: impl Into<String>) -> Self {
        Self {
            raw,
            path: path.into(),
        }
    }

    pub fn raw(&self) -> i32 {
        self.raw
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

pub trait FlashVfs {
    fn mount(
        &mut self,
        partition: &str,
        path: &str,
        config: &MountConfig,
    ) -> Result<MountHandle, HalError>;

    fn unmount(&mut self, handle: MountHandle) -> Result<(), HalError>;
}

/// Everything the adapter modules reach for.
pub trait Board {
    fn panel(&mut self) -> &mut dyn Panel;
    fn power(&mut self) -> &mut dyn Power;
    fn leds(&mut self) -> &mut dyn Leds;
    fn entropy(&mut self) -> &mut dyn Entropy;
    fn vfs(&mut self) -> &mut dyn FlashVfs;

    /// Power first, then LEDs, then the panel.
    fn init(&mut self) -> Result<(), HalError> {
        self.power().init()?;
        self.leds().init()?;
        self.panel().init()
    }
}

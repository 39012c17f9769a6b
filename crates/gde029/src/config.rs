//! Panel geometry and controller settings

use crate::error::BuilderError;
use crate::lut::Lut;

/// Gate outputs (rows) the controller can drive
pub const MAX_GATE_OUTPUTS: u16 = 320;
/// Source outputs (columns) the controller can drive
pub const MAX_SOURCE_OUTPUTS: u16 = 240;

/// Panel size in controller orientation: one row per gate, `cols` sources.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub rows: u16,
    pub cols: u16,
}

impl Dimensions {
    /// 296 gates by 128 sources
    pub const GDEH029A1: Dimensions = Dimensions {
        rows: 296,
        cols: 128,
    };

    /// `cols` must be a non-zero multiple of 8; both axes are bounded by the
    /// controller's output count.
    pub fn new(rows: u16, cols: u16) -> Result<Self, BuilderError> {
        let rows_ok = (1..=MAX_GATE_OUTPUTS).contains(&rows);
        let cols_ok = (1..=MAX_SOURCE_OUTPUTS).contains(&cols) && cols % 8 == 0;
        if !(rows_ok && cols_ok) {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    pub fn row_bytes(&self) -> usize {
        usize::from(self.cols) / 8
    }

    /// Bytes in one full frame of controller RAM
    pub fn buffer_size(&self) -> usize {
        usize::from(self.rows) * self.row_bytes()
    }
}

/// Register values written once per reset
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalogSettings {
    /// Command 0x0C phases A, B, C
    pub booster_soft_start: [u8; 3],
    /// GD/SM/TB bits of command 0x01
    pub gate_scanning: u8,
    pub border_waveform: u8,
    pub vcom: u8,
    pub dummy_line_period: u8,
    pub gate_line_width: u8,
}

impl AnalogSettings {
    /// Values from the GDEH029A1 reference init sequence
    pub const GDEH029A1: AnalogSettings = AnalogSettings {
        booster_soft_start: [0xD7, 0xD6, 0x9D],
        gate_scanning: 0x00,
        border_waveform: 0x33,
        vcom: 0xA8,
        // 4 dummy lines
        dummy_line_period: 0x1A,
        // 2us per line
        gate_line_width: 0x08,
    };
}

impl Default for AnalogSettings {
    fn default() -> Self {
        Self::GDEH029A1
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    pub dimensions: Dimensions,
    /// Loaded at reset and used when an update does not name a LUT
    pub default_lut: Lut,
    pub analog: AnalogSettings,
}

/// ```
/// use gde029::{Builder, Dimensions, Lut};
///
/// let config = Builder::new()
///     .dimensions(Dimensions::GDEH029A1)
///     .default_lut(Lut::Normal)
///     .vcom(0x9A)
///     .build()
///     .unwrap();
/// assert_eq!(config.dimensions.buffer_size(), 4736);
/// assert_eq!(config.analog.vcom, 0x9A);
/// ```
#[derive(Default)]
pub struct Builder {
    dimensions: Option<Dimensions>,
    default_lut: Lut,
    analog: AnalogSettings,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    pub fn default_lut(mut self, lut: Lut) -> Self {
        self.default_lut = lut;
        self
    }

    /// Replace every analog register value at once.
    pub fn analog(mut self, analog: AnalogSettings) -> Self {
        self.analog = analog;
        self
    }

    /// VCOM varies per glass batch; this is the setting most often tuned.
    pub fn vcom(mut self, value: u8) -> Self {
        self.analog.vcom = value;
        self
    }

    pub fn border_waveform(mut self, value: u8) -> Self {
        self.analog.border_waveform = value;
        self
    }

    pub fn build(self) -> Result<Config, BuilderError> {
        let dimensions = self.dimensions.ok_or(BuilderError::MissingDimensions)?;
        Ok(Config {
            dimensions,
            default_lut: self.default_lut,
            analog: self.analog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unaligned_columns() {
        assert_eq!(
            Dimensions::new(296, 124),
            Err(BuilderError::InvalidDimensions {
                rows: 296,
                cols: 124
            })
        );
        assert!(Dimensions::new(0, 128).is_err());
        assert!(Dimensions::new(321, 128).is_err());
        assert_eq!(Dimensions::new(296, 128), Ok(Dimensions::GDEH029A1));
    }

    #[test]
    fn badge_panel_buffer_size() {
        assert_eq!(Dimensions::GDEH029A1.row_bytes(), 16);
        assert_eq!(Dimensions::GDEH029A1.buffer_size(), 296 * 16);
    }

    #[test]
    fn builder_defaults_to_reference_settings() {
        let config = Builder::new()
            .dimensions(Dimensions::GDEH029A1)
            .border_waveform(0x01)
            .build()
            .unwrap();
        assert_eq!(config.default_lut, Lut::Full);
        assert_eq!(config.analog.vcom, AnalogSettings::GDEH029A1.vcom);
        assert_eq!(config.analog.border_waveform, 0x01);
    }
}

//! Waveform lookup tables
//!
//! The controller takes a 30-byte LUT: 20 bytes of phase voltage selection
//! followed by 10 bytes of phase timing. Shorter timing trades ghosting for
//! refresh speed.

/// Length of a waveform LUT in bytes
pub const LUT_LEN: usize = 30;

/// Selectable refresh waveform
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Lut {
    /// Full refresh, flashes the panel, no ghosting
    #[default]
    Full,
    /// Partial refresh with moderate ghosting
    Normal,
    /// Shorter partial refresh
    Faster,
    /// Shortest partial refresh, most ghosting
    Fastest,
}

impl Lut {
    /// Decode the 4-bit LUT field carried in display flags.
    ///
    /// `0` means "keep the default" and yields `None`; `1..=4` select
    /// [`Lut::Full`] through [`Lut::Fastest`]. Larger values also yield `None`.
    pub fn from_flag_field(field: u32) -> Option<Self> {
        match field {
            1 => Some(Lut::Full),
            2 => Some(Lut::Normal),
            3 => Some(Lut::Faster),
            4 => Some(Lut::Fastest),
            _ => None,
        }
    }

    /// Raw waveform bytes for this LUT
    pub fn bytes(&self) -> &'static [u8; LUT_LEN] {
        match self {
            Lut::Full => &LUT_FULL,
            Lut::Normal => &LUT_NORMAL,
            Lut::Faster => &LUT_FASTER,
            Lut::Fastest => &LUT_FASTEST,
        }
    }
}

#[rustfmt::skip]
const LUT_FULL: [u8; LUT_LEN] = [
    0x50, 0xAA, 0x55, 0xAA, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0xFF, 0xFF, 0x1F, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[rustfmt::skip]
const LUT_NORMAL: [u8; LUT_LEN] = [
    0x10, 0x18, 0x18, 0x08, 0x18, 0x18, 0x08, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x13, 0x14, 0x44, 0x12, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[rustfmt::skip]
const LUT_FASTER: [u8; LUT_LEN] = [
    0x10, 0x18, 0x18, 0x08, 0x18, 0x18, 0x08, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x0A, 0x0A, 0x22, 0x09, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[rustfmt::skip]
const LUT_FASTEST: [u8; LUT_LEN] = [
    0x10, 0x18, 0x18, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x05, 0x05, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_field_zero_keeps_default() {
        assert_eq!(Lut::from_flag_field(0), None);
        assert_eq!(Lut::from_flag_field(1), Some(Lut::Full));
        assert_eq!(Lut::from_flag_field(4), Some(Lut::Fastest));
        assert_eq!(Lut::from_flag_field(9), None);
    }

    #[test]
    fn partial_luts_are_shorter_than_full() {
        let timing = |lut: Lut| lut.bytes()[20..].iter().map(|&b| b as u32).sum::<u32>();
        assert!(timing(Lut::Normal) < timing(Lut::Full));
        assert!(timing(Lut::Faster) < timing(Lut::Normal));
        assert!(timing(Lut::Fastest) < timing(Lut::Faster));
    }
}

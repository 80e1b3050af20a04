use crate::register::{self, REGISTER_LEN, ReferenceClock, bits};

/// Read register bits, grouped by byte index.
mod read_bits {
    /// Byte 0: a station was found or the PLL locked.
    pub const READY: u8 = 0x80;
    /// Byte 0: a search hit the band limit.
    pub const BAND_LIMIT: u8 = 0x40;
    /// Byte 2: stereo pilot detected.
    pub const STEREO: u8 = 0x80;
    /// Byte 2: IF counter result.
    pub const IF_COUNTER_MASK: u8 = 0x7F;
    /// Byte 3: level ADC output, upper nibble.
    pub const LEVEL_SHIFT: u8 = 4;
    /// Byte 3: chip identification, bits 3..1.
    pub const CHIP_ID_MASK: u8 = 0x0E;
}

/// Decoded contents of the tuner's 5-byte read register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TunerStatus {
    pub ready: bool,
    pub band_limit: bool,
    pub pll: u16,
    pub stereo: bool,
    pub if_counter: u8,
    /// Signal level, 0–15.
    pub level: u8,
    pub chip_id: u8,
}

impl TunerStatus {
    pub fn from_bytes(bytes: &[u8; REGISTER_LEN]) -> Self {
        Self {
            ready: bytes[0] & read_bits::READY != 0,
            band_limit: bytes[0] & read_bits::BAND_LIMIT != 0,
            pll: (u16::from(bytes[0] & bits::PLL_HIGH_MASK) << 8) | u16::from(bytes[1]),
            stereo: bytes[2] & read_bits::STEREO != 0,
            if_counter: bytes[2] & read_bits::IF_COUNTER_MASK,
            level: bytes[3] >> read_bits::LEVEL_SHIFT,
            chip_id: (bytes[3] & read_bits::CHIP_ID_MASK) >> 1,
        }
    }

    /// Frequency the PLL is actually tuned to, in MHz.
    pub fn frequency_mhz(&self, reference: ReferenceClock) -> f64 {
        register::frequency_from_pll(self.pll, reference)
    }
}

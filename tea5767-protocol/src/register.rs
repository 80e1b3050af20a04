use std::fmt;

use crate::error::{Result, TunerError};

/// Number of bytes in a full write (and read) transfer.
pub const REGISTER_LEN: usize = 5;

/// Intermediate frequency added before the PLL division.
pub const INTERMEDIATE_FREQUENCY_HZ: u32 = 225_000;

/// Largest value the 14-bit PLL field can hold.
pub const PLL_MAX: u16 = 0x3FFF;

/// Write register bits, grouped by byte index.
pub mod bits {
    /// Byte 0: mute both channels.
    pub const MUTE: u8 = 0x80;
    /// Byte 0: PLL[13:8].
    pub const PLL_HIGH_MASK: u8 = 0x3F;
    /// Byte 2: high-side LO injection.
    pub const HIGH_SIDE_INJECTION: u8 = 0x10;
    /// Byte 3: standby.
    pub const STANDBY: u8 = 0x40;
    /// Byte 3: 32.768 kHz crystal.
    pub const XTAL_32768HZ: u8 = 0x10;
    /// Byte 4: 75 µs de-emphasis time constant.
    pub const DTC_75US: u8 = 0x40;
}

/// Reference frequency the PLL divides against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReferenceClock {
    /// 32.768 kHz watch crystal.
    #[default]
    Xtal32768Hz,
    /// 50 kHz reference derived from a 13 MHz crystal.
    Ref50kHz,
}

impl ReferenceClock {
    /// Select the reference for a clock frequency in Hz.
    pub fn from_hz(hz: u32) -> Result<Self> {
        match hz {
            32_768 => Ok(Self::Xtal32768Hz),
            50_000 => Ok(Self::Ref50kHz),
            other => Err(TunerError::UnsupportedReference(other)),
        }
    }

    /// Return the reference frequency in Hz.
    pub fn hz(self) -> u32 {
        match self {
            Self::Xtal32768Hz => 32_768,
            Self::Ref50kHz => 50_000,
        }
    }

    /// Byte 3 clock selection bits for this reference.
    fn xtal_bits(self) -> u8 {
        match self {
            Self::Xtal32768Hz => bits::XTAL_32768HZ,
            Self::Ref50kHz => 0x00,
        }
    }
}

impl fmt::Display for ReferenceClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.hz())
    }
}

/// Everything the chip's write registers depend on.
///
/// A [`RegisterImage`] is always derived from a complete `RegisterSettings`,
/// never patched from a previous image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RegisterSettings {
    pub frequency_mhz: f64,
    pub mute: bool,
    pub standby: bool,
    pub reference: ReferenceClock,
}

/// The five write-register bytes, in transfer order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RegisterImage([u8; REGISTER_LEN]);

impl RegisterImage {
    /// Wrap raw register bytes.
    pub fn from_bytes(bytes: [u8; REGISTER_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; REGISTER_LEN] {
        &self.0
    }

    /// The 14-bit PLL word carried in bytes 0 and 1.
    pub fn pll_word(&self) -> u16 {
        (u16::from(self.0[0] & bits::PLL_HIGH_MASK) << 8) | u16::from(self.0[1])
    }

    pub fn is_muted(&self) -> bool {
        self.0[0] & bits::MUTE != 0
    }

    pub fn is_standby(&self) -> bool {
        self.0[3] & bits::STANDBY != 0
    }
}

/// Compute the PLL word for a target frequency with high-side injection.
///
/// The result is not clamped: frequencies outside the band produce words
/// the chip cannot lock to, and anything past 14 bits is truncated when the
/// word is packed into the register image.
pub fn pll_word(frequency_mhz: f64, reference: ReferenceClock) -> u16 {
    let lo_hz = frequency_mhz * 1_000_000.0 + f64::from(INTERMEDIATE_FREQUENCY_HZ);
    let word = (4.0 * lo_hz / f64::from(reference.hz())).round();
    // Float-to-int casts saturate, so negative inputs become 0.
    word as u16
}

/// Recover the tuned frequency in MHz from a PLL word.
pub fn frequency_from_pll(pll: u16, reference: ReferenceClock) -> f64 {
    let lo_hz = f64::from(pll) * f64::from(reference.hz()) / 4.0;
    (lo_hz - f64::from(INTERMEDIATE_FREQUENCY_HZ)) / 1_000_000.0
}

/// Encode a full write-register image.
pub fn encode(settings: &RegisterSettings) -> RegisterImage {
    let pll = pll_word(settings.frequency_mhz, settings.reference) & PLL_MAX;

    let mut bytes = [0u8; REGISTER_LEN];
    bytes[0] = (pll >> 8) as u8 & bits::PLL_HIGH_MASK;
    if settings.mute {
        bytes[0] |= bits::MUTE;
    }
    bytes[1] = (pll & 0xFF) as u8;
    bytes[2] = bits::HIGH_SIDE_INJECTION;
    bytes[3] = settings.reference.xtal_bits();
    if settings.standby {
        bytes[3] |= bits::STANDBY;
    }
    bytes[4] = bits::DTC_75US;

    RegisterImage(bytes)
}

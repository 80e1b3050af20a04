use std::fmt;

use crate::error::{Result, TunerError};

/// Lowest tunable broadcast frequency, in tenths of a MHz.
const BAND_MIN_TENTHS: u16 = 875;
/// Highest tunable broadcast frequency, in tenths of a MHz.
const BAND_MAX_TENTHS: u16 = 1080;

/// A station frequency inside the FM broadcast band (87.5–108.0 MHz).
///
/// Stored as a count of 100 kHz steps so that repeated 0.1 MHz adjustments
/// stay exact. A `Frequency` can only be constructed inside the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Frequency(u16);

impl Frequency {
    /// Bottom of the band, 87.5 MHz.
    pub const BAND_MIN: Self = Self(BAND_MIN_TENTHS);
    /// Top of the band, 108.0 MHz.
    pub const BAND_MAX: Self = Self(BAND_MAX_TENTHS);
    /// Power-on station, 94.7 MHz.
    pub const DEFAULT_STATION: Self = Self(947);

    /// Create a `Frequency` from a count of 100 kHz steps (947 = 94.7 MHz).
    pub fn from_tenths(tenths: u16) -> Result<Self> {
        if !(BAND_MIN_TENTHS..=BAND_MAX_TENTHS).contains(&tenths) {
            return Err(TunerError::FrequencyOutOfBand(f64::from(tenths) / 10.0));
        }
        Ok(Self(tenths))
    }

    /// Create a `Frequency` from a value in MHz, rounded to the nearest 0.1 MHz.
    pub fn from_mhz(mhz: f64) -> Result<Self> {
        let tenths = (mhz * 10.0).round();
        if !tenths.is_finite()
            || tenths < f64::from(BAND_MIN_TENTHS)
            || tenths > f64::from(BAND_MAX_TENTHS)
        {
            return Err(TunerError::FrequencyOutOfBand(mhz));
        }
        Ok(Self(tenths as u16))
    }

    /// Return the frequency in 100 kHz steps.
    pub fn tenths(self) -> u16 {
        self.0
    }

    /// Return the frequency in MHz.
    pub fn mhz(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Move by `delta` tenths of a MHz.
    ///
    /// Returns `None` when the result would leave the band; the band never wraps.
    pub fn offset(self, delta: i16) -> Option<Self> {
        let next = i32::from(self.0) + i32::from(delta);
        if (i32::from(BAND_MIN_TENTHS)..=i32::from(BAND_MAX_TENTHS)).contains(&next) {
            Some(Self(next as u16))
        } else {
            None
        }
    }
}

impl Default for Frequency {
    fn default() -> Self {
        Self::DEFAULT_STATION
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tenths() {
        let freq = Frequency::from_tenths(947).unwrap();
        assert_eq!(freq.tenths(), 947);
        assert_eq!(freq, Frequency::DEFAULT_STATION);
    }

    #[test]
    fn test_from_tenths_out_of_band() {
        assert!(Frequency::from_tenths(874).is_err());
        assert!(Frequency::from_tenths(1081).is_err());
        assert!(Frequency::from_tenths(875).is_ok());
        assert!(Frequency::from_tenths(1080).is_ok());
    }

    #[test]
    fn test_from_mhz_rounds_to_step() {
        assert_eq!(Frequency::from_mhz(95.0).unwrap().tenths(), 950);
        assert_eq!(Frequency::from_mhz(94.73).unwrap().tenths(), 947);
        assert_eq!(Frequency::from_mhz(100.06).unwrap().tenths(), 1001);
    }

    #[test]
    fn test_from_mhz_out_of_band() {
        assert!(matches!(
            Frequency::from_mhz(76.0),
            Err(TunerError::FrequencyOutOfBand(_))
        ));
        assert!(Frequency::from_mhz(108.1).is_err());
        assert!(Frequency::from_mhz(f64::NAN).is_err());
    }

    #[test]
    fn test_offset_within_band() {
        let freq = Frequency::from_tenths(947).unwrap();
        assert_eq!(freq.offset(3).unwrap().tenths(), 950);
        assert_eq!(freq.offset(-10).unwrap().tenths(), 937);
    }

    #[test]
    fn test_offset_stops_at_edges() {
        assert_eq!(Frequency::BAND_MIN.offset(-1), None);
        assert_eq!(Frequency::BAND_MAX.offset(1), None);
        let near_top = Frequency::from_tenths(1075).unwrap();
        assert_eq!(near_top.offset(10), None);
        assert_eq!(near_top.offset(5), Some(Frequency::BAND_MAX));
    }

    #[test]
    fn test_display() {
        assert_eq!(Frequency::DEFAULT_STATION.to_string(), "94.7");
        assert_eq!(Frequency::BAND_MAX.to_string(), "108.0");
        assert_eq!(Frequency::BAND_MIN.to_string(), "87.5");
    }

    #[test]
    fn test_accessors() {
        let freq = Frequency::from_tenths(1003).unwrap();
        assert!((freq.mhz() - 100.3).abs() < 1e-9);
    }
}

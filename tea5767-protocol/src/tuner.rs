use std::io;

use log::{debug, trace};

use crate::error::{Result, TunerError};
use crate::frequency::Frequency;
use crate::register::{self, REGISTER_LEN, ReferenceClock, RegisterImage, RegisterSettings};
use crate::status::TunerStatus;
use crate::transport::Transport;

/// Factory I2C address of the TEA5767.
pub const DEFAULT_ADDRESS: u8 = 0x60;

/// Configuration for a tuner session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TunerConfig {
    /// Slave address of the chip on the bus.
    pub address: u8,
    /// Reference clock wired to the chip.
    pub reference: ReferenceClock,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            reference: ReferenceClock::Xtal32768Hz,
        }
    }
}

/// A session with one TEA5767 over a two-wire transport.
///
/// The session keeps the last settings it successfully wrote, so a mute or
/// standby change survives later re-tunes and vice versa. Every operation
/// re-encodes and writes all five register bytes.
pub struct Tuner {
    transport: Box<dyn Transport>,
    address: u8,
    frequency: Frequency,
    settings: RegisterSettings,
    image: RegisterImage,
}

impl Tuner {
    /// Address the chip and tune it to `initial`.
    ///
    /// Fails with [`TunerError::DeviceUnreachable`] if the slave address
    /// cannot be selected.
    pub fn initialize(
        mut transport: Box<dyn Transport>,
        config: TunerConfig,
        initial: Frequency,
    ) -> Result<Self> {
        transport
            .address_device(config.address)
            .map_err(|source| TunerError::DeviceUnreachable {
                address: config.address,
                source,
            })?;

        let mut tuner = Self {
            transport,
            address: config.address,
            frequency: initial,
            settings: RegisterSettings {
                frequency_mhz: initial.mhz(),
                mute: false,
                standby: false,
                reference: config.reference,
            },
            image: RegisterImage::default(),
        };
        tuner.tune(initial)?;
        debug!("tuner at {:#04x} initialized on {} MHz", config.address, initial);
        Ok(tuner)
    }

    /// Tune to `frequency`, keeping the current mute and standby state.
    pub fn tune(&mut self, frequency: Frequency) -> Result<()> {
        self.write_settings(RegisterSettings {
            frequency_mhz: frequency.mhz(),
            ..self.settings
        })?;
        self.frequency = frequency;
        Ok(())
    }

    pub fn set_mute(&mut self, mute: bool) -> Result<()> {
        self.write_settings(RegisterSettings {
            mute,
            ..self.settings
        })
    }

    pub fn set_standby(&mut self, standby: bool) -> Result<()> {
        self.write_settings(RegisterSettings {
            standby,
            ..self.settings
        })
    }

    pub fn mute(&mut self) -> Result<()> {
        self.set_mute(true)
    }

    pub fn unmute(&mut self) -> Result<()> {
        self.set_mute(false)
    }

    pub fn standby_on(&mut self) -> Result<()> {
        self.set_standby(true)
    }

    pub fn standby_off(&mut self) -> Result<()> {
        self.set_standby(false)
    }

    /// Switch the reference clock used for the PLL and rewrite the registers.
    pub fn set_reference_clock(&mut self, reference: ReferenceClock) -> Result<()> {
        self.write_settings(RegisterSettings {
            reference,
            ..self.settings
        })
    }

    /// Read and decode the chip's status register.
    pub fn read_status(&mut self) -> Result<TunerStatus> {
        let mut buf = [0u8; REGISTER_LEN];
        let read = self
            .transport
            .read(&mut buf)
            .map_err(TunerError::TransportReadFailed)?;
        if read != REGISTER_LEN {
            return Err(TunerError::TransportReadFailed(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("read {read} of {REGISTER_LEN} status bytes"),
            )));
        }
        trace!("RX: {:02X?}", buf);
        Ok(TunerStatus::from_bytes(&buf))
    }

    /// Encode `settings`, write the whole image in one transfer, and keep it
    /// only once the chip has accepted every byte.
    fn write_settings(&mut self, settings: RegisterSettings) -> Result<()> {
        let image = register::encode(&settings);
        let bytes = image.as_bytes();

        trace!("TX: {:02X?}", bytes);
        let written = self
            .transport
            .write(bytes)
            .map_err(TunerError::TransportWriteFailed)?;
        if written != bytes.len() {
            return Err(TunerError::TransportWriteFailed(io::Error::new(
                io::ErrorKind::WriteZero,
                format!("wrote {written} of {} register bytes", bytes.len()),
            )));
        }

        self.settings = settings;
        self.image = image;
        Ok(())
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    /// Last frequency successfully tuned.
    pub fn frequency(&self) -> Frequency {
        self.frequency
    }

    pub fn reference_clock(&self) -> ReferenceClock {
        self.settings.reference
    }

    pub fn is_muted(&self) -> bool {
        self.settings.mute
    }

    pub fn is_standby(&self) -> bool {
        self.settings.standby
    }

    /// The register image last written to the chip.
    pub fn register_image(&self) -> &RegisterImage {
        &self.image
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Records every transfer; optionally truncates writes or fails addressing.
    #[derive(Clone, Default)]
    struct MockTransport {
        writes: Arc<Mutex<Vec<Vec<u8>>>>,
        addressed: Arc<Mutex<Option<u8>>>,
        reject_address: bool,
        short_write: Arc<Mutex<bool>>,
        status: [u8; REGISTER_LEN],
        status_len: usize,
    }

    impl Transport for MockTransport {
        fn address_device(&mut self, address: u8) -> io::Result<()> {
            if self.reject_address {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no ACK from slave"));
            }
            *self.addressed.lock().unwrap() = Some(address);
            Ok(())
        }

        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.writes.lock().unwrap().push(buf.to_vec());
            if *self.short_write.lock().unwrap() {
                Ok(buf.len() - 1)
            } else {
                Ok(buf.len())
            }
        }

        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.status_len.min(buf.len());
            buf[..n].copy_from_slice(&self.status[..n]);
            Ok(n)
        }
    }

    fn freq(tenths: u16) -> Frequency {
        Frequency::from_tenths(tenths).unwrap()
    }

    fn open(mock: &MockTransport) -> Tuner {
        Tuner::initialize(Box::new(mock.clone()), TunerConfig::default(), freq(947)).unwrap()
    }

    #[test]
    fn test_initialize_addresses_and_tunes() {
        let mock = MockTransport::default();
        let tuner = open(&mock);
        assert_eq!(*mock.addressed.lock().unwrap(), Some(DEFAULT_ADDRESS));
        let writes = mock.writes.lock().unwrap();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].as_slice(), tuner.register_image().as_bytes());
        assert_eq!(tuner.frequency(), freq(947));
    }

    #[test]
    fn test_initialize_unreachable() {
        let mock = MockTransport {
            reject_address: true,
            ..Default::default()
        };
        let result = Tuner::initialize(Box::new(mock.clone()), TunerConfig::default(), freq(947));
        assert!(matches!(
            result,
            Err(TunerError::DeviceUnreachable { address: 0x60, .. })
        ));
        assert!(mock.writes.lock().unwrap().is_empty());
    }

    #[test]
    fn test_tune_writes_full_image_once() {
        let mock = MockTransport::default();
        let mut tuner = open(&mock);
        tuner.tune(freq(950)).unwrap();
        let writes = mock.writes.lock().unwrap();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[1], vec![0x2D, 0x68, 0x10, 0x10, 0x40]);
    }

    #[test]
    fn test_mute_survives_retune() {
        let mock = MockTransport::default();
        let mut tuner = open(&mock);
        tuner.tune(freq(950)).unwrap();
        tuner.set_mute(true).unwrap();
        tuner.tune(freq(1013)).unwrap();
        assert!(tuner.register_image().is_muted());
        let last = mock.writes.lock().unwrap().last().cloned().unwrap();
        assert_eq!(last[0] & 0x80, 0x80);
        assert_eq!(
            tuner.register_image().pll_word(),
            register::pll_word(101.3, ReferenceClock::Xtal32768Hz)
        );
    }

    #[test]
    fn test_mute_rewrites_whole_buffer() {
        let mock = MockTransport::default();
        let mut tuner = open(&mock);
        tuner.tune(freq(950)).unwrap();
        tuner.mute().unwrap();
        let writes = mock.writes.lock().unwrap();
        let last = writes.last().unwrap();
        assert_eq!(last, &vec![0xAD, 0x68, 0x10, 0x10, 0x40]);
    }

    #[test]
    fn test_standby_and_mute_are_independent() {
        let mock = MockTransport::default();
        let mut tuner = open(&mock);
        tuner.standby_on().unwrap();
        tuner.mute().unwrap();
        assert!(tuner.register_image().is_standby());
        assert!(tuner.register_image().is_muted());

        tuner.unmute().unwrap();
        assert!(tuner.register_image().is_standby());
        assert!(!tuner.register_image().is_muted());

        tuner.standby_off().unwrap();
        tuner.tune(freq(900)).unwrap();
        assert!(!tuner.is_standby());
        assert!(!tuner.register_image().is_standby());
    }

    #[test]
    fn test_short_write_keeps_last_good_image() {
        let mock = MockTransport::default();
        let mut tuner = open(&mock);
        let before = *tuner.register_image();

        *mock.short_write.lock().unwrap() = true;
        let err = tuner.tune(freq(1000)).unwrap_err();
        assert!(matches!(err, TunerError::TransportWriteFailed(_)));
        assert_eq!(*tuner.register_image(), before);
        assert_eq!(tuner.frequency(), freq(947));

        let err = tuner.mute().unwrap_err();
        assert!(matches!(err, TunerError::TransportWriteFailed(_)));
        assert!(!tuner.is_muted());
    }

    #[test]
    fn test_reference_clock_change() {
        let mock = MockTransport::default();
        let mut tuner = open(&mock);
        tuner.tune(freq(950)).unwrap();
        tuner.set_reference_clock(ReferenceClock::Ref50kHz).unwrap();
        assert_eq!(tuner.reference_clock(), ReferenceClock::Ref50kHz);
        assert_eq!(tuner.register_image().pll_word(), 7_618);
        assert_eq!(tuner.register_image().as_bytes()[3], 0x00);
    }

    #[test]
    fn test_read_status() {
        let mock = MockTransport {
            status: [0xAD, 0x68, 0xB7, 0xB0, 0x00],
            status_len: REGISTER_LEN,
            ..Default::default()
        };
        let mut tuner = open(&mock);
        let status = tuner.read_status().unwrap();
        assert!(status.ready);
        assert!(status.stereo);
        assert_eq!(status.level, 11);
    }

    #[test]
    fn test_read_status_short() {
        let mock = MockTransport {
            status_len: 2,
            ..Default::default()
        };
        let mut tuner = open(&mock);
        assert!(matches!(
            tuner.read_status(),
            Err(TunerError::TransportReadFailed(_))
        ));
    }
}

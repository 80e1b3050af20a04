use std::io;
use std::path::Path;

use i2cdev::core::I2CDevice;
use i2cdev::linux::LinuxI2CDevice;
use log::{debug, info};

use crate::error::{Result, TunerError};
use crate::tuner::DEFAULT_ADDRESS;

use super::Transport;

/// Default bus on the BeagleBone header pins P9_19/P9_20.
pub const DEFAULT_BUS: &str = "/dev/i2c-2";

/// A transport backed by a Linux i2c-dev character device.
pub struct I2cTransport {
    device: LinuxI2CDevice,
}

impl I2cTransport {
    /// Open an i2c-dev bus such as `/dev/i2c-2`.
    ///
    /// The handle starts out pointed at the factory tuner address;
    /// [`Transport::address_device`] retargets it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let device = LinuxI2CDevice::new(path, u16::from(DEFAULT_ADDRESS))
            .map_err(|e| TunerError::Io(io::Error::from(e)))?;
        info!("opened I2C bus {}", path.display());
        Ok(Self { device })
    }
}

impl Transport for I2cTransport {
    fn address_device(&mut self, address: u8) -> io::Result<()> {
        self.device.set_slave_address(u16::from(address))?;
        debug!("addressed I2C slave {:#04x}", address);
        Ok(())
    }

    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        I2CDevice::write(&mut self.device, buf)?;
        Ok(buf.len())
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        I2CDevice::read(&mut self.device, buf)?;
        Ok(buf.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_bus() {
        let dir = tempfile::tempdir().unwrap();
        let result = I2cTransport::open(dir.path().join("i2c-9"));
        match result {
            Err(TunerError::Io(e)) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            Err(e) => panic!("unexpected error: {e}"),
            Ok(_) => panic!("opened a bus that does not exist"),
        }
    }

    #[test]
    fn test_open_regular_file_fails() {
        // A plain file accepts the open but rejects the slave-address ioctl.
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(matches!(I2cTransport::open(file.path()), Err(TunerError::Io(_))));
    }
}

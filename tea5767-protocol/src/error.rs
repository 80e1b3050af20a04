use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TunerError>;

#[derive(Debug, Error)]
pub enum TunerError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("tuner at address {address:#04x} unreachable: {source}")]
    DeviceUnreachable {
        address: u8,
        #[source]
        source: io::Error,
    },

    #[error("register write failed: {0}")]
    TransportWriteFailed(#[source] io::Error),

    #[error("status read failed: {0}")]
    TransportReadFailed(#[source] io::Error),

    #[error("frequency out of band: {0} MHz")]
    FrequencyOutOfBand(f64),

    #[error("unsupported reference clock: {0} Hz")]
    UnsupportedReference(u32),
}

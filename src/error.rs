use std::io;

use tea5767_protocol::TunerError;
use thiserror::Error;

use crate::controls::Button;

pub type Result<T> = std::result::Result<T, RadioError>;

#[derive(Debug, Error)]
pub enum RadioError {
    #[error("tuner error: {0}")]
    Tuner(#[from] TunerError),

    #[error("{button} button (line {line}) read failed: {source}")]
    InputReadFailed {
        button: Button,
        line: u32,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to spawn {name} thread: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },
}

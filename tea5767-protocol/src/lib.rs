pub mod error;
pub mod frequency;
pub mod register;
pub mod status;
pub mod transport;
pub mod tuner;

pub use error::{Result, TunerError};
pub use frequency::Frequency;
pub use register::{ReferenceClock, RegisterImage, RegisterSettings};
pub use status::TunerStatus;
pub use transport::Transport;
pub use tuner::{Tuner, TunerConfig};

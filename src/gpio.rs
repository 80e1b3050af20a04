use std::fmt;
use std::io;

use log::trace;
use sysfs_gpio::Pin;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
}

impl From<Direction> for sysfs_gpio::Direction {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::In => Self::In,
            Direction::Out => Self::Out,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => f.write_str("in"),
            Self::Out => f.write_str("out"),
        }
    }
}

/// Line-level digital I/O.
///
/// Methods take `&self` so one driver can be shared by every button thread.
pub trait LineIo: Send + Sync {
    fn set_direction(&self, line: u32, direction: Direction) -> io::Result<()>;

    /// Returns `true` when the line reads high.
    fn read_level(&self, line: u32) -> io::Result<bool>;

    fn write_level(&self, line: u32, high: bool) -> io::Result<()>;
}

/// GPIO lines exported through `/sys/class/gpio`.
///
/// Lines must already be exported. Each call opens and closes the line's
/// attribute file, so no descriptor is held between polls.
#[derive(Debug, Clone, Copy, Default)]
pub struct SysfsGpio;

fn pin(line: u32) -> Pin {
    Pin::new(u64::from(line))
}

fn into_io(e: sysfs_gpio::Error) -> io::Error {
    match e {
        sysfs_gpio::Error::Io(e) => e,
        other => io::Error::other(other.to_string()),
    }
}

impl LineIo for SysfsGpio {
    fn set_direction(&self, line: u32, direction: Direction) -> io::Result<()> {
        pin(line).set_direction(direction.into()).map_err(into_io)
    }

    fn read_level(&self, line: u32) -> io::Result<bool> {
        let value = pin(line).get_value().map_err(into_io)?;
        trace!("gpio{line} = {value}");
        Ok(value != 0)
    }

    fn write_level(&self, line: u32, high: bool) -> io::Result<()> {
        pin(line).set_value(u8::from(high)).map_err(into_io)
    }
}

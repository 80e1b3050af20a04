use std::path::PathBuf;
use std::time::Duration;

use tea5767_protocol::transport::i2c::DEFAULT_BUS;
use tea5767_protocol::tuner::DEFAULT_ADDRESS;
use tea5767_protocol::{Frequency, ReferenceClock, TunerConfig};

use crate::controls::Button;
use crate::error::{RadioError, Result};
use crate::sched::RealtimePriority;

/// GPIO line wired to each button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonLines {
    pub audio: u32,
    pub digit: u32,
    pub decrease: u32,
    pub increase: u32,
    pub commit: u32,
}

impl ButtonLines {
    pub fn line(&self, button: Button) -> u32 {
        match button {
            Button::Audio => self.audio,
            Button::Digit => self.digit,
            Button::Decrease => self.decrease,
            Button::Increase => self.increase,
            Button::Commit => self.commit,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Button, u32)> + '_ {
        Button::ALL.into_iter().map(|b| (b, self.line(b)))
    }
}

impl Default for ButtonLines {
    /// BeagleBone header pins P9_24, P9_26, P9_18, P9_27, P9_12.
    fn default() -> Self {
        Self {
            audio: 15,
            digit: 14,
            decrease: 4,
            increase: 115,
            commit: 60,
        }
    }
}

/// Startup configuration for the receiver.
#[derive(Debug, Clone)]
pub struct RadioConfig {
    /// i2c-dev bus the tuner hangs off.
    pub i2c_bus: PathBuf,
    pub device_address: u8,
    pub initial_frequency: Frequency,
    /// Reference clock in Hz (32768 or 50000).
    pub reference_clock_hz: u32,
    /// Button sampling period.
    pub poll_interval: Duration,
    pub buttons: ButtonLines,
    /// `SCHED_FIFO` priority of the button threads.
    pub input_priority: i32,
    /// `SCHED_FIFO` priority of the dispatcher and display threads.
    pub control_priority: i32,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            i2c_bus: PathBuf::from(DEFAULT_BUS),
            device_address: DEFAULT_ADDRESS,
            initial_frequency: Frequency::DEFAULT_STATION,
            reference_clock_hz: 32_768,
            poll_interval: Duration::from_millis(10),
            buttons: ButtonLines::default(),
            input_priority: 50,
            control_priority: 20,
        }
    }
}

impl RadioConfig {
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval.is_zero() {
            return Err(RadioError::InvalidConfig("poll interval must be non-zero".into()));
        }
        let input = RealtimePriority::new(self.input_priority)?;
        let control = RealtimePriority::new(self.control_priority)?;
        if input <= control {
            return Err(RadioError::InvalidConfig(format!(
                "input priority {} must exceed control priority {}",
                input.get(),
                control.get()
            )));
        }
        let lines: Vec<(Button, u32)> = self.buttons.iter().collect();
        for (i, (a, line)) in lines.iter().enumerate() {
            if let Some((b, _)) = lines[i + 1..].iter().find(|(_, other)| other == line) {
                return Err(RadioError::InvalidConfig(format!(
                    "{a} and {b} buttons share line {line}"
                )));
            }
        }
        self.reference_clock()?;
        Ok(())
    }

    pub fn reference_clock(&self) -> Result<ReferenceClock> {
        Ok(ReferenceClock::from_hz(self.reference_clock_hz)?)
    }

    pub fn tuner_config(&self) -> Result<TunerConfig> {
        Ok(TunerConfig {
            address: self.device_address,
            reference: self.reference_clock()?,
        })
    }

    pub fn input_priority(&self) -> Result<RealtimePriority> {
        RealtimePriority::new(self.input_priority)
    }

    pub fn control_priority(&self) -> Result<RealtimePriority> {
        RealtimePriority::new(self.control_priority)
    }
}

use std::fmt;
use std::sync::Mutex;

use tea5767_protocol::Frequency;

use crate::lock::lock_or_recover;

/// A 1.0 MHz step up is only taken from strictly below 107.0 MHz.
const ONES_STEP_UP_LIMIT: u16 = 1070;

/// Which decimal place the adjustment buttons move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Digit {
    /// 0.1 MHz steps.
    #[default]
    Tenths,
    /// 1.0 MHz steps.
    Ones,
}

impl Digit {
    pub fn toggle(self) -> Self {
        match self {
            Self::Tenths => Self::Ones,
            Self::Ones => Self::Tenths,
        }
    }

    /// Step size in tenths of a MHz.
    pub fn step_tenths(self) -> i16 {
        match self {
            Self::Tenths => 1,
            Self::Ones => 10,
        }
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tenths => write!(f, "0.1 MHz"),
            Self::Ones => write!(f, "1.0 MHz"),
        }
    }
}

/// Direction of a frequency adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Down,
    Up,
}

/// Shared tuning state.
///
/// Each field has its own lock; there is no joint snapshot. The only place
/// two locks are held together is [`TuningState::adjust`], which always takes
/// the digit lock before the frequency lock.
#[derive(Debug)]
pub struct TuningState {
    frequency: Mutex<Frequency>,
    audio_enabled: Mutex<bool>,
    digit: Mutex<Digit>,
}

impl TuningState {
    /// Start on `frequency` with audio on and the tenths digit selected.
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency: Mutex::new(frequency),
            audio_enabled: Mutex::new(true),
            digit: Mutex::new(Digit::Tenths),
        }
    }

    /// The staged frequency.
    pub fn frequency(&self) -> Frequency {
        *lock_or_recover(&self.frequency, "frequency")
    }

    pub fn audio_enabled(&self) -> bool {
        *lock_or_recover(&self.audio_enabled, "audio")
    }

    pub fn active_digit(&self) -> Digit {
        *lock_or_recover(&self.digit, "digit")
    }

    /// Flip audio on/off and return the new value.
    pub fn toggle_audio(&self) -> bool {
        let mut audio = lock_or_recover(&self.audio_enabled, "audio");
        *audio = !*audio;
        *audio
    }

    /// Switch the adjustment digit and return the new selection.
    pub fn toggle_digit(&self) -> Digit {
        let mut digit = lock_or_recover(&self.digit, "digit");
        *digit = digit.toggle();
        *digit
    }

    /// Move the staged frequency one step of the active digit.
    ///
    /// A step that would leave the band is ignored, as is a 1.0 MHz step up
    /// from 107.0 MHz or higher. Returns the staged frequency after the
    /// adjustment.
    pub fn adjust(&self, step: Step) -> Frequency {
        let digit = lock_or_recover(&self.digit, "digit");
        let mut frequency = lock_or_recover(&self.frequency, "frequency");
        let delta = match step {
            Step::Down => -digit.step_tenths(),
            Step::Up => digit.step_tenths(),
        };
        if step == Step::Up && *digit == Digit::Ones && frequency.tenths() >= ONES_STEP_UP_LIMIT {
            return *frequency;
        }
        if let Some(next) = frequency.offset(delta) {
            *frequency = next;
        }
        *frequency
    }
}

impl Default for TuningState {
    fn default() -> Self {
        Self::new(Frequency::DEFAULT_STATION)
    }
}

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use log::debug;

use crate::controls::{Button, Controls};
use crate::error::RadioError;
use crate::gpio::LineIo;

/// Release-edge detector.
///
/// A press registers when the line goes from pressed to released, so a
/// held button fires exactly once, on let-go.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReleaseDetector {
    last_pressed: bool,
}

impl ReleaseDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one sample. Returns `true` on a pressed-to-released transition.
    pub fn sample(&mut self, pressed: bool) -> bool {
        let released = self.last_pressed && !pressed;
        self.last_pressed = pressed;
        released
    }
}

/// Polls one input line at a fixed interval and fires its button action.
pub struct ButtonPoller {
    button: Button,
    line: u32,
    lines: Arc<dyn LineIo>,
    detector: ReleaseDetector,
    interval: Duration,
}

impl ButtonPoller {
    pub fn new(button: Button, line: u32, lines: Arc<dyn LineIo>, interval: Duration) -> Self {
        Self {
            button,
            line,
            lines,
            detector: ReleaseDetector::new(),
            interval,
        }
    }

    /// Sample one tick. Returns whether a press completed.
    pub fn poll(&mut self, controls: &Controls) -> Result<bool, RadioError> {
        let pressed = self
            .lines
            .read_level(self.line)
            .map_err(|source| RadioError::InputReadFailed {
                button: self.button,
                line: self.line,
                source,
            })?;
        if !self.detector.sample(pressed) {
            return Ok(false);
        }
        debug!("{} button released", self.button);
        controls.press(self.button);
        Ok(true)
    }

    /// Poll until the line can no longer be read.
    pub fn run(mut self, controls: &Controls) -> RadioError {
        loop {
            if let Err(e) = self.poll(controls) {
                return e;
            }
            thread::sleep(self.interval);
        }
    }
}

use std::fmt;
use std::sync::Arc;

use log::{debug, info};

use crate::display::StatusLine;
use crate::mailbox::{CommandMailbox, PendingCommand};
use crate::state::{Step, TuningState};

/// The five front-panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Toggle mute.
    Audio,
    /// Switch the adjustment digit between tenths and ones.
    Digit,
    /// Lower the staged frequency.
    Decrease,
    /// Raise the staged frequency.
    Increase,
    /// Tune the chip to the staged frequency.
    Commit,
}

impl Button {
    pub const ALL: [Button; 5] = [
        Button::Audio,
        Button::Digit,
        Button::Decrease,
        Button::Increase,
        Button::Commit,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Audio => "audio",
            Self::Digit => "digit",
            Self::Decrease => "decrease",
            Self::Increase => "increase",
            Self::Commit => "commit",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What each completed button press does.
///
/// Shared by all button threads. Adjustments only touch the tuning state;
/// audio and commit presses also hand a command to the dispatcher.
#[derive(Clone)]
pub struct Controls {
    state: Arc<TuningState>,
    commands: Arc<CommandMailbox>,
    status: Arc<dyn StatusLine>,
}

impl Controls {
    pub fn new(
        state: Arc<TuningState>,
        commands: Arc<CommandMailbox>,
        status: Arc<dyn StatusLine>,
    ) -> Self {
        Self {
            state,
            commands,
            status,
        }
    }

    pub fn press(&self, button: Button) {
        match button {
            Button::Audio => {
                let enabled = self.state.toggle_audio();
                info!("audio {}", if enabled { "on" } else { "muted" });
                self.post(PendingCommand::CommitAudio);
            }
            Button::Digit => {
                let digit = self.state.toggle_digit();
                debug!("adjusting in {digit} steps");
            }
            Button::Decrease => self.adjust(Step::Down),
            Button::Increase => self.adjust(Step::Up),
            Button::Commit => self.post(PendingCommand::CommitTune),
        }
    }

    fn adjust(&self, step: Step) {
        let staged = self.state.adjust(step);
        self.status.staged(staged);
    }

    fn post(&self, command: PendingCommand) {
        if let Some(replaced) = self.commands.post(command) {
            debug!("pending {replaced} command replaced by {command}");
        }
    }
}

use std::sync::Arc;

use log::{debug, error, info, warn};
use tea5767_protocol::{Transport, Tuner, TunerConfig};

use crate::display::DisplayFlag;
use crate::error::Result;
use crate::mailbox::{CommandMailbox, PendingCommand};
use crate::state::TuningState;

/// The only thread that talks to the tuner.
///
/// Blocks on the command mailbox, applies one command per wake-up, and then
/// raises the display flag whether or not the command succeeded.
pub struct Dispatcher {
    tuner: Tuner,
    state: Arc<TuningState>,
    commands: Arc<CommandMailbox>,
    display: Arc<DisplayFlag>,
}

impl Dispatcher {
    /// Open a tuner session on the current staged frequency.
    pub fn start(
        transport: Box<dyn Transport>,
        config: TunerConfig,
        state: Arc<TuningState>,
        commands: Arc<CommandMailbox>,
        display: Arc<DisplayFlag>,
    ) -> Result<Self> {
        let tuner = Tuner::initialize(transport, config, state.frequency())?;
        info!("tuner ready on {} MHz", tuner.frequency());
        Ok(Self {
            tuner,
            state,
            commands,
            display,
        })
    }

    /// Serve commands forever.
    pub fn run(mut self) {
        loop {
            self.dispatch_next();
        }
    }

    /// Wait for one command, apply it, and notify the display.
    pub fn dispatch_next(&mut self) -> PendingCommand {
        let command = self.commands.take();
        self.apply(command);
        self.display.post(());
        command
    }

    /// State is read before any bus traffic so no state lock is held across I/O.
    fn apply(&mut self, command: PendingCommand) {
        match command {
            PendingCommand::CommitTune => {
                let frequency = self.state.frequency();
                match self.tuner.tune(frequency) {
                    Ok(()) => {
                        info!("tuned to {frequency} MHz");
                        self.log_reception();
                    }
                    Err(e) => error!("tune to {frequency} MHz failed: {e}"),
                }
            }
            PendingCommand::CommitAudio => {
                let mute = !self.state.audio_enabled();
                match self.tuner.set_mute(mute) {
                    Ok(()) => info!("audio {}", if mute { "muted" } else { "on" }),
                    Err(e) => error!("audio change failed: {e}"),
                }
            }
        }
    }

    fn log_reception(&mut self) {
        match self.tuner.read_status() {
            Ok(status) => debug!(
                "reception: level {}/15, {}, IF {}",
                status.level,
                if status.stereo { "stereo" } else { "mono" },
                status.if_counter
            ),
            Err(e) => warn!("status read failed: {e}"),
        }
    }

    pub fn tuner(&self) -> &Tuner {
        &self.tuner
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use tea5767_protocol::{Frequency, TunerError};

    use super::*;
    use crate::state::Step;

    #[derive(Default)]
    struct Bus {
        writes: Vec<Vec<u8>>,
        fail_writes: bool,
    }

    struct MockTransport {
        bus: Arc<Mutex<Bus>>,
        reachable: bool,
    }

    impl Transport for MockTransport {
        fn address_device(&mut self, _address: u8) -> io::Result<()> {
            if self.reachable {
                Ok(())
            } else {
                Err(io::Error::new(io::ErrorKind::NotFound, "no ACK"))
            }
        }

        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            let mut bus = self.bus.lock().unwrap();
            if bus.fail_writes {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "bus fault"));
            }
            bus.writes.push(buf.to_vec());
            Ok(buf.len())
        }

        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            buf.copy_from_slice(&[0x2D, 0x68, 0xB0, 0xA0, 0x00]);
            Ok(buf.len())
        }
    }

    struct Fixture {
        bus: Arc<Mutex<Bus>>,
        state: Arc<TuningState>,
        commands: Arc<CommandMailbox>,
        display: Arc<DisplayFlag>,
        dispatcher: Dispatcher,
    }

    fn fixture() -> Fixture {
        let bus = Arc::new(Mutex::new(Bus::default()));
        let state = Arc::new(TuningState::default());
        let commands = Arc::new(CommandMailbox::new("command"));
        let display = Arc::new(DisplayFlag::new("display"));
        let dispatcher = Dispatcher::start(
            Box::new(MockTransport {
                bus: Arc::clone(&bus),
                reachable: true,
            }),
            TunerConfig::default(),
            Arc::clone(&state),
            Arc::clone(&commands),
            Arc::clone(&display),
        )
        .unwrap();
        Fixture {
            bus,
            state,
            commands,
            display,
            dispatcher,
        }
    }

    fn last_write(bus: &Mutex<Bus>) -> Vec<u8> {
        bus.lock().unwrap().writes.last().cloned().unwrap()
    }

    #[test]
    fn test_start_tunes_initial_frequency() {
        let f = fixture();
        assert_eq!(f.bus.lock().unwrap().writes.len(), 1);
        assert_eq!(f.dispatcher.tuner().frequency(), Frequency::DEFAULT_STATION);
        assert!(!f.display.is_pending());
    }

    #[test]
    fn test_start_unreachable() {
        let err = Dispatcher::start(
            Box::new(MockTransport {
                bus: Arc::default(),
                reachable: false,
            }),
            TunerConfig::default(),
            Arc::new(TuningState::default()),
            Arc::new(CommandMailbox::new("command")),
            Arc::new(DisplayFlag::new("display")),
        )
        .err()
        .unwrap();
        assert!(matches!(
            err,
            crate::error::RadioError::Tuner(TunerError::DeviceUnreachable { address: 0x60, .. })
        ));
    }

    #[test]
    fn test_commit_tune_writes_pll() {
        let mut f = fixture();
        for _ in 0..3 {
            f.state.adjust(Step::Up);
        }
        f.commands.post(PendingCommand::CommitTune);
        assert_eq!(f.dispatcher.dispatch_next(), PendingCommand::CommitTune);

        let pll = (4.0 * (95_000_000.0 + 225_000.0) / 32_768.0_f64).round() as u16;
        let bytes = last_write(&f.bus);
        assert_eq!(u16::from(bytes[0] & 0x3F) << 8 | u16::from(bytes[1]), pll);
        assert_eq!(bytes, [0x2D, 0x68, 0x10, 0x10, 0x40]);
        assert!(f.display.is_pending());
    }

    #[test]
    fn test_commit_audio_sets_mute() {
        let mut f = fixture();
        f.state.toggle_audio();
        f.commands.post(PendingCommand::CommitAudio);
        f.dispatcher.dispatch_next();
        assert_ne!(last_write(&f.bus)[0] & 0x80, 0);
        assert!(f.dispatcher.tuner().is_muted());

        f.state.toggle_audio();
        f.commands.post(PendingCommand::CommitAudio);
        f.dispatcher.dispatch_next();
        assert_eq!(last_write(&f.bus)[0] & 0x80, 0);
    }

    #[test]
    fn test_mute_survives_retune() {
        let mut f = fixture();
        f.state.toggle_audio();
        f.commands.post(PendingCommand::CommitAudio);
        f.dispatcher.dispatch_next();
        f.state.adjust(Step::Down);
        f.commands.post(PendingCommand::CommitTune);
        f.dispatcher.dispatch_next();
        assert_ne!(last_write(&f.bus)[0] & 0x80, 0);
    }

    #[test]
    fn test_failure_still_notifies_and_continues() {
        let mut f = fixture();
        f.bus.lock().unwrap().fail_writes = true;
        f.state.adjust(Step::Up);
        f.commands.post(PendingCommand::CommitTune);
        f.dispatcher.dispatch_next();
        assert!(f.display.try_take().is_some());
        assert_eq!(f.dispatcher.tuner().frequency(), Frequency::DEFAULT_STATION);

        f.bus.lock().unwrap().fail_writes = false;
        f.commands.post(PendingCommand::CommitTune);
        f.dispatcher.dispatch_next();
        assert_eq!(f.dispatcher.tuner().frequency(), f.state.frequency());
    }
}

use std::sync::Arc;
use std::thread::JoinHandle;

use log::{error, info, warn};
use tea5767_protocol::Transport;

use crate::config::RadioConfig;
use crate::controls::Controls;
use crate::debounce::ButtonPoller;
use crate::display::{DisplayFlag, DisplayNotifier, DisplaySink, StatusLine};
use crate::dispatcher::Dispatcher;
use crate::error::Result;
use crate::gpio::{Direction, LineIo};
use crate::mailbox::CommandMailbox;
use crate::sched;
use crate::state::TuningState;

/// Opens the bus from inside the dispatcher thread.
pub type TransportOpener =
    Box<dyn FnOnce() -> tea5767_protocol::Result<Box<dyn Transport>> + Send>;

/// Hardware and sinks the receiver runs against.
pub struct Peripherals {
    pub lines: Arc<dyn LineIo>,
    pub open_transport: TransportOpener,
    pub display: Box<dyn DisplaySink>,
    pub status: Arc<dyn StatusLine>,
}

/// Threads of a running receiver.
pub struct Receiver {
    pub state: Arc<TuningState>,
    pub commands: Arc<CommandMailbox>,
    pub display: Arc<DisplayFlag>,
    pub threads: Vec<JoinHandle<()>>,
}

impl Receiver {
    /// Block until every thread has ended.
    pub fn join(self) {
        for handle in self.threads {
            if handle.join().is_err() {
                error!("receiver thread panicked");
            }
        }
    }
}

/// Validate `config`, configure the input lines, and start the dispatcher,
/// display, and one poller per button.
pub fn launch(config: &RadioConfig, peripherals: Peripherals) -> Result<Receiver> {
    config.validate()?;
    let tuner_config = config.tuner_config()?;
    let input_priority = config.input_priority()?;
    let control_priority = config.control_priority()?;

    let Peripherals {
        lines,
        open_transport,
        display: sink,
        status,
    } = peripherals;

    for (button, line) in config.buttons.iter() {
        if let Err(e) = lines.set_direction(line, Direction::In) {
            warn!("could not configure {button} line {line} as input: {e}");
        }
    }

    let state = Arc::new(TuningState::new(config.initial_frequency));
    let commands = Arc::new(CommandMailbox::new("command"));
    let display = Arc::new(DisplayFlag::new("display"));
    let mut threads = Vec::with_capacity(7);

    {
        let state = Arc::clone(&state);
        let commands = Arc::clone(&commands);
        let display = Arc::clone(&display);
        threads.push(sched::spawn("dispatcher", control_priority, move || {
            let transport = match open_transport() {
                Ok(transport) => transport,
                Err(e) => {
                    error!("could not open tuner bus: {e}");
                    return;
                }
            };
            match Dispatcher::start(transport, tuner_config, state, commands, display) {
                Ok(dispatcher) => dispatcher.run(),
                Err(e) => error!("dispatcher stopped: {e}"),
            }
        })?);
    }

    let notifier = DisplayNotifier::new(Arc::clone(&state), Arc::clone(&display), sink);
    threads.push(sched::spawn("display", control_priority, move || notifier.run())?);

    let controls = Controls::new(Arc::clone(&state), Arc::clone(&commands), status);
    for (button, line) in config.buttons.iter() {
        let poller = ButtonPoller::new(button, line, Arc::clone(&lines), config.poll_interval);
        let controls = controls.clone();
        let name = format!("button-{button}");
        threads.push(sched::spawn(&name, input_priority, move || {
            let e = poller.run(&controls);
            error!("{button} poller stopped: {e}");
        })?);
    }

    info!(
        "receiver started on {} MHz ({} button threads at {input_priority}, control at {control_priority})",
        config.initial_frequency,
        config.buttons.iter().count()
    );
    Ok(Receiver {
        state,
        commands,
        display,
        threads,
    })
}

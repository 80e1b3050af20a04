pub mod config;
pub mod controls;
pub mod debounce;
pub mod dispatcher;
pub mod display;
pub mod error;
pub mod gpio;
mod lock;
pub mod mailbox;
pub mod radio;
pub mod sched;
pub mod state;

pub use config::{ButtonLines, RadioConfig};
pub use controls::{Button, Controls};
pub use dispatcher::Dispatcher;
pub use display::{ConsoleDisplay, ConsoleStatusLine, DisplaySink, DisplaySnapshot, StatusLine};
pub use error::{RadioError, Result};
pub use gpio::{Direction, LineIo, SysfsGpio};
pub use mailbox::{CommandMailbox, Mailbox, PendingCommand};
pub use radio::{Peripherals, Receiver, launch};
pub use state::{Digit, Step, TuningState};

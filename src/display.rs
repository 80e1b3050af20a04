use std::fmt;
use std::io::{self, Stdout, Write};
use std::sync::{Arc, Mutex};

use crossterm::cursor::MoveToColumn;
use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};
use log::{debug, warn};
use tea5767_protocol::Frequency;

use crate::lock::lock_or_recover;
use crate::mailbox::Mailbox;
use crate::state::TuningState;

const RULE: &str = "------------------------";

/// Wake-up flag for the display thread. A filled slot means "re-render".
pub type DisplayFlag = Mailbox<()>;

/// What the display shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySnapshot {
    pub frequency: Frequency,
    pub audio_enabled: bool,
}

impl DisplaySnapshot {
    /// Read each field under its own lock.
    pub fn capture(state: &TuningState) -> Self {
        Self {
            frequency: state.frequency(),
            audio_enabled: state.audio_enabled(),
        }
    }

    pub fn audio_label(&self) -> &'static str {
        if self.audio_enabled { "ON" } else { "MUTED" }
    }
}

impl fmt::Display for DisplaySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.frequency, self.audio_label())
    }
}

/// Renders full snapshots. Owned by the display thread.
pub trait DisplaySink: Send {
    fn render(&mut self, snapshot: &DisplaySnapshot) -> io::Result<()>;
}

/// Shows the staged frequency while it is being adjusted, before it is
/// committed to the tuner. Called from the button threads.
pub trait StatusLine: Send + Sync {
    fn staged(&self, frequency: Frequency);
}

/// Waits for the display flag and re-renders the shared state.
pub struct DisplayNotifier {
    state: Arc<TuningState>,
    flag: Arc<DisplayFlag>,
    sink: Box<dyn DisplaySink>,
}

impl DisplayNotifier {
    pub fn new(state: Arc<TuningState>, flag: Arc<DisplayFlag>, sink: Box<dyn DisplaySink>) -> Self {
        Self { state, flag, sink }
    }

    /// Render the startup snapshot, then one snapshot per wake-up. Never returns.
    pub fn run(mut self) {
        self.render_current();
        loop {
            self.wait_and_render();
        }
    }

    /// Block until the flag is raised, clear it, and render.
    pub fn wait_and_render(&mut self) -> DisplaySnapshot {
        self.flag.take();
        self.render_current()
    }

    pub fn render_current(&mut self) -> DisplaySnapshot {
        let snapshot = DisplaySnapshot::capture(&self.state);
        debug!("display: {snapshot}");
        if let Err(e) = self.sink.render(&snapshot) {
            warn!("display render failed: {e}");
        }
        snapshot
    }
}

/// Two-line text readout on a terminal-like writer.
///
/// The writer sits behind a lock shared with [`ConsoleStatusLine`]; a render
/// holds it for its whole output, so a status update never lands mid-render.
pub struct ConsoleDisplay<W> {
    out: Arc<Mutex<W>>,
}

impl<W: Write> ConsoleDisplay<W> {
    pub fn new(out: Arc<Mutex<W>>) -> Self {
        Self { out }
    }

    /// A status line that writes through the same lock.
    pub fn status_line(&self) -> ConsoleStatusLine<W> {
        ConsoleStatusLine::new(Arc::clone(&self.out))
    }
}

impl ConsoleDisplay<Stdout> {
    pub fn stdout() -> Self {
        Self::new(Arc::new(Mutex::new(io::stdout())))
    }
}

fn write_snapshot<W: Write>(out: &mut W, snapshot: &DisplaySnapshot) -> io::Result<()> {
    let color = if snapshot.audio_enabled {
        Color::Green
    } else {
        Color::Red
    };
    // Leading newline ends any in-progress status line.
    writeln!(out, "\n{RULE}")?;
    writeln!(out, "Frequency: {} MHz", snapshot.frequency)?;
    queue!(
        out,
        Print("Audio: "),
        SetForegroundColor(color),
        Print(snapshot.audio_label()),
        ResetColor,
        Print("\n"),
    )?;
    writeln!(out, "{RULE}")?;
    out.flush()
}

impl<W: Write + Send> DisplaySink for ConsoleDisplay<W> {
    fn render(&mut self, snapshot: &DisplaySnapshot) -> io::Result<()> {
        let mut out = lock_or_recover(&self.out, "console");
        write_snapshot(&mut *out, snapshot)
    }
}

/// Rewrites the current terminal line with the staged frequency.
pub struct ConsoleStatusLine<W> {
    out: Arc<Mutex<W>>,
}

impl<W: Write> ConsoleStatusLine<W> {
    pub fn new(out: Arc<Mutex<W>>) -> Self {
        Self { out }
    }
}

impl<W: Write + Send> StatusLine for ConsoleStatusLine<W> {
    fn staged(&self, frequency: Frequency) {
        let mut out = lock_or_recover(&self.out, "console");
        let result = queue!(
            out,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(format!("Tuning Frequency: {frequency} MHz")),
        )
        .and_then(|()| out.flush());
        if let Err(e) = result {
            warn!("status line write failed: {e}");
        }
    }
}

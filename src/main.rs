// SPDX-License-Identifier: MIT
//
// tilde — a minimal terminal text editor.
//
// This is the main binary that wires together the crates:
//
//   tilde-term   → raw mode, geometry, frame output, key decoding, event loop
//   tilde-editor → cursor state, key dispatch, frame composition
//
// The Editor struct implements tilde-term's App trait. Each iteration:
//
//   paint → view::render → OutputFrame → one write to the terminal
//   stdin → read_key → on_key → cursor motion or quit
//
// Startup order matters: raw mode first (the geometry probe reads the
// terminal's reply byte-by-byte, which needs non-canonical input), then the
// viewport size, then the loop. Every failure funnels into `die`, which
// restores the terminal before exiting non-zero.

use std::io;

use tilde_editor::options::Options;
use tilde_editor::state::EditorState;
use tilde_editor::view;

use tilde_term::TermError;
use tilde_term::event_loop::{Action, App, EventLoop};
use tilde_term::geometry::{self, Size};
use tilde_term::input::Key;
use tilde_term::output::OutputFrame;
use tilde_term::reader::StdinSource;
use tilde_term::terminal::{self, RawMode};

// ─── Editor ─────────────────────────────────────────────────────────────────

/// The editor application state.
struct Editor {
    state: EditorState,
    options: Options,
}

impl Editor {
    const fn new(viewport: Size, options: Options) -> Self {
        Self {
            state: EditorState::new(viewport),
            options,
        }
    }
}

impl App for Editor {
    fn paint(&mut self, frame: &mut OutputFrame) {
        view::render(&self.state, &self.options, frame);
    }

    fn on_key(&mut self, key: Key) -> Action {
        self.state.handle_key(key)
    }
}

// ─── Logging ────────────────────────────────────────────────────────────────

/// Send tracing output to `./tilde.log`. The returned guard flushes the
/// background writer when dropped.
#[cfg(feature = "file-log")]
fn init_logging() -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let file_appender = tracing_appender::rolling::never(".", "tilde.log");
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .ok()?;
    Some(guard)
}

#[cfg(not(feature = "file-log"))]
const fn init_logging() -> Option<()> {
    None
}

// ─── Entry point ────────────────────────────────────────────────────────────

fn run() -> Result<(), TermError> {
    let raw = RawMode::enable()?;

    let mut input = StdinSource::new();
    let mut output = io::stdout();
    let viewport = geometry::window_size(&mut output, &mut input)?;
    tracing::info!(rows = viewport.rows, cols = viewport.cols, "editor starting");

    let mut editor = Editor::new(viewport, Options::default());
    EventLoop::new(input, output).run(&mut editor)?;

    raw.disable()
}

fn main() {
    let _log_guard = init_logging();

    if let Err(err) = run() {
        terminal::die(&err);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────────────

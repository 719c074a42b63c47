// SPDX-License-Identifier: MIT
//
// Event loop — the render → read → process heartbeat.
//
// Each iteration while running:
//
//   1. The app paints a fresh `OutputFrame`.
//   2. The frame goes to the terminal in one write, then is dropped.
//   3. One key is decoded from the byte source (this is the only place the
//      loop waits, bounded by the raw-mode read timeout).
//   4. The app handles the key and says whether to keep going.
//
// Two states: `Running` and `Terminated`. The only way to `Terminated` is
// the app returning `Action::Quit`; the loop then clears the screen, homes
// the cursor and returns. Fatal errors come back as `Err` for the caller to
// hand to `die`.
//
// The loop is generic over its byte source and output sink, so the whole
// cycle runs in tests against scripted input and a `Vec<u8>`.

use std::io::Write;

use crate::ansi;
use crate::error::TermError;
use crate::input::{self, Key};
use crate::output::OutputFrame;
use crate::reader::ByteSource;

// ─── App Trait ───────────────────────────────────────────────────────────────

/// What the application tells the event loop to do after handling a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Continue running.
    Continue,
    /// Exit the event loop cleanly.
    Quit,
}

/// Loop lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Painting frames and handling keys.
    Running,
    /// Quit was requested; the screen has been cleared. Terminal state.
    Terminated,
}

/// Application interface for the event loop.
///
/// Only [`paint`](App::paint) is required; keys are ignored by default.
pub trait App {
    /// Compose the whole screen into `frame`.
    ///
    /// Called once per iteration with an empty frame. Composition can't
    /// fail: appends that can't allocate are dropped.
    fn paint(&mut self, frame: &mut OutputFrame);

    /// Handle one decoded key.
    ///
    /// Return [`Action::Quit`] to terminate the loop.
    fn on_key(&mut self, _key: Key) -> Action {
        Action::Continue
    }
}

// ─── EventLoop ───────────────────────────────────────────────────────────────

/// The terminal event loop.
///
/// # Example
///
/// ```no_run
/// use tilde_term::event_loop::{Action, App, EventLoop};
/// use tilde_term::input::Key;
/// use tilde_term::output::OutputFrame;
/// use tilde_term::reader::StdinSource;
///
/// struct Hello;
///
/// impl App for Hello {
///     fn paint(&mut self, frame: &mut OutputFrame) {
///         frame.append(b"\x1b[Hhello");
///     }
///
///     fn on_key(&mut self, key: Key) -> Action {
///         if key == Key::ctrl(b'q') { Action::Quit } else { Action::Continue }
///     }
/// }
///
/// EventLoop::new(StdinSource::new(), std::io::stdout()).run(&mut Hello)?;
/// # Ok::<(), tilde_term::TermError>(())
/// ```
pub struct EventLoop<S, W> {
    input: S,
    output: W,
    state: LoopState,
}

impl<S: ByteSource, W: Write> EventLoop<S, W> {
    /// A loop over an arbitrary byte source and sink.
    #[must_use]
    pub const fn new(input: S, output: W) -> Self {
        Self {
            input,
            output,
            state: LoopState::Running,
        }
    }

    /// Current lifecycle state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// The byte source (e.g. for a geometry probe before the loop starts).
    pub const fn input_mut(&mut self) -> &mut S {
        &mut self.input
    }

    /// The output sink.
    pub const fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    /// Take the loop apart.
    pub fn into_parts(self) -> (S, W) {
        (self.input, self.output)
    }

    /// Run until the app returns [`Action::Quit`].
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: a failed frame write or a failed read.
    pub fn run(&mut self, app: &mut impl App) -> Result<(), TermError> {
        tracing::debug!("event loop started");
        while self.tick(app)? == LoopState::Running {}
        tracing::debug!("event loop terminated");
        Ok(())
    }

    /// One iteration: paint and flush a frame, read one key, dispatch it.
    ///
    /// Does nothing once terminated.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub fn tick(&mut self, app: &mut impl App) -> Result<LoopState, TermError> {
        if self.state == LoopState::Terminated {
            return Ok(self.state);
        }

        let mut frame = OutputFrame::new();
        app.paint(&mut frame);
        frame.flush_to(&mut self.output).map_err(TermError::Write)?;

        let key = input::read_key(&mut self.input)?;
        if app.on_key(key) == Action::Quit {
            ansi::reset_screen(&mut self.output).map_err(TermError::Write)?;
            self.output.flush().map_err(TermError::Write)?;
            self.state = LoopState::Terminated;
        }

        Ok(self.state)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::ScriptedSource;
    use pretty_assertions::assert_eq;
    use std::io;

    /// Paints a counter, records keys, quits on Ctrl-Q.
    #[derive(Default)]
    struct Recorder {
        paints: usize,
        keys: Vec<Key>,
    }

    impl App for Recorder {
        fn paint(&mut self, frame: &mut OutputFrame) {
            self.paints += 1;
            frame.append(format!("<frame {}>", self.paints).as_bytes());
        }

        fn on_key(&mut self, key: Key) -> Action {
            self.keys.push(key);
            if key == Key::ctrl(b'q') {
                Action::Quit
            } else {
                Action::Continue
            }
        }
    }

    struct MinimalApp;

    impl App for MinimalApp {
        fn paint(&mut self, _frame: &mut OutputFrame) {}
    }

    fn looped(bytes: &[u8]) -> EventLoop<ScriptedSource, Vec<u8>> {
        EventLoop::new(ScriptedSource::bytes(bytes), Vec::new())
    }

    // ── Action / LoopState ──────────────────────────────────────────

    #[test]
    fn action_equality() {
        assert_eq!(Action::Continue, Action::Continue);
        assert_ne!(Action::Continue, Action::Quit);
    }

    #[test]
    fn app_default_on_key_continues() {
        let mut app = MinimalApp;
        assert_eq!(app.on_key(Key::Char(b'x')), Action::Continue);
        assert_eq!(app.on_key(Key::ctrl(b'q')), Action::Continue);
    }

    #[test]
    fn starts_running() {
        assert_eq!(looped(b"").state(), LoopState::Running);
    }

    // ── Cycle ───────────────────────────────────────────────────────

    #[test]
    fn paints_before_each_read() {
        let mut ev = looped(b"ab\x11");
        let mut app = Recorder::default();
        ev.run(&mut app).unwrap();

        assert_eq!(app.paints, 3);
        assert_eq!(
            app.keys,
            vec![Key::Char(b'a'), Key::Char(b'b'), Key::ctrl(b'q')]
        );
    }

    #[test]
    fn quit_clears_and_homes_after_last_frame() {
        let mut ev = looped(b"\x11");
        let mut app = Recorder::default();
        ev.run(&mut app).unwrap();

        assert_eq!(ev.state(), LoopState::Terminated);
        let (_, out) = ev.into_parts();
        assert_eq!(out, b"<frame 1>\x1b[2J\x1b[H");
    }

    #[test]
    fn tick_after_termination_is_inert() {
        let mut ev = looped(b"\x11x");
        let mut app = Recorder::default();
        assert_eq!(ev.tick(&mut app).unwrap(), LoopState::Terminated);
        assert_eq!(ev.tick(&mut app).unwrap(), LoopState::Terminated);
        assert_eq!(app.paints, 1);
        assert_eq!(ev.input_mut().remaining(), 1);
    }

    #[test]
    fn escape_sequences_reach_the_app_decoded() {
        let mut ev = looped(b"\x1b[A\x1b[Z\x11");
        let mut app = Recorder::default();
        ev.run(&mut app).unwrap();
        assert_eq!(app.keys[0], Key::ArrowUp);
        assert_eq!(app.keys[1], Key::Escape);
    }

    #[test]
    fn read_failure_propagates() {
        let mut ev = looped(b"a");
        let mut app = Recorder::default();
        let err = ev.run(&mut app).unwrap_err();
        assert!(matches!(err, TermError::Read(_)));
        assert_eq!(ev.state(), LoopState::Running);
    }

    #[test]
    fn write_failure_propagates() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::from(io::ErrorKind::BrokenPipe))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut ev = EventLoop::new(ScriptedSource::bytes(b"\x11"), Closed);
        let err = ev.run(&mut Recorder::default()).unwrap_err();
        assert!(matches!(err, TermError::Write(_)));
    }

    #[test]
    fn output_mut_reaches_sink() {
        let mut ev = looped(b"");
        ev.output_mut().extend_from_slice(b"probe");
        let (_, out) = ev.into_parts();
        assert_eq!(out, b"probe");
    }
}

// SPDX-License-Identifier: MIT
//
// Terminal mode control — raw mode, guaranteed restore, and the fatal path.
//
// Safety: This module necessarily uses `unsafe` for termios (tcgetattr,
// tcsetattr), raw fd writes, and signal registration. These are the
// standard POSIX interfaces for terminal control. Each unsafe block is
// minimal.
#![allow(unsafe_code)]
//
// Raw mode is a scoped resource. `RawMode::enable` snapshots the terminal's
// attributes and applies the raw set; dropping the guard puts the snapshot
// back. Every exit path funnels into one restore:
//
//   normal return / quit   → the guard's Drop
//   fatal error            → `die`, which restores before process::exit
//   panic                  → the panic hook
//   SIGTERM / SIGHUP       → a signal handler (ISIG is off, so Ctrl-C and
//                            friends never arrive as signals)
//
// The snapshot is kept in a write-once process global so the panic hook
// and signal handler can reach it without the guard. An `ACTIVE` flag is
// swapped off by whichever path restores first; the others become no-ops,
// so the terminal is restored exactly once.

use std::io::{self, Write};
use std::process;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Once, OnceLock};

use crate::ansi;
use crate::error::TermError;

// ─── Config ─────────────────────────────────────────────────────────────────

/// Read semantics applied in raw mode (`VMIN` / `VTIME`).
///
/// The defaults make `read()` return as soon as one byte is available, or
/// after one decisecond with nothing, so the input decoder never blocks
/// indefinitely on an incomplete escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawModeConfig {
    /// Minimum bytes per read (`VMIN`).
    pub min_read_bytes: u8,
    /// Inter-byte timeout in tenths of a second (`VTIME`).
    pub read_timeout_deciseconds: u8,
}

impl Default for RawModeConfig {
    fn default() -> Self {
        Self {
            min_read_bytes: 0,
            read_timeout_deciseconds: 1,
        }
    }
}

// ─── Terminal Queries ───────────────────────────────────────────────────────

/// Read the current attributes of `fd`.
///
/// # Errors
///
/// Returns [`TermError::TerminalQuery`] if `tcgetattr` fails.
#[cfg(unix)]
fn get_attrs(fd: libc::c_int) -> Result<libc::termios, TermError> {
    let mut termios: libc::termios = unsafe { std::mem::zeroed() };
    if unsafe { libc::tcgetattr(fd, &raw mut termios) } != 0 {
        return Err(TermError::TerminalQuery(io::Error::last_os_error()));
    }
    Ok(termios)
}

/// Apply `termios` to `fd` after draining output and discarding pending input.
#[cfg(unix)]
fn set_attrs(fd: libc::c_int, termios: &libc::termios) -> Result<(), TermError> {
    if unsafe { libc::tcsetattr(fd, libc::TCSAFLUSH, termios) } != 0 {
        return Err(TermError::TerminalConfig(io::Error::last_os_error()));
    }
    Ok(())
}

/// Switch `fd` to raw mode and hand back the attributes it had before.
///
/// Touches nothing process-wide; [`RawMode`] layers the exactly-once
/// restore bookkeeping on top.
#[cfg(unix)]
fn enter_raw(fd: libc::c_int, config: RawModeConfig) -> Result<libc::termios, TermError> {
    let original = get_attrs(fd)?;
    set_attrs(fd, &make_raw(&original, config))?;
    Ok(original)
}

/// Put `original` back on `fd`.
#[cfg(unix)]
fn leave_raw(fd: libc::c_int, original: &libc::termios) -> Result<(), TermError> {
    set_attrs(fd, original)
}

/// Compute the raw attribute set from `original`.
///
/// Input: no CR→NL translation, no XON/XOFF, no break signal, no parity
/// check, no 8th-bit stripping. Output: no post-processing. Control: 8-bit
/// characters. Local: no echo, no canonical mode, no extended input, no
/// signal characters. Every other field is copied untouched.
#[cfg(unix)]
#[must_use]
pub fn make_raw(original: &libc::termios, config: RawModeConfig) -> libc::termios {
    let mut raw = *original;
    raw.c_iflag &= !(libc::ICRNL | libc::IXON | libc::BRKINT | libc::INPCK | libc::ISTRIP);
    raw.c_oflag &= !libc::OPOST;
    raw.c_cflag |= libc::CS8;
    raw.c_lflag &= !(libc::ECHO | libc::ICANON | libc::IEXTEN | libc::ISIG);
    raw.c_cc[libc::VMIN] = config.min_read_bytes;
    raw.c_cc[libc::VTIME] = config.read_timeout_deciseconds;
    raw
}

// ─── Process-wide restore ───────────────────────────────────────────────────

/// The attributes captured the first time raw mode was entered.
#[cfg(unix)]
static SNAPSHOT: OnceLock<libc::termios> = OnceLock::new();

/// Whether raw attributes are currently applied and still owe a restore.
static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Sequence written on the panic path: clear, home, show the cursor.
const EMERGENCY_RESTORE: &[u8] = b"\x1b[2J\x1b[H\x1b[?25h";

/// Put the snapshot back if raw mode is still active. Best-effort.
///
/// Safe to call from every exit path; only the first call after entering
/// raw mode does anything. Returns whether this call was that one.
/// Async-signal-safe: one atomic swap, one atomic load, one `tcsetattr`.
pub fn restore_terminal() -> bool {
    if !ACTIVE.swap(false, Ordering::SeqCst) {
        return false;
    }
    #[cfg(unix)]
    if let Some(original) = SNAPSHOT.get() {
        unsafe {
            let _ = libc::tcsetattr(libc::STDIN_FILENO, libc::TCSAFLUSH, original);
        }
    }
    true
}

/// Write bytes straight to fd 1, bypassing Rust's stdout lock.
///
/// Used where the lock might already be held (panic mid-frame) or where
/// taking it isn't allowed (signal handlers).
fn write_stdout_raw(bytes: &[u8]) {
    #[cfg(unix)]
    unsafe {
        let _ = libc::write(libc::STDOUT_FILENO, bytes.as_ptr().cast(), bytes.len());
    }

    #[cfg(not(unix))]
    {
        let _ = io::stdout().write_all(bytes);
        let _ = io::stdout().flush();
    }
}

/// Panic hook guard — ensures the hook is installed at most once per process.
static PANIC_HOOK_INSTALLED: Once = Once::new();

/// Install a panic hook that restores the terminal before printing the error.
///
/// Without this, a panic in raw mode leaves the shell with no echo and no
/// line editing, and the panic message lands on a screen full of tildes.
fn install_panic_hook() {
    PANIC_HOOK_INSTALLED.call_once(|| {
        let original = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            // Outside raw mode the screen belongs to the user again.
            if restore_terminal() {
                write_stdout_raw(EMERGENCY_RESTORE);
            }
            tracing::error!(%info, "panic");
            original(info);
        }));
    });
}

/// Signal handler guard — handlers are registered at most once per process.
static SIGNALS_INSTALLED: Once = Once::new();

/// Restore the terminal and exit on `SIGTERM` / `SIGHUP`.
///
/// Raw mode turns off ISIG, so keyboard-generated signals never arrive; these
/// are the termination signals that can still come from outside.
#[cfg(unix)]
fn install_signal_handlers() {
    use signal_hook::consts::signal::{SIGHUP, SIGTERM};

    SIGNALS_INSTALLED.call_once(|| {
        for signal in [SIGTERM, SIGHUP] {
            // The action only touches atomics and async-signal-safe syscalls.
            let registered = unsafe {
                signal_hook::low_level::register(signal, move || {
                    if restore_terminal() {
                        write_stdout_raw(b"\x1b[2J\x1b[H");
                    }
                    signal_hook::low_level::exit(128 + signal);
                })
            };
            if let Err(err) = registered {
                tracing::warn!(signal, %err, "could not register termination handler");
            }
        }
    });
}

#[cfg(not(unix))]
fn install_signal_handlers() {}

// ─── RawMode ────────────────────────────────────────────────────────────────

/// Raw-mode guard with RAII restore.
///
/// # Example
///
/// ```no_run
/// use tilde_term::terminal::RawMode;
///
/// let raw = RawMode::enable()?;
/// // ... read keys, draw frames ...
/// drop(raw); // original attributes are back
/// # Ok::<(), tilde_term::TermError>(())
/// ```
pub struct RawMode {
    /// Terminal the guard was entered on.
    #[cfg(unix)]
    fd: libc::c_int,
    /// Attributes captured before this guard changed anything.
    #[cfg(unix)]
    original: libc::termios,
}

impl RawMode {
    /// Enter raw mode with the default read semantics.
    ///
    /// # Errors
    ///
    /// [`TermError::TerminalQuery`] if the attributes can't be read (stdin is
    /// not a terminal), [`TermError::TerminalConfig`] if they can't be applied.
    pub fn enable() -> Result<Self, TermError> {
        Self::with_config(RawModeConfig::default())
    }

    /// Enter raw mode with custom `VMIN` / `VTIME`.
    ///
    /// # Errors
    ///
    /// Same as [`enable`](Self::enable).
    #[cfg(unix)]
    pub fn with_config(config: RawModeConfig) -> Result<Self, TermError> {
        let fd = libc::STDIN_FILENO;
        let original = enter_raw(fd, config)?;
        let _ = SNAPSHOT.set(original);

        install_panic_hook();
        install_signal_handlers();
        ACTIVE.store(true, Ordering::SeqCst);
        tracing::debug!(
            vmin = config.min_read_bytes,
            vtime = config.read_timeout_deciseconds,
            "raw mode entered"
        );

        Ok(Self { fd, original })
    }

    #[cfg(not(unix))]
    pub fn with_config(_config: RawModeConfig) -> Result<Self, TermError> {
        Err(TermError::TerminalQuery(io::Error::from(
            io::ErrorKind::Unsupported,
        )))
    }

    /// Leave raw mode now and report whether the restore worked.
    ///
    /// Dropping the guard does the same thing but has to swallow errors.
    ///
    /// # Errors
    ///
    /// Returns [`TermError::TerminalConfig`] if `tcsetattr` fails.
    pub fn disable(self) -> Result<(), TermError> {
        let result = self.restore();
        std::mem::forget(self);
        result
    }

    fn restore(&self) -> Result<(), TermError> {
        if !ACTIVE.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::debug!("raw mode left");
        #[cfg(unix)]
        leave_raw(self.fd, &self.original)?;
        Ok(())
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = self.restore() {
            tracing::error!(error = %err.describe(), "raw mode restore failed");
        }
    }
}

// ─── Fatal path ─────────────────────────────────────────────────────────────

/// Report a fatal error and terminate.
///
/// Clears the screen, homes the cursor, restores the terminal attributes,
/// prints the reason plus the OS error to stderr, and exits with status 1.
/// `process::exit` skips destructors, so the restore happens here rather
/// than in a guard's Drop.
pub fn die(err: &TermError) -> ! {
    tracing::error!(error = %err.describe(), "fatal");

    {
        let mut stdout = io::stdout().lock();
        let _ = ansi::reset_screen(&mut stdout);
        let _ = stdout.flush();
    }
    let _ = restore_terminal();

    eprintln!("{}", err.describe());
    process::exit(1);
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// A termios with every flag bit set, so clears are observable.
    fn all_set() -> libc::termios {
        let mut t: libc::termios = unsafe { std::mem::zeroed() };
        t.c_iflag = !0;
        t.c_oflag = !0;
        t.c_cflag = 0;
        t.c_lflag = !0;
        for (i, cc) in t.c_cc.iter_mut().enumerate() {
            *cc = u8::try_from(i % 200).unwrap_or(0) + 3;
        }
        t
    }

    fn same_attrs(a: &libc::termios, b: &libc::termios) -> bool {
        a.c_iflag == b.c_iflag
            && a.c_oflag == b.c_oflag
            && a.c_cflag == b.c_cflag
            && a.c_lflag == b.c_lflag
            && a.c_cc == b.c_cc
    }

    // ── RawModeConfig ───────────────────────────────────────────────

    #[test]
    fn default_config_is_timed_read() {
        let config = RawModeConfig::default();
        assert_eq!(config.min_read_bytes, 0);
        assert_eq!(config.read_timeout_deciseconds, 1);
    }

    // ── make_raw ────────────────────────────────────────────────────

    #[test]
    fn input_flags_cleared() {
        let raw = make_raw(&all_set(), RawModeConfig::default());
        for flag in [libc::ICRNL, libc::IXON, libc::BRKINT, libc::INPCK, libc::ISTRIP] {
            assert_eq!(raw.c_iflag & flag, 0);
        }
    }

    #[test]
    fn output_processing_cleared() {
        let raw = make_raw(&all_set(), RawModeConfig::default());
        assert_eq!(raw.c_oflag & libc::OPOST, 0);
    }

    #[test]
    fn eight_bit_chars_forced() {
        let raw = make_raw(&all_set(), RawModeConfig::default());
        assert_eq!(raw.c_cflag & libc::CS8, libc::CS8);
    }

    #[test]
    fn local_flags_cleared() {
        let raw = make_raw(&all_set(), RawModeConfig::default());
        for flag in [libc::ECHO, libc::ICANON, libc::IEXTEN, libc::ISIG] {
            assert_eq!(raw.c_lflag & flag, 0);
        }
    }

    #[test]
    fn read_semantics_applied() {
        let config = RawModeConfig {
            min_read_bytes: 0,
            read_timeout_deciseconds: 1,
        };
        let raw = make_raw(&all_set(), config);
        assert_eq!(raw.c_cc[libc::VMIN], 0);
        assert_eq!(raw.c_cc[libc::VTIME], 1);
    }

    #[test]
    fn unrelated_bits_untouched() {
        let original = all_set();
        let raw = make_raw(&original, RawModeConfig::default());
        let touched_i = libc::ICRNL | libc::IXON | libc::BRKINT | libc::INPCK | libc::ISTRIP;
        assert_eq!(raw.c_iflag | touched_i, original.c_iflag);
        assert_eq!(raw.c_lflag & libc::ECHOE, original.c_lflag & libc::ECHOE);
        assert_eq!(raw.c_cc[libc::VINTR], original.c_cc[libc::VINTR]);
    }

    #[test]
    fn original_is_not_mutated() {
        let original = all_set();
        let copy = original;
        let _ = make_raw(&original, RawModeConfig::default());
        assert!(same_attrs(&original, &copy));
    }

    // ── Restore ─────────────────────────────────────────────────────

    /// A fresh pseudo-terminal pair, closed on drop.
    struct Pty {
        master: libc::c_int,
        slave: libc::c_int,
    }

    impl Pty {
        fn open() -> Self {
            let (mut master, mut slave) = (-1, -1);
            let rc = unsafe {
                libc::openpty(
                    &raw mut master,
                    &raw mut slave,
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                    std::ptr::null_mut(),
                )
            };
            assert_eq!(rc, 0, "openpty: {}", io::Error::last_os_error());
            Self { master, slave }
        }
    }

    impl Drop for Pty {
        fn drop(&mut self) {
            unsafe {
                libc::close(self.slave);
                libc::close(self.master);
            }
        }
    }

    #[test]
    fn enter_then_exit_restores_every_field() {
        let pty = Pty::open();
        let before = get_attrs(pty.slave).unwrap();

        let original = enter_raw(pty.slave, RawModeConfig::default()).unwrap();
        assert!(same_attrs(&original, &before));

        let during = get_attrs(pty.slave).unwrap();
        assert_eq!(during.c_lflag & libc::ECHO, 0);
        assert_eq!(during.c_lflag & libc::ICANON, 0);
        assert_eq!(during.c_cc[libc::VMIN], 0);
        assert_eq!(during.c_cc[libc::VTIME], 1);

        leave_raw(pty.slave, &original).unwrap();
        let after = get_attrs(pty.slave).unwrap();
        assert_eq!(after.c_iflag, before.c_iflag);
        assert_eq!(after.c_oflag, before.c_oflag);
        assert_eq!(after.c_cflag, before.c_cflag);
        assert_eq!(after.c_lflag, before.c_lflag);
        assert_eq!(after.c_cc, before.c_cc);
    }

    #[test]
    fn attrs_of_a_non_terminal_fail_as_query() {
        let mut fds = [-1; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        let result = get_attrs(fds[0]);
        unsafe {
            libc::close(fds[0]);
            libc::close(fds[1]);
        }
        assert!(matches!(result, Err(TermError::TerminalQuery(_))));
    }

    #[test]
    fn restore_without_raw_mode_reports_nothing_done() {
        // Nothing in this binary enters raw mode on stdin.
        assert!(!restore_terminal());
    }

    #[test]
    fn emergency_restore_shows_cursor() {
        let s = std::str::from_utf8(EMERGENCY_RESTORE).unwrap();
        assert!(s.starts_with("\x1b[2J\x1b[H"));
        assert!(s.ends_with("\x1b[?25h"));
    }
}

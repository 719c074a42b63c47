// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Byte sources — where the input decoder gets its bytes.
//
// In raw mode we configure the terminal with VMIN=0, VTIME=1: a read()
// returns as soon as one byte is available, or after 100ms with nothing.
// So "no byte" is a normal outcome, not an error, and the `ByteSource`
// trait reports it as `Ok(None)`. The decoder decides what silence means:
// keep waiting for a first byte, or give up on an escape sequence.
//
// Everything here is synchronous and single-threaded. The read timeout is
// the only suspension point in the whole editor.

use std::collections::VecDeque;
use std::io;

/// A source of raw input bytes with timeout semantics.
pub trait ByteSource {
    /// Read one byte.
    ///
    /// Returns `Ok(Some(b))` when a byte arrived, `Ok(None)` when the read
    /// timed out with no data.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error for any failure other than
    /// "no data yet".
    fn read_byte(&mut self) -> io::Result<Option<u8>>;
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        (**self).read_byte()
    }
}

// ─── StdinSource ─────────────────────────────────────────────────────────────

/// Reads stdin one byte at a time with a raw `read(2)`.
///
/// Bypasses `std::io::Stdin`'s internal buffer: buffering would swallow
/// bytes the decoder expects to see one at a time, and it would turn a
/// VTIME timeout (a zero-length read) into a spurious EOF.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinSource;

impl StdinSource {
    /// Create a source reading from file descriptor 0.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[cfg(unix)]
impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        let mut byte = 0u8;
        let n = unsafe { libc::read(libc::STDIN_FILENO, (&raw mut byte).cast(), 1) };

        match n {
            1 => Ok(Some(byte)),
            0 => Ok(None),
            _ => {
                let err = io::Error::last_os_error();
                match err.kind() {
                    // EAGAIN (Cygwin reports the timeout this way) and EINTR.
                    io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => Ok(None),
                    _ => Err(err),
                }
            }
        }
    }
}

#[cfg(not(unix))]
impl ByteSource for StdinSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        use std::io::Read;

        let mut byte = [0u8; 1];
        match io::stdin().lock().read(&mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }
}

// ─── ScriptedSource ──────────────────────────────────────────────────────────

/// A replayable byte source: a script of bytes and timeouts.
///
/// Each step is either `Some(byte)` (a byte arrives) or `None` (one read
/// times out). Once the script runs out, reads fail with
/// [`io::ErrorKind::UnexpectedEof`], so a decoder waiting forever on an
/// exhausted script errors instead of spinning.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    steps: VecDeque<Option<u8>>,
}

impl ScriptedSource {
    /// A script where every byte arrives immediately.
    #[must_use]
    pub fn bytes(data: &[u8]) -> Self {
        Self {
            steps: data.iter().copied().map(Some).collect(),
        }
    }

    /// A script mixing arriving bytes and timed-out reads.
    #[must_use]
    pub fn steps(steps: impl IntoIterator<Item = Option<u8>>) -> Self {
        Self {
            steps: steps.into_iter().collect(),
        }
    }

    /// Append arriving bytes to the end of the script.
    pub fn push_bytes(&mut self, data: &[u8]) {
        self.steps.extend(data.iter().copied().map(Some));
    }

    /// Append one timed-out read to the end of the script.
    pub fn push_timeout(&mut self) {
        self.steps.push_back(None);
    }

    /// Steps not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

impl ByteSource for ScriptedSource {
    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        self.steps
            .pop_front()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "input script exhausted"))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

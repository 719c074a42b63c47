// SPDX-License-Identifier: MIT
//
// Output batching.
//
// An `OutputFrame` accumulates every escape sequence and every character of
// one screen update in memory, so the whole frame reaches the terminal in a
// single write(). The terminal never sees a half-drawn screen, and there's
// no per-escape syscall overhead.
//
// Appends are best-effort: if the allocator refuses to grow the buffer, the
// bytes are dropped and composition carries on. A partially composed frame
// is replaced by a full one on the next tick, which beats aborting mid-render.
//
// Frames are single-use. `flush_to` consumes the frame, so nothing from one
// tick can leak into the next.

use std::io::{self, Write};

/// Initial capacity: enough for a 200×60 screen of markers and escapes.
const DEFAULT_CAPACITY: usize = 16_384;

/// One fully composed screen update, flushed atomically.
#[derive(Debug)]
pub struct OutputFrame {
    buf: Vec<u8>,
}

impl OutputFrame {
    /// Create an empty frame with default capacity (16 KB).
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty frame, reserving `capacity` bytes if the allocator allows.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buf = Vec::new();
        // A refused reservation just means the first append tries again.
        let _ = buf.try_reserve(capacity);
        Self { buf }
    }

    /// Number of bytes accumulated.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Whether nothing has been appended.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The accumulated bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Append `bytes` to the end of the frame.
    ///
    /// Silently does nothing if the buffer cannot grow.
    pub fn append(&mut self, bytes: &[u8]) {
        if self.buf.try_reserve(bytes.len()).is_err() {
            tracing::warn!(len = bytes.len(), "frame append dropped: allocation refused");
            return;
        }
        self.buf.extend_from_slice(bytes);
    }

    /// Append `n` copies of `byte` (padding runs).
    pub fn append_repeated(&mut self, byte: u8, n: usize) {
        if self.buf.try_reserve(n).is_err() {
            tracing::warn!(len = n, "frame padding dropped: allocation refused");
            return;
        }
        self.buf.resize(self.buf.len() + n, byte);
    }

    /// Write the whole frame to `w` in one `write_all`, then discard it.
    ///
    /// An empty frame writes nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to or flushing `w` fails.
    pub fn flush_to(self, w: &mut impl Write) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        w.write_all(&self.buf)?;
        w.flush()
    }
}

impl Write for OutputFrame {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        // Frames reach the terminal only through flush_to().
        Ok(())
    }
}

impl Default for OutputFrame {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
#![allow(unsafe_code)]
//
// Window geometry — how big is the viewport?
//
// The direct route is `ioctl(TIOCGWINSZ)`. Some terminals (and some
// serial/remote setups) don't answer it, or answer with zero columns. For
// those we ask the terminal itself: shove the cursor as far right and down
// as it will go, then request a Device Status Report. The reply,
// `ESC [ rows ; cols R`, arrives on stdin like any other input, so the
// probe reads it through the same byte source the key decoder uses.

use std::io::Write;

use crate::ansi;
use crate::error::TermError;
use crate::input;
use crate::reader::ByteSource;

/// Longest cursor-position report we'll read before giving up.
const REPORT_MAX_LEN: usize = 31;

/// How far to push the cursor before probing. The terminal clamps it.
const FAR_AWAY: u16 = 999;

// ─── Size ───────────────────────────────────────────────────────────────────

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Size {
    /// Number of columns (width in character cells).
    pub cols: u16,
    /// Number of rows (height in character cells).
    pub rows: u16,
}

impl Size {
    /// Build a size from rows and columns, in the order terminals report them.
    #[inline]
    #[must_use]
    pub const fn new(rows: u16, cols: u16) -> Self {
        Self { cols, rows }
    }

    /// Whether either dimension is zero.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.cols == 0 || self.rows == 0
    }
}

// ─── Direct query ───────────────────────────────────────────────────────────

/// Query the terminal size via `ioctl(TIOCGWINSZ)` on stdout.
///
/// Returns `None` if stdout is not a terminal, the query fails, or it
/// reports a zero dimension.
#[cfg(unix)]
#[must_use]
pub fn query_size() -> Option<Size> {
    let mut ws: libc::winsize = unsafe { std::mem::zeroed() };
    let result = unsafe { libc::ioctl(libc::STDOUT_FILENO, libc::TIOCGWINSZ, &raw mut ws) };

    let size = Size::new(ws.ws_row, ws.ws_col);
    if result == 0 && !size.is_empty() {
        Some(size)
    } else {
        None
    }
}

#[cfg(not(unix))]
#[must_use]
pub fn query_size() -> Option<Size> {
    None
}

// ─── Cursor-position probe ──────────────────────────────────────────────────

/// Parse a cursor-position report: `ESC [ rows ; cols` with the final `R`
/// already stripped or present.
///
/// Returns `None` for anything malformed, out of range, or zero.
#[must_use]
pub fn parse_cursor_report(report: &[u8]) -> Option<Size> {
    let body = report.strip_prefix(&[input::ESC, b'['])?;
    let body = body.strip_suffix(b"R").unwrap_or(body);
    let body = std::str::from_utf8(body).ok()?;

    let (rows, cols) = body.split_once(';')?;
    if !is_decimal(rows) || !is_decimal(cols) {
        return None;
    }
    let size = Size::new(rows.parse().ok()?, cols.parse().ok()?);

    (!size.is_empty()).then_some(size)
}

fn is_decimal(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Learn the size by moving the cursor to the bottom-right corner and asking
/// where it ended up.
///
/// After the report, one more key is consumed so the decoder's stream stays
/// in step with the terminal.
///
/// # Errors
///
/// [`TermError::GeometryUnavailable`] if the probe can't be sent or the
/// reply doesn't parse; [`TermError::Read`] if consuming the trailing key
/// fails.
pub fn probe_size(out: &mut impl Write, src: &mut impl ByteSource) -> Result<Size, TermError> {
    send_probe(out).map_err(|err| {
        tracing::debug!(%err, "cursor probe could not be written");
        TermError::GeometryUnavailable
    })?;

    let mut report = Vec::with_capacity(REPORT_MAX_LEN);
    while report.len() < REPORT_MAX_LEN {
        match src.read_byte() {
            Ok(Some(b'R')) => break,
            Ok(Some(b)) => report.push(b),
            Ok(None) | Err(_) => break,
        }
    }

    let size = parse_cursor_report(&report).ok_or_else(|| {
        tracing::debug!(report = ?String::from_utf8_lossy(&report), "unparseable cursor report");
        TermError::GeometryUnavailable
    })?;

    input::read_key(src)?;
    Ok(size)
}

fn send_probe(out: &mut impl Write) -> std::io::Result<()> {
    ansi::cursor_forward(out, FAR_AWAY)?;
    ansi::cursor_down(out, FAR_AWAY)?;
    ansi::request_cursor_position(out)?;
    out.flush()
}

// ─── Resolution ─────────────────────────────────────────────────────────────

/// Pick the viewport size: the direct query if it answered, else the probe.
///
/// # Errors
///
/// [`TermError::GeometryUnavailable`] if both methods fail.
pub fn resolve_window_size(
    queried: Option<Size>,
    out: &mut impl Write,
    src: &mut impl ByteSource,
) -> Result<Size, TermError> {
    if let Some(size) = queried.filter(|s| !s.is_empty()) {
        tracing::debug!(rows = size.rows, cols = size.cols, "window size from ioctl");
        return Ok(size);
    }

    let size = probe_size(out, src)?;
    tracing::debug!(rows = size.rows, cols = size.cols, "window size from cursor probe");
    Ok(size)
}

/// Resolve the size of the real terminal.
///
/// # Errors
///
/// Same as [`resolve_window_size`].
pub fn window_size(out: &mut impl Write, src: &mut impl ByteSource) -> Result<Size, TermError> {
    resolve_window_size(query_size(), out, src)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write VT100 control sequences to any `impl Write`.
// No state and no decisions about when to emit; callers compose them into
// an `OutputFrame` (for a render tick) or write them straight to stdout
// (for the quit and fatal paths).
//
// Cursor positions are 0-indexed in our API and converted to 1-indexed for
// the terminal (ANSI CUP is 1-based).

use std::io::{self, Write};

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to `(x, y)` using the CUP (Cursor Position) sequence.
///
/// Our coordinates are 0-indexed; ANSI CUP is 1-indexed.
#[inline]
pub fn cursor_to(w: &mut impl Write, x: u16, y: u16) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", u32::from(y) + 1, u32::from(x) + 1)
}

/// Move the cursor to the top-left corner (CUP with no parameters).
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// Move the cursor right by `n` columns (CUF). The terminal clamps at the edge.
#[inline]
pub fn cursor_forward(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}C")
}

/// Move the cursor down by `n` rows (CUD). The terminal clamps at the edge.
#[inline]
pub fn cursor_down(w: &mut impl Write, n: u16) -> io::Result<()> {
    write!(w, "\x1b[{n}B")
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

/// Ask the terminal to report the cursor position (DSR 6).
///
/// The terminal answers on stdin with `ESC [ rows ; cols R`.
#[inline]
pub fn request_cursor_position(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[6n")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2). Does not move the cursor.
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Clear from the cursor to the end of the line (EL 0).
#[inline]
pub fn clear_line(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[K")
}

/// Clear the screen and home the cursor — the sequence every exit path emits.
#[inline]
pub fn reset_screen(w: &mut impl Write) -> io::Result<()> {
    clear_screen(w)?;
    cursor_home(w)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn emit(f: impl FnOnce(&mut Vec<u8>) -> io::Result<()>) -> String {
        let mut out = Vec::new();
        f(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    // ── Cursor ──────────────────────────────────────────────────────

    #[test]
    fn cursor_to_origin_is_one_based() {
        assert_eq!(emit(|w| cursor_to(w, 0, 0)), "\x1b[1;1H");
    }

    #[test]
    fn cursor_to_row_then_column() {
        assert_eq!(emit(|w| cursor_to(w, 9, 4)), "\x1b[5;10H");
    }

    #[test]
    fn cursor_to_max_does_not_overflow() {
        assert_eq!(
            emit(|w| cursor_to(w, u16::MAX, u16::MAX)),
            "\x1b[65536;65536H"
        );
    }

    #[test]
    fn cursor_home_sequence() {
        assert_eq!(emit(cursor_home), "\x1b[H");
    }

    #[test]
    fn relative_motion() {
        assert_eq!(emit(|w| cursor_forward(w, 999)), "\x1b[999C");
        assert_eq!(emit(|w| cursor_down(w, 999)), "\x1b[999B");
    }

    #[test]
    fn visibility() {
        assert_eq!(emit(cursor_hide), "\x1b[?25l");
        assert_eq!(emit(cursor_show), "\x1b[?25h");
    }

    #[test]
    fn device_status_report() {
        assert_eq!(emit(request_cursor_position), "\x1b[6n");
    }

    // ── Screen ──────────────────────────────────────────────────────

    #[test]
    fn clears() {
        assert_eq!(emit(clear_screen), "\x1b[2J");
        assert_eq!(emit(clear_line), "\x1b[K");
    }

    #[test]
    fn reset_screen_clears_then_homes() {
        assert_eq!(emit(reset_screen), "\x1b[2J\x1b[H");
    }
}

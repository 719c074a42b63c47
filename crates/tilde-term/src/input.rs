// SPDX-License-Identifier: MIT
//
// Input decoder.
//
// Turns raw stdin bytes into `Key`s, one key per call. Plain bytes pass
// through as `Key::Char`; an ESC byte may start a VT100 sequence:
//
//   ESC [ A / B / C / D   → arrow keys
//   ESC [ 5 ~ / ESC [ 6 ~ → Page Up / Page Down
//
// # Escape vs escape-sequence ambiguity
//
// A bare ESC could be the Escape key or the start of a sequence. After ESC
// we try to read the follow bytes; each read is bounded by the terminal's
// VTIME timeout. If a follow byte doesn't arrive, or the sequence isn't one
// we know, the result is a plain `Key::Escape`. An incomplete sequence never
// blocks and never errors.
//
// The first byte of a key is different: silence there just means the user
// hasn't typed anything, so we keep waiting.

use crate::error::TermError;
use crate::reader::ByteSource;

/// The escape byte.
pub const ESC: u8 = 0x1b;

/// A decoded keypress.
///
/// Named keys have dedicated variants; everything else is the literal byte.
/// Control chords arrive as their control code (`Ctrl-Q` is `Char(0x11)`);
/// build them with [`Key::ctrl`] rather than spelling the number out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A literal byte (printable, control code, or UTF-8 fragment).
    Char(u8),
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    PageUp,
    PageDown,
    Escape,
}

impl Key {
    /// The key produced by holding Ctrl with `c` (`c & 0x1f`).
    ///
    /// `Key::ctrl(b'q') == Key::Char(0x11)`.
    #[inline]
    #[must_use]
    pub const fn ctrl(c: u8) -> Self {
        Self::Char(c & 0x1f)
    }
}

/// Read one key from `src`.
///
/// Waits (through any number of timed-out reads) for the first byte, then
/// decodes an escape sequence if that byte is ESC.
///
/// # Errors
///
/// Returns [`TermError::Read`] if reading the first byte fails for any
/// reason other than a timeout.
pub fn read_key(src: &mut impl ByteSource) -> Result<Key, TermError> {
    let byte = loop {
        if let Some(b) = src.read_byte().map_err(TermError::Read)? {
            break b;
        }
    };

    let key = if byte == ESC {
        decode_escape(src)
    } else {
        Key::Char(byte)
    };

    tracing::trace!(?key, "key decoded");
    Ok(key)
}

/// Decode the bytes following an ESC. Anything unrecognized is `Escape`.
fn decode_escape(src: &mut impl ByteSource) -> Key {
    let Some(first) = follow_byte(src) else {
        return Key::Escape;
    };
    let Some(second) = follow_byte(src) else {
        return Key::Escape;
    };

    if first != b'[' {
        return Key::Escape;
    }

    match second {
        b'A' => Key::ArrowUp,
        b'B' => Key::ArrowDown,
        b'C' => Key::ArrowRight,
        b'D' => Key::ArrowLeft,
        b'0'..=b'9' => match (second, follow_byte(src)) {
            (b'5', Some(b'~')) => Key::PageUp,
            (b'6', Some(b'~')) => Key::PageDown,
            _ => Key::Escape,
        },
        _ => Key::Escape,
    }
}

/// One follow byte of an escape sequence, or `None` if it didn't arrive.
///
/// A failed read here degrades the sequence to a plain Escape, same as a
/// timeout.
fn follow_byte(src: &mut impl ByteSource) -> Option<u8> {
    match src.read_byte() {
        Ok(b) => b,
        Err(err) => {
            tracing::debug!(%err, "escape sequence read failed, treating as Escape");
            None
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

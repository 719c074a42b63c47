//! View — composes one full screen into an [`OutputFrame`].
//!
//! The frame is built top to bottom with the cursor hidden, so the terminal
//! never shows it jumping around mid-draw:
//!
//! ```text
//! ESC[?25l ESC[H                hide, home
//! ~ ESC[K \r\n                  one row per viewport line
//! ~     Tilde editor -- ... ESC[K \r\n   banner row (rows / 3)
//! ~ ESC[K                       last row: no trailing \r\n (no scroll)
//! ESC[y;xH ESC[?25h             place and reveal the cursor
//! ```
//!
//! Every row clears to end-of-line after its content instead of clearing
//! the whole screen up front, which is what keeps redraws flicker-free.

use unicode_width::UnicodeWidthChar;

use tilde_term::ansi;
use tilde_term::geometry::Size;
use tilde_term::output::OutputFrame;

use crate::options::Options;
use crate::state::EditorState;

/// The row that carries the welcome banner.
#[inline]
#[must_use]
pub const fn banner_row(viewport: Size) -> u16 {
    viewport.rows / 3
}

/// Longest prefix of `text` that fits in `cols` display columns.
#[must_use]
pub fn truncate_to_width(text: &str, cols: usize) -> &str {
    let mut used = 0;
    for (i, ch) in text.char_indices() {
        let w = ch.width().unwrap_or(0);
        if used + w > cols {
            return &text[..i];
        }
        used += w;
    }
    text
}

/// Display width of `text` in terminal columns.
fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}

/// Compose the whole screen for `state`.
#[must_use]
pub fn compose_frame(state: &EditorState, options: &Options) -> OutputFrame {
    let mut frame = OutputFrame::new();
    render(state, options, &mut frame);
    frame
}

/// Compose the whole screen for `state` into an existing frame.
pub fn render(state: &EditorState, options: &Options, frame: &mut OutputFrame) {
    // OutputFrame's Write impl never fails, so the ansi results are moot.
    ansi::cursor_hide(frame).ok();
    ansi::cursor_home(frame).ok();

    draw_rows(state.viewport(), options, frame);

    let cursor = state.cursor();
    ansi::cursor_to(frame, cursor.x(), cursor.y()).ok();
    ansi::cursor_show(frame).ok();
}

/// Margin markers, the banner, per-row clears and row separators.
fn draw_rows(viewport: Size, options: &Options, frame: &mut OutputFrame) {
    let mut marker = [0u8; 4];
    let marker = options.margin_marker.encode_utf8(&mut marker).as_bytes();
    let cols = usize::from(viewport.cols);

    for y in 0..viewport.rows {
        if y == banner_row(viewport) {
            draw_banner(&options.banner, marker, cols, frame);
        } else {
            frame.append(marker);
        }

        ansi::clear_line(frame).ok();
        if y + 1 < viewport.rows {
            frame.append(b"\r\n");
        }
    }
}

/// The banner, truncated to `cols` and centered; the left padding starts
/// with the margin marker when there is any padding at all.
fn draw_banner(banner: &str, marker: &[u8], cols: usize, frame: &mut OutputFrame) {
    let text = truncate_to_width(banner, cols);
    let mut padding = (cols - display_width(text)) / 2;

    if padding > 0 {
        frame.append(marker);
        padding -= 1;
    }
    frame.append_repeated(b' ', padding);
    frame.append(text.as_bytes());
}

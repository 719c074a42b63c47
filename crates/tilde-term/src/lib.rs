// SPDX-License-Identifier: MIT
//
// tilde-term — terminal foundation for the tilde editor.
//
// Puts the controlling terminal into raw mode and guarantees it comes back,
// learns the viewport size (ioctl first, cursor-position probe second),
// batches each frame into one write, and decodes keystrokes including the
// VT100 sequences for arrow and page keys.
//
// No TUI framework underneath: direct termios and ANSI escape sequences.
// Everything is single-threaded and synchronous; the only wait is the
// raw-mode read timeout.

pub mod ansi;
pub mod error;
pub mod event_loop;
pub mod geometry;
pub mod input;
pub mod output;
pub mod reader;
pub mod terminal;

pub use error::TermError;

// SPDX-License-Identifier: MIT
//
// Error taxonomy for the terminal layer.
//
// Every variant here is fatal: it means the terminal environment itself is
// unusable (attributes can't be read or applied, stdin can't be read, stdout
// can't be written, or the window size can't be learned). Recoverable
// conditions — a frame buffer that couldn't grow, a truncated escape
// sequence — never surface as errors; they degrade in place.

use std::io;

/// A fatal terminal failure.
///
/// The `Display` text is the short reason (what we were doing); the
/// underlying OS error, when there is one, is available via
/// [`std::error::Error::source`] and appended by [`describe`](Self::describe).
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    /// `tcgetattr` failed — usually stdin is not a terminal.
    #[error("tcgetattr")]
    TerminalQuery(#[source] io::Error),

    /// `tcsetattr` failed while applying or restoring attributes.
    #[error("tcsetattr")]
    TerminalConfig(#[source] io::Error),

    /// Reading a byte from stdin failed for a reason other than "no data yet".
    #[error("read")]
    Read(#[source] io::Error),

    /// Writing a frame or control sequence to stdout failed.
    #[error("write")]
    Write(#[source] io::Error),

    /// Neither the window-size ioctl nor the cursor-position probe worked.
    #[error("get_window_size")]
    GeometryUnavailable,
}

impl TermError {
    /// The reason plus the underlying system error description, `perror`-style.
    ///
    /// `"tcgetattr: Inappropriate ioctl for device (os error 25)"`
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::TerminalQuery(e)
            | Self::TerminalConfig(e)
            | Self::Read(e)
            | Self::Write(e) => format!("{self}: {e}"),
            Self::GeometryUnavailable => {
                format!("{self}: terminal size could not be determined")
            }
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

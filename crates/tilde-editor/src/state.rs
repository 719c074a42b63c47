//! Editor state and key dispatch.
//!
//! [`EditorState`] is the whole of what the editor knows: where the cursor
//! is and how big the viewport is. [`EditorState::handle_key`] is the
//! dispatch table:
//!
//! | Key        | Effect                                  |
//! |------------|-----------------------------------------|
//! | arrows     | move one cell, clamped at the edges     |
//! | `Ctrl-Q`   | quit                                    |
//! | any other  | nothing                                 |

use tilde_term::event_loop::Action;
use tilde_term::geometry::Size;
use tilde_term::input::Key;

use crate::cursor::{Cursor, Direction};

/// The quit chord.
pub const QUIT_KEY: Key = Key::ctrl(b'q');

/// Cursor plus viewport, owned by the editor loop.
///
/// Invariant: the cursor is always inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorState {
    cursor: Cursor,
    viewport: Size,
}

impl EditorState {
    /// Fresh state: cursor at the origin of `viewport`.
    ///
    /// The viewport should be non-empty; a zero dimension leaves the cursor
    /// pinned at 0 on that axis.
    #[must_use]
    pub const fn new(viewport: Size) -> Self {
        Self {
            cursor: Cursor::new(),
            viewport,
        }
    }

    /// Current cursor.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Current viewport.
    #[inline]
    #[must_use]
    pub const fn viewport(&self) -> Size {
        self.viewport
    }

    /// Adopt a new viewport size, pulling the cursor back inside it.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.cursor.clamp_to(viewport);
    }

    /// Apply one key.
    pub fn handle_key(&mut self, key: Key) -> Action {
        let dir = match key {
            Key::ArrowUp => Direction::Up,
            Key::ArrowDown => Direction::Down,
            Key::ArrowLeft => Direction::Left,
            Key::ArrowRight => Direction::Right,
            QUIT_KEY => {
                tracing::debug!("quit requested");
                return Action::Quit;
            }
            Key::Char(_) | Key::PageUp | Key::PageDown | Key::Escape => {
                return Action::Continue;
            }
        };

        self.cursor.step(dir, self.viewport);
        tracing::trace!(x = self.cursor.x(), y = self.cursor.y(), "cursor moved");
        Action::Continue
    }
}

//! # tilde-editor — Editor core for tilde
//!
//! - **[`cursor`]** — `Cursor`, a screen position clamped to the viewport
//! - **[`state`]** — `EditorState` (cursor + viewport) and key dispatch
//! - **[`view`]** — the render engine: one full frame per tick
//! - **[`options`]** — banner text and margin marker
//!
//! Text buffers, file I/O and editing will sit on top of these.

pub mod cursor;
pub mod options;
pub mod state;
pub mod view;

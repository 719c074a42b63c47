//! Editor options — presentation knobs with fixed defaults.
//!
//! Nothing is read from files, flags or the environment; the editor runs
//! with [`Options::default`]. Embedders and tests build their own.
//!
//! | Field           | Default                              |
//! |-----------------|--------------------------------------|
//! | `banner`        | `Tilde editor -- version <pkg ver>`  |
//! | `margin_marker` | `~`                                  |

/// Name shown in the welcome banner.
pub const EDITOR_NAME: &str = "Tilde editor";

/// Crate version, shown in the welcome banner.
pub const EDITOR_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Presentation options for the render engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Text centered on the welcome row (one third of the way down).
    pub banner: String,

    /// Character drawn in the left margin of every empty row.
    pub margin_marker: char,
}

impl Options {
    /// Replace the banner text.
    #[must_use]
    pub fn with_banner(mut self, banner: impl Into<String>) -> Self {
        self.banner = banner.into();
        self
    }

    /// Replace the margin marker.
    #[must_use]
    pub const fn with_marker(mut self, marker: char) -> Self {
        self.margin_marker = marker;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            banner: format!("{EDITOR_NAME} -- version {EDITOR_VERSION}"),
            margin_marker: '~',
        }
    }
}

//! Cursor — a screen position clamped to the viewport.
//!
//! There is no text buffer yet, so the cursor lives in screen space: `x` is
//! a column, `y` a row, both 0-indexed. Every mutation clamps against the
//! viewport it's given. Motion at an edge stays at the edge; it never wraps.

use tilde_term::geometry::Size;

/// One step of cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A cursor position inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    x: u16,
    y: u16,
}

impl Cursor {
    /// A cursor at the top-left corner.
    #[must_use]
    pub const fn new() -> Self {
        Self { x: 0, y: 0 }
    }

    /// A cursor at `(x, y)`, clamped into `viewport`.
    #[must_use]
    pub fn at(x: u16, y: u16, viewport: Size) -> Self {
        let mut cursor = Self { x, y };
        cursor.clamp_to(viewport);
        cursor
    }

    /// Column, 0-indexed.
    #[inline]
    #[must_use]
    pub const fn x(self) -> u16 {
        self.x
    }

    /// Row, 0-indexed.
    #[inline]
    #[must_use]
    pub const fn y(self) -> u16 {
        self.y
    }

    /// Move one cell in `dir`, staying inside `viewport`.
    pub fn step(&mut self, dir: Direction, viewport: Size) {
        match dir {
            Direction::Up => self.y = self.y.saturating_sub(1),
            Direction::Down => self.y = self.y.saturating_add(1),
            Direction::Left => self.x = self.x.saturating_sub(1),
            Direction::Right => self.x = self.x.saturating_add(1),
        }
        self.clamp_to(viewport);
    }

    /// Pull the cursor back inside `viewport` (last column / last row).
    pub fn clamp_to(&mut self, viewport: Size) {
        self.x = self.x.min(viewport.cols.saturating_sub(1));
        self.y = self.y.min(viewport.rows.saturating_sub(1));
    }

    /// Whether the cursor is inside `viewport`.
    #[must_use]
    pub const fn is_within(self, viewport: Size) -> bool {
        self.x < viewport.cols && self.y < viewport.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VIEW: Size = Size { cols: 80, rows: 24 };

    #[test]
    fn starts_at_origin() {
        let c = Cursor::new();
        assert_eq!((c.x(), c.y()), (0, 0));
    }

    #[test]
    fn steps_in_each_direction() {
        let mut c = Cursor::at(5, 5, VIEW);
        c.step(Direction::Up, VIEW);
        assert_eq!((c.x(), c.y()), (5, 4));
        c.step(Direction::Down, VIEW);
        c.step(Direction::Down, VIEW);
        assert_eq!((c.x(), c.y()), (5, 6));
        c.step(Direction::Left, VIEW);
        assert_eq!((c.x(), c.y()), (4, 6));
        c.step(Direction::Right, VIEW);
        c.step(Direction::Right, VIEW);
        assert_eq!((c.x(), c.y()), (6, 6));
    }

    #[test]
    fn top_left_edges_hold() {
        let mut c = Cursor::new();
        c.step(Direction::Up, VIEW);
        c.step(Direction::Left, VIEW);
        assert_eq!(c, Cursor::new());
    }

    #[test]
    fn bottom_right_edges_hold() {
        let mut c = Cursor::at(79, 23, VIEW);
        c.step(Direction::Down, VIEW);
        c.step(Direction::Right, VIEW);
        assert_eq!((c.x(), c.y()), (79, 23));
    }

    #[test]
    fn at_clamps() {
        let c = Cursor::at(500, 500, VIEW);
        assert_eq!((c.x(), c.y()), (79, 23));
    }

    #[test]
    fn clamp_after_shrink() {
        let mut c = Cursor::at(70, 20, VIEW);
        c.clamp_to(Size { cols: 40, rows: 10 });
        assert_eq!((c.x(), c.y()), (39, 9));
    }

    #[test]
    fn single_cell_viewport() {
        let one = Size { cols: 1, rows: 1 };
        let mut c = Cursor::new();
        for dir in [Direction::Right, Direction::Down, Direction::Left, Direction::Up] {
            c.step(dir, one);
            assert_eq!(c, Cursor::new());
        }
    }

    #[test]
    fn within() {
        assert!(Cursor::at(79, 23, VIEW).is_within(VIEW));
        assert!(!Cursor::at(79, 23, VIEW).is_within(Size { cols: 79, rows: 24 }));
    }
}

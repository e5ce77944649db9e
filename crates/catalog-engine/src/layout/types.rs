//! Layout data types
//!
//! All coordinates are millimetres with the origin at the top-left corner of
//! the page and y growing downward.

/// One rectangular region on a page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// X position (left edge)
    pub x: f32,
    /// Y position (top edge)
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Cell {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x coordinate
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge y coordinate
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    /// Shrink by `padding` on every side
    pub fn inset(&self, padding: f32) -> Cell {
        Cell::new(
            self.x + padding,
            self.y + padding,
            self.width - 2.0 * padding,
            self.height - 2.0 * padding,
        )
    }

    /// Whether `other` lies entirely inside this cell (with a small tolerance)
    pub fn contains(&self, other: &Cell) -> bool {
        const EPS: f32 = 1e-3;
        other.x >= self.x - EPS
            && other.y >= self.y - EPS
            && other.right() <= self.right() + EPS
            && other.bottom() <= self.bottom() + EPS
    }
}

/// Position within the grid (row, column)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridPosition {
    /// Row index (0 = top row)
    pub row: usize,
    /// Column index (0 = leftmost column)
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

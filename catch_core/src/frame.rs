//! Display commands produced by the game logic and flushed by the render task.

use catch_traits::TextMode;

/// One pending change to the matrix. Position changes are always emitted as
/// a clear of the old cell followed by a set of the new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOp {
    Cell { row: u8, col: u8, on: bool },
    Text(String),
    Mode(TextMode),
    Clear,
}

impl FrameOp {
    #[inline]
    pub fn set(row: u8, col: u8) -> Self {
        FrameOp::Cell { row, col, on: true }
    }

    #[inline]
    pub fn unset(row: u8, col: u8) -> Self {
        FrameOp::Cell {
            row,
            col,
            on: false,
        }
    }
}

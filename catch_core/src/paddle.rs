//! Paddle position and ball possession.

use crate::ball::BallModel;
use crate::config::GridCfg;
use crate::frame::FrameOp;

/// One navigation-switch step of the paddle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Nudge {
    /// Toward row 0 (navswitch north).
    North,
    /// Toward the last row (navswitch south).
    South,
}

impl Nudge {
    #[inline]
    pub fn delta(self) -> i8 {
        match self {
            Nudge::North => -1,
            Nudge::South => 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaddleModel {
    grid: GridCfg,
    row: u8,
    holds_ball: bool,
}

impl PaddleModel {
    pub fn new(grid: GridCfg) -> Self {
        Self {
            grid,
            row: grid.start_row().min(grid.max_paddle_row()),
            holds_ball: false,
        }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn holds_ball(&self) -> bool {
        self.holds_ball
    }

    /// Emit the two cells the paddle covers. Only the top cell (`row`) catches;
    /// a ball reaching the lower cell is a miss.
    pub fn draw(&self, out: &mut Vec<FrameOp>) {
        let col = self.grid.paddle_col();
        out.push(FrameOp::set(self.row, col));
        out.push(FrameOp::set(self.row + 1, col));
    }

    /// Move one row, clamped to `[0, max_row - 1]`. A move into the edge is a
    /// no-op. A held ball moves with the paddle.
    pub fn nudge(&mut self, nudge: Nudge, ball: &mut BallModel, out: &mut Vec<FrameOp>) -> bool {
        let Some(row) = self.row.checked_add_signed(nudge.delta()) else {
            return false;
        };
        if row > self.grid.max_paddle_row() {
            return false;
        }
        let col = self.grid.paddle_col();
        out.push(FrameOp::unset(self.row, col));
        out.push(FrameOp::unset(self.row + 1, col));
        self.row = row;
        self.draw(out);
        if self.holds_ball {
            ball.shift_row(nudge.delta(), out);
        }
        true
    }

    pub fn throw_ball(&mut self) {
        self.holds_ball = false;
    }

    pub fn catch_ball(&mut self) {
        self.holds_ball = true;
    }

    /// Back to the start row, empty-handed.
    pub fn reset(&mut self) {
        self.row = self.grid.start_row().min(self.grid.max_paddle_row());
        self.holds_ball = false;
    }
}

//! Ball position, heading and animation clock.

use crate::config::GridCfg;
use crate::frame::FrameOp;

/// Heading of the ball along the column axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Toward the far edge (col 0) and the other board.
    Up,
    /// Toward this board's paddle.
    Down,
}

#[derive(Debug, Clone)]
pub struct BallModel {
    grid: GridCfg,
    row: u8,
    col: u8,
    direction: Direction,
    speed_ticks: u16,
    ticks: u16,
    in_flight: bool,
}

impl BallModel {
    pub fn new(grid: GridCfg, speed_ticks: u16) -> Self {
        Self {
            grid,
            row: grid.start_row(),
            col: grid.held_col(),
            direction: Direction::Up,
            speed_ticks: speed_ticks.max(1),
            ticks: 0,
            in_flight: false,
        }
    }

    pub fn row(&self) -> u8 {
        self.row
    }

    pub fn col(&self) -> u8 {
        self.col
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn speed_ticks(&self) -> u16 {
        self.speed_ticks
    }

    /// Motion ticks between steps; clamped to at least 1.
    pub fn set_speed(&mut self, ticks: u16) {
        self.speed_ticks = ticks.max(1);
    }

    /// Place the ball in front of the paddle's start row, held.
    pub fn init_local(&mut self, out: &mut Vec<FrameOp>) {
        self.row = self.grid.start_row();
        self.col = self.grid.held_col();
        self.direction = Direction::Up;
        self.ticks = 0;
        self.in_flight = false;
        out.push(FrameOp::set(self.row, self.col));
    }

    /// Enter from the remote edge at `position`, heading for the paddle.
    ///
    /// `position` has already been range-checked by the decoder.
    pub fn receive_remote(&mut self, position: u8, out: &mut Vec<FrameOp>) {
        debug_assert!(position <= self.grid.max_row(), "handoff row out of range");
        self.row = position.min(self.grid.max_row());
        self.col = 0;
        self.direction = Direction::Down;
        self.ticks = 0;
        self.in_flight = true;
        out.push(FrameOp::set(self.row, self.col));
    }

    /// Advance the animation clock by one motion tick. Returns true when the
    /// ball moved a cell.
    pub fn tick(&mut self, out: &mut Vec<FrameOp>) -> bool {
        if !self.in_flight {
            return false;
        }
        self.ticks = self.ticks.saturating_add(1);
        if self.ticks < self.speed_ticks {
            return false;
        }
        self.ticks = 0;
        let next = match self.direction {
            Direction::Up => self.col.saturating_sub(1),
            Direction::Down => (self.col + 1).min(self.grid.max_col()),
        };
        if next == self.col {
            return false;
        }
        out.push(FrameOp::unset(self.row, self.col));
        self.col = next;
        out.push(FrameOp::set(self.row, self.col));
        true
    }

    /// Stop on the paddle at `paddle_row`, ready to be thrown back.
    pub fn caught(&mut self, paddle_row: u8, out: &mut Vec<FrameOp>) {
        out.push(FrameOp::unset(self.row, self.col));
        self.row = paddle_row;
        self.col = self.grid.held_col();
        self.in_flight = false;
        self.direction = Direction::Up;
        self.ticks = 0;
        out.push(FrameOp::set(self.row, self.col));
    }

    /// Launch a held ball toward the far edge.
    pub fn throw(&mut self) {
        self.direction = Direction::Up;
        self.ticks = 0;
        self.in_flight = true;
    }

    /// Follow the holding paddle by one row.
    pub fn shift_row(&mut self, delta: i8, out: &mut Vec<FrameOp>) {
        let Some(row) = self.row.checked_add_signed(delta) else {
            return;
        };
        if row > self.grid.max_row() {
            return;
        }
        out.push(FrameOp::unset(self.row, self.col));
        self.row = row;
        out.push(FrameOp::set(self.row, self.col));
    }

    /// Remove the ball from this board's matrix.
    pub fn hide(&mut self, out: &mut Vec<FrameOp>) {
        out.push(FrameOp::unset(self.row, self.col));
        self.in_flight = false;
        self.ticks = 0;
    }

    /// Back to the power-up position without drawing.
    pub fn reset(&mut self) {
        self.row = self.grid.start_row();
        self.col = self.grid.held_col();
        self.direction = Direction::Up;
        self.ticks = 0;
        self.in_flight = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ball(speed: u16) -> BallModel {
        BallModel::new(GridCfg::default(), speed)
    }

    #[test]
    fn held_ball_does_not_move() {
        let mut b = ball(1);
        let mut out = Vec::new();
        b.init_local(&mut out);
        assert_eq!(out, vec![FrameOp::set(3, 3)]);
        out.clear();
        for _ in 0..10 {
            assert!(!b.tick(&mut out));
        }
        assert!(out.is_empty());
        assert_eq!((b.row(), b.col()), (3, 3));
    }

    #[test]
    fn moves_once_per_speed_ticks_with_clear_then_set() {
        let mut b = ball(3);
        let mut out = Vec::new();
        b.receive_remote(2, &mut out);
        out.clear();
        assert!(!b.tick(&mut out));
        assert!(!b.tick(&mut out));
        assert!(b.tick(&mut out));
        assert_eq!(out, vec![FrameOp::unset(2, 0), FrameOp::set(2, 1)]);
        assert_eq!(b.direction(), Direction::Down);
    }

    #[test]
    fn stops_at_edges() {
        let mut b = ball(1);
        let mut out = Vec::new();
        b.receive_remote(0, &mut out);
        for _ in 0..20 {
            b.tick(&mut out);
        }
        assert_eq!(b.col(), 4);

        b.caught(0, &mut out);
        b.throw();
        for _ in 0..20 {
            b.tick(&mut out);
        }
        assert_eq!(b.col(), 0);
    }

    #[test]
    fn caught_reverses_and_parks_in_front_of_paddle() {
        let mut b = ball(1);
        let mut out = Vec::new();
        b.receive_remote(5, &mut out);
        out.clear();
        b.caught(5, &mut out);
        assert!(!b.in_flight());
        assert_eq!(b.direction(), Direction::Up);
        assert_eq!((b.row(), b.col()), (5, 3));
        assert_eq!(out, vec![FrameOp::unset(5, 0), FrameOp::set(5, 3)]);
    }

    #[test]
    fn shift_row_ignores_out_of_grid() {
        let mut b = ball(1);
        let mut out = Vec::new();
        b.receive_remote(0, &mut out);
        out.clear();
        b.shift_row(-1, &mut out);
        assert!(out.is_empty());
        assert_eq!(b.row(), 0);
    }
}

use catch_core::{
    BallModel, DecodePolicy, Direction, GridCfg, LinkProtocol, Message, Nudge, PaddleModel,
    RoundState,
};
use proptest::prelude::*;

fn grid_strategy() -> impl Strategy<Value = GridCfg> {
    (3u8..=16, 3u8..=16).prop_map(|(rows, cols)| GridCfg { rows, cols })
}

fn nudge_strategy() -> impl Strategy<Value = Nudge> {
    prop_oneof![Just(Nudge::North), Just(Nudge::South)]
}

proptest! {
    #[test]
    fn paddle_never_leaves_its_range(
        grid in grid_strategy(),
        moves in proptest::collection::vec(nudge_strategy(), 0..64),
    ) {
        let mut paddle = PaddleModel::new(grid);
        let mut ball = BallModel::new(grid, 1);
        let mut out = Vec::new();
        for m in moves {
            paddle.nudge(m, &mut ball, &mut out);
            prop_assert!(paddle.row() <= grid.max_paddle_row());
        }
    }

    #[test]
    fn opposite_moves_cancel_away_from_edges(
        grid in grid_strategy(),
        steps in 0u8..16,
    ) {
        let mut paddle = PaddleModel::new(grid);
        let mut ball = BallModel::new(grid, 1);
        let mut out = Vec::new();
        for _ in 0..steps {
            paddle.nudge(Nudge::North, &mut ball, &mut out);
        }
        let p = paddle.row();
        if p < grid.max_paddle_row() {
            paddle.nudge(Nudge::South, &mut ball, &mut out);
            paddle.nudge(Nudge::North, &mut ball, &mut out);
            prop_assert_eq!(paddle.row(), p);
        }
        if p > 0 {
            paddle.nudge(Nudge::North, &mut ball, &mut out);
            paddle.nudge(Nudge::South, &mut ball, &mut out);
            prop_assert_eq!(paddle.row(), p);
        }
    }

    #[test]
    fn ball_steps_once_per_speed_ticks_toward_paddle(
        grid in grid_strategy(),
        speed in 1u16..50,
        row_seed in any::<u8>(),
    ) {
        let row = row_seed % grid.rows;
        let mut ball = BallModel::new(grid, speed);
        let mut out = Vec::new();
        ball.receive_remote(row, &mut out);
        let mut last = ball.col();
        let total = u32::from(speed) * u32::from(grid.cols) + 5;
        for i in 1..=total {
            let moved = ball.tick(&mut out);
            let col = ball.col();
            prop_assert!(col <= grid.max_col());
            prop_assert!(col >= last);
            let on_schedule = i % u32::from(speed) == 0 && last < grid.max_col();
            prop_assert_eq!(moved, on_schedule);
            prop_assert_eq!(col, if moved { last + 1 } else { last });
            last = col;
        }
        prop_assert_eq!(ball.col(), grid.max_col());
        prop_assert_eq!(ball.direction(), Direction::Down);
    }

    #[test]
    fn thrown_ball_heads_for_far_edge(
        grid in grid_strategy(),
        speed in 1u16..20,
    ) {
        let mut ball = BallModel::new(grid, speed);
        let mut out = Vec::new();
        ball.init_local(&mut out);
        ball.throw();
        let mut last = ball.col();
        for _ in 0..(u32::from(speed) * u32::from(grid.cols) + 5) {
            ball.tick(&mut out);
            prop_assert!(ball.col() <= last);
            last = ball.col();
        }
        prop_assert_eq!(ball.col(), 0);
    }

    #[test]
    fn receive_then_speed_ticks_moves_one_step(
        grid in grid_strategy(),
        speed in 1u16..100,
        row_seed in any::<u8>(),
    ) {
        let row = row_seed % grid.rows;
        let mut ball = BallModel::new(grid, speed);
        let mut out = Vec::new();
        ball.receive_remote(row, &mut out);
        prop_assert_eq!((ball.row(), ball.col()), (row, 0));
        for _ in 0..speed {
            ball.tick(&mut out);
        }
        prop_assert_eq!(ball.col(), 1);
        prop_assert_eq!(ball.row(), row);
    }

    #[test]
    fn handoff_round_trips_for_every_row(rows in 3u8..=16, row_seed in any::<u8>()) {
        let grid = GridCfg { rows, cols: 5 };
        let proto = LinkProtocol::new(grid.max_row(), DecodePolicy::Strict);
        let r = row_seed % rows;
        let byte = proto.encode(Message::BallHandoff(r));
        prop_assert_eq!(proto.decode(byte, RoundState::Playing), Ok(Message::BallHandoff(r)));
        let win = proto.encode(Message::Win);
        prop_assert_ne!(win, byte);
        prop_assert_eq!(proto.decode(win, RoundState::Playing), Ok(Message::Win));
    }

    #[test]
    fn strict_decode_never_panics(byte in any::<u8>()) {
        let proto = LinkProtocol::new(6, DecodePolicy::Strict);
        for state in [RoundState::Init, RoundState::Setup, RoundState::Playing, RoundState::Over] {
            let _ = proto.decode(byte, state);
        }
    }
}

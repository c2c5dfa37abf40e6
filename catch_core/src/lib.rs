#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core catch-game logic (hardware-agnostic).
//!
//! Two boards each drive a small dot matrix and pass one ball between them
//! over a single-byte serial link. All peripheral access goes through the
//! traits in `catch_traits`.
//!
//! ## Architecture
//!
//! - **Models**: `BallModel` and `PaddleModel` emit `FrameOp`s for every change
//! - **Protocol**: `LinkProtocol` encodes `Message`s and decodes bytes by round state
//! - **Session**: `GameSession` owns the round state machine, score and outbox
//! - **Board**: binds a session to peripherals and runs the scheduled tasks
//! - **Runner**: steps two boards in lockstep, optionally paced by a `Clock`

pub mod ball;
pub mod board;
pub mod config;
pub mod conversions;
pub mod error;
pub mod frame;
pub mod hw_error;
pub mod mocks;
pub mod paddle;
pub mod protocol;
pub mod runner;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod util;

pub use ball::{BallModel, Direction};
pub use board::{Board, BoardBuilder};
pub use config::{
    DecodePolicy, GameCfg, GridCfg, ServeRole, SpeedTable, SpeedTier, TaskRates, ToneCfg,
};
pub use error::{BuildError, GameError, Result};
pub use frame::FrameOp;
pub use paddle::{Nudge, PaddleModel};
pub use protocol::{LinkProtocol, Message, ProtocolFault, RESET_SENTINEL, WIN_SENTINEL};
pub use runner::{RunOptions, RunReport, run_pair};
pub use scheduler::{Scheduler, Task};
pub use session::{GameSession, LinkStats, ToneCue};
pub use state::{Outcome, RoundState};

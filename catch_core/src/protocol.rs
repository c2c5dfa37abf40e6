//! Single-byte link protocol between the two boards.
//!
//! Wire alphabet:
//!
//! | byte            | Setup         | Playing        | Over          |
//! |-----------------|---------------|----------------|---------------|
//! | `0..=2`         | SpeedSelect   | BallHandoff    | fault         |
//! | `3..=max_row`   | fault         | BallHandoff    | fault         |
//! | `WIN_SENTINEL`  | fault         | Win            | fault         |
//! | `RESET_SENTINEL`| fault         | fault          | ResetRequest  |
//!
//! The byte carries no kind tag, so the receiver's round state selects the
//! interpretation. Nothing is acknowledged or retried; the link is trusted to
//! be reliable and in order.

use thiserror::Error;

use crate::config::{DecodePolicy, SpeedTier};
use crate::state::RoundState;

/// Sent by the board that missed the ball; the receiver has won.
pub const WIN_SENTINEL: u8 = 0xF0;
/// Sent by a board asking both sides to start a new round.
pub const RESET_SENTINEL: u8 = 0xF1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Ball leaves the sender; payload is the row in the receiver's frame.
    BallHandoff(u8),
    Win,
    ResetRequest,
    SpeedSelect(SpeedTier),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolFault {
    #[error("handoff row {byte} outside 0..={max_row}")]
    HandoffOutOfRange { byte: u8, max_row: u8 },
    #[error("unknown speed index {0}")]
    UnknownSpeed(u8),
    #[error("byte {byte:#04x} not expected in {state}")]
    Unexpected { byte: u8, state: RoundState },
    #[error("handoff received while the ball is already on this board")]
    BallAlreadyHere,
}

#[derive(Debug, Clone, Copy)]
pub struct LinkProtocol {
    max_row: u8,
    policy: DecodePolicy,
}

impl LinkProtocol {
    pub fn new(max_row: u8, policy: DecodePolicy) -> Self {
        debug_assert!(max_row < WIN_SENTINEL, "rows collide with sentinels");
        Self { max_row, policy }
    }

    pub fn encode(&self, msg: Message) -> u8 {
        match msg {
            Message::BallHandoff(row) => row,
            Message::Win => WIN_SENTINEL,
            Message::ResetRequest => RESET_SENTINEL,
            Message::SpeedSelect(tier) => tier.index(),
        }
    }

    /// Interpret `byte` in the context of the receiver's `state`.
    pub fn decode(&self, byte: u8, state: RoundState) -> Result<Message, ProtocolFault> {
        match state {
            RoundState::Setup => match SpeedTier::from_index(byte) {
                Some(tier) => Ok(Message::SpeedSelect(tier)),
                None if self.policy == DecodePolicy::Lenient => {
                    Ok(Message::SpeedSelect(SpeedTier::Medium))
                }
                None => Err(ProtocolFault::UnknownSpeed(byte)),
            },
            RoundState::Playing => match byte {
                WIN_SENTINEL => Ok(Message::Win),
                row if row <= self.max_row => Ok(Message::BallHandoff(row)),
                RESET_SENTINEL => Err(ProtocolFault::Unexpected { byte, state }),
                _ => Err(ProtocolFault::HandoffOutOfRange {
                    byte,
                    max_row: self.max_row,
                }),
            },
            RoundState::Over => match (byte, self.policy) {
                (RESET_SENTINEL, _) | (_, DecodePolicy::Lenient) => Ok(Message::ResetRequest),
                _ => Err(ProtocolFault::Unexpected { byte, state }),
            },
            RoundState::Init => Err(ProtocolFault::Unexpected { byte, state }),
        }
    }
}

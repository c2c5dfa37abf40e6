//! Round lifecycle states and outcomes.

use std::fmt;

/// Lifecycle of one round: Init → Setup → Playing → Over → Init.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundState {
    /// Banner scrolling; waiting for a push.
    #[default]
    Init,
    /// Choosing the speed.
    Setup,
    Playing,
    /// Round decided; waiting for the reset handshake.
    Over,
}

impl RoundState {
    pub fn name(self) -> &'static str {
        match self {
            RoundState::Init => "init",
            RoundState::Setup => "setup",
            RoundState::Playing => "playing",
            RoundState::Over => "over",
        }
    }
}

impl fmt::Display for RoundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the last round ended for this board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Lose,
}

impl Outcome {
    pub fn name(self) -> &'static str {
        match self {
            Outcome::Win => "win",
            Outcome::Lose => "lose",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

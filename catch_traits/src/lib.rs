//! Peripheral boundaries consumed by the game core.
//!
//! Each board owns one of each: a dot-matrix display, a five-way navigation
//! switch, a half-duplex serial link to the other board and a buzzer.
pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock};

/// Error type returned across every peripheral boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Text presentation on the matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    /// Text scrolls across the matrix.
    Scroll,
    /// One character at a time, replaced on each update.
    Step,
}

/// Edge-triggered navigation switch events; each fires once per actuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    North,
    South,
    East,
    West,
    Push,
}

pub trait DotMatrix {
    fn set_cell(&mut self, row: u8, col: u8, on: bool) -> Result<(), BoxError>;
    fn refresh(&mut self) -> Result<(), BoxError>;
    fn show_text(&mut self, text: &str) -> Result<(), BoxError>;
    fn set_text_mode(&mut self, mode: TextMode) -> Result<(), BoxError>;
    fn clear(&mut self) -> Result<(), BoxError>;
}

pub trait NavSwitch {
    /// Append the events seen since the previous poll.
    fn poll(&mut self, events: &mut Vec<NavEvent>) -> Result<(), BoxError>;
}

pub trait SerialLink {
    /// Queue one byte for transmission; never blocks.
    fn try_send(&mut self, byte: u8) -> Result<(), BoxError>;
    fn byte_ready(&mut self) -> bool;
    /// Only valid after `byte_ready()` returned true.
    fn receive_byte(&mut self) -> Result<u8, BoxError>;
}

pub trait Buzzer {
    /// Start playing a note sequence; the previous one is replaced.
    fn play_sequence(&mut self, token: &str) -> Result<(), BoxError>;
}

//! Simulated peripherals for running boards on a host.
//!
//! Every type here implements one of the `catch_traits` boundaries. Errors
//! are `error::HwError`, boxed at the trait boundary.
pub mod buzzer;
pub mod error;
pub mod link;
pub mod matrix;
pub mod nav;
pub mod util;

pub use buzzer::LoggingBuzzer;
pub use link::SimulatedLink;
pub use matrix::FrameBuffer;
pub use nav::ScriptedNavSwitch;

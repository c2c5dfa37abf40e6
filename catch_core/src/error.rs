use thiserror::Error;

/// Peripheral failures surfaced by board tasks. Protocol faults never reach
/// here; they are logged and counted by the session.
#[derive(Debug, Error, Clone)]
pub enum GameError {
    #[error("peripheral error: {0}")]
    Peripheral(String),
    #[error("serial link error: {0}")]
    Link(String),
}

#[derive(Debug, Error, Clone)]
pub enum BuildError {
    #[error("display not provided")]
    MissingDisplay,
    #[error("navigation switch not provided")]
    MissingInput,
    #[error("serial link not provided")]
    MissingLink,
    #[error("buzzer not provided")]
    MissingBuzzer,
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;

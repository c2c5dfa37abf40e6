use thiserror::Error;

#[derive(Debug, Error)]
pub enum HwError {
    #[error("serial link disconnected")]
    LinkClosed,
    #[error("serial link: no byte pending")]
    NoByte,
    #[error("cell ({row}, {col}) outside {rows}x{cols} matrix")]
    OutOfBounds { row: u8, col: u8, rows: u8, cols: u8 },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HwError>;

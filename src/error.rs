//! Error type shared by every module of the crate.

use thiserror::Error;

/// Errors produced by the matrix algebra, the bit packer, the codec and the
/// stream layer.
///
/// Shape, index and bit-count variants are contract violations and indicate a
/// programming defect. `UncorrectableError` is an expected outcome of decoding
/// a codeword hit by two or more bit errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid matrix shape: {0}")]
    InvalidShape(String),

    #[error("Matrix dimensions mismatch: {0}")]
    DimensionMismatch(String),

    #[error("Invalid bit value {0}, expected 0 or 1")]
    InvalidValue(u8),

    #[error("Index ({row}, {col}) out of range for a {rows}x{cols} matrix")]
    IndexOutOfRange {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("Invalid bit count {0}, expected a value in [0, 8]")]
    InvalidBitCount(usize),

    #[error("Invalid bit sequence length {0}, expected at most 8 bits")]
    InvalidLength(usize),

    #[error("Uncorrectable error in codeword {0:#010b}")]
    UncorrectableError(u8),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

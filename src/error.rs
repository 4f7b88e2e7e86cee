use thiserror::Error;

/// Precondition violations raised by the aggregation core.
///
/// None of these are retried: a run either completes the growth loop or
/// aborts with one of these.
#[derive(Debug, Error, PartialEq)]
pub enum DlaError {
    #[error("lattice length {length} too small, expected L > {min}")]
    LatticeTooSmall { length: usize, min: usize },
    #[error("run name {name:?} must be non-empty and contain no whitespace")]
    InvalidRunName { name: String },
    #[error("cell ({row}, {col}) is outside the {size}x{size} lattice")]
    OutOfBounds { row: i64, col: i64, size: usize },
    #[error("cell ({row}, {col}) is already occupied")]
    AlreadyOccupied { row: i64, col: i64 },
    #[error("generation label must be non-zero")]
    ZeroLabel,
}

pub type Result<T> = std::result::Result<T, DlaError>;

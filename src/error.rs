use thiserror::Error;

/// Errors raised while building boards and hyperparameter schedules
#[derive(Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error("no cost for tile '{label}' at ({row}, {col})")]
    MissingCost {
        label: String,
        row: usize,
        col: usize,
    },

    #[error("board is not square: row {row} has {found} tiles, expected {expected}")]
    NotSquare {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("board side must be at least 2, got {side}")]
    TooSmall { side: usize },

    #[error("`vi - vf` must have same sign as `rate` (rate={rate}, vi={vi}, vf={vf})")]
    InvalidDecay { rate: f64, vi: f64, vf: f64 },
}

pub type Result<T> = std::result::Result<T, Error>;

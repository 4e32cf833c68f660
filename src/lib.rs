//! Tabular Q-learning for a knight crossing a square board of typed tiles.
//!
//! A [`Board`] maps each tile to a reward, a [`QTable`] holds one value per
//! (state, direction) pair, a [`Trainer`] fills the table by epsilon greedy
//! exploration, and [`play()`] walks the learned greedy policy.

/// Board layout and per-tile rewards
pub mod board;

/// State index and coordinate conversions
pub mod coord;

/// Implementations of strategies for time-decaying hyperparameters
pub mod decay;

mod error;

/// Exploration policies
pub mod exploration;

/// Greedy playback of a trained table
pub mod play;

/// Q-value table and the temporal difference update
pub mod q_table;

/// Episodic training loop
pub mod train;

mod util;

/// Terminal dashboard for training runs
#[cfg(feature = "viz")]
pub mod viz;

pub use board::Board;
pub use coord::Direction;
pub use error::{Error, Result};
pub use play::{play, Outcome, PlayConfig};
pub use q_table::QTable;
pub use train::{EpisodeOutcome, EpisodeSummary, TrainConfig, TrainReport, Trainer};

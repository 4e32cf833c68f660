use std::{fmt::Display, io, thread, time::Duration};

use log::{info, warn};

use crate::{
    board::Board,
    coord::{successor, to_2d},
    q_table::QTable,
};

/// Configuration for [`play`]
#[derive(Debug, Clone, PartialEq)]
pub struct PlayConfig {
    /// State the knight starts in
    ///
    /// **Default**: `0`
    pub start: usize,
    /// Stop once the accumulated cost reaches this
    ///
    /// **Default**: `50.0`
    pub success: f64,
    /// Give up once the accumulated cost drops below this
    ///
    /// **Default**: `-10.0`
    pub stuck: f64,
    /// Hard ceiling on the number of moves
    ///
    /// **Default**: `100`
    pub max_steps: u32,
    /// Pause before each move
    ///
    /// **Default**: one second
    pub delay: Duration,
}

impl Default for PlayConfig {
    fn default() -> Self {
        Self {
            start: 0,
            success: 50.0,
            stuck: -10.0,
            max_steps: 100,
            delay: Duration::from_secs(1),
        }
    }
}

/// How a playback run ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// Accumulated cost reached the success threshold
    Reached { steps: u32, cost: f64 },
    /// Accumulated cost fell below the stuck threshold
    Stuck { steps: u32, cost: f64 },
    /// Step ceiling hit with neither threshold crossed
    StepLimit { steps: u32, cost: f64 },
}

pub const RETRAIN_MESSAGE: &str =
    "Ended game due to bad performance,\nplease retrain with different parameters.";

/// Walk the greedy policy of `table` across `board`, drawing each step to `out`
///
/// Writes the table and the starting board first. Each move adds the value of the
/// chosen pair to the accumulated cost, moves the knight and draws the board. The
/// table is only read.
///
/// **Panics** if `table` was not built for a board the size of `board`.
pub fn play<T, W>(
    table: &QTable,
    board: &mut Board<T>,
    config: &PlayConfig,
    out: &mut W,
) -> io::Result<Outcome>
where
    T: Clone + Display,
    W: io::Write,
{
    assert_eq!(
        table.width(),
        board.width(),
        "Q-table and board sizes differ"
    );
    let width = board.width();
    let mut state = config.start;
    let mut cost = 0.0;
    let mut steps = 0;

    board.set_agent_position(to_2d(state, width));
    writeln!(out, "\nQ-Table:\n{table}")?;
    writeln!(out, "Game:\n{}", board.render())?;

    let outcome = loop {
        if cost >= config.success {
            break Outcome::Reached { steps, cost };
        }
        if steps >= config.max_steps {
            break Outcome::StepLimit { steps, cost };
        }
        if !config.delay.is_zero() {
            thread::sleep(config.delay);
        }

        let dir = table.best_direction(state);
        cost += table.row(state)[dir.index()];
        state = successor(state, dir, width);
        steps += 1;
        board.set_agent_position(to_2d(state, width));

        if cost < config.stuck {
            writeln!(out, "{RETRAIN_MESSAGE}")?;
            break Outcome::Stuck { steps, cost };
        }
        writeln!(out, "{}", board.render())?;
    };

    match outcome {
        Outcome::Stuck { .. } => warn!("playback stuck: {outcome:?}"),
        _ => info!("playback finished: {outcome:?}"),
    }
    Ok(outcome)
}

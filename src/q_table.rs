use std::fmt;

use strum::VariantArray;

use crate::{
    board::Board,
    coord::{checked_successor, Direction},
};

/// Q-values for every (state, direction) pair of a square board
///
/// Pairs whose move would leave the board are masked with NaN when the table is
/// built. Masked pairs are never written, never chosen, and never take part in
/// the max over a successor's values.
#[derive(Debug, Clone)]
pub struct QTable {
    width: usize,
    values: Vec<[f64; 4]>,
}

impl QTable {
    /// Zero-initialized table for a board whose last column index is `width`
    pub fn new(width: usize) -> Self {
        let side = width + 1;
        let values = (0..side * side)
            .map(|state| {
                let mut row = [0.0; 4];
                for &dir in Direction::VARIANTS {
                    if checked_successor(state, dir, width).is_none() {
                        row[dir.index()] = f64::NAN;
                    }
                }
                row
            })
            .collect();
        Self { width, values }
    }

    /// Zero-initialized table sized for `board`
    pub fn for_board<T>(board: &Board<T>) -> Self {
        Self::new(board.width())
    }

    /// Index of the last column of the board this table was built for
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn num_states(&self) -> usize {
        self.values.len()
    }

    /// Raw row of values for `state`, with NaN in masked slots
    pub fn row(&self, state: usize) -> &[f64; 4] {
        &self.values[state]
    }

    pub fn is_legal(&self, state: usize, dir: Direction) -> bool {
        !self.values[state][dir.index()].is_nan()
    }

    /// Value of a pair, or `None` if the pair is masked
    pub fn get(&self, state: usize, dir: Direction) -> Option<f64> {
        let value = self.values[state][dir.index()];
        (!value.is_nan()).then_some(value)
    }

    /// Directions that keep the knight on the board from `state`
    pub fn legal_directions(&self, state: usize) -> Vec<Direction> {
        Direction::VARIANTS
            .iter()
            .copied()
            .filter(|&dir| self.is_legal(state, dir))
            .collect()
    }

    /// Legal direction with the highest value; the first one wins ties
    ///
    /// Every state of a board with side >= 2 has at least two legal directions.
    pub fn best_direction(&self, state: usize) -> Direction {
        self.legal_directions(state)
            .into_iter()
            .fold(None, |best: Option<(Direction, f64)>, dir| {
                let value = self.values[state][dir.index()];
                match best {
                    Some((_, v)) if v >= value => best,
                    _ => Some((dir, value)),
                }
            })
            .map(|(dir, _)| dir)
            .expect("every state has a legal direction")
    }

    /// Highest value over the legal directions of `state`
    pub fn max_value(&self, state: usize) -> f64 {
        self.values[state]
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Q-learning update:
    ///
    /// Q(s,a) ← Q(s,a) + α[r + γ max<sub>a'</sub> Q(s',a') - Q(s,a)]
    ///
    /// The max runs over the legal directions of `next_state` only.
    ///
    /// **Returns** the new value, or `None` without writing anything if `(state, dir)`
    /// is masked.
    pub fn update(
        &mut self,
        state: usize,
        dir: Direction,
        reward: f64,
        next_state: usize,
        learn_rate: f64,
        discount: f64,
    ) -> Option<f64> {
        let q_value = self.get(state, dir)?;
        let max_next_q = self.max_value(next_state);
        let td_error = reward + discount * max_next_q - q_value;
        let new_q_value = q_value + learn_rate * td_error;
        self.values[state][dir.index()] = new_q_value;
        Some(new_q_value)
    }

    /// Greedy direction for every state, in state order
    pub fn policy(&self) -> Vec<Direction> {
        (0..self.num_states())
            .map(|state| self.best_direction(state))
            .collect()
    }

    /// Greedy policy drawn as one arrow per tile, one row per line
    pub fn policy_grid(&self) -> String {
        self.policy()
            .chunks(self.width + 1)
            .map(|row| row.iter().map(|dir| dir.arrow()).collect::<String>() + "\n")
            .collect()
    }
}

impl fmt::Display for QTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", "state")?;
        for dir in Direction::VARIANTS {
            write!(f, " {:>9}", dir.to_string())?;
        }
        writeln!(f)?;
        for (state, row) in self.values.iter().enumerate() {
            write!(f, "{state:>6}")?;
            for value in row {
                if value.is_nan() {
                    write!(f, " {:>9}", "-")?;
                } else {
                    write!(f, " {value:>9.3}")?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

//! Conversions between flattened state indices, grid coordinates, and moves.
//!
//! Every function here takes `width`, the index of the last column of the
//! board (its side length minus one). A state is the row-major index of a cell.

use strum::{Display, FromRepr, VariantArray};

/// Grid coordinates as `(row, col)`
pub type Pos = (usize, usize);

/// One of the four grid-aligned moves available to the knight
///
/// The discriminant is the column of the move in a [`QTable`](crate::q_table::QTable) row.
#[derive(VariantArray, FromRepr, Display, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// `(row, col)` offset of a single move
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Right => (0, 1),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
        }
    }

    /// Column of this direction in a Q-table row
    pub fn index(self) -> usize {
        self as usize
    }

    /// Single-glyph arrow used when drawing a policy
    pub fn arrow(self) -> char {
        match self {
            Direction::Up => '↑',
            Direction::Right => '→',
            Direction::Down => '↓',
            Direction::Left => '←',
        }
    }
}

/// Row and column of `state`
pub fn to_2d(state: usize, width: usize) -> Pos {
    let cols = width + 1;
    (state / cols, state % cols)
}

/// State index of `pos`, the inverse of [`to_2d`]
pub fn to_1d(pos: Pos, width: usize) -> usize {
    pos.0 * (width + 1) + pos.1
}

/// State reached by moving from `state` in `dir`, or `None` if the move leaves the grid
///
/// The grid is assumed square, so `width` bounds rows as well as columns.
pub fn checked_successor(state: usize, dir: Direction, width: usize) -> Option<usize> {
    let (row, col) = to_2d(state, width);
    let (dr, dc) = dir.delta();
    let row = row.checked_add_signed(dr).filter(|&r| r <= width)?;
    let col = col.checked_add_signed(dc).filter(|&c| c <= width)?;
    Some(to_1d((row, col), width))
}

/// State reached by moving from `state` in `dir`
///
/// `dir` must be legal at `state`, i.e. the move stays on the board. The Q-table
/// masks every illegal pair so callers that only pick legal directions never hit this.
///
/// **Panics** in debug builds if the move leaves the grid. Release builds return an
/// unspecified index.
pub fn successor(state: usize, dir: Direction, width: usize) -> usize {
    let next = checked_successor(state, dir, width);
    debug_assert!(
        next.is_some(),
        "{dir} from state {state} leaves a board of width {width}"
    );
    next.unwrap_or(usize::MAX)
}

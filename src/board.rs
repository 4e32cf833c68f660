use std::{
    collections::HashMap,
    fmt::{self, Display, Write},
    hash::Hash,
};

use crate::{
    coord::Pos,
    error::{Error, Result},
};

/// Tile layout of a square board and the reward for standing on each tile
///
/// Rewards are looked up once at construction from a cost table and never change.
/// The tile grid itself is only touched while rendering, where the tile under the
/// knight is swapped for a marker and put back before [`render`](Board::render) returns.
#[derive(Debug, Clone)]
pub struct Board<T> {
    tiles: Vec<Vec<T>>,
    rewards: Vec<Vec<i32>>,
    marker: T,
    agent_position: Pos,
}

impl<T> Board<T>
where
    T: Clone + Eq + Hash + Display,
{
    /// Build a board from rows of tile labels and a `label -> reward` table
    ///
    /// `marker` is drawn in place of the tile the knight stands on.
    ///
    /// **Errors** if the grid is not square, has a side shorter than 2, or holds a
    /// label missing from `costs`.
    pub fn new(tiles: Vec<Vec<T>>, costs: &HashMap<T, i32>, marker: T) -> Result<Self> {
        let side = tiles.len();
        if side < 2 {
            return Err(Error::TooSmall { side });
        }

        let rewards = tiles
            .iter()
            .enumerate()
            .map(|(row, line)| {
                if line.len() != side {
                    return Err(Error::NotSquare {
                        row,
                        expected: side,
                        found: line.len(),
                    });
                }
                line.iter()
                    .enumerate()
                    .map(|(col, label)| {
                        costs.get(label).copied().ok_or_else(|| Error::MissingCost {
                            label: label.to_string(),
                            row,
                            col,
                        })
                    })
                    .collect()
            })
            .collect::<Result<Vec<Vec<i32>>>>()?;

        Ok(Self {
            tiles,
            rewards,
            marker,
            agent_position: (0, 0),
        })
    }
}

impl<T> Board<T> {
    /// Number of rows (and columns)
    pub fn side(&self) -> usize {
        self.tiles.len()
    }

    /// Index of the last column, the `width` expected by [`coord`](crate::coord)
    pub fn width(&self) -> usize {
        self.side() - 1
    }

    /// Number of states, one per tile
    pub fn num_states(&self) -> usize {
        self.side() * self.side()
    }

    pub fn reward_at(&self, row: usize, col: usize) -> i32 {
        self.rewards[row][col]
    }

    pub fn tile_at(&self, row: usize, col: usize) -> &T {
        &self.tiles[row][col]
    }

    pub fn agent_position(&self) -> Pos {
        self.agent_position
    }

    pub fn set_agent_position(&mut self, pos: Pos) {
        assert!(
            pos.0 < self.side() && pos.1 < self.side(),
            "position {pos:?} is off a board of side {}",
            self.side()
        );
        self.agent_position = pos;
    }
}

impl<T: Clone + Display> Board<T> {
    /// Draw the board one row per line with the knight's tile replaced by the marker
    pub fn render(&mut self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.render_into(&mut out);
        out
    }

    /// Like [`render`](Board::render) but into any [`fmt::Write`]
    ///
    /// The tile under the knight is restored even if `out` fails midway.
    pub fn render_into<W: Write>(&mut self, out: &mut W) -> fmt::Result {
        let marked = Marked::new(&mut self.tiles, self.agent_position, self.marker.clone());
        for row in marked.tiles.iter() {
            for tile in row {
                write!(out, "{tile}")?;
            }
            out.write_char('\n')?;
        }
        Ok(())
    }
}

/// Scoped marker substitution: swaps a tile in on creation and back out on drop
struct Marked<'a, T> {
    tiles: &'a mut Vec<Vec<T>>,
    pos: Pos,
    under: Option<T>,
}

impl<'a, T> Marked<'a, T> {
    fn new(tiles: &'a mut Vec<Vec<T>>, pos: Pos, marker: T) -> Self {
        let under = std::mem::replace(&mut tiles[pos.0][pos.1], marker);
        Self {
            tiles,
            pos,
            under: Some(under),
        }
    }
}

impl<T> Drop for Marked<'_, T> {
    fn drop(&mut self) {
        if let Some(under) = self.under.take() {
            self.tiles[self.pos.0][self.pos.1] = under;
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn grid(rows: &[&str]) -> Vec<Vec<char>> {
        rows.iter().map(|r| r.chars().collect()).collect()
    }

    pub(crate) fn costs() -> HashMap<char, i32> {
        HashMap::from([('O', -1), ('E', -100), ('P', 100)])
    }

    #[test]
    fn rewards_follow_costs() {
        let board = Board::new(grid(&["OE", "PO"]), &costs(), 'K').unwrap();
        assert_eq!(board.side(), 2);
        assert_eq!(board.width(), 1);
        assert_eq!(board.num_states(), 4);
        assert_eq!(board.reward_at(0, 0), -1);
        assert_eq!(board.reward_at(0, 1), -100);
        assert_eq!(board.reward_at(1, 0), 100);
        assert_eq!(board.reward_at(1, 1), -1);
    }

    #[test]
    fn missing_cost_fails() {
        let err = Board::new(grid(&["OO", "OX"]), &costs(), 'K').unwrap_err();
        assert_eq!(
            err,
            Error::MissingCost {
                label: "X".into(),
                row: 1,
                col: 1
            }
        );
    }

    #[test]
    fn shape_is_validated() {
        assert_eq!(
            Board::new(grid(&["OOO", "OO", "OOO"]), &costs(), 'K').unwrap_err(),
            Error::NotSquare {
                row: 1,
                expected: 3,
                found: 2
            }
        );
        assert_eq!(
            Board::new(grid(&["O"]), &costs(), 'K').unwrap_err(),
            Error::TooSmall { side: 1 }
        );
    }

    #[test]
    fn arbitrary_labels() {
        let tiles = vec![vec!["grass", "lava"], vec!["grass", "castle"]];
        let costs = HashMap::from([("grass", -1), ("lava", -50), ("castle", 20)]);
        let mut board = Board::new(tiles, &costs, "knight").unwrap();
        assert_eq!(board.reward_at(1, 1), 20);
        assert_eq!(board.render(), "knightlava\ngrasscastle\n");
    }

    #[test]
    fn render_marks_and_restores() {
        let mut board = Board::new(grid(&["OOO", "OEO", "OOP"]), &costs(), 'K').unwrap();
        assert_eq!(board.render(), "KOO\nOEO\nOOP\n");

        board.set_agent_position((1, 1));
        assert_eq!(board.render(), "OOO\nOKO\nOOP\n");
        assert_eq!(*board.tile_at(1, 1), 'E');
        assert_eq!(board.reward_at(1, 1), -100);
    }

    struct FailingWriter {
        budget: usize,
    }

    impl Write for FailingWriter {
        fn write_str(&mut self, s: &str) -> fmt::Result {
            if self.budget < s.len() {
                return Err(fmt::Error);
            }
            self.budget -= s.len();
            Ok(())
        }
    }

    #[test]
    fn render_restores_on_failure() {
        let mut board = Board::new(grid(&["OO", "OP"]), &costs(), 'K').unwrap();
        board.set_agent_position((1, 1));

        let result = board.render_into(&mut FailingWriter { budget: 1 });
        assert!(result.is_err());
        assert_eq!(*board.tile_at(1, 1), 'P');
        assert_eq!(board.render(), "OO\nOK\n");
    }

    #[test]
    #[should_panic]
    fn agent_position_is_bounded() {
        let mut board = Board::new(grid(&["OO", "OO"]), &costs(), 'K').unwrap();
        board.set_agent_position((2, 0));
    }
}

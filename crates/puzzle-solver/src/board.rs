//! N×N sliding-tile board.
//!
//! Tiles are stored row-major with `0` as the blank. Boards deserialize from
//! a JSON array of rows and parse from the classic text format (dimension
//! followed by the tiles), running the same validation either way.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::BoardError;
use crate::state::{PuzzleState, Successors};

/// Label of the blank cell
pub const BLANK: u16 = 0;

/// Largest dimension whose labels `0..dim*dim` fit in a `u16`.
pub const MAX_DIM: usize = 256;

fn check_dimension(dim: usize) -> Result<(), BoardError> {
    match dim {
        0 => Err(BoardError::Empty),
        1 => Err(BoardError::TooSmall { dim }),
        d if d > MAX_DIM => Err(BoardError::TooLarge { dim, max: MAX_DIM }),
        _ => Ok(()),
    }
}

/// Direction the blank moves in a slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slide {
    Up,
    Down,
    Left,
    Right,
}

impl Slide {
    pub const ALL: [Slide; 4] = [Slide::Up, Slide::Down, Slide::Left, Slide::Right];

    pub fn delta(self) -> (isize, isize) {
        match self {
            Slide::Up => (-1, 0),
            Slide::Down => (1, 0),
            Slide::Left => (0, -1),
            Slide::Right => (0, 1),
        }
    }
}

/// An immutable puzzle configuration
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u16>>", into = "Vec<Vec<u16>>")]
pub struct Board {
    dim: usize,
    tiles: Box<[u16]>,
    blank: usize,
}

impl Board {
    /// Build a board from rows, rejecting anything that is not a square
    /// permutation of `0..dim*dim`.
    pub fn new(rows: Vec<Vec<u16>>) -> Result<Self, BoardError> {
        let dim = rows.len();
        check_dimension(dim)?;
        for (row, cells) in rows.iter().enumerate() {
            if cells.len() != dim {
                return Err(BoardError::NotSquare {
                    row,
                    len: cells.len(),
                    dim,
                });
            }
        }
        Self::from_flat(dim, rows.into_iter().flatten().collect())
    }

    /// `dim` must already have passed `check_dimension`.
    fn from_flat(dim: usize, tiles: Vec<u16>) -> Result<Self, BoardError> {
        let cells = dim * dim;
        if tiles.len() != cells {
            return Err(BoardError::Parse(format!(
                "expected {} tiles, found {}",
                cells,
                tiles.len()
            )));
        }
        // cells - 1 <= u16::MAX for every dimension up to MAX_DIM
        let max = (cells - 1) as u16;

        let mut seen = vec![false; cells];
        for &tile in &tiles {
            if tile > max {
                return Err(BoardError::TileOutOfRange { tile, max });
            }
            if std::mem::replace(&mut seen[tile as usize], true) {
                return Err(BoardError::DuplicateTile { tile });
            }
        }

        // A full permutation always contains the blank exactly once.
        let blank = tiles
            .iter()
            .position(|&t| t == BLANK)
            .ok_or_else(|| BoardError::Parse("board has no blank".to_string()))?;

        Ok(Self {
            dim,
            tiles: tiles.into_boxed_slice(),
            blank,
        })
    }

    /// The solved board of the given dimension.
    pub fn goal(dim: usize) -> Result<Self, BoardError> {
        check_dimension(dim)?;
        let tiles = (1..dim * dim)
            .map(|t| t as u16)
            .chain(std::iter::once(BLANK))
            .collect();
        Self::from_flat(dim, tiles)
    }

    pub fn dimension(&self) -> usize {
        self.dim
    }

    pub fn tile_at(&self, row: usize, col: usize) -> u16 {
        self.tiles[row * self.dim + col]
    }

    /// (row, col) of the blank
    pub fn blank_position(&self) -> (usize, usize) {
        (self.blank / self.dim, self.blank % self.dim)
    }

    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    pub fn rows(&self) -> Vec<Vec<u16>> {
        self.tiles.chunks(self.dim).map(<[u16]>::to_vec).collect()
    }

    /// Number of non-blank tiles out of place
    pub fn hamming(&self) -> u32 {
        self.tiles
            .iter()
            .enumerate()
            .filter(|&(i, &t)| t != BLANK && t as usize != i + 1)
            .count() as u32
    }

    /// Sum of the row and column distances of every non-blank tile from its
    /// goal cell.
    pub fn manhattan(&self) -> u32 {
        let mut distance = 0;
        for (i, &tile) in self.tiles.iter().enumerate() {
            if tile == BLANK {
                continue;
            }
            let target = tile as usize - 1;
            distance += (i / self.dim).abs_diff(target / self.dim);
            distance += (i % self.dim).abs_diff(target % self.dim);
        }
        distance as u32
    }

    pub fn is_goal(&self) -> bool {
        let last = self.tiles.len() - 1;
        self.blank == last
            && self.tiles[..last]
                .iter()
                .enumerate()
                .all(|(i, &t)| t as usize == i + 1)
    }

    /// Slide the blank one cell, or `None` if it would leave the grid.
    pub fn slide(&self, slide: Slide) -> Option<Self> {
        let (row, col) = self.blank_position();
        let (dr, dc) = slide.delta();
        let new_row = row.checked_add_signed(dr).filter(|&r| r < self.dim)?;
        let new_col = col.checked_add_signed(dc).filter(|&c| c < self.dim)?;
        let target = new_row * self.dim + new_col;

        let mut tiles = self.tiles.clone();
        tiles.swap(self.blank, target);
        Some(Self {
            dim: self.dim,
            tiles,
            blank: target,
        })
    }

    /// Every board one legal slide away, in up/down/left/right order.
    pub fn neighbors(&self) -> SmallVec<[Board; 4]> {
        Slide::ALL.iter().filter_map(|&s| self.slide(s)).collect()
    }

    /// Swap the first two tiles of row 0, or of row 1 when row 0's pair
    /// contains the blank.
    pub fn twin(&self) -> Self {
        let row = if self.tiles[0] == BLANK || self.tiles[1] == BLANK {
            1
        } else {
            0
        };
        let first = row * self.dim;
        let mut tiles = self.tiles.clone();
        tiles.swap(first, first + 1);
        Self {
            dim: self.dim,
            tiles,
            blank: self.blank,
        }
    }

    fn count_inversions(&self) -> usize {
        let tiles: Vec<u16> = self.tiles.iter().copied().filter(|&t| t != BLANK).collect();
        tiles
            .iter()
            .enumerate()
            .map(|(i, &t)| tiles[i + 1..].iter().filter(|&&next| next < t).count())
            .sum()
    }

    /// Closed-form solvability test by inversion parity.
    ///
    /// Odd widths are solvable with an even inversion count; even widths need
    /// `inversions + blank row` to be odd.
    pub fn is_solvable_by_parity(&self) -> bool {
        let inversions = self.count_inversions();
        if self.dim % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + self.blank / self.dim) % 2 == 1
        }
    }
}

impl PuzzleState for Board {
    type Signature = Box<[u16]>;

    fn is_goal(&self) -> bool {
        Board::is_goal(self)
    }

    fn heuristic(&self) -> u32 {
        self.manhattan()
    }

    fn successors(&self) -> Successors<Self> {
        self.neighbors()
    }

    fn twin(&self) -> Self {
        Board::twin(self)
    }

    fn signature(&self) -> Self::Signature {
        self.tiles.clone()
    }
}

impl TryFrom<Vec<Vec<u16>>> for Board {
    type Error = BoardError;

    fn try_from(rows: Vec<Vec<u16>>) -> Result<Self, Self::Error> {
        Board::new(rows)
    }
}

impl From<Board> for Vec<Vec<u16>> {
    fn from(board: Board) -> Self {
        board.rows()
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parse `n` followed by `n*n` whitespace-separated tiles.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let dim: usize = tokens
            .next()
            .ok_or(BoardError::Empty)?
            .parse()
            .map_err(|e| BoardError::Parse(format!("invalid dimension: {}", e)))?;
        check_dimension(dim)?;

        let tiles = tokens
            .map(|tok| {
                tok.parse::<u16>()
                    .map_err(|e| BoardError::Parse(format!("invalid tile {:?}: {}", tok, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_flat(dim, tiles)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.tiles.len() - 1).to_string().len();
        writeln!(f, "{}", self.dim)?;
        for row in self.tiles.chunks(self.dim) {
            for &tile in row {
                write!(f, " {:>width$}", tile, width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(rows: &[&[u16]]) -> Board {
        Board::new(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn test_rejects_malformed_boards() {
        assert_eq!(Board::new(vec![]), Err(BoardError::Empty));
        assert_eq!(Board::new(vec![vec![0]]), Err(BoardError::TooSmall { dim: 1 }));
        assert_eq!(
            Board::new(vec![vec![1, 2], vec![0]]),
            Err(BoardError::NotSquare { row: 1, len: 1, dim: 2 })
        );
        assert_eq!(
            Board::new(vec![vec![1, 2], vec![3, 4]]),
            Err(BoardError::TileOutOfRange { tile: 4, max: 3 })
        );
        assert_eq!(
            Board::new(vec![vec![1, 1], vec![3, 0]]),
            Err(BoardError::DuplicateTile { tile: 1 })
        );
    }

    #[test]
    fn test_parse_rejects_huge_dimension() {
        assert_eq!(
            "4294967296 1 2 3".parse::<Board>(),
            Err(BoardError::TooLarge { dim: 4_294_967_296, max: MAX_DIM })
        );
        assert_eq!(
            "9223372036854775810 1 2 3 0".parse::<Board>(),
            Err(BoardError::TooLarge { dim: 9_223_372_036_854_775_810, max: MAX_DIM })
        );
        assert_eq!(
            "257 0".parse::<Board>(),
            Err(BoardError::TooLarge { dim: 257, max: MAX_DIM })
        );
        assert!(matches!(Board::goal(usize::MAX), Err(BoardError::TooLarge { .. })));
        assert!(matches!(Board::goal(1 << 32), Err(BoardError::TooLarge { .. })));
    }

    #[test]
    fn test_largest_dimension() {
        let goal = Board::goal(MAX_DIM).unwrap();
        assert!(goal.is_goal());
        assert_eq!(goal.tiles().len(), MAX_DIM * MAX_DIM);
        assert_eq!(goal.tile_at(MAX_DIM - 1, MAX_DIM - 2), u16::MAX);
    }

    #[test]
    fn test_goal() {
        let goal = Board::goal(3).unwrap();
        assert!(goal.is_goal());
        assert_eq!(goal.blank_position(), (2, 2));
        assert_eq!(goal.manhattan(), 0);
        assert_eq!(goal.hamming(), 0);
        assert!(!board(&[&[1, 2, 3], &[4, 5, 6], &[7, 0, 8]]).is_goal());
    }

    #[test]
    fn test_distances() {
        // textbook example: hamming 5, manhattan 10
        let b = board(&[&[8, 1, 3], &[4, 0, 2], &[7, 6, 5]]);
        assert_eq!(b.hamming(), 5);
        assert_eq!(b.manhattan(), 10);
    }

    #[test]
    fn test_neighbors() {
        let corner = Board::goal(3).unwrap();
        let neighbors = corner.neighbors();
        assert_eq!(neighbors.len(), 2);
        assert!(neighbors.contains(&board(&[&[1, 2, 3], &[4, 5, 0], &[7, 8, 6]])));
        assert!(neighbors.contains(&board(&[&[1, 2, 3], &[4, 5, 6], &[7, 0, 8]])));

        let center = board(&[&[1, 2, 3], &[4, 0, 5], &[6, 7, 8]]);
        let neighbors = center.neighbors();
        assert_eq!(neighbors.len(), 4);
        for n in &neighbors {
            assert_eq!(n.count_differences(&center), 2);
        }
    }

    #[test]
    fn test_twin() {
        let b = board(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 0]]);
        assert_eq!(b.twin(), board(&[&[2, 1, 3], &[4, 5, 6], &[7, 8, 0]]));

        let blank_first = board(&[&[0, 1, 3], &[4, 2, 5], &[7, 8, 6]]);
        assert_eq!(blank_first.twin(), board(&[&[0, 1, 3], &[2, 4, 5], &[7, 8, 6]]));

        // deterministic, and flips parity
        assert_eq!(b.twin(), b.twin());
        assert_ne!(b.is_solvable_by_parity(), b.twin().is_solvable_by_parity());
        assert_ne!(
            blank_first.is_solvable_by_parity(),
            blank_first.twin().is_solvable_by_parity()
        );
    }

    #[test]
    fn test_parity() {
        assert!(Board::goal(3).unwrap().is_solvable_by_parity());
        assert!(Board::goal(4).unwrap().is_solvable_by_parity());
        assert!(!board(&[&[1, 2, 3], &[4, 5, 6], &[8, 7, 0]]).is_solvable_by_parity());
        assert!(board(&[&[1, 2, 3], &[4, 0, 6], &[7, 5, 8]]).is_solvable_by_parity());
        // moving the blank vertically on an even board keeps it solvable
        let moved = Board::goal(4).unwrap().slide(Slide::Up).unwrap();
        assert!(moved.is_solvable_by_parity());
    }

    #[test]
    fn test_signature_is_structural() {
        let a = board(&[&[1, 2], &[3, 0]]);
        let b = Board::goal(2).unwrap();
        assert_eq!(a.signature(), b.signature());
        assert_ne!(a.signature(), a.twin().signature());
    }

    #[test]
    fn test_parse_text() {
        let b: Board = "3\n 0 1 3\n 4 2 5\n 7 8 6\n".parse().unwrap();
        assert_eq!(b.tile_at(0, 1), 1);
        assert_eq!(b.blank_position(), (0, 0));
        assert_eq!(b.to_string().parse::<Board>().unwrap(), b);

        assert!(matches!("2\n1 2 3".parse::<Board>(), Err(BoardError::Parse(_))));
        assert!(matches!("x".parse::<Board>(), Err(BoardError::Parse(_))));
        assert_eq!("".parse::<Board>(), Err(BoardError::Empty));
    }

    #[test]
    fn test_sample_files() {
        let b: Board = include_str!("../boards/puzzle04.txt").parse().unwrap();
        assert_eq!(b.manhattan(), 4);
        assert_eq!(b.hamming(), 4);

        let b: Board = serde_json::from_str(include_str!("../boards/puzzle4x4.json")).unwrap();
        assert_eq!(b.dimension(), 4);
        assert_eq!(b.blank_position(), (0, 1));
    }

    #[test]
    fn test_json_round_trip_validates() {
        let b: Board = serde_json::from_str("[[1,2,3],[4,0,6],[7,5,8]]").unwrap();
        assert_eq!(b.blank_position(), (1, 1));
        assert_eq!(serde_json::to_string(&b).unwrap(), "[[1,2,3],[4,0,6],[7,5,8]]");

        assert!(serde_json::from_str::<Board>("[[1,1],[2,0]]").is_err());
    }

    impl Board {
        fn count_differences(&self, other: &Board) -> usize {
            self.tiles
                .iter()
                .zip(other.tiles.iter())
                .filter(|(a, b)| a != b)
                .count()
        }
    }
}

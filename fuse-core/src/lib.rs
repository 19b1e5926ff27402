//! Sliding-tile merge puzzle logic for a 4x4 board.
//!
//! # Board Layout
//!
//! ```text
//! Cell indices (row-major order):
//!   (0,0)=0   (0,1)=1   (0,2)=2   (0,3)=3
//!   (1,0)=4   (1,1)=5   (1,2)=6   (1,3)=7
//!   (2,0)=8   (2,1)=9   (2,2)=10  (2,3)=11
//!   (3,0)=12  (3,1)=13  (3,2)=14  (3,3)=15
//! ```
//!
//! Each cell is 0 (empty) or a power of two.
//!
//! # Canonical Frame
//!
//! All move logic runs in a single canonical orientation: the board is
//! rotated so the requested direction lines up with a leftward row shift,
//! each of the 4 rows is shifted and merged independently, and the board is
//! rotated back. The rotation for each direction:
//!
//! ```text
//!   Up    -> identity
//!   Right -> 90 degrees clockwise
//!   Down  -> 180 degrees
//!   Left  -> 90 degrees counter-clockwise
//! ```

use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One of the four slide directions, in fixed wire order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    Up = 0,
    Right = 1,
    Down = 2,
    Left = 3,
}

impl Direction {
    /// All four directions in wire order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Convert a wire code (0-3) to a `Direction`.
    #[inline]
    pub fn from_code(code: u8) -> Option<Direction> {
        match code {
            0 => Some(Direction::Up),
            1 => Some(Direction::Right),
            2 => Some(Direction::Down),
            3 => Some(Direction::Left),
            _ => None,
        }
    }

    /// The wire code for this direction.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Draw a direction uniformly at random.
    #[inline]
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Direction {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// 4x4 board snapshot. Cells are 0 (empty) or a power of two, row-major.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Board([u32; 16]);

impl Board {
    /// Number of cells.
    pub const CELLS: usize = 16;
    /// Side length of the grid.
    pub const SIDE: usize = 4;

    /// Index maps for quarter-turn rotations, new index -> old index.
    const ROTATE_CW: [usize; 16] = [12, 8, 4, 0, 13, 9, 5, 1, 14, 10, 6, 2, 15, 11, 7, 3];
    const ROTATE_CCW: [usize; 16] = [3, 7, 11, 15, 2, 6, 10, 14, 1, 5, 9, 13, 0, 4, 8, 12];
    const ROTATE_HALF: [usize; 16] = [15, 14, 13, 12, 11, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1, 0];

    /// Create an empty board.
    #[inline]
    pub fn new() -> Board {
        Board([0; 16])
    }

    /// Construct a board from its 16 row-major cell values.
    #[inline]
    pub fn from_cells(cells: [u32; 16]) -> Board {
        Board(cells)
    }

    /// Borrow the raw row-major cells.
    #[inline]
    pub fn cells(&self) -> &[u32; 16] {
        &self.0
    }

    /// Value at (row, col), 0-3 each.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> u32 {
        debug_assert!(row < Self::SIDE && col < Self::SIDE);
        self.0[row * Self::SIDE + col]
    }

    /// Apply an index permutation, new index -> old index.
    fn permute(self, map: &[usize; 16]) -> Board {
        let mut out = [0u32; 16];
        for (new_idx, &old_idx) in map.iter().enumerate() {
            out[new_idx] = self.0[old_idx];
        }
        Board(out)
    }

    /// Rotate so that `dir` lines up with the canonical leftward row shift.
    #[inline]
    pub fn rotate_to(self, dir: Direction) -> Board {
        match dir {
            Direction::Up => self,
            Direction::Right => self.permute(&Self::ROTATE_CW),
            Direction::Down => self.permute(&Self::ROTATE_HALF),
            Direction::Left => self.permute(&Self::ROTATE_CCW),
        }
    }

    /// Inverse of [`Board::rotate_to`]: restore the original orientation.
    #[inline]
    pub fn rotate_from(self, dir: Direction) -> Board {
        match dir {
            Direction::Up => self,
            Direction::Right => self.permute(&Self::ROTATE_CCW),
            Direction::Down => self.permute(&Self::ROTATE_HALF),
            Direction::Left => self.permute(&Self::ROTATE_CW),
        }
    }

    /// Slide and merge tiles in `dir`. Pure: no random tile is inserted.
    pub fn shift(self, dir: Direction) -> Board {
        let rotated = self.rotate_to(dir);
        let mut out = [0u32; 16];
        for row in 0..Self::SIDE {
            let base = row * Self::SIDE;
            let merged = shift_and_merge_row([
                rotated.0[base],
                rotated.0[base + 1],
                rotated.0[base + 2],
                rotated.0[base + 3],
            ]);
            out[base..base + Self::SIDE].copy_from_slice(&merged);
        }
        Board(out).rotate_from(dir)
    }

    /// True when shifting in `dir` would change the board (before any spawn).
    #[inline]
    pub fn is_effective(&self, dir: Direction) -> bool {
        self.shift(dir) != *self
    }

    /// Shift in `dir`, then insert a random tile if the shift changed the
    /// board. An ineffective move returns the board untouched.
    pub fn make_move<R: Rng + ?Sized>(self, dir: Direction, rng: &mut R) -> Board {
        let shifted = self.shift(dir);
        if shifted != self {
            shifted.spawn_random_tile(rng)
        } else {
            self
        }
    }

    /// Ordered indices of empty cells.
    pub fn empty_cells(&self) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|(_, &val)| val == 0)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Count of empty cells.
    #[inline]
    pub fn count_empty(&self) -> usize {
        self.0.iter().filter(|&&val| val == 0).count()
    }

    /// The highest tile value on the board (0 when empty).
    #[inline]
    pub fn max_tile(&self) -> u32 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    /// Insert a 2 (90%) or 4 (10%) tile into a uniformly random empty cell.
    /// A full board is returned unchanged.
    pub fn spawn_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Board {
        let empty = self.empty_cells();
        if empty.is_empty() {
            return self;
        }
        let idx = empty[rng.random_range(0..empty.len())];
        let value = if rng.random_bool(0.9) { 2 } else { 4 };
        let mut cells = self.0;
        cells[idx] = value;
        Board(cells)
    }

    /// True when no move can change the board.
    ///
    /// A board with an empty cell is never terminal; a full board is
    /// terminal iff every direction's shift leaves it unchanged.
    pub fn is_terminal(&self) -> bool {
        if self.count_empty() > 0 {
            return false;
        }
        Direction::ALL.iter().all(|&dir| self.shift(dir) == *self)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..Self::SIDE {
            writeln!(
                f,
                "{:>6} {:>6} {:>6} {:>6}",
                self.get(row, 0),
                self.get(row, 1),
                self.get(row, 2),
                self.get(row, 3)
            )?;
        }
        Ok(())
    }
}

/// Shift one row's tiles left and merge adjacent equal pairs.
///
/// Non-zero values are compacted left preserving order, then a single
/// left-to-right pass merges each adjacent equal pair into double the value
/// at the left position (a tile merges at most once per shift), and the
/// result is compacted left again and zero-padded to length 4.
pub fn shift_and_merge_row(row: [u32; 4]) -> [u32; 4] {
    let mut compact = [0u32; 4];
    let mut len = 0;
    for val in row {
        if val != 0 {
            compact[len] = val;
            len += 1;
        }
    }
    for i in 1..len {
        if compact[i] != 0 && compact[i] == compact[i - 1] {
            compact[i - 1] *= 2;
            compact[i] = 0;
        }
    }
    let mut out = [0u32; 4];
    let mut n = 0;
    for val in compact {
        if val != 0 {
            out[n] = val;
            n += 1;
        }
    }
    out
}

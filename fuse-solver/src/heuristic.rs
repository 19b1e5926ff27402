//! Positional board evaluation.
//!
//! The score is a weighted sum of features over the 4x4 grid: empty-cell
//! count, max tile, adjacent equal pairs, monotone lines, corner placement
//! of the max tile, and the number of directions that would change the
//! board. Higher is better.

use fuse_core::{Board, Direction};

const WEIGHT_EMPTY: f64 = 1.0;
const WEIGHT_MAX_TILE: f64 = 0.5;
const WEIGHT_SMOOTHNESS: f64 = 0.05;
const WEIGHT_MONOTONICITY: f64 = 0.1;
const WEIGHT_MAX_IN_CORNER: f64 = 0.2;

const CORNERS: [(usize, usize); 4] = [(0, 0), (0, 3), (3, 0), (3, 3)];

/// Score a board.
pub fn score(board: Board) -> f64 {
    let max_tile = board.max_tile();

    WEIGHT_EMPTY * board.count_empty() as f64
        + WEIGHT_MAX_TILE * max_tile as f64
        + WEIGHT_SMOOTHNESS * smoothness(&board)
        + WEIGHT_MONOTONICITY * monotonicity(&board)
        + WEIGHT_MAX_IN_CORNER * max_in_corner(&board, max_tile)
        + corner_bonus(&board, max_tile)
        + merge_potential(&board)
}

/// Sum of values of adjacent equal pairs (right and down neighbors).
fn smoothness(board: &Board) -> f64 {
    let mut total = 0.0;
    for row in 0..Board::SIDE {
        for col in 0..Board::SIDE {
            let val = board.get(row, col);
            if col < Board::SIDE - 1 && val == board.get(row, col + 1) {
                total += val as f64;
            }
            if row < Board::SIDE - 1 && val == board.get(row + 1, col) {
                total += val as f64;
            }
        }
    }
    total
}

/// Sum of each row and column whose values are weakly non-decreasing or
/// weakly non-increasing. A line that is both (e.g. constant) still counts
/// its sum exactly once.
fn monotonicity(board: &Board) -> f64 {
    let mut total = 0.0;
    for i in 0..Board::SIDE {
        let row: [u32; 4] = std::array::from_fn(|j| board.get(i, j));
        let col: [u32; 4] = std::array::from_fn(|j| board.get(j, i));
        if is_monotone(&row) {
            total += row.iter().sum::<u32>() as f64;
        }
        if is_monotone(&col) {
            total += col.iter().sum::<u32>() as f64;
        }
    }
    total
}

fn is_monotone(line: &[u32; 4]) -> bool {
    line.windows(2).all(|w| w[0] <= w[1]) || line.windows(2).all(|w| w[0] >= w[1])
}

/// The max tile value, once, if it sits in any corner.
fn max_in_corner(board: &Board, max_tile: u32) -> f64 {
    if CORNERS.iter().any(|&(r, c)| board.get(r, c) == max_tile) {
        max_tile as f64
    } else {
        0.0
    }
}

/// The max tile value once per corner that holds it (up to 4x on ties).
fn corner_bonus(board: &Board, max_tile: u32) -> f64 {
    let matching = CORNERS
        .iter()
        .filter(|&&(r, c)| board.get(r, c) == max_tile)
        .count();
    matching as f64 * max_tile as f64
}

/// How many of the four directions would change the board.
fn merge_potential(board: &Board) -> f64 {
    Direction::ALL
        .iter()
        .filter(|&&dir| board.is_effective(dir))
        .count() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locked_board() -> Board {
        Board::from_cells([
            2, 4, 8, 16, //
            32, 64, 128, 256, //
            2, 4, 8, 16, //
            32, 64, 128, 256,
        ])
    }

    #[test]
    fn test_score_single_tile() {
        // One 2 in the top-left corner, everything else empty.
        let mut cells = [0u32; 16];
        cells[0] = 2;
        let board = Board::from_cells(cells);

        // empties 15, max 2*0.5 = 1, smoothness 0, monotonicity: row 0 and
        // column 0 each sum to 2, all-zero lines sum to 0, so 0.4 total;
        // max-in-corner 0.4, corner bonus 2 (one corner), merge potential 2
        // (only Down and Right move the tile).
        let expected = 15.0 + 1.0 + 0.0 + 0.4 + 0.4 + 2.0 + 2.0;
        assert!((score(board) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_monotone_constant_line_counted_once() {
        // Row 0 is constant (both non-decreasing and non-increasing); its
        // sum must appear once in the monotonicity term, not twice.
        let mut cells = [0u32; 16];
        cells[..4].copy_from_slice(&[4, 4, 4, 4]);
        let board = Board::from_cells(cells);

        // Row 0 contributes 16; rows 1-3 contribute 0; every column is
        // [4,0,0,0], monotone, contributing 4 each.
        assert!((monotonicity(&board) - 32.0).abs() < 1e-9);
    }

    #[test]
    fn test_monotonicity_rejects_mixed_line() {
        let line = [2, 8, 4, 16];
        assert!(!is_monotone(&line));
        assert!(is_monotone(&[2, 4, 8, 16]));
        assert!(is_monotone(&[16, 8, 4, 2]));
        assert!(is_monotone(&[2, 2, 4, 4]));
    }

    #[test]
    fn test_smoothness_counts_both_axes() {
        // (0,0)=(0,1)=2 is a row pair; (0,0)=(1,0)=2 is a column pair.
        let mut cells = [0u32; 16];
        cells[0] = 2;
        cells[1] = 2;
        cells[4] = 2;
        let board = Board::from_cells(cells);
        // Pairs among the 2s: right neighbor of (0,0) and down neighbor of
        // (0,0), 2 each. Zero-valued equal neighbors add nothing.
        assert!((smoothness(&board) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_corner_bonus_counts_each_corner() {
        let mut cells = [0u32; 16];
        cells[0] = 8;
        cells[3] = 8;
        cells[5] = 2;
        let board = Board::from_cells(cells);
        assert!((corner_bonus(&board, 8) - 16.0).abs() < 1e-9);
        assert!((max_in_corner(&board, 8) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_merge_potential_zero_when_locked() {
        assert_eq!(merge_potential(&locked_board()), 0.0);
    }

    #[test]
    fn test_merge_potential_counts_effective_directions() {
        // A full board whose only merge pair sits in row 0: only the two
        // row-wise shifts (Up and Down in the canonical mapping) change it.
        let mut cells = *locked_board().cells();
        cells[1] = 2; // row 0 becomes [2, 2, 8, 16]
        let board = Board::from_cells(cells);
        assert_eq!(merge_potential(&board), 2.0);
    }
}

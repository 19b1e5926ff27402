//! Concurrent move selection over the four candidate directions.

use rayon::prelude::*;

use fuse_core::{Board, Direction};

use crate::rollout::{average_rollout, TranspositionCache};

/// Rollout count and depth while the board is still open (> 5 empty cells).
const OPEN_BOARD: (u32, u32) = (50, 30);
/// Heavier search once the board fills up.
const CROWDED_BOARD: (u32, u32) = (100, 50);

/// Picks the best direction for a board by averaging concurrent rollouts.
///
/// Each call evaluates all four candidate directions as a fork-join on the
/// rayon worker pool, one worker per direction, and blocks until every
/// branch finishes. Workers share nothing but the transposition cache; the
/// board itself is copied into each branch.
pub struct MoveSelector {
    cache: TranspositionCache,
}

impl MoveSelector {
    pub fn new() -> Self {
        Self::with_cache(TranspositionCache::new())
    }

    /// Build a selector around an existing cache.
    pub fn with_cache(cache: TranspositionCache) -> Self {
        Self { cache }
    }

    /// The shared rollout cache.
    pub fn cache(&self) -> &TranspositionCache {
        &self.cache
    }

    /// Select the best direction for `board`.
    ///
    /// Directions whose shift would leave the board unchanged are filtered
    /// out; among the rest the highest average rollout total wins, ties
    /// breaking toward the earlier direction in wire order. When no
    /// direction can change the board, the answer is a uniformly random
    /// direction rather than an error.
    pub fn best_move(&self, board: Board) -> Direction {
        let (simulations, depth) = if board.count_empty() > 5 {
            OPEN_BOARD
        } else {
            CROWDED_BOARD
        };

        let scores: Vec<(Direction, f64)> = Direction::ALL
            .par_iter()
            .map(|&dir| {
                let mut rng = rand::rng();
                let avg = average_rollout(&self.cache, board, dir, simulations, depth, &mut rng);
                (dir, avg)
            })
            .collect();

        let mut best: Option<(Direction, f64)> = None;
        for (dir, avg) in scores {
            if !board.is_effective(dir) {
                continue;
            }
            match best {
                Some((_, best_avg)) if avg <= best_avg => {}
                _ => best = Some((dir, avg)),
            }
        }

        match best {
            Some((dir, _)) => dir,
            None => Direction::random(&mut rand::rng()),
        }
    }
}

impl Default for MoveSelector {
    fn default() -> Self {
        Self::new()
    }
}

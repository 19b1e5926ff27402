//! Randomized forward rollouts with shared memoization.

use std::sync::atomic::{AtomicU64, Ordering};

use ahash::RandomState;
use dashmap::DashMap;
use rand::Rng;

use fuse_core::{Board, Direction};

use crate::heuristic;

/// Concurrent memoization of rollout totals, keyed by board content alone.
///
/// The key carries no direction or depth: the first total stored for a
/// given content is returned for every later request for that content.
/// Concurrent writers racing on the same content resolve first-writer-wins.
/// Entries live for the lifetime of the cache and are never evicted.
pub struct TranspositionCache {
    map: DashMap<Board, f64, RandomState>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl TranspositionCache {
    pub fn new() -> Self {
        Self {
            map: DashMap::with_hasher(RandomState::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Cached total for a board's content, if any.
    pub fn get(&self, board: &Board) -> Option<f64> {
        let total = self.map.get(board).map(|entry| *entry);
        if total.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
        total
    }

    /// Store `total` for `board` unless an earlier writer got there first.
    pub fn insert_first(&self, board: Board, total: f64) {
        self.map.entry(board).or_insert(total);
    }

    /// Number of distinct board contents cached.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Lookup hits since creation.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Lookup misses since creation.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }
}

impl Default for TranspositionCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Run one randomized rollout from `board` opening with `dir`.
///
/// The cache is consulted first: a hit returns the stored total without
/// simulating, no matter which direction or depth produced it. On a miss
/// the opening move is applied, then up to `depth` random moves follow;
/// the heuristic score of each intermediate state is accumulated, stopping
/// early at a terminal state. The total is stored under the original board
/// and returned.
pub fn rollout<R: Rng + ?Sized>(
    cache: &TranspositionCache,
    board: Board,
    dir: Direction,
    depth: u32,
    rng: &mut R,
) -> f64 {
    if let Some(total) = cache.get(&board) {
        return total;
    }

    let mut sim = board.make_move(dir, rng);
    let mut total = 0.0;
    for _ in 0..depth {
        if sim.is_terminal() {
            break;
        }
        sim = sim.make_move(Direction::random(rng), rng);
        total += heuristic::score(sim);
    }

    cache.insert_first(board, total);
    total
}

/// Arithmetic mean of `simulations` rollouts for the same starting board
/// and opening direction.
///
/// With the cache keyed on board content alone, every rollout after the
/// first returns the stored total, so the mean collapses to the first
/// computed value; see [`TranspositionCache`].
pub fn average_rollout<R: Rng + ?Sized>(
    cache: &TranspositionCache,
    board: Board,
    dir: Direction,
    simulations: u32,
    depth: u32,
    rng: &mut R,
) -> f64 {
    debug_assert!(simulations > 0);
    let total: f64 = (0..simulations)
        .map(|_| rollout(cache, board, dir, depth, rng))
        .sum();
    total / simulations as f64
}

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::engine::Direction;
use crate::game::Game;

use super::{decide, evaluate_branches, BranchEval, Policy, SearchStats};

/// Knobs for [`MonteCarlo`]. `simulations` is the total playout budget
/// split evenly over the legal root moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonteCarloConfig {
    pub simulations: u32,
    pub parallel: bool,
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self { simulations: 2000, parallel: true }
    }
}

/// Pure random-playout move selection.
#[derive(Debug, Default)]
pub struct MonteCarlo {
    cfg: MonteCarloConfig,
    stats: SearchStats,
}

impl MonteCarlo {
    pub fn new() -> Self {
        Self::with_config(MonteCarloConfig::default())
    }

    pub fn with_config(cfg: MonteCarloConfig) -> Self {
        Self { cfg, stats: SearchStats::default() }
    }

    #[inline]
    pub fn config(&self) -> MonteCarloConfig {
        self.cfg
    }

    /// Move whose playouts reach the highest summed final score.
    ///
    /// Panics if no move is legal.
    pub fn best_move<R: Rng + ?Sized>(&mut self, game: &Game, rng: &mut R) -> Direction {
        let branches = self.branch_evals(game, rng);
        decide("mcts", game.board(), &branches, self.stats.nodes)
    }

    /// Summed playout scores per direction. `nodes` in the stats counts playouts.
    pub fn branch_evals<R: Rng + ?Sized>(&mut self, game: &Game, rng: &mut R) -> [BranchEval; 8] {
        let mask = game.valid_move_mask();
        // seeds are drawn up front so the outcome does not depend on scheduling
        let mut seeds = [0u64; 8];
        for dir in mask.iter() {
            seeds[dir.index()] = rng.gen();
        }
        let playouts = (self.cfg.simulations / mask.len().max(1) as u32).max(1);
        let (branches, nodes) = evaluate_branches(mask, self.cfg.parallel, |dir| {
            let mut branch_rng = StdRng::seed_from_u64(seeds[dir.index()]);
            let total: i64 = (0..playouts).map(|_| playout(*game, dir, &mut branch_rng)).sum();
            (total as f64, playouts as u64)
        });
        self.stats.record(nodes);
        branches
    }

    #[inline]
    pub fn last_stats(&self) -> SearchStats {
        self.stats
    }

    #[inline]
    pub fn reset_stats(&mut self) {
        self.stats = SearchStats::default();
    }
}

impl Policy for MonteCarlo {
    fn choose_move(&mut self, game: Game, rng: &mut dyn RngCore) -> Direction {
        self.best_move(&game, rng)
    }
}

/// Play `first`, then uniformly random legal moves until none is left.
fn playout<R: Rng + ?Sized>(mut game: Game, first: Direction, rng: &mut R) -> i64 {
    game.play(first, rng);
    while let Some(dir) = game.random_move(rng) {
        game.play(dir, rng);
    }
    game.score()
}

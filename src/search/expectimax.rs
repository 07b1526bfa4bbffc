use std::collections::HashMap;
use std::sync::Arc;

use ahash::RandomState as AHasher;
use rand::RngCore;

use crate::engine::{Board, Direction};
use crate::game::Game;

use super::heuristic::{Evaluator, Full, Precision, Weights};
use super::{decide, evaluate_branches, saturation_shortcut, BranchEval, Policy, SearchStats};

/// Knobs for [`Expectimax`].
///
/// - `depth`: number of spawn layers searched below each root move.
/// - `min_prob`: spawn nodes whose path probability is at or below this
///   value are evaluated statically.
/// - `cache_enabled`: per-branch transposition cache.
/// - `parallel`: one rayon task per root move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectimaxConfig {
    pub depth: u32,
    pub min_prob: f32,
    pub cache_enabled: bool,
    pub parallel: bool,
}

impl Default for ExpectimaxConfig {
    fn default() -> Self {
        Self { depth: 6, min_prob: 0.01, cache_enabled: true, parallel: true }
    }
}

#[derive(Clone, Copy)]
struct CacheEntry {
    value: f64,
    min_prob: f32,
}

type LevelCache = HashMap<Board, CacheEntry, AHasher>;

/// Expected-value search over spawn outcomes.
pub struct Expectimax<P: Precision = Full> {
    cfg: ExpectimaxConfig,
    eval: Arc<Evaluator<P>>,
    stats: SearchStats,
}

impl<P: Precision> Expectimax<P> {
    pub fn new() -> Self {
        Self::with_config(ExpectimaxConfig::default())
    }

    pub fn with_config(cfg: ExpectimaxConfig) -> Self {
        Self::with_evaluator(Arc::new(Evaluator::new(Weights::default())), cfg)
    }

    pub fn with_evaluator(eval: Arc<Evaluator<P>>, cfg: ExpectimaxConfig) -> Self {
        Self { cfg, eval, stats: SearchStats::default() }
    }

    #[inline]
    pub fn config(&self) -> ExpectimaxConfig {
        self.cfg
    }

    /// Best legal move for `game`.
    ///
    /// Panics if no move is legal.
    pub fn best_move(&mut self, game: &Game) -> Direction {
        let board = game.board();
        if let Some(dir) = saturation_shortcut(board) {
            self.stats.record(0);
            return dir;
        }
        let branches = self.branch_evals(game);
        decide("expectimax", board, &branches, self.stats.nodes)
    }

    /// Expected value of every direction, indexed like [`Direction::ALL`].
    pub fn branch_evals(&mut self, game: &Game) -> [BranchEval; 8] {
        let board = game.board();
        let (branches, nodes) = evaluate_branches(board.valid_move_mask(), self.cfg.parallel, |dir| {
            let mut search = BranchSearch::new(&self.eval, &self.cfg);
            let value = search.expectation(board.shift(dir), self.cfg.depth, 1.0);
            (value, search.nodes)
        });
        self.stats.record(nodes);
        branches
    }

    /// Value of the best root move, or the static value when none is legal.
    pub fn state_value(&mut self, game: &Game) -> f64 {
        let branches = self.branch_evals(game);
        let best = branches.iter().filter(|b| b.legal).map(|b| b.value).fold(f64::NEG_INFINITY, f64::max);
        if best == f64::NEG_INFINITY { self.eval.heuristic(game.board()) } else { best }
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

impl<P: Precision> Default for Expectimax<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Precision> Policy for Expectimax<P> {
    fn choose_move(&mut self, game: Game, _rng: &mut dyn RngCore) -> Direction {
        self.best_move(&game)
    }
}

/// State of one root branch: its own cache, one map per remaining depth.
struct BranchSearch<'a, P: Precision> {
    eval: &'a Evaluator<P>,
    min_prob: f32,
    cache: Option<Vec<LevelCache>>,
    nodes: u64,
}

impl<'a, P: Precision> BranchSearch<'a, P> {
    fn new(eval: &'a Evaluator<P>, cfg: &ExpectimaxConfig) -> Self {
        let cache = cfg
            .cache_enabled
            .then(|| (0..=cfg.depth).map(|_| LevelCache::with_hasher(AHasher::new())).collect());
        Self { eval, min_prob: cfg.min_prob, cache, nodes: 0 }
    }

    fn move_node(&mut self, board: Board, depth: u32, prob: f32) -> f64 {
        self.nodes += 1;
        let mask = board.valid_move_mask();
        if mask.is_empty() {
            return self.eval.heuristic(board);
        }
        mask.iter()
            .map(|dir| self.expectation(board.shift(dir), depth, prob))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    fn expectation(&mut self, board: Board, depth: u32, prob: f32) -> f64 {
        self.nodes += 1;
        let mut blanks = board.blank_mask();
        let n_blanks = blanks.count_ones();
        if depth == 0 || prob <= self.min_prob || n_blanks == 0 {
            return self.eval.heuristic(board);
        }
        if let Some(value) = self.lookup(board, depth) {
            return value;
        }

        let raw = board.raw();
        let child_prob = prob / n_blanks as f32;
        let mut total = 0.0;
        while blanks != 0 {
            let slot = blanks & blanks.wrapping_neg();
            blanks &= blanks - 1;
            total += 0.9 * self.move_node(Board::from_raw(raw | slot), depth - 1, 0.9 * child_prob);
            total += 0.1 * self.move_node(Board::from_raw(raw | (slot << 1)), depth - 1, 0.1 * child_prob);
        }
        let value = total / n_blanks as f64;

        let min_prob = self.min_prob;
        if let Some(levels) = self.cache.as_mut() {
            levels[depth as usize].insert(board, CacheEntry { value, min_prob });
        }
        value
    }

    // An entry computed with a looser cutoff is not reused.
    fn lookup(&self, board: Board, depth: u32) -> Option<f64> {
        let entry = self.cache.as_ref()?[depth as usize].get(&board)?;
        (entry.min_prob <= self.min_prob).then_some(entry.value)
    }
}

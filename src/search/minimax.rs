use std::sync::Arc;

use rand::RngCore;

use crate::engine::{Board, Direction};
use crate::game::Game;

use super::heuristic::{Evaluator, Full, Precision, Weights};
use super::{decide, evaluate_branches, saturation_shortcut, BranchEval, Policy, SearchStats};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinimaxConfig {
    pub depth: u32,
    pub parallel: bool,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self { depth: 3, parallel: true }
    }
}

/// Alpha-beta search that assumes the worst spawn every turn.
pub struct Minimax<P: Precision = Full> {
    cfg: MinimaxConfig,
    eval: Arc<Evaluator<P>>,
    stats: SearchStats,
}

impl<P: Precision> Minimax<P> {
    pub fn new() -> Self {
        Self::with_config(MinimaxConfig::default())
    }

    pub fn with_config(cfg: MinimaxConfig) -> Self {
        Self::with_evaluator(Arc::new(Evaluator::new(Weights::default())), cfg)
    }

    pub fn with_evaluator(eval: Arc<Evaluator<P>>, cfg: MinimaxConfig) -> Self {
        Self { cfg, eval, stats: SearchStats::default() }
    }

    #[inline]
    pub fn config(&self) -> MinimaxConfig {
        self.cfg
    }

    /// Panics if no move is legal.
    pub fn best_move(&mut self, game: &Game) -> Direction {
        let board = game.board();
        if let Some(dir) = saturation_shortcut(board) {
            self.stats.record(0);
            return dir;
        }
        let branches = self.branch_evals(game);
        decide("minimax", board, &branches, self.stats.nodes)
    }

    /// Worst-case value of every direction, each with a full window.
    pub fn branch_evals(&mut self, game: &Game) -> [BranchEval; 8] {
        let board = game.board();
        let depth = self.cfg.depth;
        let (branches, nodes) = evaluate_branches(board.valid_move_mask(), self.cfg.parallel, |dir| {
            let mut search = AlphaBeta { eval: &self.eval, nodes: 0 };
            let next = board.shift(dir);
            let value = if depth == 0 {
                self.eval.heuristic(next)
            } else {
                search.min_node(next, depth, f64::NEG_INFINITY, f64::INFINITY)
            };
            (value, search.nodes)
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

impl<P: Precision> Default for Minimax<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Precision> Policy for Minimax<P> {
    fn choose_move(&mut self, game: Game, _rng: &mut dyn RngCore) -> Direction {
        self.best_move(&game)
    }
}

struct AlphaBeta<'a, P: Precision> {
    eval: &'a Evaluator<P>,
    nodes: u64,
}

impl<P: Precision> AlphaBeta<'_, P> {
    fn max_node(&mut self, board: Board, depth: u32, mut alpha: f64, beta: f64) -> f64 {
        self.nodes += 1;
        let mask = board.valid_move_mask();
        if depth == 0 || mask.is_empty() {
            return self.eval.heuristic(board);
        }
        let mut best = f64::NEG_INFINITY;
        for dir in mask.iter() {
            let value = self.min_node(board.shift(dir), depth, alpha, beta);
            best = best.max(value);
            alpha = alpha.max(value);
            if alpha >= beta {
                break;
            }
        }
        best
    }

    // Called with depth >= 1.
    fn min_node(&mut self, board: Board, depth: u32, alpha: f64, mut beta: f64) -> f64 {
        self.nodes += 1;
        let mut blanks = board.blank_mask();
        if blanks == 0 {
            return self.max_node(board, depth.saturating_sub(1), alpha, beta);
        }
        let raw = board.raw();
        let mut worst = f64::INFINITY;
        while blanks != 0 {
            let slot = blanks & blanks.wrapping_neg();
            blanks &= blanks - 1;
            for spawn in [slot, slot << 1] {
                let value = self.max_node(Board::from_raw(raw | spawn), depth - 1, alpha, beta);
                worst = worst.min(value);
                beta = beta.min(value);
                if beta <= alpha {
                    return worst;
                }
            }
        }
        worst
    }
}

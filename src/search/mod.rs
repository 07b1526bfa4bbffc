//! Move selection for four-dimensional 2048.
//!
//! Three engines share one surface:
//! - [`Expectimax`]: depth- and probability-bounded expectimax with a
//!   per-branch transposition cache.
//! - [`Minimax`]: alpha-beta search treating spawns as adversarial.
//! - [`MonteCarlo`]: uniform random playouts per root move.
//!
//! Each engine evaluates the legal root moves independently, either in
//! sequence or as one rayon task per move, and picks the first maximum in
//! [`Direction::ALL`] order. Both modes make the same decision.
//!
//! [`Solver`] wraps an engine chosen at runtime from a [`Strategy`] together
//! with a shared [`Evaluator`].
//!
//! ```
//! use ai_2048_4d::game::Game;
//! use ai_2048_4d::search::{Solver, Strategy, Weights};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let mut rng = StdRng::seed_from_u64(123);
//! let game = Game::start(&mut rng);
//!
//! let strategy = Strategy::Expectimax { depth: 2, min_prob: 0.01 };
//! let mut solver: Solver = Solver::new(Weights::default(), strategy, true).unwrap();
//! let dir = solver.choose_move(&game, &mut rng);
//! assert!(game.valid_move_mask().contains(dir));
//! ```

use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use rand::{Rng, RngCore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::SolverConfig;
use crate::engine::{Board, Direction, MoveMask};
use crate::error::{Error, Result};
use crate::game::Game;
use crate::tables::MAX_EXPONENT;

mod expectimax;
pub mod heuristic;
mod mcts;
mod minimax;

pub use expectimax::{Expectimax, ExpectimaxConfig};
pub use heuristic::{Evaluator, Fast, Full, Precision, Weights, LOSS_PENALTY};
pub use mcts::{MonteCarlo, MonteCarloConfig};
pub use minimax::{Minimax, MinimaxConfig};

/// Deepest search any strategy accepts.
pub const MAX_DEPTH: u32 = 16;

/// Anything that can pick a move for a game.
pub trait Policy {
    /// Pick a legal direction. Panics when the game has no legal move.
    fn choose_move(&mut self, game: Game, rng: &mut dyn RngCore) -> Direction;
}

/// Root value of one direction.
///
/// `legal` is false when the move is a no-op; `value` is then 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchEval {
    pub dir: Direction,
    pub value: f64,
    pub legal: bool,
}

/// Node counts for the last decision.
///
/// `peak_nodes` is the largest `nodes` seen since the engine was built or
/// its stats were reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub nodes: u64,
    pub peak_nodes: u64,
}

impl SearchStats {
    pub(crate) fn record(&mut self, nodes: u64) {
        self.nodes = nodes;
        self.peak_nodes = self.peak_nodes.max(nodes);
    }
}

/// Search algorithm and its bounds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Strategy {
    Expectimax { depth: u32, min_prob: f32 },
    Minimax { depth: u32 },
    MonteCarlo { simulations: u32 },
}

impl Default for Strategy {
    fn default() -> Self {
        let cfg = ExpectimaxConfig::default();
        Strategy::Expectimax { depth: cfg.depth, min_prob: cfg.min_prob }
    }
}

impl Strategy {
    pub fn validate(&self) -> Result<()> {
        match *self {
            Strategy::Expectimax { depth, min_prob } => {
                validate_depth(depth)?;
                if !(0.0..=1.0).contains(&min_prob) {
                    return Err(Error::Parameter(format!("min_prob {min_prob} is outside [0, 1]")));
                }
                Ok(())
            }
            Strategy::Minimax { depth } => validate_depth(depth),
            Strategy::MonteCarlo { simulations } if simulations == 0 => {
                Err(Error::Parameter("simulations must be at least 1".to_string()))
            }
            Strategy::MonteCarlo { .. } => Ok(()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Expectimax { .. } => "expectimax",
            Strategy::Minimax { .. } => "minimax",
            Strategy::MonteCarlo { .. } => "mcts",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Expectimax { depth, min_prob } => write!(f, "expectimax(depth={depth}, min_prob={min_prob})"),
            Strategy::Minimax { depth } => write!(f, "minimax(depth={depth})"),
            Strategy::MonteCarlo { simulations } => write!(f, "mcts(simulations={simulations})"),
        }
    }
}

fn validate_depth(depth: u32) -> Result<()> {
    if depth > MAX_DEPTH {
        return Err(Error::Parameter(format!("depth {depth} exceeds {MAX_DEPTH}")));
    }
    Ok(())
}

enum Engine<P: Precision> {
    Expectimax(Expectimax<P>),
    Minimax(Minimax<P>),
    MonteCarlo(MonteCarlo),
}

/// Runtime-selected search engine over a shared evaluator.
pub struct Solver<P: Precision = Full> {
    evaluator: Arc<Evaluator<P>>,
    strategy: Strategy,
    engine: Engine<P>,
}

impl<P: Precision> Solver<P> {
    pub fn new(weights: Weights, strategy: Strategy, parallel: bool) -> Result<Self> {
        weights.validate()?;
        strategy.validate()?;
        let evaluator = Arc::new(Evaluator::new(weights));
        let engine = match strategy {
            Strategy::Expectimax { depth, min_prob } => {
                let cfg = ExpectimaxConfig { depth, min_prob, parallel, ..ExpectimaxConfig::default() };
                Engine::Expectimax(Expectimax::with_evaluator(Arc::clone(&evaluator), cfg))
            }
            Strategy::Minimax { depth } => {
                Engine::Minimax(Minimax::with_evaluator(Arc::clone(&evaluator), MinimaxConfig { depth, parallel }))
            }
            Strategy::MonteCarlo { simulations } => {
                Engine::MonteCarlo(MonteCarlo::with_config(MonteCarloConfig { simulations, parallel }))
            }
        };
        Ok(Self { evaluator, strategy, engine })
    }

    /// Build from a loaded configuration. The precision recorded in the
    /// config is not consulted here; it selects `P` at the call site.
    pub fn from_config(cfg: &SolverConfig) -> Result<Self> {
        Self::new(cfg.weights, cfg.strategy, cfg.parallel)
    }

    /// Pick the move for `game`. Panics when no move is legal.
    pub fn choose_move<R: Rng + ?Sized>(&mut self, game: &Game, rng: &mut R) -> Direction {
        match &mut self.engine {
            Engine::Expectimax(engine) => engine.best_move(game),
            Engine::Minimax(engine) => engine.best_move(game),
            Engine::MonteCarlo(engine) => engine.best_move(game, rng),
        }
    }

    /// Statistics of the last call to [`Solver::choose_move`].
    pub fn last_stats(&self) -> SearchStats {
        match &self.engine {
            Engine::Expectimax(engine) => engine.last_stats(),
            Engine::Minimax(engine) => engine.last_stats(),
            Engine::MonteCarlo(engine) => engine.last_stats(),
        }
    }

    #[inline]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    #[inline]
    pub fn evaluator(&self) -> &Arc<Evaluator<P>> {
        &self.evaluator
    }
}

impl<P: Precision> Policy for Solver<P> {
    fn choose_move(&mut self, game: Game, rng: &mut dyn RngCore) -> Direction {
        Solver::choose_move(self, &game, rng)
    }
}

/// If the board holds exactly two 15-cells and a legal move merges them,
/// return the first such move.
pub(crate) fn saturation_shortcut(board: Board) -> Option<Direction> {
    if board.count(MAX_EXPONENT) != 2 {
        return None;
    }
    board.valid_moves().find(|&dir| board.shift(dir).count(MAX_EXPONENT) == 1)
}

/// Evaluate every direction in `mask`, one rayon task each when `parallel`.
///
/// `eval` returns the branch value and the number of nodes it visited.
pub(crate) fn evaluate_branches<F>(mask: MoveMask, parallel: bool, eval: F) -> ([BranchEval; 8], u64)
where
    F: Fn(Direction) -> (f64, u64) + Sync,
{
    let legal: Vec<Direction> = mask.iter().collect();
    let results: Vec<(Direction, f64, u64)> = if parallel {
        legal
            .par_iter()
            .map(|&dir| {
                let (value, nodes) = eval(dir);
                (dir, value, nodes)
            })
            .collect()
    } else {
        legal
            .iter()
            .map(|&dir| {
                let (value, nodes) = eval(dir);
                (dir, value, nodes)
            })
            .collect()
    };

    let mut out = Direction::ALL.map(|dir| BranchEval { dir, value: 0.0, legal: false });
    let mut total = 0;
    for (dir, value, nodes) in results {
        trace!("branch {dir}: value {value:.3}, {nodes} nodes");
        out[dir.index()] = BranchEval { dir, value, legal: true };
        total += nodes;
    }
    (out, total)
}

/// First legal branch with the strictly greatest value.
pub(crate) fn first_best(branches: &[BranchEval]) -> Option<&BranchEval> {
    branches
        .iter()
        .filter(|branch| branch.legal)
        .fold(None, |best: Option<&BranchEval>, branch| match best {
            Some(cur) if cur.value >= branch.value => Some(cur),
            _ => Some(branch),
        })
}

/// Pick the root move from evaluated branches and log the decision.
pub(crate) fn decide(engine: &str, board: Board, branches: &[BranchEval], nodes: u64) -> Direction {
    match first_best(branches) {
        Some(best) => {
            debug!("{engine}: chose {} (value {:.3}, {nodes} nodes)", best.dir, best.value);
            best.dir
        }
        None => panic!("no legal move for board {board:?}"),
    }
}

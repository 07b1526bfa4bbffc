//! Static board evaluation.
//!
//! The evaluator combines per-face row terms (merge potential, blanks and a
//! monotonicity cost summed over square faces) with a clustering bonus that
//! rewards heavy tiles gathered in one 8-cell half and one face within it.
//! All row terms are folded into weighted lookup tables when the evaluator is
//! built, so evaluating a board is a few dozen table reads.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::engine::{self, Board};
use crate::error::{Error, Result};
use crate::tables::{tables, ROW_TABLE_SIZE};

/// Subtracted from the positional score of a board with no legal move.
pub const LOSS_PENALTY: f64 = 1_000_000.0;

/// Multiplier on the best half/face clustering score.
const FACET_BONUS: f64 = 1.05;

/// Fast mode sums two groupings instead of six and scales the row terms to match.
const FAST_ROW_SCALE: f64 = 3.0;

/// Weight vector of the heuristic, in the order `merge, blank, cube, square, edge, monotonicity`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Weights {
    pub merge: f64,
    pub blank: f64,
    pub cube: f64,
    pub square: f64,
    pub edge: f64,
    pub monotonicity: f64,
}

impl Default for Weights {
    fn default() -> Self {
        Self { merge: 50.0, blank: 300.0, cube: 20.0, square: 5.0, edge: 3.0, monotonicity: 2.0 }
    }
}

impl Weights {
    pub const LEN: usize = 6;

    pub fn from_array(w: [f64; Self::LEN]) -> Self {
        let [merge, blank, cube, square, edge, monotonicity] = w;
        Self { merge, blank, cube, square, edge, monotonicity }
    }

    pub fn to_array(self) -> [f64; Self::LEN] {
        [self.merge, self.blank, self.cube, self.square, self.edge, self.monotonicity]
    }

    /// Every weight must be finite.
    pub fn validate(&self) -> Result<()> {
        const NAMES: [&str; Weights::LEN] = ["merge", "blank", "cube", "square", "edge", "monotonicity"];
        match self.to_array().iter().position(|w| !w.is_finite()) {
            Some(idx) => Err(Error::Weights(format!("{} weight is not finite", NAMES[idx]))),
            None => Ok(()),
        }
    }
}

impl TryFrom<&[f64]> for Weights {
    type Error = Error;

    fn try_from(slice: &[f64]) -> Result<Self> {
        let array: [f64; Self::LEN] = slice
            .try_into()
            .map_err(|_| Error::Weights(format!("expected {} weights, got {}", Self::LEN, slice.len())))?;
        let weights = Self::from_array(array);
        weights.validate()?;
        Ok(weights)
    }
}

impl FromStr for Weights {
    type Err = Error;

    /// Parses a comma separated list such as `50,300,20,5,3,2`.
    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<f64>().map_err(|e| Error::Weights(format!("{part:?}: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::try_from(values.as_slice())
    }
}

impl fmt::Display for Weights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.to_array();
        write!(f, "{a},{b},{c},{d},{e},{g}")
    }
}

/// Compile-time choice between the complete evaluation and the cheap one.
pub trait Precision: Send + Sync + 'static {
    const FAST: bool;
}

/// All 24 faces, all cube splits and four reorientations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Full;

/// Two row groupings, one cube split and two reorientations.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fast;

impl Precision for Full {
    const FAST: bool = false;
}

impl Precision for Fast {
    const FAST: bool = true;
}

/// Heuristic evaluator with weights baked into row tables.
pub struct Evaluator<P: Precision = Full> {
    weights: Weights,
    square: Box<[f64]>,
    rows: Box<[f64]>,
    _precision: PhantomData<P>,
}

impl<P: Precision> Evaluator<P> {
    pub fn new(weights: Weights) -> Self {
        let t = tables();
        let scale = if P::FAST { FAST_ROW_SCALE } else { 1.0 };
        let mut square = vec![0f64; ROW_TABLE_SIZE];
        let mut rows = vec![0f64; ROW_TABLE_SIZE];
        for (idx, (sq, row_term)) in square.iter_mut().zip(rows.iter_mut()).enumerate() {
            let row = idx as u16;
            *sq = weights.cube * (t.power(row) + weights.edge * t.edge(row));
            *row_term = scale
                * (weights.merge * t.merges(row) as f64 + weights.blank * t.blanks(row) as f64
                    - weights.monotonicity * t.monotonicity(row));
        }
        Self {
            weights,
            square: square.into_boxed_slice(),
            rows: rows.into_boxed_slice(),
            _precision: PhantomData,
        }
    }

    #[inline]
    pub fn weights(&self) -> Weights {
        self.weights
    }

    /// Positional score, minus [`LOSS_PENALTY`] when the board is terminal.
    #[inline]
    pub fn heuristic(&self, board: Board) -> f64 {
        let score = self.positional(board);
        if board.is_terminal() { score - LOSS_PENALTY } else { score }
    }

    /// Clustering bonus plus the row terms, without the loss penalty.
    #[inline]
    pub fn positional(&self, board: Board) -> f64 {
        self.facet(board) + self.row_terms(board)
    }

    /// Best clustering score over the reorientations of the board.
    pub fn facet(&self, board: Board) -> f64 {
        let raw = board.raw();
        let base = self.half_score(raw).max(self.half_score(engine::swap_0_1(raw)));
        if P::FAST {
            return base;
        }
        base.max(self.half_score(engine::swap_0_2(raw))).max(self.half_score(engine::swap_0_3(raw)))
    }

    /// Merge, blank and monotonicity terms summed over the face groupings.
    pub fn row_terms(&self, board: Board) -> f64 {
        let raw = board.raw();
        if P::FAST {
            return self.grouping_sum(raw) + self.grouping_sum(engine::transpose(raw));
        }
        [
            raw,
            engine::swap_1_2(raw),
            engine::swap_0_2(raw),
            engine::swap_1_3(raw),
            engine::swap_0_3(raw),
            engine::transpose(raw),
        ]
        .into_iter()
        .map(|grouped| self.grouping_sum(grouped))
        .sum()
    }

    #[inline(always)]
    fn grouping_sum(&self, raw: u64) -> f64 {
        (0..4).map(|row_idx| self.rows[engine::extract_row(raw, row_idx) as usize]).sum()
    }

    #[inline(always)]
    fn half_score(&self, raw: u64) -> f64 {
        FACET_BONUS * self.cube(raw >> 32).max(self.cube(raw & 0xffff_ffff))
    }

    // `half` holds 8 cells in its low 32 bits; the swaps keep them there.
    #[inline(always)]
    fn cube(&self, half: u64) -> f64 {
        let best = self.split(half);
        if P::FAST {
            return best;
        }
        best.max(self.split(engine::swap_1_2(half))).max(self.split(engine::swap_1_3(half)))
    }

    #[inline(always)]
    fn split(&self, half: u64) -> f64 {
        let s0 = self.square[(half & 0xffff) as usize];
        let s1 = self.square[((half >> 16) & 0xffff) as usize];
        s0.min(s1) + self.weights.square * s0.max(s1)
    }
}

impl<P: Precision> Default for Evaluator<P> {
    fn default() -> Self {
        Self::new(Weights::default())
    }
}

impl<P: Precision> fmt::Debug for Evaluator<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator").field("weights", &self.weights).field("fast", &P::FAST).finish()
    }
}

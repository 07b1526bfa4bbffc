use std::fmt;

use rand::Rng;

use crate::engine::{Board, Direction, MoveMask};
use crate::tables::MAX_EXPONENT;

/// Score a real 65 536 tile would add beyond what a saturated cell records.
pub const SATURATION_PENALTY: i64 = 557_056;

/// A board plus the bookkeeping needed to report a faithful score.
///
/// `penalty` collects the face value of every spawned tile (which the board
/// score counts but no merge earned) and is reduced by
/// [`SATURATION_PENALTY`] each time two 15-cells merge into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Game {
    board: Board,
    penalty: i64,
    max_tile_exceeded: bool,
}

impl Game {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing board with no spawn history.
    pub fn from_board(board: Board) -> Self {
        Self { board, ..Self::default() }
    }

    /// Empty board with the two opening tiles spawned.
    pub fn start<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut game = Self::new();
        game.spawn_tile(rng);
        game.spawn_tile(rng);
        game
    }

    #[inline]
    pub fn board(&self) -> Board {
        self.board
    }

    #[inline]
    pub fn penalty(&self) -> i64 {
        self.penalty
    }

    #[inline]
    pub fn max_tile_exceeded(&self) -> bool {
        self.max_tile_exceeded
    }

    #[inline]
    pub fn get(&self, x0: usize, x1: usize, x2: usize, x3: usize) -> u32 {
        self.board.get(x0, x1, x2, x3)
    }

    /// Overwrite one cell; see [`Board::set`] for the accepted values.
    pub fn set(&mut self, x0: usize, x1: usize, x2: usize, x3: usize, value: u32) {
        self.board = self.board.set(x0, x1, x2, x3, value);
    }

    /// Board score minus the spawn and saturation corrections.
    #[inline]
    pub fn score(&self) -> i64 {
        self.board.score() as i64 - self.penalty
    }

    /// Largest exponent, or 16 once a 65 536 tile would have formed.
    pub fn rank(&self) -> u8 {
        if self.max_tile_exceeded { MAX_EXPONENT + 1 } else { self.board.rank() }
    }

    #[inline]
    pub fn count(&self, exponent: u8) -> u32 {
        self.board.count(exponent)
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        self.board.is_terminal()
    }

    #[inline]
    pub fn valid_move_mask(&self) -> MoveMask {
        self.board.valid_move_mask()
    }

    #[inline]
    pub fn valid_moves(&self) -> impl Iterator<Item = Direction> {
        self.board.valid_moves()
    }

    /// Shift without spawning. Returns false (and changes nothing) when the
    /// move is a no-op.
    pub fn apply_move(&mut self, dir: Direction) -> bool {
        let before = self.board;
        let after = before.shift(dir);
        if after == before {
            return false;
        }
        let lost = before.count(MAX_EXPONENT).saturating_sub(after.count(MAX_EXPONENT));
        if lost > 0 {
            self.penalty -= SATURATION_PENALTY * lost as i64;
            self.max_tile_exceeded = true;
        }
        self.board = after;
        true
    }

    /// Spawn a 2 (90%) or 4 (10%) on a uniformly chosen blank cell.
    ///
    /// A full board is left untouched.
    pub fn spawn_tile<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Board {
        if let Some((board, exponent)) = self.board.spawn_random(rng) {
            self.board = board;
            self.penalty += 1 << exponent;
        }
        self.board
    }

    /// [`Game::apply_move`] followed by a spawn when the board changed.
    pub fn play<R: Rng + ?Sized>(&mut self, dir: Direction, rng: &mut R) -> bool {
        let moved = self.apply_move(dir);
        if moved {
            self.spawn_tile(rng);
        }
        moved
    }

    /// A uniformly chosen legal direction, if any.
    pub fn random_move<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<Direction> {
        let mask = self.valid_move_mask();
        if mask.is_empty() {
            return None;
        }
        mask.iter().nth(rng.gen_range(0..mask.len()))
    }
}

impl From<Board> for Game {
    fn from(board: Board) -> Self {
        Self::from_board(board)
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[Score: {}]", self.score())?;
        writeln!(f, "[Rank: {}]", 1u64 << self.rank())?;
        write!(f, "{}", self.board)
    }
}

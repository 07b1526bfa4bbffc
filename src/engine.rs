use std::fmt;
use std::str::FromStr;

use rand::Rng;

use crate::error::Error;
use crate::tables::{tables, MAX_EXPONENT};

/// One of the eight shifts of the 2×2×2×2 board.
///
/// Rows group cells by `(x0, x1)`; the four row directions shift inside a
/// row along `x3` (single) or `x2` (double). The four column directions
/// shift across rows along `x1` (single) or `x0` (double).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Direction {
    /// `x3` toward 0.
    Left = 0,
    /// `x2` toward 0.
    DoubleLeft = 1,
    /// `x3` toward 1.
    Right = 2,
    /// `x2` toward 1.
    DoubleRight = 3,
    /// `x1` toward 0.
    Up = 4,
    /// `x0` toward 0.
    DoubleUp = 5,
    /// `x1` toward 1.
    Down = 6,
    /// `x0` toward 1.
    DoubleDown = 7,
}

impl Direction {
    /// Every direction in enumeration order. Search ties are broken by it.
    pub const ALL: [Direction; 8] = [
        Direction::Left,
        Direction::DoubleLeft,
        Direction::Right,
        Direction::DoubleRight,
        Direction::Up,
        Direction::DoubleUp,
        Direction::Down,
        Direction::DoubleDown,
    ];

    #[inline(always)]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(idx: usize) -> Option<Self> {
        Self::ALL.get(idx).copied()
    }

    /// True for the four directions that shift across rows.
    #[inline(always)]
    pub fn is_column(self) -> bool {
        self.index() >= 4
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "L",
            Direction::DoubleLeft => "LL",
            Direction::Right => "R",
            Direction::DoubleRight => "RR",
            Direction::Up => "U",
            Direction::DoubleUp => "UU",
            Direction::Down => "D",
            Direction::DoubleDown => "DD",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dir = match s.to_ascii_lowercase().as_str() {
            "l" | "left" => Direction::Left,
            "ll" | "double-left" => Direction::DoubleLeft,
            "r" | "right" => Direction::Right,
            "rr" | "double-right" => Direction::DoubleRight,
            "u" | "up" => Direction::Up,
            "uu" | "double-up" => Direction::DoubleUp,
            "d" | "down" => Direction::Down,
            "dd" | "double-down" => Direction::DoubleDown,
            _ => return Err(Error::Direction(s.to_string())),
        };
        Ok(dir)
    }
}

/// Set of directions that change a board; bit `d` stands for `Direction::ALL[d]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveMask(u8);

impl MoveMask {
    pub const NONE: MoveMask = MoveMask(0);

    #[inline]
    pub fn bits(self) -> u8 { self.0 }

    #[inline]
    pub fn contains(self, dir: Direction) -> bool { self.0 & (1 << dir.index()) != 0 }

    #[inline]
    pub fn is_empty(self) -> bool { self.0 == 0 }

    #[inline]
    pub fn len(self) -> usize { self.0.count_ones() as usize }

    #[inline]
    fn insert(&mut self, dir: Direction) { self.0 |= 1 << dir.index() }

    /// Legal directions in enumeration order.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&d| self.contains(d))
    }
}

type BoardRaw = u64;

const ROW_MASK: BoardRaw = 0xffff;
const COL_MASK: BoardRaw = 0x000f_000f_000f_000f;
const LOW_NIBBLE_BITS: BoardRaw = 0x1111_1111_1111_1111;

/// Packed 2×2×2×2 board: 16 exponent nibbles in a `u64`.
///
/// Cell `(x0, x1, x2, x3)` has linear index `8*x0 + 4*x1 + 2*x2 + x3` and
/// lives in the nibble at bit offset `4 * (15 - index)`, so index 0 is the
/// most significant nibble.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Board(BoardRaw);

impl Board {
    /// A constant empty board (all zeros).
    pub const EMPTY: Board = Board(0);

    #[inline]
    pub fn from_raw(raw: BoardRaw) -> Self { Board(raw) }

    #[inline]
    pub fn into_raw(self) -> BoardRaw { self.0 }

    #[inline]
    pub fn raw(&self) -> BoardRaw { self.0 }

    /// Encode 16 exponents given in linear cell order.
    ///
    /// Panics if an exponent exceeds 15.
    pub fn from_exponents(cells: [u8; 16]) -> Self {
        let raw = cells.iter().enumerate().fold(0, |acc, (idx, &e)| {
            assert!(e <= MAX_EXPONENT, "exponent {e} at cell {idx} exceeds {MAX_EXPONENT}");
            acc | (e as BoardRaw) << (4 * (15 - idx))
        });
        Board(raw)
    }

    /// Decode into 16 exponents in linear cell order.
    pub fn exponents(self) -> [u8; 16] {
        std::array::from_fn(|idx| ((self.0 >> (4 * (15 - idx))) & 0xf) as u8)
    }

    /// Exponent stored at the given coordinates (0 = empty).
    #[inline]
    pub fn exponent(self, x0: usize, x1: usize, x2: usize, x3: usize) -> u8 {
        ((self.0 >> nibble_offset(x0, x1, x2, x3)) & 0xf) as u8
    }

    /// Tile value at the given coordinates (0 if empty, else 2^exponent).
    #[inline]
    pub fn get(self, x0: usize, x1: usize, x2: usize, x3: usize) -> u32 {
        match self.exponent(x0, x1, x2, x3) {
            0 => 0,
            e => 1 << e,
        }
    }

    /// Board with the cell at the given coordinates replaced by `exponent`.
    pub fn with_exponent(self, x0: usize, x1: usize, x2: usize, x3: usize, exponent: u8) -> Self {
        assert!(exponent <= MAX_EXPONENT, "exponent {exponent} exceeds {MAX_EXPONENT}");
        let offset = nibble_offset(x0, x1, x2, x3);
        Board((self.0 & !(0xf << offset)) | (exponent as BoardRaw) << offset)
    }

    /// Board with the cell at the given coordinates set to tile `value`.
    ///
    /// `value` must be 0 (clears the cell) or a power of two in `2..=32768`.
    pub fn set(self, x0: usize, x1: usize, x2: usize, x3: usize, value: u32) -> Self {
        assert!(
            value == 0 || (value.is_power_of_two() && (2..=1 << MAX_EXPONENT).contains(&value)),
            "cell value {value} is not 0 or a power of two between 2 and 32768"
        );
        let exponent = if value == 0 { 0 } else { value.trailing_zeros() as u8 };
        self.with_exponent(x0, x1, x2, x3, exponent)
    }

    /// Swap the `(x0, x1)` axis pair with the `(x2, x3)` pair.
    #[inline]
    pub fn transpose(self) -> Self { Board(transpose(self.0)) }

    #[inline]
    pub fn swap_0_1(self) -> Self { Board(swap_0_1(self.0)) }

    #[inline]
    pub fn swap_0_2(self) -> Self { Board(swap_0_2(self.0)) }

    #[inline]
    pub fn swap_0_3(self) -> Self { Board(swap_0_3(self.0)) }

    #[inline]
    pub fn swap_1_2(self) -> Self { Board(swap_1_2(self.0)) }

    #[inline]
    pub fn swap_1_3(self) -> Self { Board(swap_1_3(self.0)) }

    #[inline]
    pub fn swap_2_3(self) -> Self { Board(swap_2_3(self.0)) }

    /// Reverse the two cells along `axis` (0..4).
    pub fn flip(self, axis: usize) -> Self {
        let raw = match axis {
            0 => flip_0(self.0),
            1 => flip_1(self.0),
            2 => flip_2(self.0),
            3 => flip_3(self.0),
            _ => panic!("axis {axis} out of range (0..4)"),
        };
        Board(raw)
    }

    /// Return the board resulting from sliding/merging tiles in `dir` (no random insert).
    #[inline]
    pub fn shift(self, dir: Direction) -> Self {
        let t = tables();
        let res = if dir.is_column() {
            (0..4).fold(0, |acc, col_idx| {
                let col = column_to_row((self.0 >> (4 * col_idx)) & COL_MASK);
                acc | (t.shifted(dir, col) << (4 * col_idx))
            })
        } else {
            (0..4).fold(0, |acc, row_idx| {
                let row = extract_row(self.0, row_idx);
                acc | (t.shifted(dir, row) << (16 * row_idx))
            })
        };
        Board(res)
    }

    /// Directions whose shift changes the board.
    pub fn valid_move_mask(self) -> MoveMask {
        let mut mask = MoveMask::NONE;
        for dir in Direction::ALL {
            if self.shift(dir) != self {
                mask.insert(dir);
            }
        }
        mask
    }

    /// Legal directions in enumeration order.
    #[inline]
    pub fn valid_moves(self) -> impl Iterator<Item = Direction> {
        self.valid_move_mask().iter()
    }

    /// Bit `4k` is set iff nibble `k` is empty.
    #[inline]
    pub fn blank_mask(self) -> BoardRaw {
        let mut blanks = !self.0;
        blanks &= blanks >> 1;
        blanks &= blanks >> 2;
        blanks & LOW_NIBBLE_BITS
    }

    #[inline]
    pub fn count_empty(self) -> u32 { self.blank_mask().count_ones() }

    /// Σ e·2^e over all cells (includes the value of spawned tiles).
    #[inline]
    pub fn score(self) -> u32 {
        let t = tables();
        (0..4).map(|row_idx| t.score(extract_row(self.0, row_idx))).sum()
    }

    /// Largest exponent on the board.
    pub fn rank(self) -> u8 {
        self.exponents().into_iter().max().unwrap_or(0)
    }

    /// Number of cells holding `exponent`.
    pub fn count(self, exponent: u8) -> u32 {
        self.exponents().iter().filter(|&&e| e == exponent).count() as u32
    }

    // Credit to Nneonneo
    /// Number of distinct non-empty exponents on the board.
    pub fn count_distinct(self) -> u32 {
        let mut bitset = 0u32;
        let mut raw = self.0;
        while raw != 0 {
            bitset |= 1 << (raw & 0xf);
            raw >>= 4;
        }
        (bitset >> 1).count_ones()
    }

    /// True iff every square face is full and stuck, i.e. no direction can
    /// change the board. The empty board is not terminal.
    #[inline]
    pub fn is_terminal(self) -> bool {
        rows_are_terminal(self.0) && rows_are_terminal(transpose(self.0))
    }

    /// Insert a random 2 (90%) or 4 (10%) tile into a random empty cell.
    ///
    /// Returns the board unchanged when it is full.
    pub fn with_random_tile<R: Rng + ?Sized>(self, rng: &mut R) -> Self {
        self.spawn_random(rng).map_or(self, |(board, _)| board)
    }

    /// Like [`Board::with_random_tile`], also reporting the spawned exponent.
    pub(crate) fn spawn_random<R: Rng + ?Sized>(self, rng: &mut R) -> Option<(Board, u8)> {
        let mut blanks = self.blank_mask();
        let n_blanks = blanks.count_ones();
        if n_blanks == 0 {
            return None;
        }
        for _ in 0..rng.gen_range(0..n_blanks) {
            blanks &= blanks - 1;
        }
        let slot = blanks & blanks.wrapping_neg();
        let exponent = if rng.gen_range(0..10) < 9 { 1 } else { 2 };
        Some((Board(self.0 | slot * exponent as BoardRaw), exponent))
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({:#018x})", self.0)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells = self.exponents();
        writeln!(f, "┌─────┬─────┬─────┬─────┐")?;
        for (row_idx, row) in cells.chunks(4).enumerate() {
            for &e in row {
                if e == 0 {
                    write!(f, "│     ")?;
                } else {
                    write!(f, "│{:>5}", 1u32 << e)?;
                }
            }
            writeln!(f, "│")?;
            if row_idx != 3 {
                writeln!(f, "├─────┼─────┼─────┼─────┤")?;
            }
        }
        write!(f, "└─────┴─────┴─────┴─────┘")
    }
}

impl From<BoardRaw> for Board { fn from(v: BoardRaw) -> Self { Board::from_raw(v) } }
impl From<Board> for BoardRaw { fn from(b: Board) -> Self { b.into_raw() } }

#[inline]
fn nibble_offset(x0: usize, x1: usize, x2: usize, x3: usize) -> u32 {
    assert!(
        x0 < 2 && x1 < 2 && x2 < 2 && x3 < 2,
        "axis coordinates must be 0 or 1, got ({x0}, {x1}, {x2}, {x3})"
    );
    4 * (15 - (8 * x0 + 4 * x1 + 2 * x2 + x3)) as u32
}

#[inline(always)]
pub(crate) fn extract_row(board: BoardRaw, row_idx: u32) -> u16 {
    ((board >> (16 * row_idx)) & ROW_MASK) as u16
}

/// Gathers the nibbles at offsets 48/32/16/0 into one row.
#[inline(always)]
fn column_to_row(col: BoardRaw) -> u16 {
    (((col >> 36) | (col >> 24) | (col >> 12) | col) & ROW_MASK) as u16
}

#[inline(always)]
fn rows_are_terminal(board: BoardRaw) -> bool {
    let t = tables();
    (0..4).all(|row_idx| t.is_terminal(extract_row(board, row_idx)))
}

// Credit to Nneonneo
/// Turns 0x0123456789ABCDEF into 0x048C159D26AE37BF.
#[inline(always)]
pub const fn transpose(x: BoardRaw) -> BoardRaw {
    let a1 = x & 0xF0F00F0FF0F00F0F;
    let a2 = x & 0x0000F0F00000F0F0;
    let a3 = x & 0x0F0F00000F0F0000;
    let a = a1 | (a2 << 12) | (a3 >> 12);
    let b1 = a & 0xFF00FF0000FF00FF;
    let b2 = a & 0x00FF00FF00000000;
    let b3 = a & 0x00000000FF00FF00;
    b1 | (b2 >> 24) | (b3 << 24)
}

/// Exchange two axes whose nibble strides are `hi` and `lo` (hi > lo).
/// `keep` selects the cells whose two coordinates are equal.
#[inline(always)]
const fn swap_axes(x: BoardRaw, keep: BoardRaw, up: BoardRaw, distance: u32) -> BoardRaw {
    let down = !(keep | up);
    (x & keep) | ((x & up) >> distance) | ((x & down) << distance)
}

#[inline(always)]
pub const fn swap_0_1(x: BoardRaw) -> BoardRaw { swap_axes(x, 0xffff_0000_0000_ffff, 0x0000_ffff_0000_0000, 16) }

#[inline(always)]
pub const fn swap_0_2(x: BoardRaw) -> BoardRaw { swap_axes(x, 0xff00_ff00_00ff_00ff, 0x00ff_00ff_0000_0000, 24) }

#[inline(always)]
pub const fn swap_0_3(x: BoardRaw) -> BoardRaw { swap_axes(x, 0xf0f0_f0f0_0f0f_0f0f, 0x0f0f_0f0f_0000_0000, 28) }

#[inline(always)]
pub const fn swap_1_2(x: BoardRaw) -> BoardRaw { swap_axes(x, 0xff00_00ff_ff00_00ff, 0x00ff_0000_00ff_0000, 8) }

#[inline(always)]
pub const fn swap_1_3(x: BoardRaw) -> BoardRaw { swap_axes(x, 0xf0f0_0f0f_f0f0_0f0f, 0x0f0f_0000_0f0f_0000, 12) }

#[inline(always)]
pub const fn swap_2_3(x: BoardRaw) -> BoardRaw { swap_axes(x, 0xf00f_f00f_f00f_f00f, 0x0f00_0f00_0f00_0f00, 4) }

#[inline(always)]
pub const fn flip_0(x: BoardRaw) -> BoardRaw { x.rotate_left(32) }

#[inline(always)]
pub const fn flip_1(x: BoardRaw) -> BoardRaw {
    ((x & 0xffff_0000_ffff_0000) >> 16) | ((x & 0x0000_ffff_0000_ffff) << 16)
}

#[inline(always)]
pub const fn flip_2(x: BoardRaw) -> BoardRaw {
    ((x & 0xff00_ff00_ff00_ff00) >> 8) | ((x & 0x00ff_00ff_00ff_00ff) << 8)
}

#[inline(always)]
pub const fn flip_3(x: BoardRaw) -> BoardRaw {
    ((x & 0xf0f0_f0f0_f0f0_f0f0) >> 4) | ((x & 0x0f0f_0f0f_0f0f_0f0f) << 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    /// Exponent equal to the linear index, with index 0 left empty.
    const ASCENDING: Board = Board(0x0123_4567_89ab_cdef);

    #[test]
    fn it_indexes_cells_msb_first() {
        assert_eq!(ASCENDING.exponent(0, 0, 0, 0), 0);
        assert_eq!(ASCENDING.exponent(0, 0, 0, 1), 1);
        assert_eq!(ASCENDING.exponent(0, 1, 1, 0), 6);
        assert_eq!(ASCENDING.exponent(1, 0, 1, 1), 11);
        assert_eq!(ASCENDING.exponent(1, 1, 1, 1), 15);
        assert_eq!(ASCENDING.get(0, 0, 1, 1), 8);
        assert_eq!(ASCENDING.get(1, 0, 1, 0), 1024);
        assert_eq!(ASCENDING.get(0, 0, 0, 0), 0);
    }

    #[test]
    fn it_sets_and_clears_cells() {
        let b = Board::EMPTY.set(1, 0, 1, 0, 64);
        assert_eq!(b.exponent(1, 0, 1, 0), 6);
        assert_eq!(b.raw(), 0x0000_0000_0060_0000);
        assert_eq!(b.set(1, 0, 1, 0, 0), Board::EMPTY);
        assert_eq!(b.set(1, 0, 1, 0, 2).get(1, 0, 1, 0), 2);
    }

    #[test]
    #[should_panic(expected = "not 0 or a power of two")]
    fn it_rejects_non_power_of_two_values() {
        let _ = Board::EMPTY.set(0, 0, 0, 0, 6);
    }

    #[test]
    #[should_panic(expected = "axis coordinates")]
    fn it_rejects_out_of_range_coordinates() {
        let _ = Board::EMPTY.get(0, 2, 0, 0);
    }

    #[test]
    fn it_round_trips_exponents() {
        let cells = [3, 0, 15, 1, 2, 2, 0, 9, 14, 5, 0, 0, 7, 1, 1, 4];
        assert_eq!(Board::from_exponents(cells).exponents(), cells);
        assert_eq!(ASCENDING.exponents(), std::array::from_fn(|i| i as u8));
    }

    #[test]
    fn test_transpose() {
        assert_eq!(ASCENDING.transpose().raw(), 0x048c_159d_26ae_37bf);
        assert_eq!(ASCENDING.transpose().transpose(), ASCENDING);
        assert_eq!(ASCENDING.swap_0_2().swap_1_3(), ASCENDING.transpose());
    }

    #[test]
    fn test_swaps_exchange_coordinates() {
        let b = ASCENDING;
        for x0 in 0..2 {
            for x1 in 0..2 {
                for x2 in 0..2 {
                    for x3 in 0..2 {
                        let e = b.exponent(x0, x1, x2, x3);
                        assert_eq!(b.swap_0_1().exponent(x1, x0, x2, x3), e);
                        assert_eq!(b.swap_0_2().exponent(x2, x1, x0, x3), e);
                        assert_eq!(b.swap_0_3().exponent(x3, x1, x2, x0), e);
                        assert_eq!(b.swap_1_2().exponent(x0, x2, x1, x3), e);
                        assert_eq!(b.swap_1_3().exponent(x0, x3, x2, x1), e);
                        assert_eq!(b.swap_2_3().exponent(x0, x1, x3, x2), e);
                        assert_eq!(b.flip(0).exponent(1 - x0, x1, x2, x3), e);
                        assert_eq!(b.flip(1).exponent(x0, 1 - x1, x2, x3), e);
                        assert_eq!(b.flip(2).exponent(x0, x1, 1 - x2, x3), e);
                        assert_eq!(b.flip(3).exponent(x0, x1, x2, 1 - x3), e);
                    }
                }
            }
        }
    }

    #[test]
    fn test_row_shifts() {
        let b = Board::from_raw(0x1122_0101_3003_ff00);
        assert_eq!(b.shift(Direction::Left).raw(), 0x2030_1010_3030_f000);
        assert_eq!(b.shift(Direction::Right).raw(), 0x0203_0101_0303_0f00);
        assert_eq!(b.shift(Direction::DoubleLeft).raw(), 0x1122_0200_3300_ff00);
        assert_eq!(b.shift(Direction::DoubleRight).raw(), 0x1122_0002_0033_00ff);
    }

    #[test]
    fn test_column_shifts() {
        // one column of cells at x2 = x3 = 1 holding [1, 1, 2, 0] by row
        let b = Board::from_raw(0x0001_0001_0002_0000);
        assert_eq!(b.shift(Direction::Up).raw(), 0x0002_0000_0002_0000);
        assert_eq!(b.shift(Direction::Down).raw(), 0x0000_0002_0000_0002);
        assert_eq!(b.shift(Direction::DoubleUp).raw(), 0x0001_0001_0002_0000);
        assert_eq!(b.shift(Direction::DoubleDown).raw(), 0x0001_0000_0002_0001);
    }

    #[test]
    fn test_valid_move_mask() {
        assert!(Board::EMPTY.valid_move_mask().is_empty());
        let single = Board::EMPTY.set(0, 0, 0, 0, 2);
        let legal: Vec<_> = single.valid_moves().collect();
        assert_eq!(legal, vec![Direction::Right, Direction::DoubleRight, Direction::Down, Direction::DoubleDown]);
        assert!(single.valid_move_mask().contains(Direction::Down));
        assert!(!single.valid_move_mask().contains(Direction::Up));
        assert_eq!(single.valid_move_mask().len(), 4);
    }

    #[test]
    fn test_blank_mask_and_count() {
        assert_eq!(Board::EMPTY.blank_mask(), LOW_NIBBLE_BITS);
        assert_eq!(Board::EMPTY.count_empty(), 16);
        assert_eq!(ASCENDING.blank_mask(), 1 << 60);
        assert_eq!(Board::from_raw(0x1111_0000_1111_0000).count_empty(), 8);
    }

    #[test]
    fn test_score_rank_count() {
        assert_eq!(Board::EMPTY.score(), 0);
        assert_eq!(Board::EMPTY.set(0, 1, 0, 1, 4).score(), 8);
        assert_eq!(ASCENDING.rank(), 15);
        assert_eq!(Board::EMPTY.rank(), 0);
        let b = Board::from_raw(0x1100_0001_0000_f00f);
        assert_eq!(b.count(1), 3);
        assert_eq!(b.count(15), 2);
        assert_eq!(b.count(0), 11);
        assert_eq!(b.count_distinct(), 2);
        assert_eq!(ASCENDING.count_distinct(), 15);
        assert_eq!(Board::EMPTY.count_distinct(), 0);
    }

    #[test]
    fn test_terminal_checkerboard() {
        // neighbours differ in coordinate parity, so no two are equal
        let cells: [u8; 16] = std::array::from_fn(|i| 1 + (i as u32).count_ones() as u8);
        let b = Board::from_exponents(cells);
        assert!(b.is_terminal());
        assert!(b.valid_move_mask().is_empty());
        let open = b.with_exponent(1, 1, 1, 1, 0);
        assert!(!open.is_terminal());
        assert!(!open.valid_move_mask().is_empty());
        assert!(!Board::EMPTY.is_terminal());
    }

    #[test]
    fn it_inserts_random_tiles() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut b = Board::EMPTY;
        for filled in 1..=16 {
            b = b.with_random_tile(&mut rng);
            assert_eq!(b.count_empty(), 16 - filled);
        }
        assert!(b.exponents().iter().all(|&e| e == 1 || e == 2));
        assert_eq!(b.with_random_tile(&mut rng), b);
    }

    #[test]
    fn it_parses_directions() {
        for dir in Direction::ALL {
            assert_eq!(dir.as_str().parse::<Direction>().unwrap(), dir);
            assert_eq!(Direction::from_index(dir.index()), Some(dir));
        }
        assert_eq!("double-up".parse::<Direction>().unwrap(), Direction::DoubleUp);
        assert!("north".parse::<Direction>().is_err());
    }

    #[test]
    fn it_displays_tile_values() {
        let text = Board::EMPTY.set(0, 0, 0, 0, 2048).to_string();
        assert!(text.starts_with("┌"));
        assert!(text.contains("│ 2048│"));
        assert_eq!(text.lines().count(), 9);
    }
}

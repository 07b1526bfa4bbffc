//! Per-row lookup tables.
//!
//! A row is the 16-bit group of four cells sharing the first two axis
//! coordinates, i.e. one 2×2 square face of the hypercube. Every full-board
//! operation is four lookups into one of these tables, so everything about
//! shifting, scoring and terminal detection for a single face is decided
//! here, once, for all 65 536 row patterns.
//!
//! Nibble `j` of a row (counting from the most significant) holds the cell
//! with `(x2, x3) = (j >> 1, j & 1)`.

use std::sync::OnceLock;

use crate::engine::Direction;

/// 65,536 possible 16-bit rows.
pub const ROW_TABLE_SIZE: usize = 0x1_0000;

/// Largest storable exponent; merging two of these saturates.
pub const MAX_EXPONENT: u8 = 15;

/// Base of the super-linear tile value used by the clustering heuristic.
pub const POWER_BASE: f64 = 2.75;

/// Base of the per-step monotonicity cost.
pub const MONOTONICITY_BASE: f64 = 3.0;

type Cells = [u8; 4];

/// `(target, source)` cell pairs merged by one shift primitive.
type Pairs = [(usize, usize); 2];

const SINGLE_FORWARD: Pairs = [(0, 1), (2, 3)];
const DOUBLE_FORWARD: Pairs = [(0, 2), (1, 3)];
const SINGLE_BACKWARD: Pairs = [(1, 0), (3, 2)];
const DOUBLE_BACKWARD: Pairs = [(2, 0), (3, 1)];

const PRIMITIVES: [Pairs; 4] = [SINGLE_FORWARD, DOUBLE_FORWARD, SINGLE_BACKWARD, DOUBLE_BACKWARD];

/// Immutable bundle of every per-row table.
///
/// Build it with [`Tables::build`] or borrow the process-wide instance from
/// [`tables`].
pub struct Tables {
    moves: [Box<[u64]>; 8],
    score: Box<[u32]>,
    power: Box<[f64]>,
    edge: Box<[f64]>,
    monotonicity: Box<[f64]>,
    merges: Box<[u8]>,
    blanks: Box<[u8]>,
    terminal: Box<[bool]>,
}

static TABLES: OnceLock<Tables> = OnceLock::new();

/// Shared tables, built on first use. Safe to call from any thread.
#[inline]
pub fn tables() -> &'static Tables {
    TABLES.get_or_init(Tables::build)
}

impl Tables {
    /// Compute every table from scratch.
    pub fn build() -> Self {
        let moves = Direction::ALL.map(|dir| {
            (0..ROW_TABLE_SIZE)
                .map(|row| {
                    let shifted = reduce(unpack(row as u16), primitive(dir));
                    if dir.is_column() { pack_col(shifted) } else { pack_row(shifted) }
                })
                .collect::<Vec<_>>()
                .into_boxed_slice()
        });

        let mut score = vec![0u32; ROW_TABLE_SIZE];
        let mut power = vec![0f64; ROW_TABLE_SIZE];
        let mut edge = vec![0f64; ROW_TABLE_SIZE];
        let mut monotonicity = vec![0f64; ROW_TABLE_SIZE];
        let mut merges = vec![0u8; ROW_TABLE_SIZE];
        let mut blanks = vec![0u8; ROW_TABLE_SIZE];
        let mut terminal = vec![false; ROW_TABLE_SIZE];

        for row in 0..ROW_TABLE_SIZE {
            let cells = unpack(row as u16);
            score[row] = row_score(cells);
            power[row] = cells.iter().map(|&e| tile_power(e)).sum();
            edge[row] = edge_power(cells);
            monotonicity[row] = row_monotonicity(cells);
            merges[row] = merge_potential(cells);
            blanks[row] = count_blanks(cells);
            terminal[row] = is_terminal_row(cells);
        }

        Tables {
            moves,
            score: score.into_boxed_slice(),
            power: power.into_boxed_slice(),
            edge: edge.into_boxed_slice(),
            monotonicity: monotonicity.into_boxed_slice(),
            merges: merges.into_boxed_slice(),
            blanks: blanks.into_boxed_slice(),
            terminal: terminal.into_boxed_slice(),
        }
    }

    /// Result of shifting one row in `dir`.
    ///
    /// Row directions return a 16-bit row; column directions return the
    /// cells spread to nibble offsets 48/32/16/0 so they can be shifted into
    /// any column of the board.
    #[inline(always)]
    pub fn shifted(&self, dir: Direction, row: u16) -> u64 {
        self.moves[dir.index()][row as usize]
    }

    /// Σ e·2^e over the row.
    #[inline(always)]
    pub fn score(&self, row: u16) -> u32 {
        self.score[row as usize]
    }

    /// Σ `POWER_BASE`^e over the row.
    #[inline(always)]
    pub fn power(&self, row: u16) -> f64 {
        self.power[row as usize]
    }

    /// Largest power sum over the four edges of the face.
    #[inline(always)]
    pub fn edge(&self, row: u16) -> f64 {
        self.edge[row as usize]
    }

    /// Zero iff the face holds a monotone loop.
    #[inline(always)]
    pub fn monotonicity(&self, row: u16) -> f64 {
        self.monotonicity[row as usize]
    }

    /// Most merges still obtainable inside the face.
    #[inline(always)]
    pub fn merges(&self, row: u16) -> u8 {
        self.merges[row as usize]
    }

    #[inline(always)]
    pub fn blanks(&self, row: u16) -> u8 {
        self.blanks[row as usize]
    }

    /// True iff no shift inside the face could change it.
    #[inline(always)]
    pub fn is_terminal(&self, row: u16) -> bool {
        self.terminal[row as usize]
    }
}

fn primitive(dir: Direction) -> Pairs {
    match dir {
        Direction::Left | Direction::Up => SINGLE_FORWARD,
        Direction::DoubleLeft | Direction::DoubleUp => DOUBLE_FORWARD,
        Direction::Right | Direction::Down => SINGLE_BACKWARD,
        Direction::DoubleRight | Direction::DoubleDown => DOUBLE_BACKWARD,
    }
}

pub(crate) fn unpack(row: u16) -> Cells {
    [(row >> 12) as u8 & 0xf, (row >> 8) as u8 & 0xf, (row >> 4) as u8 & 0xf, row as u8 & 0xf]
}

pub(crate) fn pack_row(cells: Cells) -> u64 {
    (cells[0] as u64) << 12 | (cells[1] as u64) << 8 | (cells[2] as u64) << 4 | cells[3] as u64
}

fn pack_col(cells: Cells) -> u64 {
    (cells[0] as u64) << 48 | (cells[1] as u64) << 32 | (cells[2] as u64) << 16 | cells[3] as u64
}

// Each axis has two cells, so a shift is a swap into the empty target or a
// merge into the target.
fn reduce(mut cells: Cells, pairs: Pairs) -> Cells {
    for (target, source) in pairs {
        if cells[target] == 0 {
            cells.swap(target, source);
        } else if cells[target] == cells[source] {
            // 2^15 + 2^15 stays 2^15; the game books the difference.
            cells[target] = (cells[target] + 1).min(MAX_EXPONENT);
            cells[source] = 0;
        }
    }
    cells
}

fn count_blanks(cells: Cells) -> u8 {
    cells.iter().filter(|&&e| e == 0).count() as u8
}

fn row_score(cells: Cells) -> u32 {
    cells.iter().map(|&e| (e as u32) << e).sum()
}

fn tile_power(exponent: u8) -> f64 {
    POWER_BASE.powi(exponent as i32)
}

fn edge_power(cells: Cells) -> f64 {
    [(0, 1), (2, 3), (0, 2), (1, 3)]
        .iter()
        .map(|&(a, b)| tile_power(cells[a]) + tile_power(cells[b]))
        .fold(f64::NEG_INFINITY, f64::max)
}

fn merge_potential(cells: Cells) -> u8 {
    let before = count_blanks(cells);
    PRIMITIVES
        .iter()
        .filter_map(|&pairs| {
            let after = reduce(cells, pairs);
            let merged = count_blanks(after) - before;
            (merged > 0).then(|| merged + merge_potential(after))
        })
        .max()
        .unwrap_or(0)
}

fn row_monotonicity(cells: Cells) -> f64 {
    // Walk the square around its boundary.
    let ring = [cells[0], cells[1], cells[3], cells[2]];
    (0..4)
        .map(|start| {
            let mut descending = 0.0;
            let mut ascending = 0.0;
            for step in 0..3 {
                let a = MONOTONICITY_BASE.powi(ring[(start + step) % 4] as i32);
                let b = MONOTONICITY_BASE.powi(ring[(start + step + 1) % 4] as i32);
                if a > b {
                    descending += a - b;
                } else {
                    ascending += b - a;
                }
            }
            f64::min(descending, ascending)
        })
        .fold(f64::INFINITY, f64::min)
}

fn is_terminal_row(cells: Cells) -> bool {
    cells.iter().all(|&e| e != 0)
        && cells[0] != cells[1]
        && cells[2] != cells[3]
        && cells[0] != cells[2]
        && cells[1] != cells[3]
}

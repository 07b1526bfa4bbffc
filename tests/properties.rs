//! Property-based tests for the board codec and move tables.

use std::sync::OnceLock;

use proptest::prelude::*;

use ai_2048_4d::engine::{Board, Direction};
use ai_2048_4d::search::{Evaluator, Fast, Full};

/// Any packed board, including saturated cells.
fn board_strategy() -> impl Strategy<Value = Board> {
    any::<u64>().prop_map(Board::from_raw)
}

/// Boards with small exponents, dense enough to hit stuck positions.
fn small_tile_board() -> impl Strategy<Value = Board> {
    prop::array::uniform16(0u8..=3).prop_map(Board::from_exponents)
}

/// Boards whose merges can never saturate.
fn unsaturated_board() -> impl Strategy<Value = Board> {
    prop::array::uniform16(0u8..=14).prop_map(Board::from_exponents)
}

fn direction_strategy() -> impl Strategy<Value = Direction> {
    (0..8usize).prop_map(|idx| Direction::ALL[idx])
}

fn permutations() -> [fn(Board) -> Board; 11] {
    [
        Board::transpose,
        Board::swap_0_1,
        Board::swap_0_2,
        Board::swap_0_3,
        Board::swap_1_2,
        Board::swap_1_3,
        Board::swap_2_3,
        |b: Board| b.flip(0),
        |b: Board| b.flip(1),
        |b: Board| b.flip(2),
        |b: Board| b.flip(3),
    ]
}

fn evaluators() -> &'static (Evaluator<Full>, Evaluator<Fast>) {
    static EVALUATORS: OnceLock<(Evaluator<Full>, Evaluator<Fast>)> = OnceLock::new();
    EVALUATORS.get_or_init(|| (Evaluator::default(), Evaluator::default()))
}

fn sorted_exponents(board: Board) -> [u8; 16] {
    let mut cells = board.exponents();
    cells.sort_unstable();
    cells
}

proptest! {
    // 1. Shifting twice equals shifting once
    #[test]
    fn shift_idempotent(board in board_strategy(), dir in direction_strategy()) {
        let once = board.shift(dir);
        prop_assert_eq!(once.shift(dir), once);
    }

    // 2. Every permutation is an involution that keeps the tiles
    #[test]
    fn permutations_are_involutions(board in board_strategy()) {
        for perm in permutations() {
            prop_assert_eq!(perm(perm(board)), board);
            prop_assert_eq!(sorted_exponents(perm(board)), sorted_exponents(board));
        }
    }

    // 3. transpose decomposes into two axis swaps
    #[test]
    fn transpose_is_two_swaps(board in board_strategy()) {
        prop_assert_eq!(board.transpose(), board.swap_0_2().swap_1_3());
        prop_assert_eq!(board.transpose(), board.swap_1_3().swap_0_2());
    }

    // 4. No legal move iff terminal, for non-empty boards
    #[test]
    fn empty_mask_iff_terminal(board in small_tile_board()) {
        prop_assume!(board != Board::EMPTY);
        prop_assert_eq!(board.valid_move_mask().is_empty(), board.is_terminal());
    }

    #[test]
    fn empty_mask_iff_terminal_any(board in board_strategy()) {
        prop_assume!(board != Board::EMPTY);
        prop_assert_eq!(board.valid_move_mask().is_empty(), board.is_terminal());
    }

    // 5. Relabelling axes keeps the number of legal moves and terminality
    #[test]
    fn permutations_preserve_mobility(board in small_tile_board()) {
        for perm in permutations() {
            let moved = perm(board);
            prop_assert_eq!(moved.valid_move_mask().len(), board.valid_move_mask().len());
            prop_assert_eq!(moved.is_terminal(), board.is_terminal());
        }
    }

    // 6. Exponent encoding round-trips
    #[test]
    fn exponents_round_trip(cells in prop::array::uniform16(0u8..=15)) {
        prop_assert_eq!(Board::from_exponents(cells).exponents(), cells);
    }

    // 7. Below saturation, shifts conserve tile mass and never lose score or blanks
    #[test]
    fn shift_conserves_tiles(board in unsaturated_board(), dir in direction_strategy()) {
        let mass = |b: Board| -> u64 {
            b.exponents().iter().map(|&e| if e == 0 { 0 } else { 1u64 << e }).sum()
        };
        let after = board.shift(dir);
        prop_assert_eq!(mass(after), mass(board));
        prop_assert!(after.score() >= board.score());
        prop_assert!(after.count_empty() >= board.count_empty());
    }

    // 8. Blank mask agrees with the exponent view
    #[test]
    fn blank_mask_matches_count(board in board_strategy()) {
        prop_assert_eq!(board.blank_mask().count_ones(), board.count(0));
        prop_assert_eq!(board.count_empty(), board.count(0));
    }

    // 9. Heuristic is deterministic and finite
    #[test]
    fn heuristic_finite(board in board_strategy()) {
        let (full, fast) = evaluators();
        let value = full.heuristic(board);
        prop_assert!(value.is_finite());
        prop_assert_eq!(value, full.heuristic(board));
        prop_assert!(fast.heuristic(board).is_finite());
    }

    // 10. A legal move always leaves a blank to spawn into
    #[test]
    fn legal_moves_leave_a_blank(board in board_strategy()) {
        for dir in board.valid_moves() {
            prop_assert!(board.shift(dir).count_empty() >= 1);
        }
    }
}

//! ai-2048-4d: a four-dimensional 2048 engine + search policies
//!
//! The board is a 2×2×2×2 hypercube packed into a `u64`, one 4-bit exponent
//! per cell. Tiles slide along one of the four axes in either sense, giving
//! eight directions.
//!
//! This crate provides:
//! - A compact `Board` type with table-driven shifts, axis permutations,
//!   scoring and terminal detection (`engine`, `tables`).
//! - A `Game` wrapper that books spawns and saturated merges (`game`).
//! - A weighted heuristic plus expectimax, minimax and Monte-Carlo engines
//!   behind one `Solver` (`search`).
//! - TOML configuration for the solver (`config`).
//!
//! Quick start:
//! ```
//! use ai_2048_4d::engine::{Board, Direction};
//! use ai_2048_4d::game::Game;
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! // Deterministic board initialization with a seeded RNG
//! let mut rng = StdRng::seed_from_u64(42);
//! let mut game = Game::start(&mut rng);
//! assert_eq!(game.board().count_empty(), 14);
//!
//! // Tables are built on first use
//! let b = Board::EMPTY.set(0, 0, 0, 0, 2).set(0, 0, 0, 1, 2);
//! assert_eq!(b.shift(Direction::Left).get(0, 0, 0, 0), 4);
//!
//! if let Some(dir) = game.random_move(&mut rng) {
//!     assert!(game.play(dir, &mut rng));
//! }
//! ```
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod search;
pub mod tables;

pub use error::{Error, Result};

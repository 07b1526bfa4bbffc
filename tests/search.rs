//! Scenario tests for the search engines and the solver facade.

use ai_2048_4d::config::SolverConfig;
use ai_2048_4d::engine::{Board, Direction};
use ai_2048_4d::game::Game;
use ai_2048_4d::search::{
    Evaluator, Expectimax, ExpectimaxConfig, Fast, Full, Minimax, MinimaxConfig, MonteCarlo, MonteCarloConfig,
    Policy, Solver, Strategy, Weights,
};
use rand::{rngs::StdRng, RngCore, SeedableRng};

/// A handful of reachable mid-game positions.
fn positions(seed: u64, count: usize) -> Vec<Game> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut game = Game::start(&mut rng);
    let mut out = Vec::new();
    while out.len() < count {
        match game.random_move(&mut rng) {
            Some(dir) => {
                game.play(dir, &mut rng);
                out.push(game);
            }
            None => game = Game::start(&mut rng),
        }
    }
    out.retain(|g| !g.valid_move_mask().is_empty());
    out
}

fn greedy(eval: &Evaluator, board: Board) -> Direction {
    let mut best: Option<(Direction, f64)> = None;
    for dir in board.valid_moves() {
        let value = eval.heuristic(board.shift(dir));
        if best.map_or(true, |(_, v)| value > v) {
            best = Some((dir, value));
        }
    }
    best.unwrap().0
}

#[test]
fn expectimax_with_unit_cutoff_is_greedy() {
    let eval = Evaluator::<Full>::default();
    let cfg = ExpectimaxConfig { depth: 4, min_prob: 1.0, cache_enabled: true, parallel: false };
    let mut ex: Expectimax = Expectimax::with_config(cfg);
    for game in positions(17, 40) {
        assert_eq!(ex.best_move(&game), greedy(&eval, game.board()), "{:?}", game.board());
    }
}

#[test]
fn expectimax_opening_returns_legal_move() {
    let mut rng = StdRng::seed_from_u64(2048);
    let game = Game::start(&mut rng);
    let cfg = ExpectimaxConfig { depth: 3, min_prob: 1e-3, ..ExpectimaxConfig::default() };
    let mut ex: Expectimax = Expectimax::with_config(cfg);
    let dir = ex.best_move(&game);
    assert!(game.valid_move_mask().contains(dir));
    assert!(ex.last_stats().nodes > 0);
}

#[test]
fn sequential_and_parallel_expectimax_agree() {
    for game in positions(5, 12) {
        let base = ExpectimaxConfig { depth: 2, min_prob: 1e-3, cache_enabled: true, parallel: false };
        let mut seq: Expectimax = Expectimax::with_config(base);
        let mut par: Expectimax = Expectimax::with_config(ExpectimaxConfig { parallel: true, ..base });
        assert_eq!(seq.branch_evals(&game), par.branch_evals(&game));
        assert_eq!(seq.best_move(&game), par.best_move(&game));
        assert_eq!(seq.last_stats().nodes, par.last_stats().nodes);
    }
}

#[test]
fn sequential_and_parallel_minimax_agree() {
    for game in positions(6, 10) {
        let mut seq: Minimax = Minimax::with_config(MinimaxConfig { depth: 2, parallel: false });
        let mut par: Minimax = Minimax::with_config(MinimaxConfig { depth: 2, parallel: true });
        assert_eq!(seq.branch_evals(&game), par.branch_evals(&game));
    }
}

#[test]
fn sequential_and_parallel_mcts_agree() {
    for (idx, game) in positions(7, 6).into_iter().enumerate() {
        let mut seq = MonteCarlo::with_config(MonteCarloConfig { simulations: 64, parallel: false });
        let mut par = MonteCarlo::with_config(MonteCarloConfig { simulations: 64, parallel: true });
        let seed = 1000 + idx as u64;
        let a = seq.branch_evals(&game, &mut StdRng::seed_from_u64(seed));
        let b = par.branch_evals(&game, &mut StdRng::seed_from_u64(seed));
        assert_eq!(a, b);
    }
}

#[test]
fn every_strategy_forces_the_saturated_merge() {
    let board = Board::EMPTY
        .set(0, 1, 0, 0, 32768)
        .set(1, 1, 0, 0, 32768)
        .set(0, 0, 0, 0, 2)
        .set(1, 0, 1, 1, 4);
    let game = Game::from_board(board);
    // x0 is the only axis separating the two 15-cells
    let expected = game.valid_moves().find(|&d| board.shift(d).count(15) == 1).unwrap();
    assert!(matches!(expected, Direction::DoubleUp | Direction::DoubleDown));

    for strategy in [
        Strategy::Expectimax { depth: 2, min_prob: 0.01 },
        Strategy::Minimax { depth: 2 },
    ] {
        let mut solver: Solver = Solver::new(Weights::default(), strategy, false).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(solver.choose_move(&game, &mut rng), expected, "{strategy}");
        assert_eq!(solver.last_stats().nodes, 0);
    }
}

#[test]
fn solver_plays_through_policy_objects() {
    let mut policies: Vec<Box<dyn Policy>> = vec![
        Box::new(Solver::<Fast>::new(Weights::default(), Strategy::Expectimax { depth: 1, min_prob: 0.01 }, true).unwrap()),
        Box::new(Solver::<Full>::new(Weights::default(), Strategy::Minimax { depth: 1 }, false).unwrap()),
        Box::new(MonteCarlo::with_config(MonteCarloConfig { simulations: 8, parallel: true })),
    ];
    for policy in policies.iter_mut() {
        let mut rng = StdRng::seed_from_u64(31);
        let mut game = Game::start(&mut rng);
        for _ in 0..25 {
            if game.valid_move_mask().is_empty() {
                break;
            }
            let dir = policy.choose_move(game, &mut rng as &mut dyn RngCore);
            assert!(game.play(dir, &mut rng), "policy picked a no-op {dir}");
        }
        assert!(game.score() > 0);
    }
}

#[test]
fn solver_builds_from_config() {
    let cfg = SolverConfig::from_toml_str(
        "parallel = false\n[strategy]\nkind = \"monte_carlo\"\nsimulations = 16\n",
    )
    .unwrap();
    let mut solver: Solver = Solver::from_config(&cfg).unwrap();
    assert_eq!(solver.strategy(), Strategy::MonteCarlo { simulations: 16 });
    let mut rng = StdRng::seed_from_u64(8);
    let game = Game::start(&mut rng);
    let dir = solver.choose_move(&game, &mut rng);
    assert!(game.valid_move_mask().contains(dir));
    assert_eq!(solver.last_stats().nodes as usize, game.valid_move_mask().len() * (16 / game.valid_move_mask().len()));
}

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ai_2048_4d::config::{HeuristicPrecision, SolverConfig};
use ai_2048_4d::game::Game;
use ai_2048_4d::search::{
    ExpectimaxConfig, Fast, Full, MinimaxConfig, MonteCarloConfig, Precision, Solver, Strategy, Weights,
};
use anyhow::Context;
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::{rngs::StdRng, SeedableRng};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyKind {
    Expectimax,
    Minimax,
    Mcts,
}

/// Play four-dimensional 2048 with a search policy.
#[derive(Parser, Debug)]
#[command(name = "ai-2048-4d", version, about)]
struct Args {
    /// TOML config file (defaults to ./Solver.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Search algorithm
    #[arg(long, value_enum)]
    strategy: Option<StrategyKind>,
    /// Search depth for expectimax / minimax
    #[arg(long)]
    depth: Option<u32>,
    /// Expectimax probability cutoff
    #[arg(long)]
    min_prob: Option<f32>,
    /// Total Monte-Carlo playouts per move
    #[arg(long)]
    simulations: Option<u32>,
    /// Heuristic weights: merge,blank,cube,square,edge,monotonicity
    #[arg(long)]
    weights: Option<Weights>,
    /// Use the cheaper heuristic
    #[arg(long)]
    fast: bool,
    /// Evaluate root moves on one thread
    #[arg(long)]
    sequential: bool,
    /// RNG seed for reproducible games
    #[arg(long)]
    seed: Option<u64>,
    /// Number of games to play
    #[arg(long, default_value_t = 1)]
    games: u32,
    /// Stop a game after this many moves
    #[arg(long)]
    max_moves: Option<u64>,
    /// Only print the per-game summary
    #[arg(long, default_value_t = false)]
    quiet: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => SolverConfig::from_file(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SolverConfig::load_or_default().context("loading Solver.toml")?,
    };
    apply_overrides(&mut cfg, &args);
    cfg.validate().context("invalid solver settings")?;
    info!("strategy {}, precision {}, parallel {}", cfg.strategy, cfg.precision, cfg.parallel);

    match cfg.precision {
        HeuristicPrecision::Full => run::<Full>(&cfg, &args),
        HeuristicPrecision::Fast => run::<Fast>(&cfg, &args),
    }
}

fn apply_overrides(cfg: &mut SolverConfig, args: &Args) {
    if let Some(weights) = args.weights {
        cfg.weights = weights;
    }
    if args.fast {
        cfg.precision = HeuristicPrecision::Fast;
    }
    if args.sequential {
        cfg.parallel = false;
    }
    cfg.strategy = resolve_strategy(cfg.strategy, args);
}

/// Flags win over the file; file values only carry over for the same algorithm.
fn resolve_strategy(base: Strategy, args: &Args) -> Strategy {
    let kind = args.strategy.unwrap_or(match base {
        Strategy::Expectimax { .. } => StrategyKind::Expectimax,
        Strategy::Minimax { .. } => StrategyKind::Minimax,
        Strategy::MonteCarlo { .. } => StrategyKind::Mcts,
    });
    match (kind, base) {
        (StrategyKind::Expectimax, base) => {
            let defaults = ExpectimaxConfig::default();
            let (depth, min_prob) = match base {
                Strategy::Expectimax { depth, min_prob } => (depth, min_prob),
                _ => (defaults.depth, defaults.min_prob),
            };
            Strategy::Expectimax {
                depth: args.depth.unwrap_or(depth),
                min_prob: args.min_prob.unwrap_or(min_prob),
            }
        }
        (StrategyKind::Minimax, base) => {
            let depth = match base {
                Strategy::Minimax { depth } => depth,
                _ => MinimaxConfig::default().depth,
            };
            Strategy::Minimax { depth: args.depth.unwrap_or(depth) }
        }
        (StrategyKind::Mcts, base) => {
            let simulations = match base {
                Strategy::MonteCarlo { simulations } => simulations,
                _ => MonteCarloConfig::default().simulations,
            };
            Strategy::MonteCarlo { simulations: args.simulations.unwrap_or(simulations) }
        }
    }
}

fn run<P: Precision>(cfg: &SolverConfig, args: &Args) -> anyhow::Result<()> {
    let mut solver = Solver::<P>::from_config(cfg)?;
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut total_score = 0i64;
    for game_idx in 1..=args.games {
        let mut game = Game::start(&mut rng);
        if !args.quiet {
            println!("Game {game_idx}\n{game}");
        }

        let pb = if args.quiet { ProgressBar::hidden() } else { ProgressBar::new_spinner() };
        pb.set_style(
            ProgressStyle::with_template("{spinner} {elapsed_precise} | Moves: {msg}")?
                .tick_chars("⠁⠃⠇⠧⠷⠿⠻⠟⠯⠷⠧⠇⠃"),
        );
        pb.enable_steady_tick(Duration::from_millis(120));

        let start = Instant::now();
        let mut moves: u64 = 0;
        while !game.valid_move_mask().is_empty() {
            if args.max_moves.is_some_and(|limit| moves >= limit) {
                break;
            }
            let dir = solver.choose_move(&game, &mut rng);
            game.play(dir, &mut rng);
            moves += 1;
            let rate = moves as f64 / start.elapsed().as_secs_f64().max(1e-6);
            pb.set_message(format!("{moves} | moves/sec: {rate:.1} | score: {}", game.score()));
        }
        pb.finish_and_clear();

        if !args.quiet {
            println!("{game}");
        }
        println!(
            "Game {game_idx}: score {} | max tile {} | moves {} | peak nodes {}",
            game.score(),
            1u64 << game.rank(),
            moves,
            solver.last_stats().peak_nodes
        );
        total_score += game.score();
    }

    if args.games > 1 {
        info!("average score over {} games: {:.1}", args.games, total_score as f64 / args.games as f64);
    }
    Ok(())
}

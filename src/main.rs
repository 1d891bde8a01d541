use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;
use rand::prelude::*;

use ember::ai::{BackpropKind, RolloutKind, Search, SearchParams, StopMode};
use ember::core::{Action, DecisionTimer, FromIndex, GameConfig, GameState, NUM_ACTIONS, NUM_AGENTS};
use ember::heuristics::EvaluatorKind;
use ember::utils::make_rng;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RolloutArg {
    SafeRandom,
    Lookahead,
    EvaluatedRandom,
}

impl From<RolloutArg> for RolloutKind {
    fn from(arg: RolloutArg) -> Self {
        match arg {
            RolloutArg::SafeRandom => RolloutKind::SafeRandom,
            RolloutArg::Lookahead => RolloutKind::OneStepLookahead,
            RolloutArg::EvaluatedRandom => RolloutKind::EvaluatedRandom,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EvaluatorArg {
    Simple,
    Advanced,
}

impl From<EvaluatorArg> for EvaluatorKind {
    fn from(arg: EvaluatorArg) -> Self {
        match arg {
            EvaluatorArg::Simple => EvaluatorKind::Simple,
            EvaluatorArg::Advanced => EvaluatorKind::Advanced,
        }
    }
}

/// Play the search engine against three uniform-random agents on the
/// default arena.
#[derive(Debug, Parser)]
#[command(name = "ember")]
struct Args {
    #[arg(long, default_value_t = 63)]
    seed: u64,

    /// Search iterations per decision
    #[arg(long, default_value_t = 200)]
    iterations: u32,

    /// Tree and rollout depth limit
    #[arg(long, default_value_t = 12)]
    rollout_depth: u32,

    /// UCB exploration constant
    #[arg(long, default_value_t = 1.4)]
    k: f64,

    /// Progressive-bias constant
    #[arg(long, default_value_t = 0.5)]
    bias: f64,

    #[arg(long, value_enum, default_value = "safe-random")]
    rollout: RolloutArg,

    #[arg(long, value_enum, default_value = "advanced")]
    evaluator: EvaluatorArg,

    /// Maximum turns to play before giving up on the match
    #[arg(long, default_value_t = 60)]
    turns: u32,

    /// Skip the board rendering
    #[arg(long)]
    quiet: bool,
}

fn main() -> Result<()> {
    flexi_logger::Logger::try_with_env_or_str("info")?
        .format(flexi_logger::colored_default_format)
        .start()?;
    let args = Args::parse();

    let config = GameConfig::default();
    config.validate()?;

    let mut state = GameState::new(&config);
    let mut opponents_rng = make_rng(args.seed.wrapping_add(1));

    for turn in 0..args.turns {
        if state.is_terminal(&config) {
            break;
        }

        let params = SearchParams {
            k: args.k,
            bias: args.bias,
            rollout_depth: args.rollout_depth,
            discount: 0.98,
            eps: 1e-6,
            stop: StopMode::Iterations {
                limit: args.iterations,
            },
            rollout: args.rollout.into(),
            backprop: BackpropKind::Plain,
            evaluator: args.evaluator.into(),
            seed: args.seed.wrapping_add(turn as u64),
        };

        let timer = DecisionTimer::start(1_000.0);
        let mut search = Search::new(&config, state.clone(), params)?;
        let result = search.run(&timer);

        let all = Action::all();
        let mut actions = [Action::Stay; NUM_AGENTS];
        for (id, slot) in actions.iter_mut().enumerate() {
            *slot = if id == state.observer {
                Action::from_index(result.action)?
            } else {
                all[opponents_rng.random_range(0..NUM_ACTIONS)]
            };
        }

        state.step(&config, &actions);
        info!(
            "turn {}: played {} ({} iterations, {} nodes)",
            turn, actions[state.observer], result.iterations, result.nodes
        );
        if !args.quiet {
            println!("{}", state);
        }
    }

    match state.winner() {
        Some(id) => println!("agent {} wins after {} steps", id, state.step),
        None => println!("no winner after {} steps", state.step),
    }

    Ok(())
}

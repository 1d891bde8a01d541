//! Play-out policies from a tree leaf to the horizon

use rand::prelude::*;

use crate::core::{Action, GameConfig, GameState, NUM_ACTIONS, NUM_AGENTS};
use crate::core::noise;
use crate::heuristics::Evaluator;

use super::params::{RolloutKind, SearchParams};

/// Advance one simulated step: the observer plays `action`, every other
/// agent is filled in uniformly at random.
pub fn roll(config: &GameConfig, state: &mut GameState, action: Action, rng: &mut impl Rng) {
    let all = Action::all();
    let actions: [Action; NUM_AGENTS] = std::array::from_fn(|id| {
        if id == state.observer {
            action
        } else {
            all[rng.random_range(0..NUM_ACTIONS)]
        }
    });
    state.step(config, &actions);
}

/// Play out from `state` until the depth horizon or a terminal position,
/// then score the final state with the bound evaluator.
pub fn run(
    config: &GameConfig,
    state: &mut GameState,
    start_depth: u32,
    params: &SearchParams,
    evaluator: &Evaluator,
    rng: &mut impl Rng,
) -> f64 {
    let mut depth = start_depth;
    while depth < params.rollout_depth && !state.is_terminal(config) {
        let action = match params.rollout {
            RolloutKind::SafeRandom => safe_random(state, rng),
            RolloutKind::OneStepLookahead => {
                one_step_lookahead(config, state, params.eps, evaluator, rng)
            }
            RolloutKind::EvaluatedRandom => {
                evaluated_random(config, state, params.eps, evaluator, rng)
            }
        };
        roll(config, state, action, rng);
        depth += 1;
    }
    evaluator.evaluate(config, state)
}

/// Resample unused candidates until one's destination cell is not aflame;
/// fall back to a uniformly random action when all are rejected.
fn safe_random(state: &GameState, rng: &mut impl Rng) -> Action {
    let pos = state.agents[state.observer].loc;
    let mut candidates = Action::all().to_vec();

    while !candidates.is_empty() {
        let pick = rng.random_range(0..candidates.len());
        let action = candidates[pick];
        let dest = pos + action.delta();
        if state.board.in_bounds(dest) && !state.board.is_hazardous(dest) {
            return action;
        }
        candidates.swap_remove(pick);
    }

    Action::all()[rng.random_range(0..NUM_ACTIONS)]
}

/// Evaluate every action's successor state (plus tie-break noise) and play
/// the maximum. Strong, but costs one forward-model call per action per
/// step.
fn one_step_lookahead(
    config: &GameConfig,
    state: &GameState,
    eps: f64,
    evaluator: &Evaluator,
    rng: &mut impl Rng,
) -> Action {
    let mut best = Action::Stay;
    let mut best_q = f64::NEG_INFINITY;

    for action in Action::all() {
        let mut copy = state.clone();
        roll(config, &mut copy, action, rng);
        let q = noise(evaluator.evaluate(config, &copy), eps, rng.random());
        if q > best_q {
            best_q = q;
            best = action;
        }
    }

    best
}

/// Duel a fresh random candidate against the running previous best, both
/// evaluated with tie-break noise; accept the winner when its destination
/// is not hazardous, otherwise discard the fresh candidate and retry.
/// Exhausting all candidates falls back to a uniformly random action.
fn evaluated_random(
    config: &GameConfig,
    state: &GameState,
    eps: f64,
    evaluator: &Evaluator,
    rng: &mut impl Rng,
) -> Action {
    let pos = state.agents[state.observer].loc;
    let mut candidates = Action::all().to_vec();
    let mut prev_best: Option<Action> = None;

    while !candidates.is_empty() {
        let pick = rng.random_range(0..candidates.len());
        let fresh = candidates[pick];

        let winner = match prev_best {
            None => fresh,
            Some(prev) => {
                let fresh_q = evaluate_after(config, state, fresh, eps, evaluator, rng);
                let prev_q = evaluate_after(config, state, prev, eps, evaluator, rng);
                if fresh_q > prev_q {
                    fresh
                } else {
                    prev
                }
            }
        };
        prev_best = Some(winner);

        let dest = pos + winner.delta();
        if state.board.in_bounds(dest) && !state.board.is_hazardous(dest) {
            return winner;
        }
        candidates.swap_remove(pick);
    }

    Action::all()[rng.random_range(0..NUM_ACTIONS)]
}

fn evaluate_after(
    config: &GameConfig,
    state: &GameState,
    action: Action,
    eps: f64,
    evaluator: &Evaluator,
    rng: &mut impl Rng,
) -> f64 {
    let mut copy = state.clone();
    roll(config, &mut copy, action, rng);
    noise(evaluator.evaluate(config, &copy), eps, rng.random())
}

#[cfg(test)]
mod tests {
    use super::super::params::{BackpropKind, StopMode};
    use super::*;
    use crate::core::{Board, Flame, GameState, Loc};
    use crate::heuristics::EvaluatorKind;
    use crate::utils::make_rng;
    use indoc::indoc;
    use test_case::test_case;

    fn corridor_state(config: &GameConfig) -> GameState {
        let (board, spawns) = Board::from_ascii(indoc! {"
            0...1
            .....
            2...3
        "})
        .unwrap();
        GameState::from_board(config, board, &spawns, 0).unwrap()
    }

    #[test]
    fn test_safe_random_avoids_flames() {
        let config = GameConfig::default();
        let mut state = corridor_state(&config);
        // ring the observer with flames except straight down
        for loc in [Loc::new(0, 0), Loc::new(1, 0)] {
            state.board.flames.push(Flame { loc, ttl: 5 });
        }
        let mut rng = make_rng(63);

        for _ in 0..50 {
            let action = safe_random(&state, &mut rng);
            assert_eq!(action, Action::Down);
        }
    }

    #[test]
    fn test_safe_random_falls_back_when_surrounded() {
        let config = GameConfig::default();
        let mut state = corridor_state(&config);
        // every reachable cell, including the observer's own, is aflame
        for loc in [Loc::new(0, 0), Loc::new(1, 0), Loc::new(0, 1)] {
            state.board.flames.push(Flame { loc, ttl: 5 });
        }
        let mut rng = make_rng(63);

        // the fallback is unconstrained; it only has to terminate
        let _ = safe_random(&state, &mut rng);
    }

    #[test_case(RolloutKind::SafeRandom)]
    #[test_case(RolloutKind::OneStepLookahead)]
    #[test_case(RolloutKind::EvaluatedRandom)]
    fn test_rollout_is_deterministic_per_seed(kind: RolloutKind) {
        let config = GameConfig::default();
        let params = SearchParams {
            k: 1.4,
            bias: 0.5,
            rollout_depth: 6,
            discount: 0.98,
            eps: 1e-6,
            stop: StopMode::Iterations { limit: 1 },
            rollout: kind,
            backprop: BackpropKind::Plain,
            evaluator: EvaluatorKind::Simple,
            seed: 63,
        };
        let state = corridor_state(&config);
        let evaluator = Evaluator::bind(params.evaluator, &config, &state);

        let first = run(
            &config,
            &mut state.clone(),
            0,
            &params,
            &evaluator,
            &mut make_rng(63),
        );
        let second = run(
            &config,
            &mut state.clone(),
            0,
            &params,
            &evaluator,
            &mut make_rng(63),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_rollout_scores_terminal_leaf_without_stepping() {
        let config = GameConfig::default();
        let mut state = corridor_state(&config);
        for agent in &mut state.agents[1..] {
            agent.alive = false;
        }
        assert!(state.is_terminal(&config));

        let params = SearchParams {
            k: 1.4,
            bias: 0.5,
            rollout_depth: 6,
            discount: 0.98,
            eps: 1e-6,
            stop: StopMode::Iterations { limit: 1 },
            rollout: RolloutKind::SafeRandom,
            backprop: BackpropKind::Plain,
            evaluator: EvaluatorKind::Simple,
            seed: 63,
        };
        let evaluator = Evaluator::bind(params.evaluator, &config, &state);
        let step_before = state.step;

        let result = run(&config, &mut state, 0, &params, &evaluator, &mut make_rng(63));

        assert_eq!(state.step, step_before);
        assert!(result.is_finite());
    }

    #[test]
    fn test_lookahead_steps_toward_higher_value() {
        let config = GameConfig::default();
        let state = corridor_state(&config);
        let evaluator = Evaluator::bind(EvaluatorKind::Advanced, &config, &state);
        let mut rng = make_rng(63);

        // no assertion on the exact action, only that it is legal and
        // reproducible under the same seed
        let a = one_step_lookahead(&config, &state, 1e-6, &evaluator, &mut rng);
        let b = one_step_lookahead(&config, &state, 1e-6, &evaluator, &mut make_rng(63));
        assert_eq!(a, b);
        assert!(Action::all().contains(&a));
    }
}

//! State evaluation heuristics

pub mod advanced;
pub mod simple;

pub use advanced::AdvancedHeuristic;
pub use simple::SimpleHeuristic;

use crate::core::{GameConfig, GameState};

/// Which evaluator a search instance binds at the root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvaluatorKind {
    Simple,
    Advanced,
}

/// A state evaluator bound to one root position. Constructed once per
/// decision and shared by every rollout of that decision.
#[derive(Debug, Clone)]
pub enum Evaluator {
    Simple(SimpleHeuristic),
    Advanced(AdvancedHeuristic),
}

impl Evaluator {
    pub fn bind(kind: EvaluatorKind, config: &GameConfig, root: &GameState) -> Self {
        match kind {
            EvaluatorKind::Simple => Evaluator::Simple(SimpleHeuristic::new(config, root)),
            EvaluatorKind::Advanced => Evaluator::Advanced(AdvancedHeuristic::new(config, root)),
        }
    }

    /// Score a state for the observing agent; higher is better.
    pub fn evaluate(&self, config: &GameConfig, state: &GameState) -> f64 {
        match self {
            Evaluator::Simple(h) => h.evaluate(config, state),
            Evaluator::Advanced(h) => h.evaluate(config, state),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Action, GameConfig, GameState, NUM_AGENTS};

    #[test]
    fn test_evaluators_are_deterministic() {
        let config = GameConfig::default();
        let state = GameState::new(&config);

        for kind in [EvaluatorKind::Simple, EvaluatorKind::Advanced] {
            let evaluator = Evaluator::bind(kind, &config, &state);
            let first = evaluator.evaluate(&config, &state);
            let second = evaluator.evaluate(&config, &state);
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_death_is_worse_than_survival() {
        let config = GameConfig::default();
        let state = GameState::new(&config);

        for kind in [EvaluatorKind::Simple, EvaluatorKind::Advanced] {
            let evaluator = Evaluator::bind(kind, &config, &state);
            let alive_score = evaluator.evaluate(&config, &state);

            let mut dead = state.clone();
            dead.agents[dead.observer].alive = false;
            assert!(evaluator.evaluate(&config, &dead) < alive_score);
        }
    }

    #[test]
    fn test_eliminations_improve_score() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        let evaluator = Evaluator::bind(EvaluatorKind::Simple, &config, &state);

        let base = evaluator.evaluate(&config, &state);
        state.agents[2].alive = false;
        assert!(evaluator.evaluate(&config, &state) > base);
    }

    #[test]
    fn test_binding_survives_state_advances() {
        let config = GameConfig::default();
        let mut state = GameState::new(&config);
        let evaluator = Evaluator::bind(EvaluatorKind::Advanced, &config, &state);

        let before = evaluator.evaluate(&config, &state);
        state.step(&config, &[Action::Stay; NUM_AGENTS]);
        let after = evaluator.evaluate(&config, &state);
        assert!(before.is_finite() && after.is_finite());
    }
}

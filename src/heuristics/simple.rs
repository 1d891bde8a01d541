//! Plain feature-sum heuristic

use crate::core::{AgentId, GameConfig, GameState};

const ALIVE_VALUE: f64 = 10.0;
const ELIMINATION_VALUE: f64 = 5.0;
const WOOD_CLEARED_VALUE: f64 = 0.5;
const AMMO_VALUE: f64 = 0.1;

/// Weighted sum of survival, eliminations and terrain progress, measured
/// against counts captured from the root position.
#[derive(Debug, Clone)]
pub struct SimpleHeuristic {
    observer: AgentId,
    root_woods: usize,
    root_enemies: usize,
}

impl SimpleHeuristic {
    pub fn new(_config: &GameConfig, root: &GameState) -> Self {
        Self {
            observer: root.observer,
            root_woods: root.board.woods_remaining(),
            root_enemies: enemies_alive(root, root.observer),
        }
    }

    pub fn evaluate(&self, _config: &GameConfig, state: &GameState) -> f64 {
        let me = &state.agents[self.observer];

        let mut score = 0.0;
        if me.alive {
            score += ALIVE_VALUE;
        }

        let eliminated = self
            .root_enemies
            .saturating_sub(enemies_alive(state, self.observer));
        score += eliminated as f64 * ELIMINATION_VALUE;

        let cleared = self
            .root_woods
            .saturating_sub(state.board.woods_remaining());
        score += cleared as f64 * WOOD_CLEARED_VALUE;

        score += me.ammo as f64 * AMMO_VALUE;
        score
    }
}

fn enemies_alive(state: &GameState, observer: AgentId) -> usize {
    state
        .agents
        .iter()
        .enumerate()
        .filter(|(id, a)| *id != observer && a.alive)
        .count()
}

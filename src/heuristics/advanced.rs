//! Composite heuristic: survival features plus mobility and bomb threat

use crate::core::{AgentId, GameConfig, GameState, Loc, Sigmoid};

use super::simple::SimpleHeuristic;

const MOBILITY_VALUE: f64 = 0.25;
const THREAT_VALUE: f64 = 1.5;
const PRESSURE_VALUE: f64 = 0.05;
const SQUASH_SCALE: f64 = 0.1;

/// Combines the simple features with mobility and bomb-threat terms and
/// squashes the total into (0, 1).
#[derive(Debug, Clone)]
pub struct AdvancedHeuristic {
    observer: AgentId,
    simple: SimpleHeuristic,
}

impl AdvancedHeuristic {
    pub fn new(config: &GameConfig, root: &GameState) -> Self {
        Self {
            observer: root.observer,
            simple: SimpleHeuristic::new(config, root),
        }
    }

    pub fn evaluate(&self, config: &GameConfig, state: &GameState) -> f64 {
        let me = &state.agents[self.observer];
        if !me.alive {
            return 0.0;
        }

        let mut score = self.simple.evaluate(config, state);

        let mobility = me
            .loc
            .neighbors()
            .iter()
            .filter(|n| state.board.is_passable(**n) && !state.board.is_hazardous(**n))
            .count();
        score += mobility as f64 * MOBILITY_VALUE;

        score -= bomb_threat(config, state, me.loc) * THREAT_VALUE;

        if let Some(dist) = nearest_enemy_dist(state, self.observer) {
            score -= dist as f64 * PRESSURE_VALUE;
        }

        (score * SQUASH_SCALE).sigmoid()
    }
}

/// How urgently the cell is endangered by planted bombs: 0 when out of
/// every blast line, approaching 1 as a covering fuse nears zero.
fn bomb_threat(config: &GameConfig, state: &GameState, loc: Loc) -> f64 {
    state
        .board
        .bombs
        .iter()
        .filter(|bomb| {
            let delta = loc - bomb.loc;
            let aligned = delta.dx == 0 || delta.dy == 0;
            aligned && bomb.loc.dist(&loc) <= bomb.blast as i32
        })
        .map(|bomb| 1.0 - bomb.fuse as f64 / config.bomb_fuse.max(1) as f64)
        .fold(0.0, f64::max)
}

fn nearest_enemy_dist(state: &GameState, observer: AgentId) -> Option<i32> {
    let me = state.agents[observer].loc;
    state
        .agents
        .iter()
        .enumerate()
        .filter(|(id, a)| *id != observer && a.alive)
        .map(|(_, a)| me.dist(&a.loc))
        .min()
}

//! Game state and rules

use anyhow::{ensure, Result};

use super::action::{Action, NUM_ACTIONS};
use super::board::{Board, Bomb};
use super::loc::Loc;

pub const NUM_AGENTS: usize = 4;

pub type AgentId = usize;

/// Static game configuration
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub bomb_fuse: u32,
    pub blast_radius: u32,
    pub flame_ttl: u32,
    pub max_steps: u32,
    pub starting_ammo: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bomb_fuse: 8,
            blast_radius: 2,
            flame_ttl: 2,
            max_steps: 300,
            starting_ammo: 1,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.bomb_fuse >= 1, "Bomb fuse must be at least one step");
        ensure!(self.blast_radius >= 1, "Blast radius must be at least one");
        ensure!(self.flame_ttl >= 1, "Flame ttl must be at least one step");
        ensure!(self.max_steps >= 1, "Step limit must be positive");
        Ok(())
    }
}

/// One participant of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentState {
    pub loc: Loc,
    pub alive: bool,
    pub ammo: u32,
}

/// State of an arena match, observed on behalf of one agent
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub board: Board,
    pub agents: [AgentState; NUM_AGENTS],
    pub step: u32,
    /// The agent this state's decisions are made for
    pub observer: AgentId,
}

impl GameState {
    /// A fresh match on the default map, observed by agent 0
    pub fn new(config: &GameConfig) -> Self {
        let (board, spawns) = Board::default_map();
        Self::from_board(config, board, &spawns, 0).expect("default map is a valid arena")
    }

    pub fn from_board(
        config: &GameConfig,
        board: Board,
        spawns: &[Loc],
        observer: AgentId,
    ) -> Result<Self> {
        ensure!(
            spawns.len() == NUM_AGENTS,
            "Expected {} spawn locations, got {}",
            NUM_AGENTS,
            spawns.len()
        );
        ensure!(observer < NUM_AGENTS, "Invalid observer id: {}", observer);
        for spawn in spawns {
            ensure!(board.is_passable(*spawn), "Spawn {} is not walkable", spawn);
        }

        let agents = std::array::from_fn(|i| AgentState {
            loc: spawns[i],
            alive: true,
            ammo: config.starting_ammo,
        });

        Ok(Self {
            board,
            agents,
            step: 0,
            observer,
        })
    }

    /// Number of legal actions, identical for every agent and every state
    pub fn num_actions(&self) -> usize {
        NUM_ACTIONS
    }

    pub fn agent_id(&self) -> AgentId {
        self.observer
    }

    pub fn alive_count(&self) -> usize {
        self.agents.iter().filter(|a| a.alive).count()
    }

    pub fn is_terminal(&self, config: &GameConfig) -> bool {
        self.alive_count() <= 1 || self.step >= config.max_steps
    }

    /// The last agent standing, if the match has one
    pub fn winner(&self) -> Option<AgentId> {
        match self.alive_count() {
            1 => self.agents.iter().position(|a| a.alive),
            _ => None,
        }
    }

    /// Advance one synchronized step: flames age, bombs are planted, moves
    /// resolve simultaneously, fuses tick and blasts spread, then agents
    /// caught in a flame die.
    pub fn step(&mut self, config: &GameConfig, actions: &[Action; NUM_AGENTS]) {
        self.board.decay_flames();
        self.plant_bombs(config, actions);
        self.resolve_moves(actions);

        let refunds = self.board.tick_bombs(config.flame_ttl);
        for owner in refunds {
            if owner < NUM_AGENTS {
                self.agents[owner].ammo += 1;
            }
        }

        for agent in &mut self.agents {
            if agent.alive && self.board.is_hazardous(agent.loc) {
                agent.alive = false;
            }
        }

        self.step += 1;
    }

    fn plant_bombs(&mut self, config: &GameConfig, actions: &[Action; NUM_AGENTS]) {
        for (id, action) in actions.iter().enumerate() {
            let agent = &self.agents[id];
            if *action != Action::Bomb || !agent.alive {
                continue;
            }
            if agent.ammo == 0 || self.board.bomb_at(agent.loc).is_some() {
                continue;
            }
            self.board.bombs.push(Bomb {
                owner: id,
                loc: agent.loc,
                fuse: config.bomb_fuse,
                blast: config.blast_radius,
            });
            self.agents[id].ammo -= 1;
        }
    }

    fn resolve_moves(&mut self, actions: &[Action; NUM_AGENTS]) {
        let current: [Loc; NUM_AGENTS] = std::array::from_fn(|i| self.agents[i].loc);

        // desired destination, already filtered by terrain and bombs
        let mut next: [Loc; NUM_AGENTS] = std::array::from_fn(|i| {
            let agent = &self.agents[i];
            if !agent.alive || !actions[i].is_move() {
                return agent.loc;
            }
            let dest = agent.loc + actions[i].delta();
            if self.board.is_passable(dest) {
                dest
            } else {
                agent.loc
            }
        });

        // shared targets and head-on swaps are cancelled for everyone
        // involved, then blocked movers cascade until stable
        let contested: Vec<AgentId> = (0..NUM_AGENTS)
            .filter(|&i| {
                self.agents[i].alive
                    && (0..NUM_AGENTS).any(|j| {
                        j != i
                            && self.agents[j].alive
                            && (next[j] == next[i]
                                || (next[i] == current[j] && next[j] == current[i]))
                    })
            })
            .collect();
        for i in contested {
            next[i] = current[i];
        }

        loop {
            let mut changed = false;
            for i in 0..NUM_AGENTS {
                if !self.agents[i].alive || next[i] == current[i] {
                    continue;
                }
                let blocked = (0..NUM_AGENTS)
                    .any(|j| j != i && self.agents[j].alive && next[j] == next[i]);
                if blocked {
                    next[i] = current[i];
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }

        for (agent, dest) in self.agents.iter_mut().zip(next) {
            agent.loc = dest;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn tiny_state(config: &GameConfig) -> GameState {
        let (board, spawns) = Board::from_ascii(indoc! {"
            0.1
            ...
            2.3
        "})
        .unwrap();
        GameState::from_board(config, board, &spawns, 0).unwrap()
    }

    #[test]
    fn test_movement_and_blocking() {
        let config = GameConfig::default();
        let mut state = tiny_state(&config);

        state.step(&config, &[Action::Right, Action::Down, Action::Stay, Action::Stay]);
        assert_eq!(state.agents[0].loc, Loc::new(1, 0));
        assert_eq!(state.agents[1].loc, Loc::new(2, 1));

        // walking off the board keeps the agent in place
        state.step(&config, &[Action::Up, Action::Stay, Action::Stay, Action::Stay]);
        assert_eq!(state.agents[0].loc, Loc::new(1, 0));
    }

    #[test]
    fn test_shared_target_cancels_both_moves() {
        let config = GameConfig::default();
        let mut state = tiny_state(&config);

        // agents 0 and 1 both head for (1, 0)
        state.step(&config, &[Action::Right, Action::Left, Action::Stay, Action::Stay]);
        assert_eq!(state.agents[0].loc, Loc::new(0, 0));
        assert_eq!(state.agents[1].loc, Loc::new(2, 0));
    }

    #[test]
    fn test_bomb_lifecycle_kills_and_refunds() {
        let config = GameConfig {
            bomb_fuse: 2,
            ..GameConfig::default()
        };
        let mut state = tiny_state(&config);

        state.step(&config, &[Action::Bomb, Action::Stay, Action::Stay, Action::Stay]);
        assert_eq!(state.agents[0].ammo, 0);
        assert_eq!(state.board.bombs.len(), 1);

        // agent 0 stays on its own bomb and is caught in the blast
        state.step(&config, &[Action::Stay; NUM_AGENTS]);
        assert!(state.board.bombs.is_empty());
        assert!(!state.agents[0].alive);
        assert_eq!(state.agents[0].ammo, 1);
    }

    #[test]
    fn test_terminal_and_winner() {
        let config = GameConfig::default();
        let mut state = tiny_state(&config);
        assert!(!state.is_terminal(&config));
        assert_eq!(state.winner(), None);

        for agent in &mut state.agents[1..] {
            agent.alive = false;
        }
        assert!(state.is_terminal(&config));
        assert_eq!(state.winner(), Some(0));
    }

    #[test]
    fn test_step_limit_terminates() {
        let config = GameConfig {
            max_steps: 3,
            ..GameConfig::default()
        };
        let mut state = tiny_state(&config);
        for _ in 0..3 {
            assert!(!state.is_terminal(&config));
            state.step(&config, &[Action::Stay; NUM_AGENTS]);
        }
        assert!(state.is_terminal(&config));
        assert_eq!(state.winner(), None);
    }

    #[test]
    fn test_bomb_without_ammo_is_noop() {
        let config = GameConfig {
            starting_ammo: 0,
            ..GameConfig::default()
        };
        let mut state = tiny_state(&config);
        state.step(&config, &[Action::Bomb; NUM_AGENTS]);
        assert!(state.board.bombs.is_empty());
    }
}

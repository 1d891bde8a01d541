//! Core game representations and rules

pub mod action;
pub mod board;
pub mod convert;
pub mod display;
pub mod game;
pub mod loc;
pub mod timer;
pub mod utils;

pub use action::{Action, NUM_ACTIONS};
pub use board::{Board, Bomb, Flame, Tile, DEFAULT_LAYOUT};
pub use convert::{FromIndex, ToIndex};
pub use game::{AgentId, AgentState, GameConfig, GameState, NUM_AGENTS};
pub use loc::{Loc, LocDelta, DIRS};
pub use timer::DecisionTimer;
pub use utils::{noise, normalise, Sigmoid};

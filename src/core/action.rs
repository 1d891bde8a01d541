//! Agent actions

use anyhow::{anyhow, Result};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::fmt::Display;

use super::convert::{FromIndex, ToIndex};
use super::loc::LocDelta;

pub const NUM_ACTIONS: usize = 6;

/// One agent's move for a single synchronized game step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Action {
    Stay,
    Up,
    Down,
    Left,
    Right,
    Bomb,
}

impl Action {
    pub fn all() -> [Action; NUM_ACTIONS] {
        [
            Action::Stay,
            Action::Up,
            Action::Down,
            Action::Left,
            Action::Right,
            Action::Bomb,
        ]
    }

    /// The movement offset this action attempts. Stay and Bomb keep the
    /// agent on its current cell.
    pub fn delta(&self) -> LocDelta {
        match self {
            Action::Up => LocDelta::new(0, -1),
            Action::Down => LocDelta::new(0, 1),
            Action::Left => LocDelta::new(-1, 0),
            Action::Right => LocDelta::new(1, 0),
            Action::Stay | Action::Bomb => LocDelta::new(0, 0),
        }
    }

    pub fn is_move(&self) -> bool {
        !matches!(self, Action::Stay | Action::Bomb)
    }
}

impl FromIndex for Action {
    fn from_index(idx: usize) -> Result<Self> {
        FromPrimitive::from_usize(idx).ok_or_else(|| anyhow!("Invalid action index: {}", idx))
    }
}

impl ToIndex for Action {
    fn to_index(&self) -> Result<usize> {
        ToPrimitive::to_usize(self).ok_or_else(|| anyhow!("Invalid action value"))
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Stay => "stay",
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Bomb => "bomb",
        };
        write!(f, "{}", name)
    }
}

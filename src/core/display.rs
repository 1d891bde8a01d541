use std::fmt;

use colored::Colorize;

use super::board::Tile;
use super::game::GameState;
use super::loc::Loc;

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "Step {}", self.step)?;
        for (id, agent) in self.agents.iter().enumerate() {
            let status = if agent.alive {
                format!("{} ammo {}", agent.loc, agent.ammo)
            } else {
                "down".to_string()
            };
            writeln!(f, "  agent {}: {}", agent_glyph(id), status)?;
        }
        writeln!(f)?;

        write!(f, "   ")?;
        for x in 0..self.board.width {
            write!(f, "{:2}", x % 10)?;
        }
        writeln!(f)?;

        for y in 0..self.board.height {
            write!(f, "{:2} ", y)?;
            for x in 0..self.board.width {
                let loc = Loc::new(x as i32, y as i32);
                write!(f, " {}", cell_glyph(self, loc))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn cell_glyph(state: &GameState, loc: Loc) -> String {
    for (id, agent) in state.agents.iter().enumerate() {
        if agent.alive && agent.loc == loc {
            return agent_glyph(id);
        }
    }
    if state.board.is_hazardous(loc) {
        return "*".bright_red().to_string();
    }
    if state.board.bomb_at(loc).is_some() {
        return "o".bright_yellow().to_string();
    }
    match state.board.tile(loc) {
        Tile::Rigid => "#".white().to_string(),
        Tile::Wood => "+".yellow().to_string(),
        Tile::Empty => "·".dimmed().to_string(),
    }
}

fn agent_glyph(id: usize) -> String {
    match id {
        0 => "0".bright_blue().to_string(),
        1 => "1".bright_red().to_string(),
        2 => "2".bright_green().to_string(),
        3 => "3".bright_magenta().to_string(),
        other => other.to_string(),
    }
}

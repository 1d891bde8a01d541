//! Board terrain, bombs and flames

use anyhow::{bail, ensure, Result};
use indoc::indoc;
use lazy_static::lazy_static;

use super::loc::{Loc, DIRS};

/// Static terrain of a single cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tile {
    Empty,
    /// Indestructible wall
    Rigid,
    /// Destructible wall, consumed by one blast
    Wood,
}

/// A planted bomb. Detonates when the fuse reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bomb {
    pub owner: usize,
    pub loc: Loc,
    pub fuse: u32,
    pub blast: u32,
}

/// An active flame cell. Expires when the ttl reaches zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flame {
    pub loc: Loc,
    pub ttl: u32,
}

/// Grid terrain plus the bomb and flame overlays
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    tiles: Vec<Tile>,
    pub bombs: Vec<Bomb>,
    pub flames: Vec<Flame>,
}

/// The default 11x11 arena: rigid pillars on odd-odd cells, wood scattered
/// between them, spawn corners kept clear.
pub const DEFAULT_LAYOUT: &str = indoc! {"
    0..+.+.+..1
    .#.#+#+#.#.
    .++.+.+.++.
    +#.#.#.#.#+
    .+.+...+.+.
    .#+#.#.#+#.
    .+.+...+.+.
    +#.#.#.#.#+
    .++.+.+.++.
    .#.#+#+#.#.
    2..+.+.+..3
"};

lazy_static! {
    static ref DEFAULT_MAP: (Board, Vec<Loc>) =
        Board::from_ascii(DEFAULT_LAYOUT).expect("default layout parses");
}

impl Board {
    /// Parse an ASCII layout. `.` empty, `#` rigid, `+` wood, digits mark
    /// agent spawn cells (left empty). Returns the board and the spawn
    /// locations ordered by digit.
    pub fn from_ascii(layout: &str) -> Result<(Board, Vec<Loc>)> {
        let rows: Vec<&str> = layout.lines().filter(|l| !l.trim().is_empty()).collect();
        ensure!(!rows.is_empty(), "Empty board layout");

        let height = rows.len();
        let width = rows[0].chars().count();
        let mut tiles = Vec::with_capacity(width * height);
        let mut spawns: Vec<(usize, Loc)> = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            ensure!(
                row.chars().count() == width,
                "Ragged board layout at row {}",
                y
            );
            for (x, c) in row.chars().enumerate() {
                let loc = Loc::new(x as i32, y as i32);
                let tile = match c {
                    '.' => Tile::Empty,
                    '#' => Tile::Rigid,
                    '+' => Tile::Wood,
                    d if d.is_ascii_digit() => {
                        spawns.push((d.to_digit(10).unwrap() as usize, loc));
                        Tile::Empty
                    }
                    other => bail!("Unknown board symbol: {:?}", other),
                };
                tiles.push(tile);
            }
        }

        spawns.sort();
        for (expected, (id, _)) in spawns.iter().enumerate() {
            ensure!(*id == expected, "Spawn markers must be 0..n without gaps");
        }

        let board = Board {
            width,
            height,
            tiles,
            bombs: Vec::new(),
            flames: Vec::new(),
        };
        Ok((board, spawns.into_iter().map(|(_, loc)| loc).collect()))
    }

    /// The default arena with its four spawn corners
    pub fn default_map() -> (Board, Vec<Loc>) {
        DEFAULT_MAP.clone()
    }

    pub fn in_bounds(&self, loc: Loc) -> bool {
        loc.x >= 0 && loc.x < self.width as i32 && loc.y >= 0 && loc.y < self.height as i32
    }

    pub fn tile(&self, loc: Loc) -> Tile {
        self.tiles[loc.y as usize * self.width + loc.x as usize]
    }

    fn set_tile(&mut self, loc: Loc, tile: Tile) {
        self.tiles[loc.y as usize * self.width + loc.x as usize] = tile;
    }

    pub fn bomb_at(&self, loc: Loc) -> Option<&Bomb> {
        self.bombs.iter().find(|b| b.loc == loc)
    }

    /// A cell an agent can walk onto
    pub fn is_passable(&self, loc: Loc) -> bool {
        self.in_bounds(loc) && self.tile(loc) == Tile::Empty && self.bomb_at(loc).is_none()
    }

    /// Hazard predicate: true iff an active flame covers the cell
    pub fn is_hazardous(&self, loc: Loc) -> bool {
        self.flames.iter().any(|f| f.loc == loc)
    }

    pub fn woods_remaining(&self) -> usize {
        self.tiles.iter().filter(|t| **t == Tile::Wood).count()
    }

    /// Age flames by one step, dropping the expired ones
    pub fn decay_flames(&mut self) {
        for flame in &mut self.flames {
            flame.ttl -= 1;
        }
        self.flames.retain(|f| f.ttl > 0);
    }

    /// Tick every fuse and detonate due bombs, chaining into any bomb a
    /// blast reaches. Returns one ammo refund per detonated bomb, keyed by
    /// owner.
    pub fn tick_bombs(&mut self, flame_ttl: u32) -> Vec<usize> {
        for bomb in &mut self.bombs {
            bomb.fuse = bomb.fuse.saturating_sub(1);
        }

        let mut due: Vec<usize> = (0..self.bombs.len())
            .filter(|&i| self.bombs[i].fuse == 0)
            .collect();
        let mut detonated = vec![false; self.bombs.len()];
        let mut refunds = Vec::new();

        while let Some(i) = due.pop() {
            if detonated[i] {
                continue;
            }
            detonated[i] = true;
            let bomb = self.bombs[i];
            refunds.push(bomb.owner);
            self.spread_blast(bomb, flame_ttl, &mut due, &detonated);
        }

        let mut keep = detonated.iter().map(|d| !d);
        self.bombs.retain(|_| keep.next().unwrap());
        self.flames.sort_by_key(|f| (f.loc, std::cmp::Reverse(f.ttl)));
        self.flames.dedup_by_key(|f| f.loc);

        refunds
    }

    fn spread_blast(&mut self, bomb: Bomb, flame_ttl: u32, due: &mut Vec<usize>, detonated: &[bool]) {
        self.ignite(bomb.loc, flame_ttl);
        for dir in DIRS {
            for r in 1..=bomb.blast as i32 {
                let cell = bomb.loc + dir.scaled(r);
                if !self.in_bounds(cell) || self.tile(cell) == Tile::Rigid {
                    break;
                }
                if self.tile(cell) == Tile::Wood {
                    // one blast consumes the wall and stops there
                    self.set_tile(cell, Tile::Empty);
                    self.ignite(cell, flame_ttl);
                    break;
                }
                self.ignite(cell, flame_ttl);
                if let Some(j) = self.bombs.iter().position(|b| b.loc == cell) {
                    if !detonated[j] {
                        due.push(j);
                    }
                }
            }
        }
    }

    fn ignite(&mut self, loc: Loc, ttl: u32) {
        self.flames.push(Flame { loc, ttl });
    }
}

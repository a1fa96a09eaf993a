//! Keyboard capability consumed by the simulation
//!
//! The game is played with four keys (WASD). The simulation only asks two
//! questions per tick: is a direction held, and was it pressed this tick.

use serde::{Deserialize, Serialize};

/// One of the four movement keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Left,
    Down,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Left => 1,
            Direction::Down => 2,
            Direction::Right => 3,
        }
    }
}

/// Queried once per tick by the state machine
pub trait InputSource {
    fn is_held(&self, dir: Direction) -> bool;

    fn is_just_pressed(&self, dir: Direction) -> bool;

    /// Edge-triggered "press any of WASD"
    fn any_just_pressed(&self) -> bool {
        Direction::ALL.iter().any(|&d| self.is_just_pressed(d))
    }
}

/// Snapshot of the movement keys for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    held: [bool; 4],
    just_pressed: [bool; 4],
}

impl KeyState {
    /// Keys held down, none newly pressed
    pub fn holding(dirs: &[Direction]) -> Self {
        let mut keys = Self::default();
        for &d in dirs {
            keys.held[d.index()] = true;
        }
        keys
    }

    /// Keys pressed this tick (and therefore held)
    pub fn pressing(dirs: &[Direction]) -> Self {
        let mut keys = Self::holding(dirs);
        for &d in dirs {
            keys.just_pressed[d.index()] = true;
        }
        keys
    }

    /// Build the next snapshot from the keys currently down
    ///
    /// A key counts as just pressed when it is down now but was not in `self`.
    pub fn next(&self, down: &[Direction]) -> Self {
        let mut keys = Self::holding(down);
        for d in Direction::ALL {
            keys.just_pressed[d.index()] = keys.held[d.index()] && !self.held[d.index()];
        }
        keys
    }
}

impl InputSource for KeyState {
    fn is_held(&self, dir: Direction) -> bool {
        self.held[dir.index()]
    }

    fn is_just_pressed(&self, dir: Direction) -> bool {
        self.just_pressed[dir.index()]
    }
}

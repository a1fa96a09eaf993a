//! Player movement and tile collision
//!
//! One discrete step per tick: direction * speed plus per-axis jitter, then a
//! point test against the wall layer. A blocked step is reverted whole.
//! There is no sweep, so a step longer than a tile could skip a thin wall;
//! with the stock speed and jitter a step is at most ~0.11 tiles.

use std::collections::VecDeque;
use std::f64::consts::FRAC_1_SQRT_2;

use glam::{DVec2, IVec2};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::level::{ColliderSet, Level};
use crate::input::{Direction, InputSource};

/// Random wobble applied to movement
pub trait JitterSource {
    /// Uniform sample in `[-amplitude, amplitude]`
    fn sample(&mut self, amplitude: f64) -> f64;
}

/// Seeded uniform jitter
#[derive(Debug, Clone)]
pub struct RandomJitter {
    rng: Pcg32,
}

impl RandomJitter {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
        }
    }
}

impl JitterSource for RandomJitter {
    fn sample(&mut self, amplitude: f64) -> f64 {
        if amplitude <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(-amplitude..=amplitude)
    }
}

/// No wobble at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl JitterSource for NoJitter {
    fn sample(&mut self, _amplitude: f64) -> f64 {
        0.0
    }
}

/// Replays fixed unit samples, scaled by the amplitude, cycling when exhausted
#[derive(Debug, Clone)]
pub struct SequenceJitter {
    units: VecDeque<f64>,
}

impl SequenceJitter {
    /// `units` are clamped to `[-1, 1]`
    pub fn new(units: impl IntoIterator<Item = f64>) -> Self {
        Self {
            units: units.into_iter().map(|u| u.clamp(-1.0, 1.0)).collect(),
        }
    }
}

impl JitterSource for SequenceJitter {
    fn sample(&mut self, amplitude: f64) -> f64 {
        let Some(unit) = self.units.pop_front() else {
            return 0.0;
        };
        self.units.push_back(unit);
        unit * amplitude
    }
}

/// Unit-or-diagonal direction for the held keys
///
/// Diagonals win over single keys, checked NW, SW, SE, NE, then N, W, S, E.
pub fn motion_vector(input: &impl InputSource) -> DVec2 {
    let up = input.is_held(Direction::Up);
    let left = input.is_held(Direction::Left);
    let down = input.is_held(Direction::Down);
    let right = input.is_held(Direction::Right);
    let d = FRAC_1_SQRT_2;

    match () {
        _ if up && left => DVec2::new(-d, -d),
        _ if left && down => DVec2::new(-d, d),
        _ if down && right => DVec2::new(d, d),
        _ if right && up => DVec2::new(d, -d),
        _ if up => DVec2::new(0.0, -1.0),
        _ if left => DVec2::new(-1.0, 0.0),
        _ if down => DVec2::new(0.0, 1.0),
        _ if right => DVec2::new(1.0, 0.0),
        _ => DVec2::ZERO,
    }
}

/// Where the player would end up this tick
pub fn candidate_position(
    pos: DVec2,
    input: &impl InputSource,
    speed: f64,
    jitter_amplitude: f64,
    jitter: &mut dyn JitterSource,
) -> DVec2 {
    let moved = pos + motion_vector(input) * speed;
    let jx = jitter.sample(jitter_amplitude);
    let jy = jitter.sample(jitter_amplitude);
    moved + DVec2::new(jx, jy)
}

/// Whether a position is inside a colliding wall tile or off the level
pub fn is_blocked(level: &Level, colliders: &ColliderSet, pos: DVec2) -> bool {
    let cell = IVec2::new(pos.x.trunc() as i32, pos.y.trunc() as i32);
    let wall = level
        .wall_tile_at(cell)
        .is_some_and(|id| colliders.contains(id));
    wall || !level.in_bounds(pos)
}

/// Result of one movement step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Step {
    /// Position after the step (the old one when blocked)
    pub pos: DVec2,
    pub blocked: bool,
}

/// Move, then keep the move only if it lands somewhere open
pub fn step(
    pos: DVec2,
    input: &impl InputSource,
    level: &Level,
    colliders: &ColliderSet,
    speed: f64,
    jitter_amplitude: f64,
    jitter: &mut dyn JitterSource,
) -> Step {
    let candidate = candidate_position(pos, input, speed, jitter_amplitude, jitter);
    if is_blocked(level, colliders, candidate) {
        Step { pos, blocked: true }
    } else {
        Step {
            pos: candidate,
            blocked: false,
        }
    }
}

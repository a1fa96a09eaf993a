//! Proximity drain ("suck")
//!
//! Every Play tick, before the player moves, each live hazard within reach
//! costs stamina, loses durability and pays out score. Hazards are visited in
//! level order. Touching the target ends the level once the pass is done.

use crate::audio::{AudioSink, Cue};
use crate::consts::*;

use super::state::Session;

/// What the drain pass decided
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuckOutcome {
    Continue,
    /// The target was reached; movement is skipped this tick
    TargetReached,
}

/// Run one drain pass over the active level's hazards
pub fn suck(session: &mut Session, audio: &mut dyn AudioSink) -> SuckOutcome {
    let Some(active) = session.active.as_mut() else {
        return SuckOutcome::Continue;
    };

    let mut outcome = SuckOutcome::Continue;
    for hazard in active.hazards.iter_mut() {
        if hazard.destroyed {
            hazard.advance_explosion();
            continue;
        }

        if hazard.center().distance(session.player.pos) > hazard.radius() {
            continue;
        }

        let stamina_at_contact = session.player.stamina;
        session.player.stamina -= SUCK_COST;
        session.score.award(SUCK_SCORE);

        if hazard.damage(SUCK_DAMAGE) {
            log::debug!("{:?} destroyed at {}", hazard.kind, hazard.pos);
            session.shake = SHAKE_PEAK;
            audio.play_one_shot(Cue::Explosion);
        }

        if hazard.is_target() {
            let bonus = (stamina_at_contact * STAMINA_BONUS_MULTIPLIER).floor().max(0.0) as u64;
            session.score.award(bonus);
            log::info!("Target reached, stamina bonus {}", bonus);
            outcome = SuckOutcome::TargetReached;
        }
    }

    outcome
}

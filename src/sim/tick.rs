//! Fixed timestep simulation tick
//!
//! Drives the screen state machine. Each phase has an entry action (run once,
//! on the first full tick inside the phase, when `tick == 1`), a per-tick
//! action, and an optional exit action run during the transition.

use super::error::LevelError;
use super::level::{LevelProvider, load_level};
use super::motion::{self, JitterSource};
use super::state::{Phase, Session};
use super::suck::{SuckOutcome, suck};
use crate::audio::{AudioSink, Cue, Track};
use crate::consts::*;
use crate::input::InputSource;
use crate::settings::{DeathPolicy, Settings};

/// Collaborators the simulation talks to during a tick
pub struct TickContext<'a> {
    pub levels: &'a dyn LevelProvider,
    pub settings: &'a Settings,
    pub audio: &'a mut dyn AudioSink,
    pub jitter: &'a mut dyn JitterSource,
}

/// Advance the session by one fixed timestep
///
/// Only level loading can fail, and such a failure is fatal.
pub fn tick(
    session: &mut Session,
    input: &impl InputSource,
    ctx: &mut TickContext<'_>,
) -> Result<(), LevelError> {
    session.shake = session.shake.saturating_sub(1);

    if !session.entered {
        session.entered = true;
        on_enter(session, ctx);
    }

    on_tick(session, input, ctx)?;

    session.tick += 1;
    Ok(())
}

/// Leave the current phase for `to`
fn transition(session: &mut Session, to: Phase) {
    on_exit(session);
    session.switch_phase(to);
}

fn on_enter(session: &mut Session, ctx: &mut TickContext<'_>) {
    match session.phase {
        Phase::MenuPrimary | Phase::MenuSecondary => {
            session.score.reset();
            if session.music_track() != Some(Track::Intro) {
                session.switch_music(ctx.audio, Track::Intro);
            }
        }
        Phase::Play => {
            session.switch_music(ctx.audio, Track::Game);
            ctx.audio.play_one_shot(Cue::Spawn);
        }
        Phase::Clear => ctx.audio.play_one_shot(Cue::LevelClear),
        Phase::Dead => session.keep_music(true),
        Phase::Outro => {
            session.switch_music(ctx.audio, Track::Outro);
            session.score.commit();
            session.final_score = Some(session.score.committed);
            log::info!("Game complete, final score {}", session.score.committed);
        }
        Phase::Init | Phase::Intro => {}
    }
}

fn on_exit(session: &mut Session) {
    match session.phase {
        Phase::Clear => session.score.commit(),
        Phase::Dead => session.score.discard_pending(),
        _ => {}
    }
}

fn on_tick(
    session: &mut Session,
    input: &impl InputSource,
    ctx: &mut TickContext<'_>,
) -> Result<(), LevelError> {
    match session.phase {
        Phase::Init => {
            session.apply_level(load_level(ctx.levels, 0)?);
            transition(session, Phase::Intro);
        }

        Phase::Intro => {
            if session.tick > INTRO_TICKS {
                transition(session, Phase::MenuPrimary);
            }
        }

        Phase::MenuPrimary => {
            session.keep_music(false);
            if input.any_just_pressed() {
                if ctx.settings.instructions_screen {
                    transition(session, Phase::MenuSecondary);
                } else {
                    start_level(session, ctx, 0)?;
                }
            }
        }

        Phase::MenuSecondary => {
            session.keep_music(false);
            if input.any_just_pressed() {
                start_level(session, ctx, 0)?;
            }
        }

        Phase::Play => {
            session.keep_music(false);
            update_play(session, input, ctx);
        }

        Phase::Clear => {
            if session.tick > CLEAR_DELAY_TICKS && input.any_just_pressed() {
                let next = session.level_index + 1;
                if next < ctx.levels.level_count() {
                    start_level(session, ctx, next)?;
                } else {
                    transition(session, Phase::Outro);
                }
            }
        }

        Phase::Dead => {
            session.keep_music(true);
            if session.tick > DEATH_DELAY_TICKS && input.any_just_pressed() {
                let index = session.level_index;
                match ctx.settings.death_policy {
                    DeathPolicy::ReloadLevel => start_level(session, ctx, index)?,
                    DeathPolicy::ReturnToMenu => transition(session, Phase::MenuPrimary),
                }
            }
        }

        Phase::Outro => session.keep_music(false),
    }
    Ok(())
}

/// Load a level and enter Play
///
/// The level is loaded before anything changes, so a failure leaves the
/// session untouched.
fn start_level(session: &mut Session, ctx: &TickContext<'_>, index: usize) -> Result<(), LevelError> {
    let loaded = load_level(ctx.levels, index)?;
    transition(session, Phase::Play);
    session.apply_level(loaded);
    Ok(())
}

/// One Play tick: drain, death check, suck, then movement
fn update_play(session: &mut Session, input: &impl InputSource, ctx: &mut TickContext<'_>) {
    session.player.stamina -= BASE_DRAIN;
    if session.player.stamina < 0.0 {
        transition(session, Phase::Dead);
        return;
    }

    if suck(session, ctx.audio) == SuckOutcome::TargetReached {
        transition(session, Phase::Clear);
        return;
    }

    let Some(active) = session.active.as_ref() else {
        return;
    };
    let step = motion::step(
        session.player.pos,
        input,
        &active.level,
        &ctx.settings.colliders,
        PLAYER_SPEED,
        PLAYER_JITTER,
        ctx.jitter,
    );
    session.player.pos = step.pos;
    if step.blocked {
        session.player.stamina -= COLLISION_PENALTY;
    }
}

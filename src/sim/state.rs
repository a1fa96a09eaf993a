//! Session state
//!
//! Everything the simulation loop owns between ticks. Renderers and audio
//! backends only ever see it read-only.

use std::sync::Arc;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::hazard::Hazard;
use super::level::{Level, LoadedLevel};
use crate::audio::{AudioSink, LoopHandle, Track};

/// Screens of the game, in the order they are normally visited
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// One-time setup, never revisited
    Init,
    /// Splash image
    Intro,
    /// Title screen
    MenuPrimary,
    /// How-to-play screen
    MenuSecondary,
    /// In a level
    Play,
    /// Target drained, score reveal
    Clear,
    /// Out of stamina
    Dead,
    /// Credits and final score
    Outro,
}

/// The ball of lightning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Tile coordinates
    pub pos: DVec2,
    pub stamina: f64,
    /// Stamina at level entry, for the HUD bar
    pub initial_stamina: f64,
}

impl Player {
    /// Remaining stamina as a fraction of the starting amount
    pub fn stamina_ratio(&self) -> f64 {
        if self.initial_stamina <= 0.0 {
            return 0.0;
        }
        (self.stamina / self.initial_stamina).clamp(0.0, 1.0)
    }
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: DVec2::ONE,
            stamina: 0.0,
            initial_stamina: 0.0,
        }
    }
}

/// Split score: points banked from cleared levels, and points earned in the
/// current attempt that are revealed on the Clear screen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub committed: u64,
    pub pending: u64,
}

impl Score {
    pub fn award(&mut self, points: u64) {
        self.pending += points;
    }

    /// Bank pending points
    pub fn commit(&mut self) {
        self.committed += self.pending;
        self.pending = 0;
    }

    pub fn discard_pending(&mut self) {
        self.pending = 0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn total(&self) -> u64 {
        self.committed + self.pending
    }
}

/// The level being played and its hazards
#[derive(Debug, Clone)]
pub struct ActiveLevel {
    pub index: usize,
    pub level: Arc<Level>,
    pub hazards: Vec<Hazard>,
}

/// Complete game session
pub struct Session {
    pub phase: Phase,
    /// Ticks spent in the current phase
    pub tick: u32,
    /// Whether the current phase's entry action has run
    pub(crate) entered: bool,
    pub level_index: usize,
    /// Screen shake countdown
    pub shake: u32,
    pub player: Player,
    pub score: Score,
    /// Set when the Outro is reached
    pub final_score: Option<u64>,
    pub(crate) active: Option<ActiveLevel>,
    music: Option<Box<dyn LoopHandle>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase)
            .field("tick", &self.tick)
            .field("level_index", &self.level_index)
            .field("shake", &self.shake)
            .field("player", &self.player)
            .field("score", &self.score)
            .field("music", &self.music_track())
            .finish_non_exhaustive()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Init,
            tick: 0,
            entered: true,
            level_index: 0,
            shake: 0,
            player: Player::default(),
            score: Score::default(),
            final_score: None,
            active: None,
            music: None,
        }
    }

    /// Enter a phase with a fresh tick counter; its entry action runs on the
    /// next tick
    pub(crate) fn switch_phase(&mut self, phase: Phase) {
        log::info!("{:?} -> {:?} after {} ticks", self.phase, phase, self.tick);
        self.phase = phase;
        self.tick = 0;
        self.entered = false;
    }

    /// Install a freshly loaded level in one step
    pub fn apply_level(&mut self, loaded: LoadedLevel) {
        self.level_index = loaded.index;
        self.player = Player {
            pos: loaded.spawn,
            stamina: loaded.stamina,
            initial_stamina: loaded.stamina,
        };
        self.score.discard_pending();
        self.active = Some(ActiveLevel {
            index: loaded.index,
            level: loaded.level,
            hazards: loaded.hazards,
        });
    }

    pub fn active(&self) -> Option<&ActiveLevel> {
        self.active.as_ref()
    }

    pub fn hazards(&self) -> &[Hazard] {
        self.active.as_ref().map_or(&[], |a| a.hazards.as_slice())
    }

    pub fn music_track(&self) -> Option<Track> {
        self.music.as_ref().map(|m| m.track())
    }

    /// Replace the background loop, stopping the old one
    pub(crate) fn switch_music(&mut self, audio: &mut dyn AudioSink, track: Track) {
        if let Some(mut old) = self.music.take() {
            old.stop();
        }
        self.music = Some(audio.start_loop(track, false));
    }

    /// Keep the current loop alive, optionally muted
    pub(crate) fn keep_music(&mut self, muted: bool) {
        if let Some(music) = self.music.as_mut() {
            music.play(muted);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioEvent, RecordingAudio};
    use crate::sim::level::load_level;
    use crate::sim::testing::{player, project, room, thing};

    #[test]
    fn test_score_split() {
        let mut score = Score::default();
        score.award(5);
        score.award(50);
        assert_eq!(score.pending, 55);
        assert_eq!(score.total(), 55);
        score.commit();
        assert_eq!(score, Score { committed: 55, pending: 0 });
        score.award(10);
        score.discard_pending();
        assert_eq!(score.total(), 55);
        score.reset();
        assert_eq!(score.total(), 0);
    }

    #[test]
    fn test_stamina_ratio() {
        let mut p = Player {
            pos: DVec2::ZERO,
            stamina: 2.5,
            initial_stamina: 5.0,
        };
        assert_eq!(p.stamina_ratio(), 0.5);
        p.stamina = -1.0;
        assert_eq!(p.stamina_ratio(), 0.0);
        p.initial_stamina = 0.0;
        assert_eq!(p.stamina_ratio(), 0.0);
    }

    #[test]
    fn test_switch_phase_resets_tick() {
        let mut session = Session::new();
        session.tick = 42;
        session.switch_phase(Phase::Intro);
        assert_eq!(session.phase, Phase::Intro);
        assert_eq!(session.tick, 0);
        assert!(!session.entered);
    }

    #[test]
    fn test_apply_level_replaces_everything() {
        let provider = project(vec![
            room(8, 8, vec![player(2, 2, 3.0), thing("Tv", 4, 4)]),
            room(9, 9, vec![player(3, 3, 7.0), thing("Toaster", 5, 5), thing("Target", 6, 6)]),
        ]);
        let mut session = Session::new();
        session.apply_level(load_level(&provider, 0).unwrap());
        session.score.award(30);
        session.player.stamina = 1.0;

        session.apply_level(load_level(&provider, 1).unwrap());
        assert_eq!(session.level_index, 1);
        assert_eq!(session.player.pos, DVec2::new(3.0, 3.0));
        assert_eq!(session.player.stamina, 7.0);
        assert_eq!(session.player.initial_stamina, 7.0);
        assert_eq!(session.score.pending, 0);
        assert_eq!(session.hazards().len(), 2);
        assert_eq!(session.active().unwrap().level.identifier(), "Room9x9");
    }

    #[test]
    fn test_music_swap_stops_old_loop() {
        let mut audio = RecordingAudio::new();
        let mut session = Session::new();
        session.keep_music(true);
        session.switch_music(&mut audio, Track::Intro);
        session.switch_music(&mut audio, Track::Game);
        session.keep_music(true);
        assert_eq!(session.music_track(), Some(Track::Game));
        assert_eq!(
            audio.events(),
            vec![
                AudioEvent::LoopStarted(Track::Intro),
                AudioEvent::LoopStopped(Track::Intro),
                AudioEvent::LoopStarted(Track::Game),
                AudioEvent::Muted(Track::Game),
            ]
        );
    }
}

//! Audio triggers
//!
//! The simulation never waits on audio: it fires one-shot cues and holds a
//! handle to the current background loop. Decoding and mixing live in
//! whatever backend implements `AudioSink`.

use std::cell::RefCell;
use std::rc::Rc;

/// One-shot sound effects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// A hazard blew up (backends pick one of several variants)
    Explosion,
    /// Player appeared in a level
    Spawn,
    /// Ringing-ears sting when the target is drained
    LevelClear,
}

/// Background music
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Track {
    /// Title and menus
    Intro,
    /// In-level loop
    Game,
    /// Credits
    Outro,
}

/// A background loop owned by the session
pub trait LoopHandle {
    fn track(&self) -> Track;

    /// Keep the loop going (restarting it if it ended), optionally muted
    fn play(&mut self, muted: bool);

    fn stop(&mut self);
}

/// Backend for cues and loops
pub trait AudioSink {
    fn play_one_shot(&mut self, cue: Cue);

    fn start_loop(&mut self, track: Track, muted: bool) -> Box<dyn LoopHandle>;
}

/// Audio disabled
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

struct SilentLoop(Track);

impl LoopHandle for SilentLoop {
    fn track(&self) -> Track {
        self.0
    }

    fn play(&mut self, _muted: bool) {}

    fn stop(&mut self) {}
}

impl AudioSink for SilentAudio {
    fn play_one_shot(&mut self, _cue: Cue) {}

    fn start_loop(&mut self, track: Track, _muted: bool) -> Box<dyn LoopHandle> {
        Box::new(SilentLoop(track))
    }
}

/// Something that happened on a `RecordingAudio` backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    OneShot(Cue),
    LoopStarted(Track),
    Muted(Track),
    Unmuted(Track),
    LoopStopped(Track),
}

/// Logs every trigger and keeps a shared transcript
///
/// Loops only record mute changes, not the per-tick keep-alive calls.
#[derive(Debug, Default, Clone)]
pub struct RecordingAudio {
    events: Rc<RefCell<Vec<AudioEvent>>>,
}

impl RecordingAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AudioEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, event: AudioEvent) -> usize {
        self.events.borrow().iter().filter(|&&e| e == event).count()
    }

    fn push(events: &RefCell<Vec<AudioEvent>>, event: AudioEvent) {
        log::debug!("audio: {:?}", event);
        events.borrow_mut().push(event);
    }
}

struct RecordingLoop {
    track: Track,
    muted: bool,
    stopped: bool,
    events: Rc<RefCell<Vec<AudioEvent>>>,
}

impl LoopHandle for RecordingLoop {
    fn track(&self) -> Track {
        self.track
    }

    fn play(&mut self, muted: bool) {
        if self.stopped || muted == self.muted {
            return;
        }
        self.muted = muted;
        let event = if muted {
            AudioEvent::Muted(self.track)
        } else {
            AudioEvent::Unmuted(self.track)
        };
        RecordingAudio::push(&self.events, event);
    }

    fn stop(&mut self) {
        if !self.stopped {
            self.stopped = true;
            RecordingAudio::push(&self.events, AudioEvent::LoopStopped(self.track));
        }
    }
}

impl AudioSink for RecordingAudio {
    fn play_one_shot(&mut self, cue: Cue) {
        Self::push(&self.events, AudioEvent::OneShot(cue));
    }

    fn start_loop(&mut self, track: Track, muted: bool) -> Box<dyn LoopHandle> {
        Self::push(&self.events, AudioEvent::LoopStarted(track));
        if muted {
            Self::push(&self.events, AudioEvent::Muted(track));
        }
        Box::new(RecordingLoop {
            track,
            muted,
            stopped: false,
            events: Rc::clone(&self.events),
        })
    }
}

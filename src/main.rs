//! Headless runner
//!
//! Plays the game with a simple autopilot for a fixed number of ticks and
//! logs what happens. Useful for smoke-testing level projects.
//!
//! Usage: lightning-ball [LEVELS.json] [--settings FILE] [--ticks N] [--scores FILE]

#[cfg(not(target_arch = "wasm32"))]
use lightning_ball::{
    audio::SilentAudio,
    input::{Direction, InputSource, KeyState},
    renderer::FrameBuilder,
    sim::{LevelProject, Phase, RandomJitter, Session, TickContext, tick},
    HighScores, Settings,
};

/// Bundled demo levels
#[cfg(not(target_arch = "wasm32"))]
const DEMO_LEVELS: &str = include_str!("../levels/demo.json");

/// Default run length, a bit over a minute of play
#[cfg(not(target_arch = "wasm32"))]
const DEFAULT_TICKS: u32 = 5000;

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
struct Args {
    levels: Option<String>,
    settings: Option<String>,
    scores: Option<String>,
    ticks: Option<u32>,
}

#[cfg(not(target_arch = "wasm32"))]
fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut it = std::env::args().skip(1);
    while let Some(arg) = it.next() {
        match arg.as_str() {
            "--settings" => args.settings = Some(it.next().ok_or("--settings needs a path")?),
            "--scores" => args.scores = Some(it.next().ok_or("--scores needs a path")?),
            "--ticks" => {
                let n = it.next().ok_or("--ticks needs a number")?;
                args.ticks = Some(n.parse().map_err(|e| format!("bad --ticks {n}: {e}"))?);
            }
            flag if flag.starts_with("--") => return Err(format!("unknown option {flag}")),
            _ => args.levels = Some(arg),
        }
    }
    Ok(args)
}

/// Picks keys for the next tick
#[cfg(not(target_arch = "wasm32"))]
fn autopilot(session: &Session, keys: &KeyState) -> Vec<Direction> {
    match session.phase {
        Phase::Play => steer(session),
        // Tap to get through screens
        _ if Direction::ALL.iter().any(|&d| keys.is_held(d)) => Vec::new(),
        _ => vec![Direction::Up],
    }
}

/// Head for the nearest live appliance, then the target
#[cfg(not(target_arch = "wasm32"))]
fn steer(session: &Session) -> Vec<Direction> {
    let pos = session.player.pos;
    let live = session.hazards().iter().filter(|h| !h.destroyed);
    let goal = live
        .clone()
        .filter(|h| !h.is_target())
        .min_by(|a, b| a.center().distance(pos).total_cmp(&b.center().distance(pos)))
        .or_else(|| live.clone().find(|h| h.is_target()))
        .map(|h| h.center());

    let Some(goal) = goal else {
        return Vec::new();
    };
    let delta = goal - pos;
    let mut dirs = Vec::new();
    if delta.y < -0.1 {
        dirs.push(Direction::Up);
    } else if delta.y > 0.1 {
        dirs.push(Direction::Down);
    }
    if delta.x < -0.1 {
        dirs.push(Direction::Left);
    } else if delta.x > 0.1 {
        dirs.push(Direction::Right);
    }
    dirs
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args = parse_args()?;
    let settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    let levels = match &args.levels {
        Some(path) => LevelProject::from_path(path)?,
        None => LevelProject::from_json(DEMO_LEVELS)?,
    };
    let ticks = args.ticks.unwrap_or(DEFAULT_TICKS);

    log::info!("Lightning Ball starting, {} ticks", ticks);

    let mut session = Session::new();
    let mut audio = SilentAudio;
    let mut jitter = RandomJitter::new(settings.seed);
    let mut frames = FrameBuilder::new(settings.seed.wrapping_add(1));
    let mut keys = KeyState::default();
    let mut last_phase = session.phase;

    for _ in 0..ticks {
        let down = autopilot(&session, &keys);
        keys = keys.next(&down);

        let mut ctx = TickContext {
            levels: &levels,
            settings: &settings,
            audio: &mut audio,
            jitter: &mut jitter,
        };
        tick(&mut session, &keys, &mut ctx)?;

        let frame = frames.build(&session, &settings);
        if session.phase != last_phase {
            log::info!(
                "{:?} -> {:?} (level {}, score {})",
                last_phase,
                session.phase,
                session.level_index,
                frame.overlay.score_text
            );
            last_phase = session.phase;
        }

        if session.phase == Phase::Outro && session.tick > 1 {
            break;
        }
    }

    match session.final_score {
        Some(score) => {
            println!("your score is {score}");
            if let Some(path) = &args.scores {
                let mut scores = HighScores::load(path);
                let cleared = u32::try_from(session.level_index + 1).unwrap_or(u32::MAX);
                if let Some(rank) = scores.record(score, cleared) {
                    log::info!("New high score, rank {}", rank);
                }
                scores.save(path)?;
            }
        }
        None => println!(
            "stopped in {:?} on level {} with {} points",
            session.phase,
            session.level_index + 1,
            session.score.total()
        ),
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Browser builds drive the library directly
}

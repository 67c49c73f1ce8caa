//! Banner Brawl entry point
//!
//! Runs a headless session driven by the demo autopilot with uneven frame
//! pacing, then prints a JSON summary of the run.
//!
//! Usage: `banner-brawl [seed] [tuning.json]`

use serde::Serialize;

use banner_brawl::sim::{GamePhase, GameState, demo_input};
use banner_brawl::{HudNotification, HudSink, Presenter, Session, Tuning};

/// Stop the demo after five minutes of simulated time
const MAX_DEMO_TICKS: u64 = 60 * 60 * 5;
/// Display intervals cycled through by the runner (60 Hz, 144 Hz, 30 Hz)
const FRAME_PATTERN: [f64; 3] = [1.0 / 60.0, 1.0 / 144.0, 1.0 / 30.0];
/// Every this many frames the runner stalls like a backgrounded tab
const STALL_EVERY: usize = 600;
const STALL_SECONDS: f64 = 0.5;

/// Stands in for a renderer: counts frames and traces the scene size
#[derive(Default)]
struct TracePresenter {
    frames: u64,
}

impl Presenter for TracePresenter {
    fn present(&mut self, state: &GameState) {
        self.frames += 1;
        if self.frames % 300 == 0 {
            log::trace!(
                "frame {}: tick={} enemies={} pickups={} particles={} camera_x={:.1}",
                self.frames,
                state.time_ticks,
                state.enemies.len(),
                state.pickups.len(),
                state.particles.len(),
                state.camera_x
            );
        }
    }
}

struct LogHud;

impl HudSink for LogHud {
    fn notify(&mut self, notification: HudNotification) {
        match notification {
            HudNotification::GameOver { won } => {
                log::info!("HUD: game over, {}", if won { "victory" } else { "defeat" });
            }
            HudNotification::WaveChanged(wave) => log::info!("HUD: wave {}", wave),
            other => log::debug!("HUD: {:?}", other),
        }
    }
}

#[derive(Serialize)]
struct RunSummary {
    seed: u64,
    ticks: u64,
    frames: u64,
    wave: u32,
    score: u64,
    sovereignty: f32,
    player_health: f32,
    enemies_remaining: usize,
    /// `None` when the demo hit its time limit first
    won: Option<bool>,
}

fn load_tuning(path: Option<String>) -> Tuning {
    let Some(path) = path else {
        return Tuning::default();
    };
    match Tuning::load(&path) {
        Ok(tuning) => tuning,
        Err(e) => {
            log::warn!("Ignoring tuning file {}: {}", path, e);
            Tuning::default()
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let tuning = load_tuning(args.next());
    log::info!("Banner Brawl (headless) starting, seed={}", seed);

    let mut session = Session::new(seed, tuning);
    let mut presenter = TracePresenter::default();
    let mut hud = LogHud;

    let mut frame = 0usize;
    while !session.state().is_over() && session.state().time_ticks < MAX_DEMO_TICKS {
        *session.input_mut() = demo_input(session.state());
        let dt = if frame % STALL_EVERY == STALL_EVERY - 1 {
            STALL_SECONDS
        } else {
            FRAME_PATTERN[frame % FRAME_PATTERN.len()]
        };
        session.frame(dt, &mut presenter, &mut hud);
        frame += 1;
    }

    let state = session.state();
    let summary = RunSummary {
        seed,
        ticks: state.time_ticks,
        frames: presenter.frames,
        wave: state.wave,
        score: state.score,
        sovereignty: state.sovereignty(),
        player_health: state.player.health,
        enemies_remaining: state.active_enemies().count(),
        won: match state.phase {
            GamePhase::GameOver { won } => Some(won),
            GamePhase::Playing => None,
        },
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Failed to serialize run summary: {}", e),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is embedded by a host page; there is no standalone wasm runner
}

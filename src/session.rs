//! Fixed-timestep loop driver
//!
//! A `Session` owns the game state for one run. The host calls [`Session::frame`]
//! once per display callback with the elapsed wall-clock time; the session
//! runs zero or more simulation ticks, hands the state to the presenter once,
//! then reports HUD changes.

use serde::Serialize;

use crate::consts::{MAX_ACCUMULATOR, SIM_DT};
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
use crate::tuning::Tuning;

/// Minimum change in player health or sovereignty worth reporting
const HUD_EPSILON: f32 = 0.1;

/// Receives a read-only view of the state once per display frame
pub trait Presenter {
    fn present(&mut self, state: &GameState);
}

/// One-way HUD signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum HudNotification {
    ScoreChanged(u64),
    HealthChanged { health: f32, max_health: f32 },
    SovereigntyChanged(f32),
    WaveChanged(u32),
    GameOver { won: bool },
}

/// Consumer of HUD notifications
pub trait HudSink {
    fn notify(&mut self, notification: HudNotification);
}

impl HudSink for Vec<HudNotification> {
    fn notify(&mut self, notification: HudNotification) {
        self.push(notification);
    }
}

/// Remembers the last values sent to the HUD so only changes go out
#[derive(Debug, Clone, Default)]
pub struct HudTracker {
    score: Option<u64>,
    health: Option<f32>,
    sovereignty: Option<f32>,
    wave: Option<u32>,
    game_over_sent: bool,
}

impl HudTracker {
    /// Forget everything so the next update re-sends every value
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn update(&mut self, state: &GameState, sink: &mut impl HudSink) {
        if self.score != Some(state.score) {
            self.score = Some(state.score);
            sink.notify(HudNotification::ScoreChanged(state.score));
        }

        let health = state.player.health;
        if self.health.is_none_or(|last| (last - health).abs() >= HUD_EPSILON) {
            self.health = Some(health);
            sink.notify(HudNotification::HealthChanged {
                health,
                max_health: state.player.max_health,
            });
        }

        let sovereignty = state.sovereignty();
        if self
            .sovereignty
            .is_none_or(|last| (last - sovereignty).abs() >= HUD_EPSILON)
        {
            self.sovereignty = Some(sovereignty);
            sink.notify(HudNotification::SovereigntyChanged(sovereignty));
        }

        if self.wave != Some(state.wave) {
            self.wave = Some(state.wave);
            sink.notify(HudNotification::WaveChanged(state.wave));
        }

        if let GamePhase::GameOver { won } = state.phase {
            if !self.game_over_sent {
                self.game_over_sent = true;
                sink.notify(HudNotification::GameOver { won });
            }
        }
    }
}

/// Game instance holding all state for one run
pub struct Session {
    state: GameState,
    accumulator: f64,
    input: TickInput,
    hud: HudTracker,
    /// Events produced by the ticks of the most recent frame
    events: Vec<GameEvent>,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            state: GameState::new(seed, tuning),
            accumulator: 0.0,
            input: TickInput::default(),
            hud: HudTracker::default(),
            events: Vec::new(),
        }
    }

    /// Reset game state for a new run with the same tuning
    pub fn restart(&mut self, seed: u64) {
        let tuning = self.state.tuning.clone();
        self.state = GameState::new(seed, tuning);
        self.accumulator = 0.0;
        self.input = TickInput::default();
        self.hud.reset();
        self.events.clear();
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Input applied to upcoming ticks; attack and jump are cleared once consumed
    #[inline]
    pub fn input_mut(&mut self) -> &mut TickInput {
        &mut self.input
    }

    /// Events emitted during the most recent frame
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Run as many fixed ticks as the elapsed time allows.
    ///
    /// The accumulator is capped so a long stall only replays a bounded
    /// amount of simulation; the excess time is dropped. Returns the number
    /// of ticks run.
    pub fn advance(&mut self, frame_dt: f64) -> u32 {
        let dt = if frame_dt.is_finite() { frame_dt.max(0.0) } else { 0.0 };
        self.accumulator = (self.accumulator + dt).min(MAX_ACCUMULATOR);

        let mut steps = 0;
        while self.accumulator >= SIM_DT {
            if self.state.is_over() {
                self.accumulator = 0.0;
                break;
            }
            tick(&mut self.state, &self.input);
            self.accumulator -= SIM_DT;
            steps += 1;

            // Clear one-shot inputs after processing
            self.input.clear_triggers();
            self.events.extend(self.state.drain_events());
        }
        steps
    }

    /// One display callback: simulate, present once, then update the HUD
    pub fn frame(
        &mut self,
        frame_dt: f64,
        presenter: &mut impl Presenter,
        hud: &mut impl HudSink,
    ) -> u32 {
        self.events.clear();
        let steps = self.advance(frame_dt);
        presenter.present(&self.state);
        self.hud.update(&self.state, hud);
        steps
    }
}

//! Frame loop driver
//!
//! `App` owns one game session plus everything around it: the seeded RNG,
//! held input, the fixed-timestep accumulator, the session clock and the
//! high score. The platform layer only forwards events and calls `frame`
//! once per display refresh until it returns `false`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS, SIM_DT};
use crate::highscores::HighScore;
use crate::persistence::ScoreStore;
use crate::platform::{Key, SwipeTracker, Viewport};
use crate::renderer::{DrawCmd, FrameInfo, jump_scene, sequence_scene};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, JumpInput, JumpState, SequenceState};
use crate::tuning::{JumpTuning, SequenceTuning};

/// Which game to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Jump,
    Sequence,
    /// Sequence game with the older five-colour ring rules
    SequenceClassic,
}

impl Variant {
    /// Parse the `data-game` attribute value
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "jump" => Some(Variant::Jump),
            "sequence" | "bubble" => Some(Variant::Sequence),
            "sequence-classic" | "classic" => Some(Variant::SequenceClassic),
            _ => None,
        }
    }

    pub fn high_score_key(&self) -> &'static str {
        match self {
            Variant::Jump => HighScore::JUMP_KEY,
            Variant::Sequence | Variant::SequenceClassic => HighScore::SEQUENCE_KEY,
        }
    }

    /// Instructions shown while no game is running
    pub fn controls_hint(&self) -> &'static str {
        match self {
            Variant::Jump => "Slide left/right to move<br>Swipe up to jump",
            Variant::Sequence | Variant::SequenceClassic => "Tap bubbles in the correct sequence!",
        }
    }
}

/// The running game
#[derive(Debug, Clone)]
pub enum Session {
    Jump(JumpState),
    Sequence(SequenceState),
}

impl Session {
    fn new(variant: Variant, viewport: Viewport, rng: &mut Pcg32) -> Self {
        match variant {
            Variant::Jump => Session::Jump(JumpState::new(viewport, JumpTuning::default(), rng)),
            Variant::Sequence => {
                Session::Sequence(SequenceState::new(viewport, SequenceTuning::default()))
            }
            Variant::SequenceClassic => {
                Session::Sequence(SequenceState::new(viewport, SequenceTuning::classic()))
            }
        }
    }

    pub fn phase(&self) -> GamePhase {
        match self {
            Session::Jump(s) => s.phase,
            Session::Sequence(s) => s.phase,
        }
    }

    pub fn score(&self) -> u64 {
        match self {
            Session::Jump(s) => s.score,
            Session::Sequence(s) => s.score,
        }
    }
}

/// Values for the DOM readouts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub score: u64,
    pub high_score: u64,
    /// Start control (and controls hint) visible
    pub show_start: bool,
}

impl Hud {
    pub fn score_text(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn high_score_text(&self) -> String {
        format!("High Score: {}", self.high_score)
    }
}

/// Game instance holding all state
pub struct App<S: ScoreStore> {
    variant: Variant,
    session: Session,
    viewport: Viewport,
    store: S,
    high_score: HighScore,
    rng: Pcg32,
    settings: Settings,
    input: JumpInput,
    jump_held: bool,
    swipe: SwipeTracker,
    accumulator: f32,
    /// Simulated milliseconds since start
    clock_ms: f64,
    // FPS tracking
    frame_times: [f64; 60],
    frame_index: usize,
    fps: u32,
}

impl<S: ScoreStore> App<S> {
    pub fn new(variant: Variant, viewport: Viewport, store: S, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let session = Session::new(variant, viewport, &mut rng);
        let high_score = HighScore::load(variant.high_score_key(), &store);
        Self {
            variant,
            session,
            viewport,
            store,
            high_score,
            rng,
            settings: Settings::default(),
            input: JumpInput::default(),
            jump_held: false,
            swipe: SwipeTracker::new(),
            accumulator: 0.0,
            clock_ms: 0.0,
            frame_times: [0.0; 60],
            frame_index: 0,
            fps: 0,
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Apply a JSON balance override on top of the variant's rules.
    /// Invalid JSON is logged and leaves the tuning unchanged.
    pub fn with_tuning(mut self, json: &str) -> Self {
        let viewport = self.viewport;
        let session = match &self.session {
            Session::Jump(s) => s
                .tuning
                .with_overrides(json)
                .map(|tuning| Session::Jump(JumpState::new(viewport, tuning, &mut self.rng))),
            Session::Sequence(s) => s
                .tuning
                .with_overrides(json)
                .map(|tuning| Session::Sequence(SequenceState::new(viewport, tuning))),
        };
        if let Some(session) = session {
            log::info!("Applied {:?} tuning override", self.variant);
            self.session = session;
        }
        self
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Direct access for tests and the native autopilot
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn clock_ms(&self) -> f64 {
        self.clock_ms
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    pub fn is_playing(&self) -> bool {
        self.session.phase() == GamePhase::Playing
    }

    /// Reset the session and begin playing (also used for restart)
    pub fn start(&mut self) {
        match &mut self.session {
            Session::Jump(s) => s.start(&mut self.rng),
            Session::Sequence(s) => s.start(&mut self.rng),
        }
        self.accumulator = 0.0;
        self.clock_ms = 0.0;
        self.input = JumpInput::default();
        self.jump_held = false;
        self.swipe.end();
    }

    /// Consume `dt` seconds of wall time. Returns whether another frame
    /// should be scheduled; calling this while stopped does nothing.
    pub fn frame(&mut self, dt: f32, time_ms: f64) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.track_fps(time_ms);

        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.accumulator -= SIM_DT;
            substeps += 1;
            self.clock_ms += SIM_DT as f64 * 1000.0;

            let events = match &mut self.session {
                Session::Jump(s) => s.step(&self.input, &mut self.rng),
                Session::Sequence(s) => s.step(SIM_DT, self.clock_ms),
            };
            self.handle_events(&events);

            if !self.is_playing() {
                self.accumulator = 0.0;
                break;
            }
        }
        self.is_playing()
    }

    fn track_fps(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % self.frame_times.len();

        // Oldest sample is the one we overwrite next
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = (60_000.0 / elapsed).round() as u32;
            }
        }
    }

    fn handle_events(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Scored { total, .. } => {
                    if self.high_score.submit(*total, &mut self.store) {
                        log::info!("New high score {}", total);
                    }
                }
                GameEvent::GameOver(cause) => {
                    log::info!(
                        "Game over ({:?}): score {}, best {}",
                        cause,
                        self.session.score(),
                        self.high_score.best()
                    );
                }
                _ => {}
            }
        }
    }

    pub fn key_down(&mut self, key: Key) {
        match key {
            Key::Left => self.input.left = true,
            Key::Right => self.input.right = true,
            Key::Jump => {
                // Auto-repeat must not re-trigger
                if !self.jump_held {
                    if let Session::Jump(s) = &mut self.session {
                        s.jump();
                    }
                }
                self.jump_held = true;
            }
        }
    }

    pub fn key_up(&mut self, key: Key) {
        match key {
            Key::Left => self.input.left = false,
            Key::Right => self.input.right = false,
            Key::Jump => self.jump_held = false,
        }
    }

    /// Click at canvas coordinates
    pub fn click(&mut self, point: Vec2) {
        if let Session::Sequence(s) = &mut self.session {
            let events = s.tap(point, self.clock_ms, &mut self.rng);
            self.handle_events(&events);
        }
    }

    /// Touch start at canvas coordinates
    pub fn touch_start(&mut self, point: Vec2) {
        match self.session {
            Session::Jump(_) => self.swipe.begin(point),
            Session::Sequence(_) => self.click(point),
        }
    }

    pub fn touch_move(&mut self, point: Vec2) {
        if let Session::Jump(s) = &mut self.session {
            if !s.is_playing() {
                return;
            }
            let threshold = self.viewport.base_unit() * s.tuning.swipe_threshold;
            let update = self.swipe.update(point, threshold);
            s.nudge(update.dx);
            if update.jump {
                s.jump();
            }
        }
    }

    pub fn touch_end(&mut self) {
        self.swipe.end();
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        match &mut self.session {
            Session::Jump(s) => s.resize(viewport),
            Session::Sequence(s) => s.viewport = viewport,
        }
    }

    /// Draw commands for the current state
    pub fn scene(&self) -> Vec<DrawCmd> {
        let info = FrameInfo {
            settings: &self.settings,
            now_ms: self.clock_ms,
            fps: Some(self.fps),
        };
        match &self.session {
            Session::Jump(s) => jump_scene(s, &info),
            Session::Sequence(s) => sequence_scene(s, &info),
        }
    }

    pub fn hud(&self) -> Hud {
        Hud {
            score: self.session.score(),
            high_score: self.high_score.best(),
            show_start: !self.is_playing(),
        }
    }
}

//! Bubble Jump simulation
//!
//! The player ball falls under constant gravity and jumps on command. Stars
//! and decorative bubbles rise from below and are recycled (replaced by a
//! fresh value spawned under the bottom edge) once they leave the top, so the
//! entity counts never change.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::circles_overlap;
use super::state::{GameEvent, GameOverCause, GamePhase};
use crate::platform::Viewport;
use crate::tuning::JumpTuning;

/// The player's ball
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Horizontal speed while a direction is held (px per step)
    pub speed: f32,
    /// Vertical velocity set by a jump (px per step)
    pub jump_impulse: f32,
    /// px per step²
    pub gravity: f32,
}

impl Player {
    fn new(viewport: &Viewport, tuning: &JumpTuning) -> Self {
        let mut player = Self {
            pos: viewport.center(),
            vel: Vec2::ZERO,
            radius: 0.0,
            speed: 0.0,
            jump_impulse: 0.0,
            gravity: 0.0,
        };
        player.rescale(viewport, tuning);
        player
    }

    /// Recompute size-dependent values from the base unit
    fn rescale(&mut self, viewport: &Viewport, tuning: &JumpTuning) {
        let bu = viewport.base_unit();
        self.radius = bu * tuning.player_radius;
        self.speed = bu * tuning.player_speed;
        self.jump_impulse = bu * tuning.jump_impulse;
        self.gravity = bu * tuning.gravity;
    }

    /// Keep the ball fully inside the canvas horizontally
    fn clamp_x(&mut self, width: f32) {
        self.pos.x = self.pos.x.clamp(self.radius, (width - self.radius).max(self.radius));
    }
}

/// A collectible star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    /// Rise speed (px per step)
    pub speed: f32,
    pub rotation: f32,
    /// Radians per step
    pub spin: f32,
}

impl Star {
    /// Spawn a star; `below` places it just under the bottom edge
    pub fn spawn(viewport: &Viewport, tuning: &JumpTuning, rng: &mut impl Rng, below: bool) -> Self {
        let bu = viewport.base_unit();
        let x = rng.random::<f32>() * (viewport.width - bu * 2.0) + bu;
        let y = if below {
            viewport.height + bu
        } else {
            rng.random::<f32>() * viewport.height
        };
        Self {
            pos: Vec2::new(x, y),
            radius: bu * tuning.star_radius,
            speed: bu * (tuning.star_speed_min + rng.random::<f32>() * tuning.star_speed_spread),
            rotation: rng.random::<f32>() * std::f32::consts::TAU,
            spin: tuning.star_spin_min + rng.random::<f32>() * tuning.star_spin_spread,
        }
    }
}

/// Tint of a decorative bubble
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DriftColor {
    Pink,
    Turquoise,
}

impl DriftColor {
    pub fn css(&self) -> &'static str {
        match self {
            DriftColor::Pink => "rgba(255,192,203,0.5)",
            DriftColor::Turquoise => "rgba(64,224,208,0.5)",
        }
    }
}

/// A decorative bubble drifting upward
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriftBubble {
    pub pos: Vec2,
    pub radius: f32,
    pub speed: f32,
    pub color: DriftColor,
}

impl DriftBubble {
    /// Spawn a bubble; `below` places it just under the bottom edge
    pub fn spawn(viewport: &Viewport, tuning: &JumpTuning, rng: &mut impl Rng, below: bool) -> Self {
        let bu = viewport.base_unit();
        let x = rng.random::<f32>() * viewport.width;
        let y = if below {
            viewport.height + bu
        } else {
            rng.random::<f32>() * viewport.height
        };
        let color = if rng.random_bool(0.5) {
            DriftColor::Pink
        } else {
            DriftColor::Turquoise
        };
        Self {
            pos: Vec2::new(x, y),
            radius: bu * (tuning.drift_radius_min + rng.random::<f32>() * tuning.drift_radius_spread),
            speed: bu * (tuning.drift_speed_min + rng.random::<f32>() * tuning.drift_speed_spread),
            color,
        }
    }
}

/// Held-key state
#[derive(Debug, Clone, Copy, Default)]
pub struct JumpInput {
    pub left: bool,
    pub right: bool,
}

impl JumpInput {
    /// -1, 0 or 1
    fn direction(&self) -> f32 {
        (self.right as i8 - self.left as i8) as f32
    }
}

/// Complete Bubble Jump session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JumpState {
    pub phase: GamePhase,
    pub score: u64,
    pub player: Player,
    pub stars: Vec<Star>,
    pub bubbles: Vec<DriftBubble>,
    pub viewport: Viewport,
    #[serde(skip)]
    pub tuning: JumpTuning,
}

impl JumpState {
    /// Build an idle session with entities already drifting (the title screen)
    pub fn new(viewport: Viewport, tuning: JumpTuning, rng: &mut impl Rng) -> Self {
        let mut state = Self {
            phase: GamePhase::Idle,
            score: 0,
            player: Player::new(&viewport, &tuning),
            stars: Vec::new(),
            bubbles: Vec::new(),
            viewport,
            tuning,
        };
        state.populate(rng);
        state
    }

    fn populate(&mut self, rng: &mut impl Rng) {
        let vp = self.viewport;
        self.stars = (0..self.tuning.star_count)
            .map(|_| Star::spawn(&vp, &self.tuning, rng, false))
            .collect();
        self.bubbles = (0..self.tuning.drift_bubble_count)
            .map(|_| DriftBubble::spawn(&vp, &self.tuning, rng, false))
            .collect();
    }

    /// Reset everything and begin playing
    pub fn start(&mut self, rng: &mut impl Rng) {
        let vp = self.viewport;
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.player = Player::new(&vp, &self.tuning);
        self.populate(rng);
        log::info!("Bubble Jump started ({}x{})", vp.width, vp.height);
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Launch upward (ignored unless playing)
    pub fn jump(&mut self) {
        if self.is_playing() {
            self.player.vel.y = self.player.jump_impulse;
        }
    }

    /// Move horizontally by a drag delta (touch)
    pub fn nudge(&mut self, dx: f32) {
        if !self.is_playing() {
            return;
        }
        self.player.pos.x += dx;
        self.player.clamp_x(self.viewport.width);
    }

    /// Apply a new canvas size; the player keeps its position but rescales
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.player.rescale(&viewport, &self.tuning);
        self.player.clamp_x(viewport.width);
    }

    /// Add points to the running score
    pub fn record_score(&mut self, points: u64) -> u64 {
        self.score += points;
        self.score
    }

    /// Advance one fixed step
    pub fn step(&mut self, input: &JumpInput, rng: &mut impl Rng) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.is_playing() {
            return events;
        }
        let vp = self.viewport;

        // Player movement
        self.player.vel.x = input.direction() * self.player.speed;
        self.player.vel.y += self.player.gravity;
        self.player.pos += self.player.vel;
        self.player.clamp_x(vp.width);

        // Fell off the bottom
        if self.player.pos.y > vp.height + self.player.radius {
            self.phase = GamePhase::GameOver;
            log::info!("Bubble Jump over, score {}", self.score);
            events.push(GameEvent::GameOver(GameOverCause::Fell));
            return events;
        }

        // Stars rise, spin, and get collected
        let mut collected = 0;
        for star in &mut self.stars {
            star.pos.y -= star.speed;
            star.rotation += star.spin;

            if circles_overlap(self.player.pos, self.player.radius, star.pos, star.radius) {
                collected += 1;
                *star = Star::spawn(&vp, &self.tuning, rng, true);
            }

            if star.pos.y < -star.radius {
                *star = Star::spawn(&vp, &self.tuning, rng, true);
            }
        }
        for _ in 0..collected {
            let points = self.tuning.star_points;
            let total = self.record_score(points);
            events.push(GameEvent::StarCollected);
            events.push(GameEvent::Scored { points, total });
        }

        // Decorative bubbles
        for bubble in &mut self.bubbles {
            bubble.pos.y -= bubble.speed;
            if bubble.pos.y < -bubble.radius {
                *bubble = DriftBubble::spawn(&vp, &self.tuning, rng, true);
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing(seed: u64) -> (JumpState, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut state = JumpState::new(Viewport::new(600.0, 900.0), JumpTuning::default(), &mut rng);
        state.start(&mut rng);
        (state, rng)
    }

    #[test]
    fn test_new_is_idle_and_populated() {
        let mut rng = Pcg32::seed_from_u64(1);
        let state = JumpState::new(Viewport::new(600.0, 900.0), JumpTuning::default(), &mut rng);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.stars.len(), 5);
        assert_eq!(state.bubbles.len(), 15);
        assert_eq!(state.player.radius, 20.0);
    }

    #[test]
    fn test_step_ignored_when_not_playing() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut state = JumpState::new(Viewport::new(600.0, 900.0), JumpTuning::default(), &mut rng);
        let before = state.player.pos;
        assert!(state.step(&JumpInput::default(), &mut rng).is_empty());
        assert_eq!(state.player.pos, before);
    }

    #[test]
    fn test_gravity_integration() {
        let (mut state, mut rng) = playing(2);
        state.stars.clear();
        let y0 = state.player.pos.y;
        let g = state.player.gravity;
        state.step(&JumpInput::default(), &mut rng);
        state.step(&JumpInput::default(), &mut rng);
        assert!((state.player.vel.y - 2.0 * g).abs() < 1e-5);
        assert!((state.player.pos.y - (y0 + 3.0 * g)).abs() < 1e-4);
    }

    #[test]
    fn test_jump_sets_impulse() {
        let (mut state, mut rng) = playing(3);
        state.stars.clear();
        state.jump();
        assert_eq!(state.player.vel.y, state.player.jump_impulse);
        let y0 = state.player.pos.y;
        state.step(&JumpInput::default(), &mut rng);
        assert!(state.player.pos.y < y0);
    }

    #[test]
    fn test_horizontal_clamp() {
        let (mut state, mut rng) = playing(4);
        state.stars.clear();
        let input = JumpInput { left: true, right: false };
        for _ in 0..500 {
            state.jump();
            state.step(&input, &mut rng);
        }
        assert_eq!(state.player.pos.x, state.player.radius);

        state.nudge(10_000.0);
        assert_eq!(state.player.pos.x, 600.0 - state.player.radius);
    }

    #[test]
    fn test_falling_ends_game_once() {
        let (mut state, mut rng) = playing(5);
        state.stars.clear();
        let mut overs = 0;
        for _ in 0..2000 {
            let events = state.step(&JumpInput::default(), &mut rng);
            overs += events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver(GameOverCause::Fell)))
                .count();
        }
        assert_eq!(overs, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        state.jump();
        assert!(state.player.vel.y > 0.0, "jump ignored after game over");
    }

    #[test]
    fn test_collecting_star_scores_and_recycles() {
        let (mut state, mut rng) = playing(6);
        state.stars.truncate(1);
        state.stars[0].pos = state.player.pos;
        state.stars[0].speed = 0.0;

        let events = state.step(&JumpInput::default(), &mut rng);
        assert_eq!(state.score, 100);
        assert!(events.contains(&GameEvent::Scored { points: 100, total: 100 }));
        assert_eq!(state.stars.len(), 1);
        assert!(state.stars[0].pos.y >= 900.0);
    }

    #[test]
    fn test_star_leaving_top_is_recycled() {
        let (mut state, mut rng) = playing(7);
        state.stars.truncate(1);
        state.player.pos = Vec2::new(300.0, 800.0);
        let r = state.stars[0].radius;
        state.stars[0].pos = Vec2::new(50.0, -r + 0.01);
        state.step(&JumpInput::default(), &mut rng);
        let star = &state.stars[0];
        assert!(star.pos.y >= 900.0);
        assert!(star.pos.x >= 0.0 && star.pos.x <= 600.0);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_drift_bubbles_recycle_without_scoring() {
        let (mut state, mut rng) = playing(8);
        state.stars.clear();
        for b in &mut state.bubbles {
            b.pos.y = -b.radius;
        }
        state.step(&JumpInput::default(), &mut rng);
        assert_eq!(state.bubbles.len(), 15);
        assert!(state.bubbles.iter().all(|b| b.pos.y >= 900.0));
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_resize_rescales_player() {
        let (mut state, _) = playing(9);
        state.resize(Viewport::new(300.0, 300.0));
        assert_eq!(state.player.radius, 10.0);
        assert!((state.player.gravity - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_restart_resets_session() {
        let (mut state, mut rng) = playing(10);
        state.record_score(500);
        state.phase = GamePhase::GameOver;
        state.start(&mut rng);
        assert_eq!(state.score, 0);
        assert!(state.is_playing());
        assert_eq!(state.player.pos, Vec2::new(300.0, 450.0));
        assert_eq!(state.player.vel, Vec2::ZERO);
    }
}

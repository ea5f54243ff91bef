//! Bubble Sequence simulation
//!
//! Each level shows numbered bubbles that must be tapped in ascending order
//! before the level timer runs out. A wrong tap throws the level away and
//! deals a fresh set of bubbles; the score and the clock are kept.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{is_clear_of, point_in_circle};
use super::powerup::{PowerUpKind, PowerUps};
use super::state::{GameEvent, GameOverCause, GamePhase};
use crate::platform::Viewport;
use crate::tuning::{BubbleLayout, SequenceTuning};

/// Bubble colours; tuning decides how many of them a game draws from
pub const PALETTE: [&str; 20] = [
    "#FF4136", // Red
    "#2ECC40", // Green
    "#0074D9", // Blue
    "#FFDC00", // Yellow
    "#B10DC9", // Purple
    "#FF851B", // Orange
    "#39CCCC", // Teal
    "#F012BE", // Magenta
    "#01FF70", // Lime
    "#7FDBFF", // Light blue
    "#FF69B4", // Hot pink
    "#FFB6C1", // Light pink
    "#98FB98", // Pale green
    "#DDA0DD", // Plum
    "#87CEEB", // Sky blue
    "#CD853F", // Peru
    "#8B4513", // Saddle brown
    "#4B0082", // Indigo
    "#9370DB", // Medium purple
    "#48D1CC", // Medium turquoise
];

/// Taps closer together than this earn the full speed multiplier (ms)
pub const SPEED_FAST_MS: f64 = 500.0;
/// Gap at which the multiplier is halfway between full and none (ms)
pub const SPEED_MID_MS: f64 = 1000.0;
/// Taps this far apart (or more) earn no speed bonus (ms)
pub const SPEED_SLOW_MS: f64 = 2000.0;

/// Speed multiplier for a correct tap, given the previous correct tap time.
///
/// Piecewise linear through `max` at `SPEED_FAST_MS`, the midpoint between
/// `max` and 1 at `SPEED_MID_MS`, and 1 at `SPEED_SLOW_MS` (3x, 2x, 1x with
/// the default maximum). The first correct tap of a session has nothing to
/// compare against and gets 1.
pub fn speed_multiplier(previous_ms: Option<f64>, now_ms: f64, max: f32) -> f32 {
    let Some(previous) = previous_ms else {
        return 1.0;
    };
    let elapsed = (now_ms - previous).max(0.0);
    let mid = (max + 1.0) / 2.0;
    if elapsed <= SPEED_FAST_MS {
        max
    } else if elapsed <= SPEED_MID_MS {
        let t = ((elapsed - SPEED_FAST_MS) / (SPEED_MID_MS - SPEED_FAST_MS)) as f32;
        max - (max - mid) * t
    } else if elapsed < SPEED_SLOW_MS {
        let t = ((elapsed - SPEED_MID_MS) / (SPEED_SLOW_MS - SPEED_MID_MS)) as f32;
        mid - (mid - 1.0) * t
    } else {
        1.0
    }
}

/// A numbered bubble
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceBubble {
    pub pos: Vec2,
    pub radius: f32,
    /// Index into `PALETTE`
    pub color: usize,
    /// Position in the required tap order (0-based)
    pub index: usize,
    /// 1.0 normally, shrinks to 0.0 once popped
    pub scale: f32,
    pub popping: bool,
}

impl SequenceBubble {
    pub fn is_visible(&self) -> bool {
        self.scale > 0.0
    }

    pub fn css_color(&self) -> &'static str {
        PALETTE[self.color % PALETTE.len()]
    }
}

/// Evenly spaced grid used when random placement gives up.
/// Every cell centre is distinct and inside the viewport.
pub fn grid_layout(count: usize, viewport: &Viewport) -> Vec<Vec2> {
    if count == 0 {
        return Vec::new();
    }
    let columns = (count as f32).sqrt().ceil() as usize;
    let cell_w = viewport.width / (columns + 1) as f32;
    let cell_h = viewport.height / (columns + 1) as f32;
    (0..count)
        .map(|i| {
            let row = i / columns;
            let col = i % columns;
            Vec2::new(cell_w * (col + 1) as f32, cell_h * (row + 1) as f32)
        })
        .collect()
}

/// Bubbles on a circle around the viewport centre
pub fn ring_layout(count: usize, ring_radius: f32, viewport: &Viewport) -> Vec<Vec2> {
    let center = viewport.center();
    (0..count)
        .map(|i| {
            let angle = i as f32 * std::f32::consts::TAU / count as f32;
            center + Vec2::new(angle.cos(), angle.sin()) * ring_radius
        })
        .collect()
}

/// Rejection-sample `count` positions at least `min_distance` apart, keeping
/// `padding` from every edge. Falls back to `grid_layout` for the whole set
/// if any bubble runs out of attempts.
pub fn scatter_layout(
    count: usize,
    padding: f32,
    min_distance: f32,
    max_attempts: u32,
    viewport: &Viewport,
    rng: &mut impl Rng,
) -> Vec<Vec2> {
    let span_x = (viewport.width - padding * 2.0).max(0.0);
    let span_y = (viewport.height - padding * 2.0).max(0.0);
    let mut placed: Vec<Vec2> = Vec::with_capacity(count);

    for _ in 0..count {
        let found = (0..max_attempts)
            .map(|_| {
                Vec2::new(
                    padding + rng.random::<f32>() * span_x,
                    padding + rng.random::<f32>() * span_y,
                )
            })
            .find(|candidate| is_clear_of(*candidate, &placed, min_distance));

        match found {
            Some(pos) => placed.push(pos),
            None => {
                log::debug!("Placement gave up after {} bubbles, using grid", placed.len());
                return grid_layout(count, viewport);
            }
        }
    }
    placed
}

/// Complete Bubble Sequence session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SequenceState {
    pub phase: GamePhase,
    pub score: u64,
    pub combo: u32,
    pub level: u32,
    /// Seconds left on the level timer
    pub time_left: f32,
    /// Palette index per sequence position
    pub sequence: Vec<usize>,
    /// Sequence indices tapped correctly so far this level
    pub progress: Vec<usize>,
    pub bubbles: Vec<SequenceBubble>,
    /// Session clock time of the previous correct tap
    pub last_tap_ms: Option<f64>,
    pub powerups: PowerUps,
    pub viewport: Viewport,
    #[serde(skip)]
    pub tuning: SequenceTuning,
}

impl SequenceState {
    pub fn new(viewport: Viewport, tuning: SequenceTuning) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            combo: 0,
            level: 1,
            time_left: tuning.start_time,
            sequence: Vec::new(),
            progress: Vec::new(),
            bubbles: Vec::new(),
            last_tap_ms: None,
            powerups: PowerUps::default(),
            viewport,
            tuning,
        }
    }

    /// Reset everything and begin playing at level 1
    pub fn start(&mut self, rng: &mut impl Rng) {
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.combo = 0;
        self.level = 1;
        self.time_left = self.tuning.start_time;
        self.last_tap_ms = None;
        self.powerups = PowerUps::default();
        self.generate_level(rng);
        log::info!("Bubble Sequence started ({} bubbles)", self.bubbles.len());
    }

    pub fn is_playing(&self) -> bool {
        self.phase == GamePhase::Playing
    }

    /// Bubble size for the current viewport
    pub fn bubble_radius(&self) -> f32 {
        self.viewport.base_unit() * self.tuning.bubble_radius
    }

    /// New random sequence for the current level and a full set of bubbles
    pub fn generate_level(&mut self, rng: &mut impl Rng) {
        let length = self.tuning.sequence_length(self.level);
        let palette = self.tuning.palette_size.clamp(1, PALETTE.len());
        self.sequence = (0..length).map(|_| rng.random_range(0..palette)).collect();
        self.progress.clear();

        let radius = self.bubble_radius();
        let positions = match self.tuning.layout {
            BubbleLayout::Scatter => scatter_layout(
                length,
                radius * 2.0,
                radius * self.tuning.min_spacing,
                self.tuning.max_placement_attempts,
                &self.viewport,
                rng,
            ),
            BubbleLayout::Ring => ring_layout(
                length,
                self.viewport.base_unit() * self.tuning.ring_radius,
                &self.viewport,
            ),
        };

        self.bubbles = positions
            .into_iter()
            .zip(&self.sequence)
            .enumerate()
            .map(|(index, (pos, &color))| SequenceBubble {
                pos,
                radius,
                color,
                index,
                scale: 1.0,
                popping: false,
            })
            .collect();
    }

    /// First visible bubble containing `point`
    pub fn bubble_at(&self, point: Vec2) -> Option<usize> {
        self.bubbles
            .iter()
            .position(|b| b.is_visible() && point_in_circle(point, b.pos, b.radius))
    }

    /// Add points to the running score
    pub fn record_score(&mut self, points: u64) -> u64 {
        self.score += points;
        self.score
    }

    /// Speed multiplier a correct tap at `now_ms` would earn
    pub fn current_speed_multiplier(&self, now_ms: f64) -> f32 {
        if !self.tuning.speed_bonus {
            return 1.0;
        }
        speed_multiplier(self.last_tap_ms, now_ms, self.tuning.max_speed_multiplier)
    }

    /// Resolve a tap at canvas coordinates
    pub fn tap(&mut self, point: Vec2, now_ms: f64, rng: &mut impl Rng) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.is_playing() {
            return events;
        }
        let Some(hit) = self.bubble_at(point) else {
            return events;
        };

        let index = self.bubbles[hit].index;
        if self.bubbles[hit].popping || index != self.progress.len() {
            log::debug!("Wrong bubble {} (expected {})", index, self.progress.len());
            self.combo = 0;
            self.progress.clear();
            self.generate_level(rng);
            events.push(GameEvent::Mistake);
            return events;
        }

        self.bubbles[hit].popping = true;
        self.progress.push(index);

        let speed = self.current_speed_multiplier(now_ms);
        self.last_tap_ms = Some(now_ms);

        let combo_multiplier = self.combo.max(1) as f64;
        let doubler = self.powerups.score_multiplier() as f64;
        let points =
            (self.tuning.base_points as f64 * combo_multiplier * doubler * speed as f64).round() as u64;
        let total = self.record_score(points);
        self.combo += 1;

        events.push(GameEvent::BubblePopped {
            index,
            speed_multiplier: speed,
        });
        events.push(GameEvent::Scored { points, total });

        if self.progress.len() == self.sequence.len() {
            self.complete_level(now_ms, rng, &mut events);
        }
        events
    }

    fn complete_level(&mut self, now_ms: f64, rng: &mut impl Rng, events: &mut Vec<GameEvent>) {
        self.level += 1;
        self.time_left = self.tuning.time_budget(self.level);
        self.generate_level(rng);
        log::info!("Level {} reached, {:.0}s on the clock", self.level, self.time_left);
        events.push(GameEvent::LevelComplete { level: self.level });

        if rng.random_bool(self.tuning.powerup_chance.clamp(0.0, 1.0)) {
            let kind = PowerUpKind::random(rng);
            let duration = match kind {
                PowerUpKind::TimeFreeze => self.tuning.time_freeze_ms,
                PowerUpKind::ScoreDoubler => self.tuning.score_doubler_ms,
            };
            self.powerups.activate(kind, now_ms, duration);
            log::info!("Power-up {:?} for {}ms", kind, duration);
            events.push(GameEvent::PowerUpActivated(kind));
        }
    }

    /// Advance one fixed step of `dt` seconds; `now_ms` is the session clock
    pub fn step(&mut self, dt: f32, now_ms: f64) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if !self.is_playing() {
            return events;
        }

        for kind in self.powerups.expire(now_ms) {
            log::info!("Power-up {:?} expired", kind);
            events.push(GameEvent::PowerUpExpired(kind));
        }

        if !self.powerups.is_active(PowerUpKind::TimeFreeze) {
            self.time_left -= dt;
        }
        if self.time_left <= 0.0 {
            self.time_left = 0.0;
            self.phase = GamePhase::GameOver;
            log::info!("Bubble Sequence over at level {}, score {}", self.level, self.score);
            events.push(GameEvent::GameOver(GameOverCause::TimeUp));
            return events;
        }

        let shrink = self.tuning.pop_shrink;
        for bubble in self.bubbles.iter_mut().filter(|b| b.popping) {
            bubble.scale *= shrink;
            if bubble.scale < 0.1 {
                bubble.scale = 0.0;
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

    fn playing(tuning: SequenceTuning, seed: u64) -> (SequenceState, Pcg32) {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut state = SequenceState::new(Viewport::new(900.0, 900.0), tuning);
        state.start(&mut rng);
        (state, rng)
    }

    fn pos_of(state: &SequenceState, index: usize) -> Vec2 {
        state.bubbles.iter().find(|b| b.index == index).unwrap().pos
    }

    #[test]
    fn test_start_generates_level_one() {
        let (state, _) = playing(SequenceTuning::default(), 1);
        assert_eq!(state.level, 1);
        assert_eq!(state.sequence.len(), 3);
        assert_eq!(state.bubbles.len(), 3);
        assert_eq!(state.time_left, 60.0);
        for (i, b) in state.bubbles.iter().enumerate() {
            assert_eq!(b.index, i);
            assert_eq!(b.color, state.sequence[i]);
        }
    }

    #[test]
    fn test_first_correct_tap_awards_base_points() {
        let (mut state, mut rng) = playing(SequenceTuning::default(), 2);
        let events = state.tap(pos_of(&state, 0), 1000.0, &mut rng);
        assert_eq!(state.score, 100);
        assert_eq!(state.combo, 1);
        assert!(events.contains(&GameEvent::Scored { points: 100, total: 100 }));
        assert!(state.bubbles[0].popping);
    }

    #[test]
    fn test_combo_and_speed_multiply_points() {
        let (mut state, mut rng) = playing(SequenceTuning::default(), 3);
        state.tap(pos_of(&state, 0), 0.0, &mut rng);
        // 300ms later: full speed bonus, combo 1
        state.tap(pos_of(&state, 1), 300.0, &mut rng);
        assert_eq!(state.score, 100 + 300);
        assert_eq!(state.combo, 2);
    }

    #[test]
    fn test_slow_tap_gets_no_speed_bonus() {
        let (mut state, mut rng) = playing(SequenceTuning::default(), 4);
        state.tap(pos_of(&state, 0), 0.0, &mut rng);
        state.tap(pos_of(&state, 1), 5000.0, &mut rng);
        assert_eq!(state.score, 200);
    }

    #[test]
    fn test_speed_multiplier_curve() {
        assert_eq!(speed_multiplier(None, 100.0, 3.0), 1.0);
        assert_eq!(speed_multiplier(Some(0.0), 200.0, 3.0), 3.0);
        assert_eq!(speed_multiplier(Some(0.0), 500.0, 3.0), 3.0);
        assert!((speed_multiplier(Some(0.0), 750.0, 3.0) - 2.5).abs() < 1e-6);
        assert_eq!(speed_multiplier(Some(0.0), 1000.0, 3.0), 2.0);
        assert!((speed_multiplier(Some(0.0), 1500.0, 3.0) - 1.5).abs() < 1e-6);
        assert_eq!(speed_multiplier(Some(0.0), 2000.0, 3.0), 1.0);
        assert_eq!(speed_multiplier(Some(0.0), 9000.0, 3.0), 1.0);
    }

    #[test]
    fn test_one_second_gap_earns_double() {
        let (mut state, mut rng) = playing(SequenceTuning::default(), 14);
        state.tap(pos_of(&state, 0), 0.0, &mut rng);
        state.tap(pos_of(&state, 1), 1000.0, &mut rng);
        // 100 + 100 * combo 1 * speed 2
        assert_eq!(state.score, 300);
    }

    #[test]
    fn test_doubler_doubles_points() {
        let (mut state, mut rng) = playing(SequenceTuning::default(), 5);
        state.powerups.activate(PowerUpKind::ScoreDoubler, 0.0, 10_000.0);
        state.tap(pos_of(&state, 0), 10.0, &mut rng);
        assert_eq!(state.score, 200);
    }

    #[test]
    fn test_wrong_tap_resets_level() {
        let (mut state, mut rng) = playing(SequenceTuning::default(), 6);
        state.tap(pos_of(&state, 0), 0.0, &mut rng);
        let score = state.score;
        let old: Vec<Vec2> = state.bubbles.iter().map(|b| b.pos).collect();

        let events = state.tap(pos_of(&state, 2), 100.0, &mut rng);
        assert_eq!(events, vec![GameEvent::Mistake]);
        assert_eq!(state.combo, 0);
        assert!(state.progress.is_empty());
        assert_eq!(state.score, score);
        assert_eq!(state.level, 1);
        assert_eq!(state.bubbles.len(), 3);
        assert!(state.bubbles.iter().all(|b| !b.popping && b.scale == 1.0));
        let new: Vec<Vec2> = state.bubbles.iter().map(|b| b.pos).collect();
        assert_ne!(old, new);
    }

    #[test]
    fn test_double_tap_on_popping_bubble_is_mistake() {
        let (mut state, mut rng) = playing(SequenceTuning::default(), 7);
        let p = pos_of(&state, 0);
        state.tap(p, 0.0, &mut rng);
        let events = state.tap(p, 50.0, &mut rng);
        assert_eq!(events, vec![GameEvent::Mistake]);
        assert_eq!(state.combo, 0);
    }

    #[test]
    fn test_tap_on_empty_space_is_ignored() {
        let (mut state, mut rng) = playing(SequenceTuning::default(), 8);
        state.bubbles.iter_mut().for_each(|b| b.pos = Vec2::new(800.0, 800.0));
        let events = state.tap(Vec2::new(10.0, 10.0), 0.0, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.bubbles.len(), 3);
    }

    #[test]
    fn test_level_complete() {
        let tuning = SequenceTuning {
            powerup_chance: 1.0,
            ..SequenceTuning::default()
        };
        let (mut state, mut rng) = playing(tuning, 9);
        state.tap(pos_of(&state, 0), 0.0, &mut rng);
        state.tap(pos_of(&state, 1), 5000.0, &mut rng);
        let events = state.tap(pos_of(&state, 2), 10_000.0, &mut rng);

        assert!(events.contains(&GameEvent::LevelComplete { level: 2 }));
        assert!(events.iter().any(|e| matches!(e, GameEvent::PowerUpActivated(_))));
        assert_eq!(state.level, 2);
        assert_eq!(state.time_left, 50.0);
        assert_eq!(state.sequence.len(), 4);
        assert_eq!(state.bubbles.len(), 4);
        assert!(state.progress.is_empty());
        // combo carries across levels
        assert_eq!(state.combo, 3);
    }

    #[test]
    fn test_timer_runs_out_once() {
        let (mut state, _) = playing(SequenceTuning::default(), 10);
        state.time_left = 0.05;
        let mut overs = 0;
        for i in 0..10 {
            let events = state.step(1.0 / 60.0, i as f64 * 16.0);
            overs += events
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver(GameOverCause::TimeUp)))
                .count();
        }
        assert_eq!(overs, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.time_left, 0.0);
    }

    #[test]
    fn test_time_freeze_stops_timer_until_expiry() {
        let (mut state, _) = playing(SequenceTuning::default(), 11);
        state.powerups.activate(PowerUpKind::TimeFreeze, 0.0, 5000.0);
        state.step(1.0, 1000.0);
        assert_eq!(state.time_left, 60.0);

        let events = state.step(1.0, 5000.0);
        assert!(events.contains(&GameEvent::PowerUpExpired(PowerUpKind::TimeFreeze)));
        assert_eq!(state.time_left, 59.0);
    }

    #[test]
    fn test_popping_bubble_shrinks_to_zero() {
        let (mut state, mut rng) = playing(SequenceTuning::default(), 12);
        state.tap(pos_of(&state, 0), 0.0, &mut rng);
        for i in 0..40 {
            state.step(1.0 / 60.0, i as f64);
        }
        assert_eq!(state.bubbles[0].scale, 0.0);
        assert!(!state.bubbles[0].is_visible());
        assert_eq!(state.bubbles[1].scale, 1.0);
        // A vanished bubble no longer catches taps
        let p = state.bubbles[0].pos;
        if state.bubbles[1..].iter().all(|b| !point_in_circle(p, b.pos, b.radius)) {
            assert!(state.bubble_at(p).is_none());
        }
    }

    #[test]
    fn test_scatter_keeps_spacing() {
        let (state, _) = playing(SequenceTuning::default(), 13);
        let r = state.bubble_radius();
        for (i, a) in state.bubbles.iter().enumerate() {
            for b in &state.bubbles[i + 1..] {
                assert!(a.pos.distance(b.pos) >= r * 2.5);
            }
        }
    }

    #[test]
    fn test_placement_fallback_is_grid() {
        let tuning = SequenceTuning {
            min_spacing: 10_000.0,
            ..SequenceTuning::default()
        };
        let (mut state, mut rng) = playing(tuning, 14);
        state.level = 8;
        state.generate_level(&mut rng);
        assert_eq!(state.bubbles.len(), 10);

        let expected = grid_layout(10, &state.viewport);
        let actual: Vec<Vec2> = state.bubbles.iter().map(|b| b.pos).collect();
        assert_eq!(actual, expected);
        for (i, a) in actual.iter().enumerate() {
            assert!(actual[i + 1..].iter().all(|b| b != a));
        }
    }

    #[test]
    fn test_classic_rules_use_ring() {
        let (state, _) = playing(SequenceTuning::classic(), 15);
        let center = state.viewport.center();
        let ring = state.viewport.base_unit() * 6.0;
        assert_eq!(state.bubbles.len(), 3);
        for b in &state.bubbles {
            assert!((b.pos.distance(center) - ring).abs() < 1e-3);
            assert!(b.color < 5);
        }
    }

    #[test]
    fn test_classic_rules_have_no_speed_bonus() {
        let (mut state, mut rng) = playing(SequenceTuning::classic(), 16);
        state.tap(pos_of(&state, 0), 0.0, &mut rng);
        state.tap(pos_of(&state, 1), 100.0, &mut rng);
        assert_eq!(state.score, 200);
    }

    #[test]
    fn test_taps_ignored_when_not_playing() {
        let mut rng = Pcg32::seed_from_u64(17);
        let mut state = SequenceState::new(Viewport::new(900.0, 900.0), SequenceTuning::default());
        assert!(state.tap(Vec2::new(1.0, 1.0), 0.0, &mut rng).is_empty());
        assert!(state.step(1.0, 0.0).is_empty());
        assert_eq!(state.time_left, 60.0);
    }
}

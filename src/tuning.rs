//! Data-driven game balance
//!
//! Lengths are expressed in base units (see `platform::Viewport`) and rates
//! per simulation step, so the defaults scale with the screen.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Balance values for Bubble Jump
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpTuning {
    /// Player radius (base units)
    pub player_radius: f32,
    /// Horizontal speed while a direction key is held (base units per step)
    pub player_speed: f32,
    /// Vertical velocity applied on jump (base units per step, negative is up)
    pub jump_impulse: f32,
    /// Downward acceleration (base units per step²)
    pub gravity: f32,
    pub star_count: usize,
    pub star_radius: f32,
    /// Star rise speed is `star_speed_min + U * star_speed_spread`
    pub star_speed_min: f32,
    pub star_speed_spread: f32,
    /// Star rotation speed in radians per step, `min + U * spread`
    pub star_spin_min: f32,
    pub star_spin_spread: f32,
    pub star_points: u64,
    pub drift_bubble_count: usize,
    pub drift_radius_min: f32,
    pub drift_radius_spread: f32,
    pub drift_speed_min: f32,
    pub drift_speed_spread: f32,
    /// Upward swipe distance that counts as a jump (base units)
    pub swipe_threshold: f32,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            player_radius: 1.0,
            player_speed: 0.25,
            jump_impulse: -0.6,
            gravity: 0.025,
            star_count: 5,
            star_radius: 0.75,
            star_speed_min: 0.1,
            star_speed_spread: 0.05,
            star_spin_min: 0.02,
            star_spin_spread: 0.02,
            star_points: 100,
            drift_bubble_count: 15,
            drift_radius_min: 0.5,
            drift_radius_spread: 1.5,
            drift_speed_min: 0.025,
            drift_speed_spread: 0.025,
            swipe_threshold: 2.0,
        }
    }
}

/// How the sequence length grows with the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SequenceGrowth {
    /// One extra bubble every level
    PerLevel,
    /// One extra bubble every second level
    EveryOtherLevel,
}

impl SequenceGrowth {
    pub fn extra_for_level(&self, level: u32) -> usize {
        match self {
            SequenceGrowth::PerLevel => level.saturating_sub(1) as usize,
            SequenceGrowth::EveryOtherLevel => (level / 2) as usize,
        }
    }
}

/// Bubble placement strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BubbleLayout {
    /// Rejection-sampled random positions with a grid fallback
    Scatter,
    /// Evenly spaced on a ring around the canvas centre
    Ring,
}

/// Balance values for Bubble Sequence
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SequenceTuning {
    pub base_length: usize,
    pub growth: SequenceGrowth,
    /// Upper bound on sequence length (also bounded by the palette size for `Ring`)
    pub max_length: usize,
    /// Number of palette colours to draw from
    pub palette_size: usize,
    pub layout: BubbleLayout,
    /// Bubble radius (base units)
    pub bubble_radius: f32,
    /// Ring radius for `BubbleLayout::Ring` (base units)
    pub ring_radius: f32,
    /// Minimum centre distance between scattered bubbles, in bubble radii
    pub min_spacing: f32,
    pub max_placement_attempts: u32,
    pub base_points: u64,
    /// Whether quick consecutive taps multiply points
    pub speed_bonus: bool,
    pub max_speed_multiplier: f32,
    /// Timer at level 1 and the amount it shrinks per level (seconds)
    pub start_time: f32,
    pub time_decay_per_level: f32,
    pub min_time: f32,
    pub powerup_chance: f64,
    pub time_freeze_ms: f64,
    pub score_doubler_ms: f64,
    /// Per-step scale factor for popping bubbles
    pub pop_shrink: f32,
}

impl Default for SequenceTuning {
    fn default() -> Self {
        Self {
            base_length: 3,
            growth: SequenceGrowth::PerLevel,
            max_length: 20,
            palette_size: 20,
            layout: BubbleLayout::Scatter,
            bubble_radius: 2.0,
            ring_radius: 6.0,
            min_spacing: 2.5,
            max_placement_attempts: 100,
            base_points: 100,
            speed_bonus: true,
            max_speed_multiplier: 3.0,
            start_time: 60.0,
            time_decay_per_level: 5.0,
            min_time: 30.0,
            powerup_chance: 0.3,
            time_freeze_ms: 5000.0,
            score_doubler_ms: 10000.0,
            pop_shrink: 0.9,
        }
    }
}

impl SequenceTuning {
    /// The earlier, simpler rules: five colours on a ring, slow growth, no speed bonus
    pub fn classic() -> Self {
        Self {
            growth: SequenceGrowth::EveryOtherLevel,
            max_length: 5,
            palette_size: 5,
            layout: BubbleLayout::Ring,
            speed_bonus: false,
            ..Self::default()
        }
    }

    /// Sequence length for a level
    pub fn sequence_length(&self, level: u32) -> usize {
        (self.base_length + self.growth.extra_for_level(level)).min(self.max_length)
    }

    /// Seconds on the clock when `level` begins after a level-up
    pub fn time_budget(&self, level: u32) -> f32 {
        (self.start_time - level as f32 * self.time_decay_per_level).max(self.min_time)
    }

    /// Copy with the fields present in `json` replaced
    pub fn with_overrides(&self, json: &str) -> Option<Self> {
        apply_overrides(self, json, "sequence")
    }
}

impl JumpTuning {
    /// Copy with the fields present in `json` replaced
    pub fn with_overrides(&self, json: &str) -> Option<Self> {
        apply_overrides(self, json, "jump")
    }
}

/// Merge a JSON object over `base`. Fields missing from `json` keep the
/// base value, so overrides stack on `classic()` as well as on the defaults.
fn apply_overrides<T: Serialize + DeserializeOwned>(base: &T, json: &str, what: &str) -> Option<T> {
    let patch = match serde_json::from_str::<Value>(json) {
        Ok(Value::Object(patch)) => patch,
        Ok(_) => {
            log::warn!("Ignoring {} tuning: expected a JSON object", what);
            return None;
        }
        Err(e) => {
            log::warn!("Ignoring invalid {} tuning: {}", what, e);
            return None;
        }
    };

    let mut merged = match serde_json::to_value(base) {
        Ok(Value::Object(fields)) => fields,
        _ => return None,
    };
    merged.extend(patch);

    match serde_json::from_value(Value::Object(merged)) {
        Ok(tuning) => Some(tuning),
        Err(e) => {
            log::warn!("Ignoring invalid {} tuning: {}", what, e);
            None
        }
    }
}

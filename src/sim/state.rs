//! Types shared by both games

use serde::{Deserialize, Serialize};

use super::powerup::PowerUpKind;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing started yet
    #[default]
    Idle,
    /// Active gameplay
    Playing,
    /// Session ended; only a restart leaves this phase
    GameOver,
}

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// Player fell below the bottom edge
    Fell,
    /// Level timer ran out
    TimeUp,
}

/// Something noteworthy that happened during a step or tap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Points were added; `total` is the running score afterwards
    Scored { points: u64, total: u64 },
    StarCollected,
    /// Correct tap on the bubble with this sequence index
    BubblePopped { index: usize, speed_multiplier: f32 },
    /// Wrong tap; the level was regenerated
    Mistake,
    /// Reached a new level
    LevelComplete { level: u32 },
    PowerUpActivated(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    GameOver(GameOverCause),
}

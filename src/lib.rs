//! Bubble Arcade - two small canvas arcade games
//!
//! Core modules:
//! - `sim`: Simulation for both games (entities, physics, sequence rules)
//! - `renderer`: Scene building (pure) and the Canvas 2D executor
//! - `platform`: Viewport scaling and input translation
//! - `persistence`: Key/value score storage (LocalStorage on web)
//! - `tuning`: Data-driven game balance
//! - `app`: Frame loop driver that owns a running session

pub mod app;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use app::{App, Variant};
pub use highscores::HighScore;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep; all per-step tuning assumes 60 Hz
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame gap consumed at once (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Viewport's shorter side divided by this gives the base unit
    pub const BASE_UNIT_DIVISOR: f32 = 30.0;
}

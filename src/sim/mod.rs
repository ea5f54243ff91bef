//! Simulation module
//!
//! All gameplay logic lives here. This module must stay platform-free:
//! - Fixed timestep only (the driver feeds `SIM_DT` steps)
//! - Randomness only through an injected `Rng`
//! - Time only through the session clock passed in by the driver
//! - No rendering or platform dependencies

pub mod geometry;
pub mod jump;
pub mod powerup;
pub mod sequence;
pub mod state;

pub use geometry::{circles_overlap, is_clear_of, point_in_circle};
pub use jump::{DriftBubble, DriftColor, JumpInput, JumpState, Player, Star};
pub use powerup::{PowerUpKind, PowerUps};
pub use sequence::{
    PALETTE, SequenceBubble, SequenceState, grid_layout, ring_layout, scatter_layout,
    speed_multiplier,
};
pub use state::{GameEvent, GameOverCause, GamePhase};

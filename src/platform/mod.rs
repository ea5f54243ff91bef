//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Viewport size and the responsive base unit
//! - Input events (keys, touch gestures, client-to-canvas coordinates)
//! - Storage (LocalStorage on web, see `persistence`)

pub mod input;
pub mod viewport;

pub use input::{Key, SwipeTracker, TouchUpdate};
pub use viewport::Viewport;

//! Rendering module
//!
//! Scenes are built as plain draw-command lists (`scene`) and replayed on a
//! Canvas 2D context (`canvas`, wasm only).

pub mod draw;
pub mod scene;
pub mod shapes;

#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use draw::{DrawCmd, Glow, TextAlign, TextBaseline};
pub use scene::{FrameInfo, jump_scene, sequence_scene};

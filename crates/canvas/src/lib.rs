//! Headless workflow canvas for Flowboard.
//!
//! [`Canvas`] owns the open [`Project`](node::Project) and the interaction
//! state layered over it: selection, the pending connection, node dragging and
//! palette visibility. Hosts feed it pointer and keyboard input and subscribe
//! to [`CanvasEvent`]s; [`svg`] renders the current state.

mod canvas;
pub mod config;
pub mod interaction;
pub mod keymap;
pub mod svg;
mod viewport;

pub use canvas::{Canvas, CanvasEvent};
pub use config::CanvasConfig;
pub use interaction::{DragState, Gesture};
pub use keymap::{EditorAction, Keystroke, Modifiers};
// Re-export coordinate types from node for convenience
pub use node::{CanvasDelta, CanvasPoint, CanvasSize, ScreenPoint};
pub use viewport::Viewport;

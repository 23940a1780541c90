//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timestamps (requestAnimationFrame vs. a native clock)
//! - Keyboard state

pub mod input;
pub mod time;

pub use input::KeyState;
pub use time::{FixedFrames, FrameSource};
#[cfg(not(target_arch = "wasm32"))]
pub use time::RealtimeFrames;

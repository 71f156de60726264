//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (wall clock for the victory time)
//! - Input (keys and joystick collapsed into one direction)
//! - Storage (LocalStorage on web, in-memory elsewhere)

pub mod input;
pub mod storage;

pub use input::{InputState, KeyboardState};
pub use storage::{MemoryStorage, Storage};

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;

/// Wall clock in milliseconds since the Unix epoch
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

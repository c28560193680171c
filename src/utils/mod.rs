//! Utility Module
//!
//! - [`OrbitControls`]: damped orbit camera controller
//! - [`time::Timer`]: per-frame delta clock

pub mod orbit_control;
pub mod time;

pub use orbit_control::OrbitControls;
pub use time::Timer;

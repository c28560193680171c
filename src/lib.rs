#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_arguments)]

pub mod animation;
pub mod app;
pub mod assets;
pub mod errors;
pub mod render;
pub mod scene;
pub mod settings;
pub mod utils;

pub use animation::{AnimationAction, AnimationClip, AnimationMixer, LoopMode};
pub use app::{App, Stage};
pub use assets::SceneFragment;
pub use errors::ViewerError;
pub use scene::{Camera, Node, Scene, ShadowFlags};
pub use settings::ViewerSettings;
pub use utils::orbit_control::OrbitControls;

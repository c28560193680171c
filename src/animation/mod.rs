//! Animation System
//!
//! Keyframe tracks sampled through a sequential-access cursor, clips that
//! group tracks by target node, actions that add playback state (time,
//! loop mode, blend weight, fades), and a mixer that owns the clip
//! registry, the crossfade selector, and the per-frame weighted blend.

mod values;

pub mod action;
pub mod binding;
pub mod clip;
pub mod mixer;
pub mod tracks;

pub use action::{AnimationAction, LoopMode};
pub use binding::{PropertyBinding, TargetPath, bind_clip};
pub use clip::{AnimationClip, Track, TrackData, TrackMeta};
pub use mixer::{AnimationMixer, CROSSFADE_SECONDS};
pub use tracks::{InterpolationMode, KeyframeCursor, KeyframeTrack};
pub use values::Interpolatable;

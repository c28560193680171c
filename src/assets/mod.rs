//! Asset Loading
//!
//! Parses glTF files into renderer-independent [`SceneFragment`]s on
//! background threads and delivers the results to the frame loop over a
//! channel.

pub mod gltf;
pub mod task;

pub use gltf::load_gltf;
pub use task::{AssetSlot, LoadEvent, spawn_loads};

use glam::{Affine3A, Quat, Vec3};

use crate::animation::AnimationClip;
use crate::scene::Mesh;

/// One node of a parsed fragment. Indices refer to the fragment's own
/// `nodes`, `meshes` and `skins` vectors; the scene resolves them to
/// handles when the fragment is instantiated.
#[derive(Debug, Clone)]
pub struct FragmentNode {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub parent: Option<usize>,
    pub mesh: Option<usize>,
    pub skin: Option<usize>,
}

/// Skin definition local to a fragment.
#[derive(Debug, Clone)]
pub struct FragmentSkin {
    pub name: String,
    pub joints: Vec<usize>,
    pub inverse_bind_matrices: Vec<Affine3A>,
}

/// The hierarchical result of parsing one asset file: nodes, mesh data,
/// skins and any animation clips the file carries.
///
/// Fragments hold no GPU or scene state, so they can be produced on a
/// loader thread and instantiated into a scene any number of times.
#[derive(Debug, Clone, Default)]
pub struct SceneFragment {
    pub nodes: Vec<FragmentNode>,
    pub meshes: Vec<Mesh>,
    pub skins: Vec<FragmentSkin>,
    pub clips: Vec<AnimationClip>,
}

impl SceneFragment {
    #[must_use]
    pub fn has_animations(&self) -> bool {
        !self.clips.is_empty()
    }
}

//! Scene Graph
//!
//! Arena-backed node hierarchy plus the component data the viewer needs:
//! meshes, skeletons, a perspective camera and the fixed light rig.

pub mod camera;
pub mod light;
pub mod mesh;
pub mod node;
#[allow(clippy::module_inception)]
pub mod scene;
pub mod skeleton;
pub mod transform;
pub mod transform_system;

pub use camera::Camera;
pub use light::{AmbientLight, DirectionalLight, ShadowConfig};
pub use mesh::{ImageData, Material, Mesh};
pub use node::Node;
pub use scene::{Scene, ShadowFlags};
pub use skeleton::Skeleton;
pub use transform::Transform;

slotmap::new_key_type! {
    /// Handle to a [`Node`] in the scene arena.
    pub struct NodeHandle;
    /// Handle to a [`Mesh`] in the scene mesh pool.
    pub struct MeshKey;
    /// Handle to a [`Skeleton`] in the scene skeleton pool.
    pub struct SkeletonKey;
}

use crate::scene::transform::Transform;
use crate::scene::{MeshKey, NodeHandle, SkeletonKey};
use glam::Affine3A;

/// A scene node: hierarchy, transform, and the components the viewer
/// attaches (mesh, skin, shadow flags).
///
/// Nodes form a tree through parent/child handles. Animation tracks target
/// nodes by `name`, which is why names are kept on the node itself.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: String,

    pub(crate) parent: Option<NodeHandle>,
    pub(crate) children: Vec<NodeHandle>,

    pub transform: Transform,
    pub visible: bool,

    pub mesh: Option<MeshKey>,
    pub skin: Option<SkeletonKey>,

    /// This node's mesh is rendered into the shadow map.
    pub cast_shadow: bool,
    /// This node's mesh samples the shadow map when shaded.
    pub receive_shadow: bool,
}

impl Node {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Transform::new(),
            visible: true,
            mesh: None,
            skin: None,
            cast_shadow: false,
            receive_shadow: false,
        }
    }

    #[inline]
    #[must_use]
    pub fn parent(&self) -> Option<NodeHandle> {
        self.parent
    }

    #[inline]
    #[must_use]
    pub fn children(&self) -> &[NodeHandle] {
        &self.children
    }

    /// World transformation matrix, updated by the hierarchy pass each frame.
    #[inline]
    #[must_use]
    pub fn world_matrix(&self) -> &Affine3A {
        &self.transform.world_matrix
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new("Node")
    }
}

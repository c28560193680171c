use glam::{Affine3A, Mat4};
use slotmap::SlotMap;

use crate::scene::node::Node;
use crate::scene::NodeHandle;

/// Ordered joint list plus inverse bind matrices for one skinned mesh.
///
/// `joints[i]` corresponds to joint index `i` in the mesh's vertex joint
/// attributes and to `joint_matrices[i]` in the shader.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub name: String,
    pub joints: Vec<NodeHandle>,
    pub(crate) inverse_bind_matrices: Vec<Affine3A>,

    /// Recomputed every frame, uploaded to the GPU joint buffer.
    pub(crate) joint_matrices: Vec<Mat4>,
}

impl Skeleton {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        joints: Vec<NodeHandle>,
        inverse_bind_matrices: Vec<Affine3A>,
    ) -> Self {
        let count = joints.len();
        Self {
            name: name.into(),
            joints,
            inverse_bind_matrices,
            joint_matrices: vec![Mat4::IDENTITY; count],
        }
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    #[inline]
    #[must_use]
    pub fn joint_matrices(&self) -> &[Mat4] {
        &self.joint_matrices
    }

    /// Recomputes the joint matrix array from the current pose.
    ///
    /// `root_matrix_inv` is the inverse world matrix of the node carrying
    /// the skinned mesh; it cancels the mesh's own transform so vertices
    /// end up in mesh-local space.
    pub fn compute_joint_matrices(
        &mut self,
        nodes: &SlotMap<NodeHandle, Node>,
        root_matrix_inv: Affine3A,
    ) {
        for (i, &joint_handle) in self.joints.iter().enumerate() {
            let Some(joint_node) = nodes.get(joint_handle) else {
                continue;
            };
            let joint_world = joint_node.transform.world_matrix;
            let ibm = self.inverse_bind_matrices[i];

            self.joint_matrices[i] = (root_matrix_inv * joint_world * ibm).into();
        }
    }
}

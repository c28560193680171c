use glam::Vec3;
use slotmap::SlotMap;

use crate::assets::SceneFragment;
use crate::scene::light::{AmbientLight, DirectionalLight};
use crate::scene::mesh::Mesh;
use crate::scene::node::Node;
use crate::scene::skeleton::Skeleton;
use crate::scene::transform_system;
use crate::scene::{MeshKey, NodeHandle, SkeletonKey};

/// Shadow participation applied to every mesh node of an instantiated
/// fragment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShadowFlags {
    pub cast: bool,
    pub receive: bool,
}

impl ShadowFlags {
    /// Environment policy: receive shadows only.
    #[must_use]
    pub fn receive() -> Self {
        Self {
            cast: false,
            receive: true,
        }
    }

    /// Character policy: cast shadows only.
    #[must_use]
    pub fn cast() -> Self {
        Self {
            cast: true,
            receive: false,
        }
    }
}

/// The scene graph: node arena, component pools, and the fixed light rig.
///
/// Scene is pure data; the renderer reads it, the animation mixer and the
/// transform system write it. All mutation happens on the main thread.
pub struct Scene {
    pub nodes: SlotMap<NodeHandle, Node>,
    pub root_nodes: Vec<NodeHandle>,

    pub meshes: SlotMap<MeshKey, Mesh>,
    pub skeletons: SlotMap<SkeletonKey, Skeleton>,

    pub ambient: AmbientLight,
    pub sun: DirectionalLight,
    /// Clear color, linear RGB.
    pub background: Vec3,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
            root_nodes: Vec::new(),
            meshes: SlotMap::with_key(),
            skeletons: SlotMap::with_key(),
            ambient: AmbientLight::default(),
            sun: DirectionalLight::default(),
            // Sky blue (0x87CEEB).
            background: Vec3::new(0.529, 0.808, 0.922),
        }
    }

    /// Adds a node at the scene root.
    pub fn add_node(&mut self, node: Node) -> NodeHandle {
        let handle = self.nodes.insert(node);
        self.root_nodes.push(handle);
        handle
    }

    /// Makes `child` a child of `parent`, keeping both sides in sync.
    pub fn attach(&mut self, child: NodeHandle, parent: NodeHandle) {
        if let Some(p) = self.nodes.get_mut(parent) {
            p.children.push(child);
        }
        if let Some(c) = self.nodes.get_mut(child) {
            c.parent = Some(parent);
        }
    }

    #[inline]
    #[must_use]
    pub fn get_node(&self, handle: NodeHandle) -> Option<&Node> {
        self.nodes.get(handle)
    }

    #[inline]
    pub fn get_node_mut(&mut self, handle: NodeHandle) -> Option<&mut Node> {
        self.nodes.get_mut(handle)
    }

    /// Depth-first search for a node by name in the subtree under `root`.
    #[must_use]
    pub fn find_node_by_name(&self, root: NodeHandle, name: &str) -> Option<NodeHandle> {
        let node = self.nodes.get(root)?;
        if node.name == name {
            return Some(root);
        }
        for &child in &node.children {
            if let Some(found) = self.find_node_by_name(child, name) {
                return Some(found);
            }
        }
        None
    }

    /// Attaches a loaded fragment under a new root node with the given
    /// placement, applying `shadow` flags to every mesh node it contains.
    ///
    /// Returns the handle of the new root.
    pub fn instantiate(
        &mut self,
        fragment: &SceneFragment,
        name: &str,
        position: Vec3,
        scale: Vec3,
        shadow: ShadowFlags,
    ) -> NodeHandle {
        let mut root = Node::new(name);
        root.transform.position = position;
        root.transform.scale = scale;
        let root_handle = self.add_node(root);

        let mesh_keys: Vec<MeshKey> = fragment
            .meshes
            .iter()
            .map(|m| self.meshes.insert(m.clone()))
            .collect();

        // Pass 1: create all nodes.
        let mut handles = Vec::with_capacity(fragment.nodes.len());
        for fnode in &fragment.nodes {
            let mut node = Node::new(fnode.name.clone());
            node.transform.position = fnode.translation;
            node.transform.rotation = fnode.rotation;
            node.transform.scale = fnode.scale;
            if let Some(mesh_index) = fnode.mesh {
                node.mesh = Some(mesh_keys[mesh_index]);
                node.cast_shadow = shadow.cast;
                node.receive_shadow = shadow.receive;
            }
            handles.push(self.nodes.insert(node));
        }

        // Pass 2: hierarchy. Parentless fragment nodes hang off the new root
        // so every node (joints included) gets world matrix updates.
        for (i, fnode) in fragment.nodes.iter().enumerate() {
            match fnode.parent {
                Some(parent_index) => self.attach(handles[i], handles[parent_index]),
                None => self.attach(handles[i], root_handle),
            }
        }

        // Pass 3: skeletons, now that all joint nodes exist.
        for (skin_index, fskin) in fragment.skins.iter().enumerate() {
            let joints = fskin.joints.iter().map(|&j| handles[j]).collect();
            let skeleton = Skeleton::new(
                fskin.name.clone(),
                joints,
                fskin.inverse_bind_matrices.clone(),
            );
            let key = self.skeletons.insert(skeleton);

            for (fnode, &handle) in fragment.nodes.iter().zip(&handles) {
                if fnode.skin == Some(skin_index) {
                    if let Some(node) = self.nodes.get_mut(handle) {
                        node.skin = Some(key);
                    }
                }
            }
        }

        root_handle
    }

    /// Recomputes world matrices for the whole scene.
    pub fn update_world_transforms(&mut self) {
        let roots = std::mem::take(&mut self.root_nodes);
        transform_system::update_hierarchy(&mut self.nodes, &roots);
        self.root_nodes = roots;
    }

    /// Recomputes joint matrices for every skinned node from the current
    /// pose. Must run after [`Scene::update_world_transforms`].
    pub fn update_skeletons(&mut self) {
        let skinned: Vec<(NodeHandle, SkeletonKey)> = self
            .nodes
            .iter()
            .filter_map(|(handle, node)| node.skin.map(|skin| (handle, skin)))
            .collect();

        for (handle, skin_key) in skinned {
            let root_inv = self.nodes[handle].transform.world_matrix.inverse();
            if let Some(skeleton) = self.skeletons.get_mut(skin_key) {
                skeleton.compute_joint_matrices(&self.nodes, root_inv);
            }
        }
    }
}

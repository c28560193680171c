//! Hierarchical transform update.
//!
//! Walks the node tree once per frame, recomputing local matrices where
//! TRS fields changed and propagating world matrices down the tree.

use glam::Affine3A;
use slotmap::SlotMap;

use crate::scene::node::Node;
use crate::scene::NodeHandle;

/// Updates world matrices for all nodes reachable from `roots`.
pub fn update_hierarchy(nodes: &mut SlotMap<NodeHandle, Node>, roots: &[NodeHandle]) {
    // (node, parent world matrix, parent changed this frame)
    let mut stack: Vec<(NodeHandle, Affine3A, bool)> = roots
        .iter()
        .map(|&h| (h, Affine3A::IDENTITY, false))
        .collect();

    while let Some((handle, parent_world, parent_changed)) = stack.pop() {
        let Some(node) = nodes.get_mut(handle) else {
            continue;
        };

        let local_changed = node.transform.update_local_matrix();
        let changed = local_changed || parent_changed;

        if changed {
            let world = parent_world * *node.transform.local_matrix();
            node.transform.set_world_matrix(world);
        }

        let world = *node.transform.world_matrix();
        for &child in &node.children {
            stack.push((child, world, changed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn child_world_position_includes_parent_offset() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let mut parent = Node::new("parent");
        parent.transform.position = Vec3::new(1.0, 0.0, 0.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::new("child");
        child.transform.position = Vec3::new(0.0, 1.0, 0.0);
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);

        nodes
            .get_mut(parent_handle)
            .unwrap()
            .children
            .push(child_handle);

        let roots = vec![parent_handle];
        update_hierarchy(&mut nodes, &roots);

        let child_world_pos = nodes[child_handle].transform.world_matrix.translation;
        assert!((child_world_pos.x - 1.0).abs() < 1e-5);
        assert!((child_world_pos.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn scale_propagates_to_children() {
        let mut nodes: SlotMap<NodeHandle, Node> = SlotMap::with_key();

        let mut parent = Node::new("parent");
        parent.transform.scale = Vec3::splat(2.0);
        let parent_handle = nodes.insert(parent);

        let mut child = Node::new("child");
        child.transform.position = Vec3::new(1.0, 0.0, 0.0);
        child.parent = Some(parent_handle);
        let child_handle = nodes.insert(child);

        nodes
            .get_mut(parent_handle)
            .unwrap()
            .children
            .push(child_handle);

        update_hierarchy(&mut nodes, &[parent_handle]);

        let child_world_pos = nodes[child_handle].transform.world_matrix.translation;
        assert!((child_world_pos.x - 2.0).abs() < 1e-5, "{child_world_pos}");
    }
}

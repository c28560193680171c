use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

/// Target property for animation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetPath {
    /// Maps to `transform.position`
    Translation,
    /// Maps to `transform.rotation`
    Rotation,
    /// Maps to `transform.scale`
    Scale,
}

/// Maps track `track_index` of a clip to the target property of a concrete
/// scene node.
#[derive(Debug, Clone)]
pub struct PropertyBinding {
    pub track_index: usize,
    pub node: NodeHandle,
    pub target: TargetPath,
}

/// Resolves a clip's tracks against the scene subtree under `root`.
///
/// Tracks whose node name is not found simply produce no binding; the
/// track is ignored at playback.
#[must_use]
pub fn bind_clip(scene: &Scene, root: NodeHandle, clip: &AnimationClip) -> Vec<PropertyBinding> {
    let mut bindings = Vec::with_capacity(clip.tracks.len());

    for (track_index, track) in clip.tracks.iter().enumerate() {
        if let Some(node) = scene.find_node_by_name(root, &track.meta.node_name) {
            bindings.push(PropertyBinding {
                track_index,
                node,
                target: track.meta.target,
            });
        }
    }

    bindings
}

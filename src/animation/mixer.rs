use std::sync::Arc;

use glam::{Quat, Vec3};
use rustc_hash::FxHashMap;

use crate::animation::action::{AnimationAction, LoopMode, TrackValue};
use crate::animation::binding::{PropertyBinding, TargetPath};
use crate::animation::clip::AnimationClip;
use crate::scene::{NodeHandle, Scene};

/// Crossfade duration used by clip selection, in seconds.
pub const CROSSFADE_SECONDS: f32 = 0.2;

/// Actions contributing less than this are skipped during blending.
const WEIGHT_EPSILON: f32 = 1e-4;

/// Weight accumulator for one (node, property) pair. Blending is a
/// progressive weighted average: each contribution lerps/slerps toward the
/// new sample by `w / (w_total + w)`.
enum BlendAccum {
    Vector(Vec3, f32),
    Rotation(Quat, f32),
}

/// Owns all animation actions for one character.
///
/// Combines the clip registry (name → action, populated exactly once after
/// the character loads), the selector that crossfades between clips, and
/// the per-frame update that advances and blends all active actions into
/// the scene.
pub struct AnimationMixer {
    actions: Vec<AnimationAction>,
    registry: FxHashMap<String, usize>,
    current: Option<usize>,
}

impl Default for AnimationMixer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationMixer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            registry: FxHashMap::default(),
            current: None,
        }
    }

    /// Registers a clip under its name. Clips whose name contains "jump"
    /// (case-insensitive) play once and hold their final pose; everything
    /// else repeats. Duplicate names are rejected with a warning.
    pub fn register_clip(&mut self, clip: Arc<AnimationClip>, bindings: Vec<PropertyBinding>) {
        if self.registry.contains_key(&clip.name) {
            log::warn!("duplicate animation clip name {:?}, ignoring", clip.name);
            return;
        }

        let mut action = AnimationAction::new(clip.clone());
        if clip.name.to_lowercase().contains("jump") {
            action.loop_mode = LoopMode::Once;
        }
        action.bindings = bindings;
        action.stop();

        self.registry.insert(clip.name.clone(), self.actions.len());
        self.actions.push(action);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    #[must_use]
    pub fn actions(&self) -> &[AnimationAction] {
        &self.actions
    }

    /// Looks up an action by clip name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&AnimationAction> {
        self.registry.get(name).map(|&i| &self.actions[i])
    }

    /// Name of the currently selected clip, if any.
    #[must_use]
    pub fn current_clip_name(&self) -> Option<&str> {
        self.current.map(|i| self.actions[i].clip().name.as_str())
    }

    /// Starts the default clip at full weight. Falls back to the first
    /// registered clip when `name` is absent, warning about the miss;
    /// warns and does nothing when no clips exist at all.
    pub fn play_default(&mut self, name: &str) {
        let index = if let Some(&i) = self.registry.get(name) {
            i
        } else if !self.actions.is_empty() {
            log::warn!(
                "default animation {:?} not found, playing first available: {:?}",
                name,
                self.actions[0].clip().name
            );
            0
        } else {
            log::warn!("no animation clips found to play");
            return;
        };

        let action = &mut self.actions[index];
        action.reset();
        action.set_weight(1.0);
        self.current = Some(index);
        log::info!("playing animation {:?}", self.actions[index].clip().name);
    }

    /// The clip selector: crossfades playback to `name`.
    ///
    /// Unknown names are a silent no-op (requests may arrive before assets
    /// finish loading), and re-selecting the current clip changes nothing.
    /// Otherwise the current clip fades out over [`CROSSFADE_SECONDS`]
    /// without a hard stop, and `name` restarts from the beginning, fading
    /// in over the same window. Never returns an error.
    pub fn crossfade_to(&mut self, name: &str) {
        let Some(&next) = self.registry.get(name) else {
            return;
        };
        if self.current == Some(next) {
            return;
        }

        if let Some(current) = self.current {
            self.actions[current].fade_out(CROSSFADE_SECONDS);
        }

        let action = &mut self.actions[next];
        action.reset();
        action.time_scale = 1.0;
        action.fade_in(CROSSFADE_SECONDS);
        self.current = Some(next);
    }

    /// Advances all actions by `dt` and writes the weight-blended pose
    /// into the scene.
    pub fn update(&mut self, dt: f32, scene: &mut Scene) {
        for action in &mut self.actions {
            action.update(dt);
        }

        let mut accum: FxHashMap<(NodeHandle, TargetPath), BlendAccum> = FxHashMap::default();

        for action_index in 0..self.actions.len() {
            // A paused-but-enabled action (clamped one-shot) still holds
            // its final pose, so only weight and enabled gate contribution.
            let weight = self.actions[action_index].weight();
            if !self.actions[action_index].enabled || weight < WEIGHT_EPSILON {
                continue;
            }

            for binding_index in 0..self.actions[action_index].bindings.len() {
                let (node, target, track_index) = {
                    let binding = &self.actions[action_index].bindings[binding_index];
                    (binding.node, binding.target, binding.track_index)
                };

                let Some(value) = self.actions[action_index].sample_track(track_index) else {
                    continue;
                };

                match (accum.entry((node, target)), value) {
                    (entry, TrackValue::Vector3(sample)) => {
                        let acc = entry.or_insert(BlendAccum::Vector(sample, 0.0));
                        if let BlendAccum::Vector(value, total) = acc {
                            let t = weight / (*total + weight);
                            *value = value.lerp(sample, t);
                            *total += weight;
                        }
                    }
                    (entry, TrackValue::Quaternion(sample)) => {
                        let acc = entry.or_insert(BlendAccum::Rotation(sample, 0.0));
                        if let BlendAccum::Rotation(value, total) = acc {
                            let t = weight / (*total + weight);
                            *value = value.slerp(sample, t);
                            *total += weight;
                        }
                    }
                }
            }
        }

        for ((node_handle, target), acc) in accum {
            let Some(node) = scene.get_node_mut(node_handle) else {
                continue;
            };
            match (target, acc) {
                (TargetPath::Translation, BlendAccum::Vector(value, _)) => {
                    node.transform.position = value;
                }
                (TargetPath::Scale, BlendAccum::Vector(value, _)) => {
                    node.transform.scale = value;
                }
                (TargetPath::Rotation, BlendAccum::Rotation(value, _)) => {
                    node.transform.rotation = value;
                }
                _ => {}
            }
        }
    }
}

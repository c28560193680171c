use std::sync::Arc;

use glam::{Quat, Vec3};

use crate::animation::binding::PropertyBinding;
use crate::animation::clip::{AnimationClip, TrackData};
use crate::animation::tracks::KeyframeCursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Play once, clamp at the last frame and hold the pose.
    Once,
    /// Repeat indefinitely.
    Repeat,
}

/// A scheduled weight ramp. Fades advance in real time, independent of the
/// action's own time scale, so a clamped one-shot clip still fades out.
#[derive(Debug, Clone)]
struct Fade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

/// One playable animation clip bound to a character: playback time, loop
/// policy, blend weight and fade state.
///
/// Created once per clip when a character finishes loading and kept for
/// the process lifetime; the mixer owns all actions.
#[derive(Debug, Clone)]
pub struct AnimationAction {
    clip: Arc<AnimationClip>,

    pub time: f32,
    pub time_scale: f32,
    pub loop_mode: LoopMode,
    pub paused: bool,
    pub enabled: bool,

    weight: f32,
    fade: Option<Fade>,

    pub(crate) bindings: Vec<PropertyBinding>,
    track_cursors: Vec<KeyframeCursor>,
}

impl AnimationAction {
    #[must_use]
    pub fn new(clip: Arc<AnimationClip>) -> Self {
        let track_count = clip.tracks.len();
        Self {
            clip,
            time: 0.0,
            time_scale: 1.0,
            loop_mode: LoopMode::Repeat,
            paused: false,
            enabled: true,
            weight: 1.0,
            fade: None,
            bindings: Vec::new(),
            track_cursors: vec![KeyframeCursor::default(); track_count],
        }
    }

    #[must_use]
    pub fn clip(&self) -> &Arc<AnimationClip> {
        &self.clip
    }

    #[inline]
    #[must_use]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f32) {
        self.weight = weight;
    }

    #[inline]
    #[must_use]
    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    /// Fully weighted and settled: enabled at weight 1 with no fade running.
    #[must_use]
    pub fn is_fully_active(&self) -> bool {
        self.enabled && self.fade.is_none() && (self.weight - 1.0).abs() < 1e-6
    }

    /// Rewinds to the start and re-enables playback.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.paused = false;
        self.enabled = true;
        for cursor in &mut self.track_cursors {
            cursor.last_index = 0;
        }
    }

    /// Stops contributing: weight 0, no fade.
    pub fn stop(&mut self) {
        self.enabled = false;
        self.weight = 0.0;
        self.fade = None;
    }

    /// Ramps weight 0 → 1 over `duration` seconds and enables the action.
    pub fn fade_in(&mut self, duration: f32) {
        self.enabled = true;
        self.weight = 0.0;
        self.fade = Some(Fade {
            from: 0.0,
            to: 1.0,
            duration,
            elapsed: 0.0,
        });
    }

    /// Ramps the current weight → 0 over `duration` seconds. The action
    /// keeps playing while it fades (no hard stop) and is disabled once
    /// the fade completes.
    pub fn fade_out(&mut self, duration: f32) {
        self.fade = Some(Fade {
            from: self.weight,
            to: 0.0,
            duration,
            elapsed: 0.0,
        });
    }

    /// Advances fade state and playback time.
    pub fn update(&mut self, dt: f32) {
        if let Some(fade) = &mut self.fade {
            fade.elapsed += dt;
            if fade.elapsed >= fade.duration {
                self.weight = fade.to;
                let faded_out = fade.to <= 0.0;
                self.fade = None;
                if faded_out {
                    self.enabled = false;
                }
            } else {
                let t = fade.elapsed / fade.duration;
                self.weight = fade.from + (fade.to - fade.from) * t;
            }
        }

        if self.paused || !self.enabled {
            return;
        }

        let duration = self.clip.duration;
        if duration <= 0.0 {
            return;
        }

        self.time += dt * self.time_scale;

        match self.loop_mode {
            LoopMode::Once => {
                if self.time >= duration {
                    self.time = duration;
                    // Hold the last pose; the action stays enabled and
                    // keeps contributing its clamped sample.
                    self.paused = true;
                } else if self.time < 0.0 {
                    self.time = 0.0;
                    self.paused = true;
                }
            }
            LoopMode::Repeat => {
                if self.time >= duration {
                    self.time %= duration;
                } else if self.time < 0.0 {
                    self.time = duration + (self.time % duration);
                }
            }
        }
    }

    /// Samples the given track at the action's current time.
    pub fn sample_track(&mut self, track_index: usize) -> Option<TrackValue> {
        let track = self.clip.tracks.get(track_index)?;
        let cursor = self.track_cursors.get_mut(track_index)?;

        Some(match &track.data {
            TrackData::Vector3(t) => TrackValue::Vector3(t.sample_with_cursor(self.time, cursor)),
            TrackData::Quaternion(t) => {
                TrackValue::Quaternion(t.sample_with_cursor(self.time, cursor))
            }
        })
    }
}

pub enum TrackValue {
    Vector3(Vec3),
    Quaternion(Quat),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::clip::{Track, TrackMeta};
    use crate::animation::tracks::{InterpolationMode, KeyframeTrack};
    use crate::animation::TargetPath;

    fn simple_clip(duration: f32) -> Arc<AnimationClip> {
        Arc::new(AnimationClip::new(
            "clip".to_string(),
            vec![Track {
                meta: TrackMeta {
                    node_name: "node".to_string(),
                    target: TargetPath::Translation,
                },
                data: TrackData::Vector3(KeyframeTrack::new(
                    vec![0.0, duration],
                    vec![Vec3::ZERO, Vec3::X],
                    InterpolationMode::Linear,
                )),
            }],
        ))
    }

    #[test]
    fn fade_in_ramps_weight_to_one() {
        let mut action = AnimationAction::new(simple_clip(2.0));
        action.fade_in(0.2);
        assert!(action.weight() < 1e-6);

        action.update(0.1);
        assert!((action.weight() - 0.5).abs() < 1e-4, "{}", action.weight());

        action.update(0.1);
        assert!((action.weight() - 1.0).abs() < 1e-6);
        assert!(!action.is_fading());
        assert!(action.enabled);
    }

    #[test]
    fn fade_out_disables_when_complete() {
        let mut action = AnimationAction::new(simple_clip(2.0));
        action.set_weight(1.0);
        action.fade_out(0.2);

        action.update(0.1);
        assert!(action.enabled, "still fading, must keep playing");
        assert!((action.weight() - 0.5).abs() < 1e-4);

        action.update(0.15);
        assert!(!action.enabled, "fade-out completion stops the action");
        assert!(action.weight() < 1e-6);
    }

    #[test]
    fn once_clamps_and_holds() {
        let mut action = AnimationAction::new(simple_clip(2.0));
        action.loop_mode = LoopMode::Once;

        action.update(3.0);
        assert!((action.time - 2.0).abs() < 1e-6);
        assert!(action.paused);
        assert!(action.enabled, "held pose must keep contributing");
    }

    #[test]
    fn repeat_wraps_time() {
        let mut action = AnimationAction::new(simple_clip(2.0));
        action.loop_mode = LoopMode::Repeat;

        action.update(2.5);
        assert!((action.time - 0.5).abs() < 1e-6);
        assert!(!action.paused);
    }

    #[test]
    fn paused_action_does_not_advance() {
        let mut action = AnimationAction::new(simple_clip(2.0));
        action.paused = true;
        action.time = 0.5;

        action.update(1.0);
        assert!((action.time - 0.5).abs() < 1e-6);
    }

    #[test]
    fn time_scale_stretches_playback() {
        let mut action = AnimationAction::new(simple_clip(4.0));
        action.loop_mode = LoopMode::Once;
        action.time_scale = 2.0;

        action.update(1.0);
        assert!((action.time - 2.0).abs() < 1e-6);
    }
}

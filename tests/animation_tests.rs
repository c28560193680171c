//! Animation System Tests
//!
//! Tests for:
//! - KeyframeTrack linear/step/cubic interpolation and cursor behavior
//! - AnimationClip duration auto-computation
//! - AnimationMixer registry, loop policy and default-clip fallback
//! - Crossfade selector semantics (idempotence, unknown names, settling)
//! - Weighted blending into scene node transforms

use std::sync::Arc;

use glam::Vec3;

use pavilion::animation::{
    AnimationClip, AnimationMixer, CROSSFADE_SECONDS, InterpolationMode, KeyframeCursor,
    KeyframeTrack, LoopMode, TargetPath, Track, TrackData, TrackMeta, bind_clip,
};
use pavilion::scene::{Node, NodeHandle, Scene};

const EPSILON: f32 = 1e-4;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < EPSILON
}

fn translation_clip(name: &str, node_name: &str, end: Vec3, duration: f32) -> AnimationClip {
    AnimationClip::new(
        name.to_string(),
        vec![Track {
            meta: TrackMeta {
                node_name: node_name.to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, duration],
                vec![Vec3::ZERO, end],
                InterpolationMode::Linear,
            )),
        }],
    )
}

/// Scene with a single animated node, plus a mixer with the given clips
/// bound against it.
fn rigged_scene(clips: &[AnimationClip]) -> (Scene, NodeHandle, AnimationMixer) {
    let mut scene = Scene::new();
    let root = scene.add_node(Node::new("root"));
    let pelvis = scene.nodes.insert(Node::new("pelvis"));
    scene.attach(pelvis, root);

    let mut mixer = AnimationMixer::new();
    for clip in clips {
        let clip = Arc::new(clip.clone());
        let bindings = bind_clip(&scene, root, &clip);
        mixer.register_clip(clip, bindings);
    }

    (scene, pelvis, mixer)
}

// ============================================================================
// KeyframeTrack
// ============================================================================

#[test]
fn track_linear_midpoint() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0)],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    let val = track.sample_with_cursor(0.5, &mut cursor);
    assert!(approx(val.x, 5.0), "Expected 5.0, got {}", val.x);
}

#[test]
fn track_clamps_outside_key_range() {
    let track = KeyframeTrack::new(
        vec![1.0, 2.0],
        vec![Vec3::splat(1.0), Vec3::splat(2.0)],
        InterpolationMode::Linear,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(approx(track.sample_with_cursor(0.0, &mut cursor).x, 1.0));
    assert!(approx(track.sample_with_cursor(5.0, &mut cursor).x, 2.0));
}

#[test]
fn track_step_holds_previous_key() {
    let track = KeyframeTrack::new(
        vec![0.0, 1.0, 2.0],
        vec![Vec3::splat(0.0), Vec3::splat(1.0), Vec3::splat(2.0)],
        InterpolationMode::Step,
    );

    let mut cursor = KeyframeCursor::default();
    assert!(approx(track.sample_with_cursor(0.9, &mut cursor).x, 0.0));
    assert!(approx(track.sample_with_cursor(1.1, &mut cursor).x, 1.0));
}

#[test]
fn track_cubic_zero_tangents_matches_hermite() {
    // Triplets of [in_tangent, value, out_tangent] per keyframe.
    let track = KeyframeTrack::new(
        vec![0.0, 1.0],
        vec![
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::ZERO,
            Vec3::splat(10.0),
            Vec3::ZERO,
        ],
        InterpolationMode::CubicSpline,
    );

    let mut cursor = KeyframeCursor::default();
    let val = track.sample_with_cursor(0.5, &mut cursor);
    // With zero tangents the Hermite midpoint is the value midpoint.
    assert!(approx(val.x, 5.0), "Expected 5.0, got {}", val.x);
}

#[test]
fn cursor_sequential_then_jump() {
    let times: Vec<f32> = (0..100).map(|i| i as f32 * 0.1).collect();
    let values: Vec<Vec3> = (0..100).map(|i| Vec3::splat(i as f32)).collect();
    let track = KeyframeTrack::new(times, values, InterpolationMode::Linear);

    let mut cursor = KeyframeCursor::default();
    // Sequential playback hits the linear-scan fast path.
    for i in 0..50 {
        let t = i as f32 * 0.1;
        let val = track.sample_with_cursor(t, &mut cursor);
        assert!(approx(val.x, i as f32), "at t={t}: {}", val.x);
    }

    // A large jump (scrub, loop reset) must still resolve correctly.
    let val = track.sample_with_cursor(9.9, &mut cursor);
    assert!(approx(val.x, 99.0), "after jump: {}", val.x);
    let val = track.sample_with_cursor(0.0, &mut cursor);
    assert!(approx(val.x, 0.0), "after rewind: {}", val.x);
}

// ============================================================================
// AnimationClip
// ============================================================================

#[test]
fn clip_duration_is_longest_track() {
    let clip = AnimationClip::new(
        "mixed".to_string(),
        vec![
            Track {
                meta: TrackMeta {
                    node_name: "a".to_string(),
                    target: TargetPath::Translation,
                },
                data: TrackData::Vector3(KeyframeTrack::new(
                    vec![0.0, 1.5],
                    vec![Vec3::ZERO, Vec3::ONE],
                    InterpolationMode::Linear,
                )),
            },
            Track {
                meta: TrackMeta {
                    node_name: "b".to_string(),
                    target: TargetPath::Scale,
                },
                data: TrackData::Vector3(KeyframeTrack::new(
                    vec![0.0, 3.25],
                    vec![Vec3::ONE, Vec3::splat(2.0)],
                    InterpolationMode::Linear,
                )),
            },
        ],
    );

    assert!(approx(clip.duration, 3.25));
}

// ============================================================================
// Mixer: registry and loop policy
// ============================================================================

#[test]
fn jump_clips_play_once_others_repeat() {
    let clips = vec![
        translation_clip("Run", "pelvis", Vec3::X, 1.0),
        translation_clip("JumpAttack", "pelvis", Vec3::Y, 1.0),
    ];
    let (_, _, mixer) = rigged_scene(&clips);

    assert_eq!(mixer.get("Run").unwrap().loop_mode, LoopMode::Repeat);
    assert_eq!(mixer.get("JumpAttack").unwrap().loop_mode, LoopMode::Once);
}

#[test]
fn duplicate_clip_names_keep_first_registration() {
    let clips = vec![
        translation_clip("Idle", "pelvis", Vec3::X, 1.0),
        translation_clip("Idle", "pelvis", Vec3::Y, 2.0),
    ];
    let (_, _, mixer) = rigged_scene(&clips);

    assert_eq!(mixer.actions().len(), 1);
    assert!(approx(mixer.get("Idle").unwrap().clip().duration, 1.0));
}

#[test]
fn default_clip_falls_back_to_first_available() {
    let clips = vec![
        translation_clip("Run", "pelvis", Vec3::X, 1.0),
        translation_clip("Jump", "pelvis", Vec3::Y, 1.0),
    ];
    let (_, _, mut mixer) = rigged_scene(&clips);

    mixer.play_default("Idle");
    assert_eq!(mixer.current_clip_name(), Some("Run"));
    assert!(mixer.get("Run").unwrap().is_fully_active());
}

#[test]
fn empty_mixer_survives_playback_requests() {
    let (mut scene, _, mut mixer) = rigged_scene(&[]);

    mixer.play_default("Idle");
    mixer.crossfade_to("Run");
    mixer.update(0.1, &mut scene);

    assert!(mixer.is_empty());
    assert_eq!(mixer.current_clip_name(), None);
}

// ============================================================================
// Mixer: crossfade selector
// ============================================================================

#[test]
fn unknown_clip_request_is_ignored() {
    let clips = vec![translation_clip("Idle", "pelvis", Vec3::X, 1.0)];
    let (_, _, mut mixer) = rigged_scene(&clips);
    mixer.play_default("Idle");

    mixer.crossfade_to("DoesNotExist");

    assert_eq!(mixer.current_clip_name(), Some("Idle"));
    assert!(mixer.get("Idle").unwrap().is_fully_active());
}

#[test]
fn reselecting_current_clip_does_not_restart_it() {
    let clips = vec![translation_clip("Idle", "pelvis", Vec3::X, 2.0)];
    let (mut scene, _, mut mixer) = rigged_scene(&clips);
    mixer.play_default("Idle");

    mixer.update(0.5, &mut scene);
    mixer.crossfade_to("Idle");

    let action = mixer.get("Idle").unwrap();
    assert!(approx(action.time, 0.5), "time reset: {}", action.time);
    assert!(!action.is_fading());
}

#[test]
fn crossfade_settles_to_one_full_weight_action() {
    let clips = vec![
        translation_clip("Idle", "pelvis", Vec3::X, 2.0),
        translation_clip("Run", "pelvis", Vec3::Y, 2.0),
    ];
    let (mut scene, _, mut mixer) = rigged_scene(&clips);
    mixer.play_default("Idle");

    mixer.crossfade_to("Run");
    assert_eq!(mixer.current_clip_name(), Some("Run"));

    // Mid-fade: both contribute.
    mixer.update(CROSSFADE_SECONDS / 2.0, &mut scene);
    assert!(mixer.get("Idle").unwrap().weight() > 0.0);
    assert!(mixer.get("Run").unwrap().weight() > 0.0);

    // After the window both fades are settled.
    mixer.update(CROSSFADE_SECONDS, &mut scene);

    let fully_active: Vec<&str> = mixer
        .actions()
        .iter()
        .filter(|a| a.is_fully_active())
        .map(|a| a.clip().name.as_str())
        .collect();
    assert_eq!(fully_active, vec!["Run"]);
    assert!(approx(mixer.get("Idle").unwrap().weight(), 0.0));
}

#[test]
fn outgoing_clip_keeps_playing_during_fade() {
    let clips = vec![
        translation_clip("Idle", "pelvis", Vec3::X, 10.0),
        translation_clip("Run", "pelvis", Vec3::Y, 10.0),
    ];
    let (mut scene, _, mut mixer) = rigged_scene(&clips);
    mixer.play_default("Idle");
    mixer.update(1.0, &mut scene);

    mixer.crossfade_to("Run");
    mixer.update(CROSSFADE_SECONDS / 2.0, &mut scene);

    // No hard stop: time advanced past the selection point.
    let idle = mixer.get("Idle").unwrap();
    assert!(idle.time > 1.0, "outgoing clip froze at {}", idle.time);

    // The incoming clip restarted from zero.
    let run = mixer.get("Run").unwrap();
    assert!(run.time < 0.2, "incoming clip did not restart: {}", run.time);
}

// ============================================================================
// Mixer: blending into the scene
// ============================================================================

#[test]
fn playback_writes_sampled_pose_into_node() {
    let clips = vec![translation_clip("Idle", "pelvis", Vec3::new(2.0, 0.0, 0.0), 1.0)];
    let (mut scene, pelvis, mut mixer) = rigged_scene(&clips);
    mixer.play_default("Idle");

    mixer.update(0.5, &mut scene);

    let pos = scene.get_node(pelvis).unwrap().transform.position;
    assert!(approx(pos.x, 1.0), "Expected 1.0, got {}", pos.x);
}

#[test]
fn crossfade_blend_is_weighted_average() {
    let clips = vec![
        translation_clip("A", "pelvis", Vec3::ZERO, 10.0),
        translation_clip("B", "pelvis", Vec3::ZERO, 10.0),
    ];
    // Constant-value variants so the blend result depends only on weights.
    let clips: Vec<AnimationClip> = clips
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let value = if i == 0 { Vec3::ZERO } else { Vec3::X };
            AnimationClip::new(
                c.name.clone(),
                vec![Track {
                    meta: TrackMeta {
                        node_name: "pelvis".to_string(),
                        target: TargetPath::Translation,
                    },
                    data: TrackData::Vector3(KeyframeTrack::new(
                        vec![0.0, 10.0],
                        vec![value, value],
                        InterpolationMode::Linear,
                    )),
                }],
            )
        })
        .collect();

    let (mut scene, pelvis, mut mixer) = rigged_scene(&clips);
    mixer.play_default("A");
    mixer.crossfade_to("B");

    // Halfway through the fade: A at weight 0.5, B at weight 0.5.
    mixer.update(CROSSFADE_SECONDS / 2.0, &mut scene);

    let pos = scene.get_node(pelvis).unwrap().transform.position;
    assert!(
        (pos.x - 0.5).abs() < 0.05,
        "Expected roughly 0.5, got {}",
        pos.x
    );
}

#[test]
fn finished_one_shot_holds_final_pose() {
    let jump = translation_clip("Jump", "pelvis", Vec3::new(0.0, 3.0, 0.0), 0.5);
    let (mut scene, pelvis, mut mixer) = rigged_scene(&[jump]);
    mixer.play_default("Jump");

    // Run well past the clip end.
    for _ in 0..10 {
        mixer.update(0.2, &mut scene);
    }

    let action = mixer.get("Jump").unwrap();
    assert_eq!(action.loop_mode, LoopMode::Once);
    assert!(action.paused);

    // The clamped final pose keeps being applied.
    let pos = scene.get_node(pelvis).unwrap().transform.position;
    assert!(approx(pos.y, 3.0), "Expected held pose 3.0, got {}", pos.y);
}

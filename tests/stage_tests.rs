//! Stage Tests
//!
//! Tests for:
//! - Asset integration in either completion order with fixed placements
//! - Shadow participation flags per asset role
//! - Resize propagation to viewport and camera aspect
//! - Soft failure of clip selection and asset load errors
//! - Key-to-clip bindings

use glam::{Quat, Vec3};

use pavilion::animation::{InterpolationMode, KeyframeTrack, TargetPath, Track, TrackData, TrackMeta};
use pavilion::assets::{AssetSlot, FragmentNode, LoadEvent, SceneFragment};
use pavilion::errors::ViewerError;
use pavilion::scene::{Material, Mesh};
use pavilion::settings::ViewerSettings;
use pavilion::{AnimationClip, Stage};

fn cube_mesh(name: &str) -> Mesh {
    Mesh {
        name: name.to_string(),
        positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
        normals: vec![[0.0, 0.0, 1.0]; 3],
        uvs: vec![[0.0, 0.0]; 3],
        joints: Vec::new(),
        weights: Vec::new(),
        indices: vec![0, 1, 2],
        material: Material::default(),
    }
}

fn mesh_node(name: &str, mesh: usize) -> FragmentNode {
    FragmentNode {
        name: name.to_string(),
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
        parent: None,
        mesh: Some(mesh),
        skin: None,
    }
}

fn environment_fragment() -> SceneFragment {
    SceneFragment {
        nodes: vec![mesh_node("ground", 0)],
        meshes: vec![cube_mesh("ground")],
        skins: Vec::new(),
        clips: Vec::new(),
    }
}

fn character_fragment() -> SceneFragment {
    let clip = AnimationClip::new(
        "Idle".to_string(),
        vec![Track {
            meta: TrackMeta {
                node_name: "Armature".to_string(),
                target: TargetPath::Translation,
            },
            data: TrackData::Vector3(KeyframeTrack::new(
                vec![0.0, 1.0],
                vec![Vec3::ZERO, Vec3::Y],
                InterpolationMode::Linear,
            )),
        }],
    );

    SceneFragment {
        nodes: vec![mesh_node("Armature", 0)],
        meshes: vec![cube_mesh("body")],
        skins: Vec::new(),
        clips: vec![clip],
    }
}

fn load(slot: AssetSlot, fragment: SceneFragment) -> LoadEvent {
    LoadEvent {
        slot,
        result: Ok(fragment),
    }
}

fn assert_placements(stage: &Stage) {
    let env_root = stage.environment_root.expect("environment missing");
    let env = stage.scene.get_node(env_root).unwrap();
    assert_eq!(env.transform.position, Vec3::ZERO);
    assert_eq!(env.transform.scale, Vec3::splat(15.0));

    let char_root = stage.character_root.expect("character missing");
    let character = stage.scene.get_node(char_root).unwrap();
    assert_eq!(character.transform.position, Vec3::new(0.0, 1.0, 3.0));
    assert_eq!(character.transform.scale, Vec3::splat(0.01));
}

#[test]
fn assets_integrate_in_either_completion_order() {
    let mut first = Stage::new(ViewerSettings::default());
    first.apply_load(load(AssetSlot::Environment, environment_fragment()));
    first.apply_load(load(AssetSlot::Character, character_fragment()));

    let mut second = Stage::new(ViewerSettings::default());
    second.apply_load(load(AssetSlot::Character, character_fragment()));
    second.apply_load(load(AssetSlot::Environment, environment_fragment()));

    assert_placements(&first);
    assert_placements(&second);

    for stage in [&first, &second] {
        let mixer = stage.mixer.as_ref().expect("mixer not built");
        assert_eq!(mixer.current_clip_name(), Some("Idle"));
    }
}

#[test]
fn shadow_flags_follow_asset_role() {
    let mut stage = Stage::new(ViewerSettings::default());
    stage.apply_load(load(AssetSlot::Environment, environment_fragment()));
    stage.apply_load(load(AssetSlot::Character, character_fragment()));

    let ground = stage
        .scene
        .find_node_by_name(stage.environment_root.unwrap(), "ground")
        .unwrap();
    let ground = stage.scene.get_node(ground).unwrap();
    assert!(ground.receive_shadow && !ground.cast_shadow);

    let body = stage
        .scene
        .find_node_by_name(stage.character_root.unwrap(), "Armature")
        .unwrap();
    let body = stage.scene.get_node(body).unwrap();
    assert!(body.cast_shadow && !body.receive_shadow);
}

#[test]
fn resize_updates_viewport_and_camera_aspect() {
    let mut stage = Stage::new(ViewerSettings::default());

    stage.handle_resize(1920, 1080);

    assert_eq!(stage.viewport, (1920, 1080));
    assert!((stage.camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);
}

#[test]
fn clip_selection_before_character_load_is_noop() {
    let mut stage = Stage::new(ViewerSettings::default());

    // No mixer yet; must not panic or create one.
    stage.select_clip("Run");
    assert!(stage.mixer.is_none());

    stage.apply_load(load(AssetSlot::Character, character_fragment()));
    let mixer = stage.mixer.as_ref().unwrap();
    assert_eq!(mixer.current_clip_name(), Some("Idle"));
}

#[test]
fn failed_load_is_skipped() {
    let mut stage = Stage::new(ViewerSettings::default());

    stage.apply_load(LoadEvent {
        slot: AssetSlot::Environment,
        result: Err(ViewerError::GltfError("truncated file".to_string())),
    });

    assert!(stage.environment_root.is_none());

    // The other asset still integrates normally.
    stage.apply_load(load(AssetSlot::Character, character_fragment()));
    assert!(stage.character_root.is_some());
}

#[test]
fn update_advances_animation_and_transforms() {
    let mut stage = Stage::new(ViewerSettings::default());
    stage.apply_load(load(AssetSlot::Character, character_fragment()));

    stage.update(0.5);

    let armature = stage
        .scene
        .find_node_by_name(stage.character_root.unwrap(), "Armature")
        .unwrap();
    let node = stage.scene.get_node(armature).unwrap();
    assert!((node.transform.position.y - 0.5).abs() < 1e-4);

    // World matrix includes the character placement and scale.
    let world_y = node.transform.world_matrix().translation.y;
    let expected = 1.0 + 0.5 * 0.01;
    assert!(
        (world_y - expected).abs() < 1e-4,
        "world y {world_y}, expected {expected}"
    );
}

#[test]
fn default_key_bindings_map_digits_to_clips() {
    let settings = ViewerSettings::default();

    assert_eq!(settings.clip_for_key("1"), Some("Idle"));
    assert_eq!(settings.clip_for_key("2"), Some("Run"));
    assert_eq!(settings.clip_for_key("3"), Some("Jump"));
    assert_eq!(settings.clip_for_key("4"), None);
}

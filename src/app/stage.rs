use std::sync::Arc;

use glam::Vec3;

use crate::animation::{AnimationMixer, bind_clip};
use crate::assets::{AssetSlot, LoadEvent};
use crate::scene::{Camera, NodeHandle, Scene, ShadowFlags};
use crate::settings::ViewerSettings;

/// The viewer's world state: scene graph, camera, animation mixer.
///
/// Holds no window or GPU resources, so the whole load/select/update flow
/// runs headless in tests.
pub struct Stage {
    pub scene: Scene,
    pub camera: Camera,
    pub mixer: Option<AnimationMixer>,

    pub environment_root: Option<NodeHandle>,
    pub character_root: Option<NodeHandle>,

    pub viewport: (u32, u32),
    settings: ViewerSettings,
}

impl Stage {
    #[must_use]
    pub fn new(settings: ViewerSettings) -> Self {
        let camera = Camera::new_perspective(
            settings.fov_degrees,
            settings.width as f32 / settings.height.max(1) as f32,
            settings.near,
            settings.far,
        );

        Self {
            scene: Scene::new(),
            camera,
            mixer: None,
            environment_root: None,
            character_root: None,
            viewport: (settings.width, settings.height),
            settings,
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    /// Applies a new surface size: stores the exact dimensions and updates
    /// the camera aspect ratio.
    pub fn handle_resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        self.camera
            .set_aspect(width as f32 / height.max(1) as f32);
    }

    /// Integrates one finished asset load into the scene.
    ///
    /// A failed load is reported and skipped; the viewer keeps running with
    /// whatever did load. Load order does not matter: each asset attaches
    /// under its own root with a fixed placement.
    pub fn apply_load(&mut self, event: LoadEvent) {
        let fragment = match event.result {
            Ok(fragment) => fragment,
            Err(err) => {
                log::error!("failed to load {}: {err}", event.slot);
                return;
            }
        };

        match event.slot {
            AssetSlot::Environment => {
                let root = self.scene.instantiate(
                    &fragment,
                    "environment",
                    Vec3::ZERO,
                    Vec3::splat(self.settings.environment_scale),
                    ShadowFlags::receive(),
                );
                self.environment_root = Some(root);
            }
            AssetSlot::Character => {
                let root = self.scene.instantiate(
                    &fragment,
                    "character",
                    self.settings.character_position,
                    Vec3::splat(self.settings.character_scale),
                    ShadowFlags::cast(),
                );
                self.character_root = Some(root);

                let mut mixer = AnimationMixer::new();
                for clip in &fragment.clips {
                    let clip = Arc::new(clip.clone());
                    let bindings = bind_clip(&self.scene, root, &clip);
                    mixer.register_clip(clip, bindings);
                }

                mixer.play_default(&self.settings.default_clip);
                self.mixer = Some(mixer);
            }
        }
    }

    /// The clip selector entry point. Soft no-op until the character (and
    /// with it the mixer) has loaded.
    pub fn select_clip(&mut self, name: &str) {
        if let Some(mixer) = &mut self.mixer {
            mixer.crossfade_to(name);
        }
    }

    /// Per-frame world update: animation, world matrices, skinning.
    pub fn update(&mut self, dt: f32) {
        if let Some(mixer) = &mut self.mixer {
            mixer.update(dt, &mut self.scene);
        }
        self.scene.update_world_transforms();
        self.scene.update_skeletons();
    }
}

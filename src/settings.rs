use std::path::PathBuf;

use glam::Vec3;

/// Everything configurable about the viewer, with defaults matching the
/// shipped demo scene.
#[derive(Debug, Clone)]
pub struct ViewerSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,

    pub environment_path: PathBuf,
    pub character_path: PathBuf,

    /// Clip started once the character loads.
    pub default_clip: String,
    /// Keyboard clip selection, key character → clip name.
    pub key_bindings: Vec<(String, String)>,

    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,

    pub environment_scale: f32,
    pub character_position: Vec3,
    pub character_scale: f32,

    pub camera_position: Vec3,
    pub orbit_target: Vec3,
    pub orbit_min_distance: f32,
    pub orbit_max_distance: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            title: "pavilion".to_string(),
            width: 1280,
            height: 720,

            environment_path: PathBuf::from("assets/environment.glb"),
            character_path: PathBuf::from("assets/character.glb"),

            default_clip: "Idle".to_string(),
            key_bindings: vec![
                ("1".to_string(), "Idle".to_string()),
                ("2".to_string(), "Run".to_string()),
                ("3".to_string(), "Jump".to_string()),
            ],

            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,

            environment_scale: 15.0,
            character_position: Vec3::new(0.0, 1.0, 3.0),
            character_scale: 0.01,

            camera_position: Vec3::new(0.0, 5.0, 12.0),
            orbit_target: Vec3::new(0.0, 1.0, 0.0),
            orbit_min_distance: 3.0,
            orbit_max_distance: 50.0,
        }
    }
}

impl ViewerSettings {
    /// Defaults, with asset paths optionally overridden by the first two
    /// positional command line arguments (environment, then character).
    #[must_use]
    pub fn from_args() -> Self {
        let mut settings = Self::default();

        let mut args = std::env::args().skip(1);
        if let Some(path) = args.next() {
            settings.environment_path = PathBuf::from(path);
        }
        if let Some(path) = args.next() {
            settings.character_path = PathBuf::from(path);
        }

        settings
    }

    /// Clip bound to a key character, if any.
    #[must_use]
    pub fn clip_for_key(&self, key: &str) -> Option<&str> {
        self.key_bindings
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, clip)| clip.as_str())
    }
}

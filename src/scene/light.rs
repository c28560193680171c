use glam::Vec3;

/// Shadow map parameters for the directional light.
#[derive(Debug, Clone)]
pub struct ShadowConfig {
    pub map_size: u32,
    /// Half-extent of the orthographic shadow frustum.
    pub extent: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_size: 1024,
            extent: 20.0,
            near: 0.5,
            far: 100.0,
        }
    }
}

/// Uniform ambient term.
#[derive(Debug, Clone)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 0.6,
        }
    }
}

/// Shadow-casting directional light. Shines from `position` toward the
/// origin.
#[derive(Debug, Clone)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub position: Vec3,
    pub cast_shadows: bool,
    pub shadow: ShadowConfig,
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            intensity: 1.0,
            position: Vec3::new(10.0, 20.0, 15.0),
            cast_shadows: true,
            shadow: ShadowConfig::default(),
        }
    }
}

impl DirectionalLight {
    /// Normalized direction the light travels (toward the origin).
    #[must_use]
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize()
    }
}

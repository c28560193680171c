use glam::{Affine3A, Mat4};

/// Perspective camera.
///
/// Projection parameters live here; position and orientation come from a
/// [`Transform`](crate::scene::Transform) passed to
/// [`Camera::update_view_projection`] each frame (the orbit controller
/// drives that transform).
#[derive(Debug, Clone)]
pub struct Camera {
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    pub(crate) world_matrix: Affine3A,
    pub(crate) view_matrix: Mat4,
    pub(crate) projection_matrix: Mat4,
    pub(crate) view_projection_matrix: Mat4,
}

impl Camera {
    /// `fov` is vertical field of view in degrees.
    #[must_use]
    pub fn new_perspective(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut cam = Self {
            fov: fov.to_radians(),
            aspect,
            near,
            far,

            world_matrix: Affine3A::IDENTITY,
            view_matrix: Mat4::IDENTITY,
            projection_matrix: Mat4::IDENTITY,
            view_projection_matrix: Mat4::IDENTITY,
        };

        cam.update_projection_matrix();
        cam
    }

    /// Recomputes the projection matrix from the current parameters.
    /// Must be called after changing `fov`, `aspect`, `near` or `far`.
    pub fn update_projection_matrix(&mut self) {
        // glam's perspective_rh targets the WGPU/Vulkan depth range [0, 1].
        self.projection_matrix = Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far);
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    /// Updates the aspect ratio, typically from a viewport resize.
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
        self.update_projection_matrix();
    }

    /// Derives view and view-projection matrices from the camera's world
    /// transform.
    pub fn update_view_projection(&mut self, world_transform: &Affine3A) {
        self.world_matrix = *world_transform;
        self.view_matrix = Mat4::from(*world_transform).inverse();
        self.view_projection_matrix = self.projection_matrix * self.view_matrix;
    }

    #[inline]
    #[must_use]
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.view_projection_matrix
    }

    #[inline]
    #[must_use]
    pub fn fov_degrees(&self) -> f32 {
        self.fov.to_degrees()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_follows_viewport_resize() {
        let mut camera = Camera::new_perspective(75.0, 800.0 / 600.0, 0.1, 1000.0);
        camera.set_aspect(1920.0 / 1080.0);

        assert!((camera.aspect - 1920.0 / 1080.0).abs() < 1e-6);

        // Projection must be rebuilt with the new aspect.
        let expected = Mat4::perspective_rh(75.0_f32.to_radians(), 1920.0 / 1080.0, 0.1, 1000.0);
        assert!((camera.projection_matrix.col(0).x - expected.col(0).x).abs() < 1e-6);
    }
}

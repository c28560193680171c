use crate::app::input::Input;
use crate::scene::transform::Transform;
use glam::{Vec2, Vec3};
use winit::event::MouseButton;

/// Damped orbit camera controller.
///
/// Left-drag rotates around the target, scroll zooms (clamped to
/// `[min_distance, max_distance]`), right-drag pans. Panning is constrained
/// to the ground plane: the vertical screen axis moves the target along the
/// camera's forward direction projected onto XZ, so the orbit center never
/// leaves its height.
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    pub center: Vec3,
    pub radius: f32,
    pub theta: f32,
    pub phi: f32,

    rotate_delta: Vec2,
}

impl OrbitControls {
    #[must_use]
    pub fn new(center: Vec3, radius: f32) -> Self {
        Self {
            rotate_speed: 1.0,
            zoom_speed: 0.05,
            pan_speed: 1.0,
            damping_factor: 0.05,
            enable_damping: true,
            min_distance: 1.0,
            max_distance: 1000.0,

            center,
            radius,
            theta: 0.0,
            phi: std::f32::consts::FRAC_PI_2,

            rotate_delta: Vec2::ZERO,
        }
    }

    /// Applies pending input to the camera transform.
    ///
    /// With damping enabled, accumulated rotation deltas decay over several
    /// frames, so this must run every frame even without fresh input.
    pub fn update(&mut self, transform: &mut Transform, input: &Input, fov_degrees: f32, dt: f32) {
        let screen_height = input.screen_size.y.max(1.0);

        if input.is_button_pressed(MouseButton::Left) {
            let rotate_per_pixel = 2.0 * std::f32::consts::PI / screen_height;
            self.rotate_delta.x -= input.cursor_delta.x * rotate_per_pixel * self.rotate_speed;
            self.rotate_delta.y -= input.cursor_delta.y * rotate_per_pixel * self.rotate_speed;
        }

        if self.enable_damping {
            let target_fps = 60.0;
            let retention = (1.0 - self.damping_factor).powf(dt * target_fps);
            let delta_apply = self.rotate_delta * (1.0 - retention);

            self.theta += delta_apply.x;
            self.phi += delta_apply.y;

            self.rotate_delta *= retention;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }

        const EPS: f32 = 0.0001;
        self.phi = self.phi.clamp(EPS, std::f32::consts::PI - EPS);

        if input.scroll_delta.y != 0.0 {
            let scale = (1.0 - self.zoom_speed).powf(input.scroll_delta.y.abs());
            if input.scroll_delta.y > 0.0 {
                self.radius *= scale;
            } else {
                self.radius /= scale;
            }
            self.radius = self.radius.clamp(self.min_distance, self.max_distance);
        }

        if input.is_button_pressed(MouseButton::Right) {
            let half_fov = fov_degrees.to_radians() / 2.0;
            let target_world_height = 2.0 * self.radius * half_fov.tan();
            let pixels_to_world_ratio = target_world_height / screen_height;

            let sin_theta = self.theta.sin();
            let cos_theta = self.theta.cos();

            // Ground-plane panning: build the basis from the horizontal
            // projection of the view direction, keeping center.y fixed.
            let forward_flat = -Vec3::new(sin_theta, 0.0, cos_theta);
            let right = forward_flat.cross(Vec3::Y).normalize();

            let pan_delta_world = (right * -input.cursor_delta.x
                + forward_flat * input.cursor_delta.y)
                * pixels_to_world_ratio
                * self.pan_speed;

            self.center += pan_delta_world;
        }

        let sin_phi = self.phi.sin();
        let cos_phi = self.phi.cos();
        let sin_theta = self.theta.sin();
        let cos_theta = self.theta.cos();

        let offset = Vec3::new(
            self.radius * sin_phi * sin_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * cos_theta,
        );

        transform.position = self.center + offset;
        transform.look_at(self.center, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_orbits_at_radius_around_center() {
        let mut controls = OrbitControls::new(Vec3::new(0.0, 1.0, 0.0), 12.0);
        let mut transform = Transform::new();
        let input = Input::new();

        controls.update(&mut transform, &input, 75.0, 1.0 / 60.0);

        let distance = (transform.position - controls.center).length();
        assert!((distance - 12.0).abs() < 1e-4, "got {distance}");
    }

    #[test]
    fn zoom_respects_distance_limits() {
        let mut controls = OrbitControls::new(Vec3::ZERO, 10.0);
        controls.min_distance = 3.0;
        controls.max_distance = 50.0;
        let mut transform = Transform::new();

        let mut input = Input::new();
        input.scroll_delta.y = 1000.0;
        controls.update(&mut transform, &input, 75.0, 1.0 / 60.0);
        assert!(controls.radius >= 3.0, "zoomed past min: {}", controls.radius);

        input.scroll_delta.y = -1000.0;
        controls.update(&mut transform, &input, 75.0, 1.0 / 60.0);
        assert!(
            controls.radius <= 50.0,
            "zoomed past max: {}",
            controls.radius
        );
    }

    #[test]
    fn damping_spreads_rotation_over_frames() {
        let mut controls = OrbitControls::new(Vec3::ZERO, 10.0);
        let mut transform = Transform::new();

        let mut input = Input::new();
        input.screen_size = Vec2::new(800.0, 600.0);
        input.cursor_delta = Vec2::new(120.0, 0.0);
        input.mouse_buttons.insert(MouseButton::Left);

        controls.update(&mut transform, &input, 75.0, 1.0 / 60.0);
        let theta_after_one = controls.theta;

        // Further frames without input keep rotating until the delta decays.
        input.cursor_delta = Vec2::ZERO;
        input.mouse_buttons.clear();
        for _ in 0..120 {
            controls.update(&mut transform, &input, 75.0, 1.0 / 60.0);
        }

        assert!(
            (controls.theta - theta_after_one).abs() > 1e-5,
            "damping should carry rotation past the first frame"
        );
    }
}

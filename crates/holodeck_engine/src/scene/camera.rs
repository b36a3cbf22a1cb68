//! Orbit camera
//!
//! Bounded orbit/pan/zoom camera with damped inertia, plus the
//! projection math needed to turn pointer positions into scene-space
//! pick rays.
//!
//! ## Coordinate System
//! Standard right-handed Y-up coordinates. NDC follow the usual
//! convention: X in [-1, 1] left to right, Y in [-1, 1] bottom to top.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::interaction::Ray;

/// Camera configuration for one panel
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraConfig {
    /// Field of view in degrees
    pub fov_degrees: f32,

    /// Aspect ratio (width / height)
    pub aspect: f32,

    /// Near clipping plane distance
    pub near: f32,

    /// Far clipping plane distance
    pub far: f32,

    /// Minimum orbit distance from the target
    pub min_distance: f32,

    /// Maximum orbit distance from the target
    pub max_distance: f32,

    /// Initial orbit distance
    pub initial_distance: f32,

    /// Inertia damping factor per second; higher values stop faster
    pub damping: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 100.0,
            min_distance: 2.0,
            max_distance: 30.0,
            initial_distance: 8.0,
            damping: 6.0,
        }
    }
}

/// Orbit camera circling a target point.
///
/// Orientation is stored as yaw/pitch around the target rather than a
/// free transform, which makes the orbit bounds trivial to enforce.
/// Orbit, pan, and zoom inputs feed velocities that decay with damped
/// inertia, so camera motion eases out instead of stopping dead.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    config: CameraConfig,
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
    pan_velocity_x: f32,
    pan_velocity_y: f32,
}

/// Pitch is clamped short of the poles to keep the view matrix stable
const PITCH_LIMIT: f32 = 1.45;

impl OrbitCamera {
    /// Create a camera from its panel configuration
    pub fn new(config: CameraConfig) -> Self {
        let distance = config
            .initial_distance
            .clamp(config.min_distance, config.max_distance);
        Self {
            config,
            target: Vec3::zeros(),
            yaw: 0.0,
            pitch: 0.35,
            distance,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            pan_velocity_x: 0.0,
            pan_velocity_y: 0.0,
        }
    }

    /// Camera position in scene space
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.target
            + Vec3::new(
                self.distance * cos_pitch * sin_yaw,
                self.distance * sin_pitch,
                self.distance * cos_pitch * cos_yaw,
            )
    }

    /// Current orbit distance from the target
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Point the camera orbits around
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Apply an orbit input (radians of yaw/pitch impulse)
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.yaw_velocity += delta_yaw;
        self.pitch_velocity += delta_pitch;
    }

    /// Apply a pan input, shifting the orbit target within the camera's
    /// horizontal plane
    pub fn pan(&mut self, delta_x: f32, delta_y: f32) {
        self.pan_velocity_x += delta_x;
        self.pan_velocity_y += delta_y;
    }

    /// Apply a zoom input (positive moves toward the target)
    pub fn zoom(&mut self, delta: f32) {
        self.zoom_velocity += delta;
    }

    /// Advance inertia by one frame.
    ///
    /// Velocities integrate into yaw/pitch/distance, then decay
    /// exponentially with the configured damping. Distance and pitch are
    /// re-clamped every frame, so no input sequence can escape the
    /// configured bounds.
    pub fn update(&mut self, delta_time: f32) {
        self.yaw += self.yaw_velocity * delta_time;
        self.pitch =
            (self.pitch + self.pitch_velocity * delta_time).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.distance = (self.distance - self.zoom_velocity * delta_time)
            .clamp(self.config.min_distance, self.config.max_distance);

        // Pan uses the same inertia model as orbit/zoom; the basis is
        // re-derived from the current yaw so a coasting pan follows an
        // ongoing orbit.
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let right = Vec3::new(cos_yaw, 0.0, -sin_yaw);
        let up = Vec3::new(0.0, 1.0, 0.0);
        self.target +=
            (right * self.pan_velocity_x + up * self.pan_velocity_y) * delta_time;

        let decay = (-self.config.damping * delta_time).exp();
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
        self.zoom_velocity *= decay;
        self.pan_velocity_x *= decay;
        self.pan_velocity_y *= decay;
    }

    /// Update aspect ratio when the panel viewport resizes
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if (self.config.aspect - aspect).abs() > 0.01 {
            log::info!(
                "camera aspect ratio changed: {:.3} -> {:.3}",
                self.config.aspect,
                aspect
            );
        }
        self.config.aspect = aspect;
    }

    /// View matrix (scene space to camera space)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &self.position().into(),
            &self.target.into(),
            &Vec3::new(0.0, 1.0, 0.0),
        )
    }

    /// Perspective projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(
            self.config.aspect,
            self.config.fov_degrees.to_radians(),
            self.config.near,
            self.config.far,
        )
    }

    /// Combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Convert NDC pointer coordinates to a scene-space pick ray.
    ///
    /// Unprojects the pointer at the near and far planes and returns the
    /// ray between them, originating at the camera position.
    pub fn screen_to_world_ray(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let view_proj = self.view_projection_matrix();
        let Some(inv_view_proj) = view_proj.try_inverse() else {
            // Degenerate matrix (zero-size viewport); fall back to the
            // camera's forward axis so picking degrades to a miss rather
            // than a panic.
            return Ray::new(self.position(), self.target - self.position());
        };

        let ndc_near = Vec4::new(ndc_x, ndc_y, -1.0, 1.0);
        let ndc_far = Vec4::new(ndc_x, ndc_y, 1.0, 1.0);

        let world_near_h = inv_view_proj * ndc_near;
        let world_far_h = inv_view_proj * ndc_far;

        let world_near = world_near_h.xyz() / world_near_h.w;
        let world_far = world_far_h.xyz() / world_far_h.w;

        Ray::new(self.position(), world_far - world_near)
    }

    /// Project a scene-space point to NDC.
    ///
    /// Used by the presentation layer to anchor overlays and labels next
    /// to the entities they describe. Returns `None` for points behind
    /// the camera.
    pub fn world_to_ndc(&self, point: Vec3) -> Option<(f32, f32)> {
        let clip = self.view_projection_matrix() * Vec4::new(point.x, point.y, point.z, 1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some((clip.x / clip.w, clip.y / clip.w))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_initial_distance_clamped_to_bounds() {
        let camera = OrbitCamera::new(CameraConfig {
            min_distance: 5.0,
            max_distance: 10.0,
            initial_distance: 50.0,
            ..CameraConfig::default()
        });
        assert_relative_eq!(camera.distance(), 10.0);
    }

    #[test]
    fn test_zoom_respects_min_distance() {
        let mut camera = OrbitCamera::new(CameraConfig::default());
        for _ in 0..600 {
            camera.zoom(10.0);
            camera.update(1.0 / 60.0);
        }
        assert_relative_eq!(camera.distance(), CameraConfig::default().min_distance);
    }

    #[test]
    fn test_inertia_decays() {
        let mut camera = OrbitCamera::new(CameraConfig::default());
        camera.orbit(1.0, 0.0);
        camera.update(1.0 / 60.0);
        let yaw_after_one = camera.yaw;
        for _ in 0..300 {
            camera.update(1.0 / 60.0);
        }
        let yaw_settled = camera.yaw;
        // The camera kept coasting after the input stopped...
        assert!(yaw_settled > yaw_after_one);
        // ...but the motion died out.
        for _ in 0..60 {
            camera.update(1.0 / 60.0);
        }
        assert_relative_eq!(camera.yaw, yaw_settled, epsilon = 1e-3);
    }

    #[test]
    fn test_pan_inertia_decays() {
        let mut camera = OrbitCamera::new(CameraConfig::default());
        camera.pan(1.0, 0.0);
        camera.update(1.0 / 60.0);
        let x_after_one = camera.target().x;
        assert!(x_after_one > 0.0);
        for _ in 0..300 {
            camera.update(1.0 / 60.0);
        }
        let x_settled = camera.target().x;
        // The target kept coasting after the input stopped...
        assert!(x_settled > x_after_one);
        // ...but the motion died out.
        for _ in 0..60 {
            camera.update(1.0 / 60.0);
        }
        assert_relative_eq!(camera.target().x, x_settled, epsilon = 1e-3);
    }

    #[test]
    fn test_center_ray_points_at_target() {
        let camera = OrbitCamera::new(CameraConfig::default());
        let ray = camera.screen_to_world_ray(0.0, 0.0);
        let to_target = (camera.target() - camera.position()).normalize();
        assert_relative_eq!(ray.direction.dot(&to_target), 1.0, epsilon = 1e-3);
    }

    #[test]
    fn test_world_to_ndc_roundtrip_at_center() {
        let camera = OrbitCamera::new(CameraConfig::default());
        let (x, y) = camera.world_to_ndc(camera.target()).unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_point_behind_camera_is_none() {
        let camera = OrbitCamera::new(CameraConfig::default());
        let behind = camera.position() + (camera.position() - camera.target());
        assert!(camera.world_to_ndc(behind).is_none());
    }
}

//! Cameras and pointer-to-world mapping.
//!
//! The main camera sits on the +z axis looking at the origin; all gameplay
//! happens on the z=0 ground plane. The visible extent of that plane (the
//! frustum width/height at the camera distance) is recomputed from current
//! camera state every time it is needed rather than cached, which keeps
//! resize handling staleness-free by construction.
//!
//! Pointer input arrives in normalized device coordinates and is unprojected
//! through the camera into a world-space ray, then intersected with z=0.

use glam::{Mat4, Vec2, Vec3, Vec4, Vec4Swizzles};

/// Main camera vertical field of view, degrees.
pub const CAMERA_FOV_DEG: f32 = 20.0;
/// Main camera distance from the ground plane.
pub const CAMERA_DISTANCE: f32 = 20.0;
/// Secondary camera vertical field of view, degrees.
pub const SECONDARY_FOV_DEG: f32 = 40.0;

const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 100.0;

/// A pointer ray's intersection with the ground plane.
///
/// `raw` is the unprojected point at mid depth; it is used for drag-distance
/// thresholding, not placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerHit {
    pub plane: Vec3,
    pub raw: Vec3,
}

/// Intersect a ray with the z=0 ground plane.
///
/// Returns `None` when the ray is parallel to the plane; callers drop that
/// frame's input rather than let a division by zero reach position state.
pub fn ground_intersection(origin: Vec3, dir: Vec3) -> Option<Vec3> {
    if dir.z.abs() < 1e-6 {
        return None;
    }
    let t = -origin.z / dir.z;
    let mut point = origin + dir * t;
    point.z = 0.0;
    Some(point)
}

/// The fixed perspective camera above the ground plane.
#[derive(Debug, Clone, Copy)]
pub struct SceneCamera {
    pub aspect: f32,
}

impl SceneCamera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            aspect: aspect_of(width, height),
        }
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect_of(width, height);
    }

    /// Camera position in world space.
    #[inline]
    pub fn eye(&self) -> Vec3 {
        Vec3::new(0.0, 0.0, CAMERA_DISTANCE)
    }

    /// Visible extent of the ground plane as (width, height).
    pub fn frustum_size(&self) -> Vec2 {
        let height = 2.0 * (CAMERA_FOV_DEG.to_radians() / 2.0).tan() * CAMERA_DISTANCE;
        Vec2::new(height * self.aspect, height)
    }

    fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), Vec3::ZERO, Vec3::Y)
    }

    fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(CAMERA_FOV_DEG.to_radians(), self.aspect, Z_NEAR, Z_FAR)
    }

    /// Combined view-projection matrix for rendering.
    pub fn view_proj(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Unproject a normalized device coordinate to a world point at mid depth.
    pub fn unproject(&self, ndc: Vec2) -> Vec3 {
        let inverse = self.view_proj().inverse();
        let point = inverse * Vec4::new(ndc.x, ndc.y, 0.5, 1.0);
        point.xyz() / point.w
    }

    /// Map a pointer position to the ground plane.
    pub fn plane_hit(&self, ndc: Vec2) -> Option<PointerHit> {
        let raw = self.unproject(ndc);
        let dir = (raw - self.eye()).normalize();
        let plane = ground_intersection(self.eye(), dir)?;
        Some(PointerHit { plane, raw })
    }
}

/// The secondary camera feeding the reflection map and preview pane.
///
/// It re-centers on the ball every frame and aims along the ball's velocity,
/// falling back to the origin when the ball is stationary.
#[derive(Debug, Clone, Copy)]
pub struct OrbitEye {
    pub aspect: f32,
}

impl OrbitEye {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            aspect: aspect_of(width, height),
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect_of(width, height);
    }

    /// View-projection matrix for the current ball state.
    pub fn view_proj(&self, ball_position: Vec3, ball_velocity: Vec3) -> Mat4 {
        let eye = ball_position;
        let target = if ball_velocity.length_squared() > 1e-8 {
            ball_position + ball_velocity.normalize()
        } else {
            Vec3::ZERO
        };
        let aim = if (target - eye).length_squared() < 1e-6 {
            // Ball resting exactly on the origin: look down +x.
            eye + Vec3::X
        } else {
            target
        };
        let view = Mat4::look_at_rh(eye, aim, Vec3::Z);
        let projection =
            Mat4::perspective_rh(SECONDARY_FOV_DEG.to_radians(), self.aspect, Z_NEAR, Z_FAR);
        projection * view
    }
}

fn aspect_of(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frustum_size_formula() {
        let camera = SceneCamera::new(1600, 800);
        let size = camera.frustum_size();
        let expected_height = 2.0 * (CAMERA_FOV_DEG.to_radians() / 2.0).tan() * CAMERA_DISTANCE;
        assert!((size.y - expected_height).abs() < 1e-5);
        assert!((size.x - expected_height * 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_center_ndc_hits_plane_origin() {
        let camera = SceneCamera::new(800, 600);
        let hit = camera.plane_hit(Vec2::ZERO).unwrap();
        assert!(hit.plane.length() < 1e-4);
        assert_eq!(hit.plane.z, 0.0);
    }

    #[test]
    fn test_corner_ndc_hits_frustum_corner() {
        let camera = SceneCamera::new(800, 600);
        let half = camera.frustum_size() * 0.5;
        let hit = camera.plane_hit(Vec2::new(1.0, 1.0)).unwrap();
        assert!((hit.plane.x - half.x).abs() < 1e-2);
        assert!((hit.plane.y - half.y).abs() < 1e-2);
    }

    #[test]
    fn test_parallel_ray_misses_plane() {
        assert_eq!(
            ground_intersection(Vec3::new(0.0, 0.0, 20.0), Vec3::X),
            None
        );
    }

    #[test]
    fn test_intersection_point_lies_on_plane() {
        let point =
            ground_intersection(Vec3::new(0.0, 0.0, 20.0), Vec3::new(0.3, 0.1, -0.9).normalize())
                .unwrap();
        assert_eq!(point.z, 0.0);
    }

    #[test]
    fn test_orbit_eye_handles_stationary_ball_at_origin() {
        let eye = OrbitEye::new(512, 512);
        // Must not produce NaNs from a degenerate look-at.
        let matrix = eye.view_proj(Vec3::ZERO, Vec3::ZERO);
        assert!(matrix.is_finite());
    }
}

//! Orbit camera around the mug
//!
//! Spherical coordinates around a fixed target: yaw around Y, pitch up from
//! the horizontal plane, distance from the target.

use macroquad::math::{vec3, Vec3};

const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;
const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 12.0;
/// Radians per pixel of mouse drag
const DRAG_SPEED: f32 = 0.01;

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

impl OrbitCamera {
    /// Camera whose eye sits at `eye`, looking at `target`
    pub fn looking_at(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(MIN_DISTANCE);
        let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
        Self {
            target,
            yaw: offset.x.atan2(offset.z),
            pitch: offset.y.atan2(horizontal).clamp(-PITCH_LIMIT, PITCH_LIMIT),
            distance,
        }
    }

    /// Eye position
    pub fn eye(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.target
            + vec3(
                self.distance * cos_pitch * sin_yaw,
                self.distance * sin_pitch,
                self.distance * cos_pitch * cos_yaw,
            )
    }

    /// Mouse drag by (dx, dy) pixels. Dragging right spins the mug right.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.yaw -= dx * DRAG_SPEED;
        self.pitch = (self.pitch + dy * DRAG_SPEED).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Mouse wheel; positive scroll moves closer
    pub fn zoom(&mut self, scroll: f32) {
        if scroll == 0.0 {
            return;
        }
        let factor = if scroll > 0.0 { 0.9 } else { 1.0 / 0.9 };
        self.distance = (self.distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Idle spin at `speed` radians per second
    pub fn auto_rotate(&mut self, speed: f32, dt: f32) {
        self.yaw = (self.yaw + speed * dt) % std::f32::consts::TAU;
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_at(vec3(0.0, 1.0, 3.0), Vec3::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn test_default_pose() {
        let camera = OrbitCamera::default();
        assert!(close(camera.eye(), vec3(0.0, 1.0, 3.0)), "eye {:?}", camera.eye());
    }

    #[test]
    fn test_drag_keeps_distance_and_clamps_pitch() {
        let mut camera = OrbitCamera::default();
        let distance = camera.distance;
        camera.drag(120.0, 0.0);
        assert!(((camera.eye() - camera.target).length() - distance).abs() < 1e-4);

        camera.drag(0.0, 10_000.0);
        assert_eq!(camera.pitch, PITCH_LIMIT);
        camera.drag(0.0, -20_000.0);
        assert_eq!(camera.pitch, -PITCH_LIMIT);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = OrbitCamera::default();
        for _ in 0..100 {
            camera.zoom(1.0);
        }
        assert_eq!(camera.distance, MIN_DISTANCE);
        for _ in 0..100 {
            camera.zoom(-1.0);
        }
        assert_eq!(camera.distance, MAX_DISTANCE);
    }

    #[test]
    fn test_auto_rotate_wraps() {
        let mut camera = OrbitCamera::default();
        camera.auto_rotate(1.0, 100.0);
        assert!(camera.yaw.abs() < std::f32::consts::TAU);
    }
}

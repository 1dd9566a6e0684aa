use glam::{Mat4, Vec2, Vec3};

use crate::math::{clamp, lerp, vec2_from_angle};

/// Rate at which camera shake decays toward zero, per second.
pub const SHAKE_DECAY: f32 = 5.0;

/// 2D camera: position, zoom, rotation and a decaying shake intensity.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// World point shown at the screen center.
    pub pos: Vec2,
    pub scale: Vec2,
    /// Rotation in radians.
    pub angle: f32,
    /// Current shake magnitude in world units.
    pub shake: f32,
}

impl Camera {
    /// A camera centered on a screen of the given size.
    pub fn new(screen: Vec2) -> Self {
        Self {
            pos: screen * 0.5,
            scale: Vec2::ONE,
            angle: 0.0,
            shake: 0.0,
        }
    }

    pub fn set_shake(&mut self, intensity: f32) {
        self.shake = intensity.max(0.0);
    }

    /// Offset for this frame's shake, pointing at `angle` radians.
    pub fn shake_offset(&self, angle: f32) -> Vec2 {
        vec2_from_angle(angle) * self.shake
    }

    /// Move shake toward zero. The step is clamped so large `dt` cannot
    /// overshoot below zero.
    pub fn decay_shake(&mut self, dt: f32) {
        let t = clamp(SHAKE_DECAY * dt, 0.0, 1.0);
        self.shake = lerp(self.shake, 0.0, t).max(0.0);
    }

    /// World-to-screen matrix: about the screen center apply scale then
    /// rotation, then translate so `pos` (offset by `shake`) lands in the
    /// center.
    pub fn matrix(&self, screen: Vec2, shake: Vec2) -> Mat4 {
        let half = screen * 0.5;
        Mat4::from_translation(half.extend(0.0))
            * Mat4::from_scale(Vec3::new(self.scale.x, self.scale.y, 1.0))
            * Mat4::from_rotation_z(self.angle)
            * Mat4::from_translation((-half).extend(0.0))
            * Mat4::from_translation((-self.pos + half + shake).extend(0.0))
    }
}

/// Map a screen point back into world space through `cam_matrix`.
pub fn screen_to_world(cam_matrix: &Mat4, screen: Vec2) -> Vec2 {
    cam_matrix.inverse().transform_point3(screen.extend(0.0)).truncate()
}

/// Map a world point onto the screen through `cam_matrix`.
pub fn world_to_screen(cam_matrix: &Mat4, world: Vec2) -> Vec2 {
    cam_matrix.transform_point3(world.extend(0.0)).truncate()
}

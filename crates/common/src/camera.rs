use glam::Vec3;
use serde::{Deserialize, Serialize};

/// First-person camera: world position plus yaw about the vertical axis.
///
/// Pitch is fixed at zero. Yaw is never wrapped; it is only consumed through
/// `sin`/`cos`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: Vec3,
    pub rot_y: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, -20.0),
            rot_y: 0.0,
        }
    }
}

impl Camera {
    pub fn new(position: Vec3, rot_y: f32) -> Self {
        Self { position, rot_y }
    }

    /// Unit look direction in the XZ plane: `(sin(rot_y), 0, cos(rot_y))`.
    pub fn forward(&self) -> Vec3 {
        let (sin, cos) = self.rot_y.sin_cos();
        Vec3::new(sin, 0.0, cos)
    }

    /// Screen-right direction, perpendicular to `forward` in the XZ plane.
    pub fn right(&self) -> Vec3 {
        let (sin, cos) = self.rot_y.sin_cos();
        Vec3::new(cos, 0.0, -sin)
    }

    pub fn move_forward(&mut self, distance: f32) {
        self.position += self.forward() * distance;
    }

    pub fn move_backward(&mut self, distance: f32) {
        self.position -= self.forward() * distance;
    }

    pub fn strafe_left(&mut self, distance: f32) {
        self.position -= self.right() * distance;
    }

    pub fn strafe_right(&mut self, distance: f32) {
        self.position += self.right() * distance;
    }

    pub fn move_up(&mut self, distance: f32) {
        self.position.y += distance;
    }

    pub fn move_down(&mut self, distance: f32) {
        self.position.y -= distance;
    }

    pub fn rotate(&mut self, delta_radians: f32) {
        self.rot_y += delta_radians;
    }

    /// Point `ahead` units in front of the camera along `forward`.
    pub fn look_point(&self, ahead: f32) -> Vec3 {
        self.position + self.forward() * ahead
    }
}

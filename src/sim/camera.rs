//! Perspective camera for viewing world space

use glam::{Mat4, Vec3};

/// Pitch is kept inside this range so the view never flips over the pole
pub const MAX_PITCH_DEGREES: f32 = 89.0;
pub const MIN_FOV_DEGREES: f32 = 1.0;
pub const MAX_FOV_DEGREES: f32 = 90.0;

const DEFAULT_FOV_DEGREES: f32 = 45.0;
const NEAR_PLANE: f32 = 0.1;
const FAR_PLANE: f32 = 2000.0;

/// Yaw/pitch perspective camera
///
/// Yaw is measured in degrees around +Y, starting at -90 so the camera looks
/// down -Z. The projection is cached and rebuilt whenever the field of view
/// or aspect ratio changes; `is_projection_updated` tells a renderer to
/// re-upload it.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec3,
    front: Vec3,
    up: Vec3,
    yaw: f32,
    pitch: f32,
    fov_y: f32,
    aspect_ratio: f32,
    projection: Mat4,
    projection_updated: bool,
}

impl Camera {
    /// Creates a camera at `position` for a framebuffer of the given size
    pub fn new(position: Vec3, width: u32, height: u32) -> Self {
        let mut camera = Self {
            position,
            front: Vec3::NEG_Z,
            up: Vec3::Y,
            yaw: -90.0,
            pitch: 0.0,
            fov_y: DEFAULT_FOV_DEGREES,
            aspect_ratio: 16.0 / 9.0,
            projection: Mat4::IDENTITY,
            projection_updated: false,
        };
        if height > 0 {
            camera.aspect_ratio = width as f32 / height as f32;
        }
        camera.rebuild_projection();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Moves the camera by `delta` in world units
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
    }

    /// Unit view direction
    pub fn front(&self) -> Vec3 {
        self.front
    }

    /// Unit vector pointing to the camera's right
    pub fn right(&self) -> Vec3 {
        self.front.cross(self.up).normalize()
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Sets the pitch in degrees, clamped to ±89
    pub fn set_pitch(&mut self, pitch: f32) {
        self.pitch = pitch.clamp(-MAX_PITCH_DEGREES, MAX_PITCH_DEGREES);
        self.update_front();
    }

    /// Turns the camera by the given degrees
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw += yaw_delta;
        self.set_pitch(self.pitch + pitch_delta);
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    /// Sets the vertical field of view in degrees, clamped to 1..=90
    pub fn set_fov_y(&mut self, fov_y: f32) {
        let fov_y = fov_y.clamp(MIN_FOV_DEGREES, MAX_FOV_DEGREES);
        if fov_y != self.fov_y {
            self.fov_y = fov_y;
            self.rebuild_projection();
        }
    }

    /// Narrows (positive) or widens (negative) the field of view
    pub fn zoom(&mut self, degrees: f32) {
        self.set_fov_y(self.fov_y - degrees);
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
        self.rebuild_projection();
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.front, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    pub fn is_projection_updated(&self) -> bool {
        self.projection_updated
    }

    pub fn reset_projection_updated(&mut self) {
        self.projection_updated = false;
    }

    fn update_front(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
        .normalize();
    }

    fn rebuild_projection(&mut self) {
        self.projection = Mat4::perspective_rh(
            self.fov_y.to_radians(),
            self.aspect_ratio,
            NEAR_PLANE,
            FAR_PLANE,
        );
        self.projection_updated = true;
    }
}

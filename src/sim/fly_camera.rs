//! Free-flying camera driven by the input snapshot

use anyhow::ensure;
use glam::Vec3;
use tracing::{debug, trace};

use crate::app::config::CameraConfig;
use crate::app::input::{InputBinding, InputId, InputWindow, InputsSnapshot, KeyCode};
use crate::app::scene::{FrameContext, Scene};

use super::camera::Camera;

/// Each `+`/`-` step scales the movement speed by this factor
const SPEED_STEP: f32 = 1.25;
const MIN_SPEED_SCALE: f32 = 0.125;
const MAX_SPEED_SCALE: f32 = 16.0;

/// Ids of the inputs the scene registers in `init`
#[derive(Debug, Clone, Copy)]
pub struct FlyCameraInputs {
    pub forward: InputId,
    pub backward: InputId,
    pub left: InputId,
    pub right: InputId,
    pub up: InputId,
    pub down: InputId,
    pub fast: InputId,
    pub speed_up: InputId,
    pub speed_down: InputId,
    /// Releases the cursor, or closes the window when it is already free
    pub escape: InputId,
    pub toggle_fly: InputId,
}

impl FlyCameraInputs {
    fn register<W: InputWindow>(ctx: &mut FrameContext<'_, W>) -> Self {
        let inputs = ctx.inputs();
        Self {
            forward: inputs.register_input_default("forward", KeyCode::W),
            backward: inputs.register_input_default("backward", KeyCode::S),
            left: inputs.register_input_default("left", KeyCode::A),
            right: inputs.register_input_default("right", KeyCode::D),
            up: inputs.register_input_default("up", KeyCode::Space),
            down: inputs.register_input_default(
                "down",
                InputBinding::new(KeyCode::LeftControl).or(KeyCode::RightControl),
            ),
            fast: inputs.register_input_default(
                "fast",
                InputBinding::new(KeyCode::LeftShift).or(KeyCode::RightShift),
            ),
            speed_up: inputs.register_input_default(
                "speed_up",
                InputBinding::new(KeyCode::Equal).or(KeyCode::NumpadAdd),
            ),
            speed_down: inputs.register_input_default(
                "speed_down",
                InputBinding::new(KeyCode::Minus).or(KeyCode::NumpadSubtract),
            ),
            escape: inputs.register_input_default("escape", KeyCode::Escape),
            toggle_fly: inputs.register_input_default("toggle_fly", KeyCode::Space),
        }
    }
}

/// Scene that moves a [`Camera`] from keyboard and mouse input
///
/// - WASD moves, Shift moves faster, Space/Ctrl rise and sink
/// - mouse movement looks around while the cursor is captured
/// - scroll zooms the field of view
/// - `+`/`-` change the movement speed, repeating while held
/// - Escape releases the cursor, a second Escape closes the window
/// - left click captures the cursor again
/// - double Space toggles between flying and walking on the XZ plane
#[derive(Debug)]
pub struct FlyCameraScene {
    config: CameraConfig,
    camera: Option<Camera>,
    inputs: Option<FlyCameraInputs>,
    speed_scale: f32,
    flying: bool,
}

impl FlyCameraScene {
    pub fn new(config: CameraConfig) -> Self {
        Self {
            config,
            camera: None,
            inputs: None,
            speed_scale: 1.0,
            flying: true,
        }
    }

    /// Camera, once the window exists
    pub fn camera(&self) -> Option<&Camera> {
        self.camera.as_ref()
    }

    pub fn inputs(&self) -> Option<&FlyCameraInputs> {
        self.inputs.as_ref()
    }

    /// Multiplier applied to the configured movement speed
    pub fn speed_scale(&self) -> f32 {
        self.speed_scale
    }

    pub fn is_flying(&self) -> bool {
        self.flying
    }

    fn movement_direction(
        &self,
        snapshot: &InputsSnapshot,
        ids: &FlyCameraInputs,
        camera: &Camera,
    ) -> Vec3 {
        let (mut front, mut right) = (camera.front(), camera.right());
        if !self.flying {
            front = Vec3::new(front.x, 0.0, front.z).normalize_or_zero();
            right = Vec3::new(right.x, 0.0, right.z).normalize_or_zero();
        }

        let mut direction = Vec3::ZERO;
        if snapshot.is_held(ids.forward) {
            direction += front;
        }
        if snapshot.is_held(ids.backward) {
            direction -= front;
        }
        if snapshot.is_held(ids.right) {
            direction += right;
        }
        if snapshot.is_held(ids.left) {
            direction -= right;
        }
        if self.flying {
            if snapshot.is_held(ids.up) {
                direction += camera.up();
            }
            if snapshot.is_held(ids.down) {
                direction -= camera.up();
            }
        }
        direction.normalize_or_zero()
    }
}

impl<W: InputWindow> Scene<W> for FlyCameraScene {
    fn init(&mut self, ctx: &mut FrameContext<'_, W>) -> anyhow::Result<()> {
        ensure!(
            self.config.movement_speed >= 0.0,
            "camera.movement_speed must not be negative"
        );

        let (width, height) = ctx.window().framebuffer_size();
        let mut camera = Camera::new(Vec3::from(self.config.start_position), width, height);
        camera.set_fov_y(self.config.fov_degrees);

        self.inputs = Some(FlyCameraInputs::register(ctx));
        self.camera = Some(camera);
        ctx.set_mouse_capture_enabled(true);
        debug!(width, height, "Fly camera ready");
        Ok(())
    }

    fn update(&mut self, snapshot: &InputsSnapshot, ctx: &mut FrameContext<'_, W>, dt: f32) {
        let Some(ids) = self.inputs else {
            return;
        };
        let Some(mut camera) = self.camera.take() else {
            return;
        };

        let framebuffer = snapshot.framebuffer();
        if framebuffer.resized
            && let Some(aspect) = framebuffer.aspect_ratio()
        {
            camera.set_aspect_ratio(aspect);
        }

        let mouse = snapshot.mouse();
        if snapshot.is_pressed(ids.escape) {
            if ctx.is_mouse_capture_enabled() {
                ctx.set_mouse_capture_enabled(false);
                debug!("Cursor released");
            } else {
                debug!("Escape pressed with a free cursor, closing");
                ctx.request_close();
            }
        } else if mouse.left_button_pressed && !ctx.is_mouse_capture_enabled() {
            ctx.set_mouse_capture_enabled(true);
            debug!("Cursor captured");
        }

        if mouse.capture_enabled && mouse.movement_offset_changed {
            let sensitivity = self.config.mouse_sensitivity;
            camera.rotate(mouse.offset_x * sensitivity, mouse.offset_y * sensitivity);
        }
        if mouse.scroll_offset_changed {
            camera.zoom(mouse.scroll_y * self.config.zoom_step);
        }

        if snapshot.is_pressed(ids.speed_up) {
            self.speed_scale = (self.speed_scale * SPEED_STEP).min(MAX_SPEED_SCALE);
            debug!(speed_scale = self.speed_scale, "Camera speed increased");
        }
        if snapshot.is_pressed(ids.speed_down) {
            self.speed_scale = (self.speed_scale / SPEED_STEP).max(MIN_SPEED_SCALE);
            debug!(speed_scale = self.speed_scale, "Camera speed decreased");
        }

        if snapshot.is_double_pressed(ids.toggle_fly) {
            self.flying = !self.flying;
            debug!(flying = self.flying, "Toggled fly mode");
        }

        let mut speed = self.config.movement_speed * self.speed_scale;
        if snapshot.is_held(ids.fast) {
            speed *= self.config.fast_multiplier;
        }
        let direction = self.movement_direction(snapshot, &ids, &camera);
        camera.translate(direction * speed * dt);

        trace!(
            frame = snapshot.frame(),
            position = ?camera.position(),
            yaw = camera.yaw(),
            pitch = camera.pitch(),
            "Camera updated"
        );
        self.camera = Some(camera);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::app::input::{InputsManager, MouseButton, RepeatConfig};
    use crate::app::platform::HeadlessWindow;

    struct Rig {
        window: HeadlessWindow,
        manager: InputsManager,
        scene: FlyCameraScene,
        time: Duration,
    }

    impl Rig {
        fn new() -> Self {
            let mut window = HeadlessWindow::new(800, 600);
            let mut manager = InputsManager::new(RepeatConfig::default());
            manager.attach(&mut window);
            let mut scene = FlyCameraScene::new(CameraConfig::default());
            scene
                .init(&mut FrameContext::new(&mut manager, &mut window))
                .expect("scene init");
            Self {
                window,
                manager,
                scene,
                time: Duration::ZERO,
            }
        }

        /// Runs one frame `dt_ms` after the previous one
        fn frame(&mut self, dt_ms: u64) {
            self.time += Duration::from_millis(dt_ms);
            self.window.pump_events();
            self.manager.poll_inputs_at(&self.window, self.time);
            let snapshot = self.manager.inputs_snapshot();
            let dt = dt_ms as f32 / 1000.0;
            self.scene.update(
                &snapshot,
                &mut FrameContext::new(&mut self.manager, &mut self.window),
                dt,
            );
        }

        fn camera(&self) -> &Camera {
            self.scene.camera().expect("camera after init")
        }
    }

    #[test]
    fn test_init_enables_capture_and_registers_inputs() {
        let rig = Rig::new();
        assert!(rig.manager.is_mouse_capture_enabled());
        assert!(rig.window.controller().is_cursor_captured());
        assert_eq!(rig.manager.input_count(), 11);
        assert!(rig.manager.find_input("toggle_fly").is_some());
    }

    #[test]
    fn test_forward_moves_along_front() {
        let mut rig = Rig::new();
        let start = rig.camera().position();
        rig.window.controller().press(KeyCode::W);
        rig.frame(500);

        let moved = rig.camera().position() - start;
        assert!(moved.z < 0.0);
        assert!((moved.length() - 2.5 * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_shift_multiplies_speed() {
        let mut rig = Rig::new();
        let start = rig.camera().position();
        let controller = rig.window.controller();
        controller.press(KeyCode::D);
        controller.press(KeyCode::LeftShift);
        rig.frame(100);

        let moved = rig.camera().position() - start;
        assert!(moved.x > 0.0);
        assert!((moved.length() - 2.5 * 4.0 * 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_mouse_look_rotates_camera() {
        let mut rig = Rig::new();
        let controller = rig.window.controller();
        controller.move_cursor(100.0, 100.0);
        rig.frame(16);
        let yaw = rig.camera().yaw();

        controller.move_cursor(150.0, 80.0);
        rig.frame(16);
        assert!((rig.camera().yaw() - (yaw + 5.0)).abs() < 1e-4);
        assert!((rig.camera().pitch() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_escape_releases_capture_and_stops_look() {
        let mut rig = Rig::new();
        let controller = rig.window.controller();
        controller.move_cursor(0.0, 0.0);
        rig.frame(16);

        controller.press(KeyCode::Escape);
        rig.frame(16);
        assert!(!rig.manager.is_mouse_capture_enabled());
        assert!(!controller.is_cursor_captured());

        let yaw = rig.camera().yaw();
        controller.move_cursor(300.0, 0.0);
        rig.frame(16);
        assert_eq!(rig.camera().yaw(), yaw);
    }

    #[test]
    fn test_second_escape_closes_window() {
        let mut rig = Rig::new();
        let controller = rig.window.controller();

        controller.press(KeyCode::Escape);
        rig.frame(16);
        assert!(!rig.manager.is_mouse_capture_enabled());
        assert!(!rig.window.should_close());

        controller.release(KeyCode::Escape);
        rig.frame(16);
        controller.press(KeyCode::Escape);
        rig.frame(16);
        assert!(rig.window.should_close());
    }

    #[test]
    fn test_click_recaptures_cursor() {
        let mut rig = Rig::new();
        let controller = rig.window.controller();
        controller.press(KeyCode::Escape);
        rig.frame(16);
        controller.release(KeyCode::Escape);
        assert!(!rig.manager.is_mouse_capture_enabled());

        controller.press(MouseButton::Left);
        rig.frame(16);
        assert!(rig.manager.is_mouse_capture_enabled());
        assert!(controller.is_cursor_captured());

        // Escape after recapturing releases again instead of closing.
        controller.release(MouseButton::Left);
        controller.press(KeyCode::Escape);
        rig.frame(16);
        assert!(!rig.manager.is_mouse_capture_enabled());
        assert!(!rig.window.should_close());
    }

    #[test]
    fn test_scroll_zooms() {
        let mut rig = Rig::new();
        rig.window.controller().scroll(0.0, 2.0);
        rig.frame(16);
        assert!((rig.camera().fov_y() - 41.0).abs() < 1e-4);
    }

    #[test]
    fn test_resize_updates_aspect() {
        let mut rig = Rig::new();
        rig.window.controller().resize(1000, 500);
        rig.frame(16);
        assert!((rig.camera().aspect_ratio() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_speed_keys_repeat_while_held() {
        let mut rig = Rig::new();
        rig.window.controller().press(KeyCode::Equal);
        rig.frame(0);
        assert!((rig.scene.speed_scale() - SPEED_STEP).abs() < 1e-4);

        // Held until the first repeat at 600ms
        rig.frame(300);
        assert!((rig.scene.speed_scale() - SPEED_STEP).abs() < 1e-4);
        rig.frame(300);
        assert!((rig.scene.speed_scale() - SPEED_STEP * SPEED_STEP).abs() < 1e-4);
    }

    #[test]
    fn test_double_space_toggles_fly_mode() {
        let mut rig = Rig::new();
        let controller = rig.window.controller();
        assert!(rig.scene.is_flying());

        controller.press(KeyCode::Space);
        rig.frame(16);
        controller.release(KeyCode::Space);
        rig.frame(100);
        controller.press(KeyCode::Space);
        rig.frame(100);
        assert!(!rig.scene.is_flying());

        // Walking ignores vertical movement
        let height = rig.camera().position().y;
        rig.frame(200);
        assert_eq!(rig.camera().position().y, height);
    }
}

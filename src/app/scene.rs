//! Per-frame consumer of the input snapshot

use super::input::{InputWindow, InputsManager, InputsSnapshot};

/// Access to input control and the window during a frame
pub struct FrameContext<'a, W: InputWindow> {
    inputs: &'a mut InputsManager,
    window: &'a mut W,
}

impl<'a, W: InputWindow> FrameContext<'a, W> {
    pub fn new(inputs: &'a mut InputsManager, window: &'a mut W) -> Self {
        Self { inputs, window }
    }

    /// Input manager, mainly for registering inputs during `init`
    pub fn inputs(&mut self) -> &mut InputsManager {
        self.inputs
    }

    pub fn window(&mut self) -> &mut W {
        self.window
    }

    /// See [`InputsManager::set_mouse_capture_enabled`]
    pub fn set_mouse_capture_enabled(&mut self, enabled: bool) {
        self.inputs.set_mouse_capture_enabled(&mut *self.window, enabled);
    }

    pub fn is_mouse_capture_enabled(&self) -> bool {
        self.inputs.is_mouse_capture_enabled()
    }

    /// Asks the render loop to finish after this frame
    pub fn request_close(&mut self) {
        self.window.set_should_close(true);
    }
}

/// Trait for what the render loop drives each frame
///
/// Every method runs on the render thread. The scene is moved there on
/// start, hence `Send + 'static`.
pub trait Scene<W: InputWindow>: Send + 'static {
    /// Called once after the window exists, before the first frame
    ///
    /// Register inputs and create window-dependent resources here.
    fn init(&mut self, ctx: &mut FrameContext<'_, W>) -> anyhow::Result<()>;

    /// Applies this frame's snapshot (camera, UI focus, viewport)
    fn update(&mut self, snapshot: &InputsSnapshot, ctx: &mut FrameContext<'_, W>, dt: f32);

    /// Issues the frame's drawing commands
    fn draw(&mut self, _window: &mut W) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called once after the last frame, while the window still exists
    fn shutdown(&mut self) {}
}

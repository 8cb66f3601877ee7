//! Desktop window backed by winit
//!
//! The event loop lives on the render thread and is driven with
//! `pump_app_events`, so resize and scroll callbacks fire nested inside
//! [`InputWindow::pump_events`], the same way a GLFW-style `poll_events`
//! behaves.

use std::collections::HashSet;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::PhysicalKey;
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{CursorGrabMode, Fullscreen, Window, WindowAttributes, WindowId};

#[cfg(target_os = "windows")]
use winit::platform::windows::EventLoopBuilderExtWindows;
#[cfg(all(
    unix,
    not(any(target_os = "macos", target_os = "ios", target_os = "android"))
))]
use winit::platform::x11::EventLoopBuilderExtX11;

use super::{Platform, PlatformError};
use crate::app::config::WindowConfig;
use crate::app::input::{
    FramebufferSizeCallback, InputWindow, KeyCode, MouseButton, PhysicalInput, ScrollCallback,
    WindowError,
};

/// Pixel scroll deltas (touchpads) are converted to wheel lines
const PIXELS_PER_LINE: f64 = 20.0;

/// Upper bound on event pumps spent waiting for the window to appear
const MAX_CREATE_PUMPS: u32 = 200;

const CREATE_PUMP_TIMEOUT: Duration = Duration::from_millis(10);

/// Creates window attributes from configuration
fn window_attributes_from_config(config: &WindowConfig) -> WindowAttributes {
    let mut attrs = WindowAttributes::default()
        .with_title(config.title.clone())
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_resizable(config.resizable)
        .with_decorations(config.decorated);

    if config.fullscreen {
        attrs = attrs.with_fullscreen(Some(Fullscreen::Borderless(None)));
    }

    attrs
}

/// Device state collected from winit events between two pumps
struct DesktopState {
    attributes: WindowAttributes,
    window: Option<Window>,
    creation_error: Option<String>,
    keys: HashSet<KeyCode>,
    buttons: HashSet<MouseButton>,
    cursor: Option<[f64; 2]>,
    /// Cursor position integrated from raw motion while the cursor is locked
    virtual_cursor: [f64; 2],
    captured: bool,
    close_requested: bool,
    on_resize: Option<FramebufferSizeCallback>,
    on_scroll: Option<ScrollCallback>,
}

impl DesktopState {
    fn new(attributes: WindowAttributes) -> Self {
        Self {
            attributes,
            window: None,
            creation_error: None,
            keys: HashSet::new(),
            buttons: HashSet::new(),
            cursor: None,
            virtual_cursor: [0.0, 0.0],
            captured: false,
            close_requested: false,
            on_resize: None,
            on_scroll: None,
        }
    }
}

impl ApplicationHandler for DesktopState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        match event_loop.create_window(self.attributes.clone()) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    window.width = size.width,
                    window.height = size.height,
                    "Window created successfully"
                );
                self.window = Some(window);
            }
            Err(e) => {
                error!(error = %e, "Failed to create window");
                self.creation_error = Some(e.to_string());
            }
        }
    }

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested");
                self.close_requested = true;
            }

            WindowEvent::Resized(size) => {
                if let Some(callback) = &mut self.on_resize {
                    callback(size.width, size.height);
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let (dx, dy) = match delta {
                    MouseScrollDelta::LineDelta(x, y) => (x as f64, y as f64),
                    MouseScrollDelta::PixelDelta(pos) => {
                        (pos.x / PIXELS_PER_LINE, pos.y / PIXELS_PER_LINE)
                    }
                };
                if let Some(callback) = &mut self.on_scroll {
                    callback(dx, dy);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key
                    && let Some(key) = KeyCode::from_winit(code)
                {
                    match event.state {
                        ElementState::Pressed => {
                            self.keys.insert(key);
                        }
                        ElementState::Released => {
                            self.keys.remove(&key);
                        }
                    }
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(button) = MouseButton::from_winit(button) {
                    match state {
                        ElementState::Pressed => {
                            self.buttons.insert(button);
                        }
                        ElementState::Released => {
                            self.buttons.remove(&button);
                        }
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = Some([position.x, position.y]);
            }

            // Releases that happen while unfocused never reach us.
            WindowEvent::Focused(false) => {
                self.keys.clear();
                self.buttons.clear();
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event
            && self.captured
        {
            self.virtual_cursor[0] += dx;
            self.virtual_cursor[1] += dy;
        }
    }
}

/// Desktop window plus the event loop that feeds it
pub struct WinitWindow {
    event_loop: EventLoop<()>,
    state: DesktopState,
}

impl WinitWindow {
    /// Underlying winit window, for renderers that need a surface
    pub fn window(&self) -> Option<&Window> {
        self.state.window.as_ref()
    }

    fn pump(&mut self, timeout: Option<Duration>) {
        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(timeout, &mut self.state)
        {
            debug!(code, "Event loop exited");
            self.state.close_requested = true;
        }
    }
}

impl InputWindow for WinitWindow {
    fn is_down(&self, input: PhysicalInput) -> bool {
        match input {
            PhysicalInput::Key(key) => self.state.keys.contains(&key),
            PhysicalInput::Mouse(button) => self.state.buttons.contains(&button),
        }
    }

    fn cursor_position(&self) -> Option<[f64; 2]> {
        if self.state.captured {
            Some(self.state.virtual_cursor)
        } else {
            self.state.cursor
        }
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.state
            .window
            .as_ref()
            .map(|window| {
                let size = window.inner_size();
                (size.width, size.height)
            })
            .unwrap_or((0, 0))
    }

    fn set_cursor_captured(&mut self, captured: bool) -> Result<(), WindowError> {
        let window = self.state.window.as_ref().ok_or(WindowError::Unavailable)?;
        self.state.captured = captured;
        window.set_cursor_visible(!captured);

        let grab = if captured {
            window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            window.set_cursor_grab(CursorGrabMode::None)
        };
        grab.map_err(|e| WindowError::CursorGrab(e.to_string()))
    }

    fn should_close(&self) -> bool {
        self.state.close_requested
    }

    fn set_should_close(&mut self, value: bool) {
        self.state.close_requested = value;
    }

    fn set_framebuffer_size_callback(&mut self, callback: FramebufferSizeCallback) {
        self.state.on_resize = Some(callback);
    }

    fn set_scroll_callback(&mut self, callback: ScrollCallback) {
        self.state.on_scroll = Some(callback);
    }

    fn pump_events(&mut self) {
        self.pump(Some(Duration::ZERO));
    }

    fn present(&mut self) {
        if let Some(window) = &self.state.window {
            window.request_redraw();
        }
    }
}

/// Platform creating [`WinitWindow`]s on the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct WinitPlatform;

impl WinitPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl Platform for WinitPlatform {
    type Window = WinitWindow;

    fn create_window(&mut self, config: &WindowConfig) -> Result<Self::Window, PlatformError> {
        let mut builder = EventLoop::builder();

        // The render thread is not the main thread.
        #[cfg(any(
            target_os = "windows",
            all(
                unix,
                not(any(target_os = "macos", target_os = "ios", target_os = "android"))
            )
        ))]
        builder.with_any_thread(true);

        let event_loop = builder
            .build()
            .map_err(|e| PlatformError::EventLoop(e.to_string()))?;

        let mut window = WinitWindow {
            event_loop,
            state: DesktopState::new(window_attributes_from_config(config)),
        };

        // The window is created from `resumed`, which only runs inside a pump.
        for _ in 0..MAX_CREATE_PUMPS {
            window.pump(Some(CREATE_PUMP_TIMEOUT));

            if window.state.window.is_some() {
                return Ok(window);
            }
            if let Some(e) = window.state.creation_error.take() {
                return Err(PlatformError::Window(e));
            }
            if window.state.close_requested {
                warn!("Event loop exited before the window was created");
                break;
            }
        }

        Err(PlatformError::WindowTimeout(MAX_CREATE_PUMPS))
    }
}

//! In-memory window driven by scripted input

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use super::{Platform, PlatformError};
use crate::app::config::WindowConfig;
use crate::app::input::{
    FramebufferSizeCallback, InputWindow, PhysicalInput, ScrollCallback, WindowError,
};

#[derive(Debug, Clone, Copy)]
enum PendingEvent {
    Resize(u32, u32),
    Scroll(f64, f64),
}

#[derive(Debug)]
struct HeadlessState {
    down: HashSet<PhysicalInput>,
    cursor: [f64; 2],
    cursor_available: bool,
    framebuffer: (u32, u32),
    pending: VecDeque<PendingEvent>,
    close_requested: bool,
    captured: bool,
    capture_changes: u32,
    presented: u64,
    frame_limit: Option<u64>,
}

/// Scripting handle for a [`HeadlessWindow`], usable from any thread
#[derive(Debug, Clone)]
pub struct HeadlessController {
    state: Arc<Mutex<HeadlessState>>,
}

impl HeadlessController {
    fn new(width: u32, height: u32) -> Self {
        Self {
            state: Arc::new(Mutex::new(HeadlessState {
                down: HashSet::new(),
                cursor: [0.0, 0.0],
                cursor_available: true,
                framebuffer: (width, height),
                pending: VecDeque::new(),
                close_requested: false,
                captured: false,
                capture_changes: 0,
                presented: 0,
                frame_limit: None,
            })),
        }
    }

    /// Holds a key or mouse button down
    pub fn press(&self, input: impl Into<PhysicalInput>) {
        self.state.lock().down.insert(input.into());
    }

    /// Releases a key or mouse button
    pub fn release(&self, input: impl Into<PhysicalInput>) {
        self.state.lock().down.remove(&input.into());
    }

    pub fn release_all(&self) {
        self.state.lock().down.clear();
    }

    /// Moves the cursor to a window position
    pub fn move_cursor(&self, x: f64, y: f64) {
        self.state.lock().cursor = [x, y];
    }

    /// Makes cursor queries fail, like a platform that lost the pointer
    pub fn set_cursor_available(&self, available: bool) {
        self.state.lock().cursor_available = available;
    }

    /// Queues a framebuffer resize, delivered on the next event pump
    pub fn resize(&self, width: u32, height: u32) {
        self.state
            .lock()
            .pending
            .push_back(PendingEvent::Resize(width, height));
    }

    /// Queues a scroll delta in lines, delivered on the next event pump
    pub fn scroll(&self, dx: f64, dy: f64) {
        self.state
            .lock()
            .pending
            .push_back(PendingEvent::Scroll(dx, dy));
    }

    /// Simulates the user closing the window
    pub fn request_close(&self) {
        self.state.lock().close_requested = true;
    }

    pub fn is_cursor_captured(&self) -> bool {
        self.state.lock().captured
    }

    /// Number of times the capture mode actually changed
    pub fn capture_changes(&self) -> u32 {
        self.state.lock().capture_changes
    }

    /// Number of frames presented so far
    pub fn presented_frames(&self) -> u64 {
        self.state.lock().presented
    }
}

/// Window with no display behind it
///
/// Device state is whatever the [`HeadlessController`] last set. Resize and
/// scroll notifications are queued and delivered to the callbacks inside
/// [`pump_events`](InputWindow::pump_events), like a real event pump.
pub struct HeadlessWindow {
    controller: HeadlessController,
    on_resize: Option<FramebufferSizeCallback>,
    on_scroll: Option<ScrollCallback>,
}

impl HeadlessWindow {
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_controller(HeadlessController::new(width, height))
    }

    fn with_controller(controller: HeadlessController) -> Self {
        Self {
            controller,
            on_resize: None,
            on_scroll: None,
        }
    }

    /// Handle for scripting this window
    pub fn controller(&self) -> HeadlessController {
        self.controller.clone()
    }
}

impl std::fmt::Debug for HeadlessWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HeadlessWindow")
            .field("controller", &self.controller)
            .field("has_resize_callback", &self.on_resize.is_some())
            .field("has_scroll_callback", &self.on_scroll.is_some())
            .finish()
    }
}

impl InputWindow for HeadlessWindow {
    fn is_down(&self, input: PhysicalInput) -> bool {
        self.controller.state.lock().down.contains(&input)
    }

    fn cursor_position(&self) -> Option<[f64; 2]> {
        let state = self.controller.state.lock();
        state.cursor_available.then_some(state.cursor)
    }

    fn framebuffer_size(&self) -> (u32, u32) {
        self.controller.state.lock().framebuffer
    }

    fn set_cursor_captured(&mut self, captured: bool) -> Result<(), WindowError> {
        let mut state = self.controller.state.lock();
        if state.captured != captured {
            state.captured = captured;
            state.capture_changes += 1;
        }
        Ok(())
    }

    fn should_close(&self) -> bool {
        let state = self.controller.state.lock();
        state.close_requested
            || state
                .frame_limit
                .is_some_and(|limit| state.presented >= limit)
    }

    fn set_should_close(&mut self, value: bool) {
        self.controller.state.lock().close_requested = value;
    }

    fn set_framebuffer_size_callback(&mut self, callback: FramebufferSizeCallback) {
        self.on_resize = Some(callback);
    }

    fn set_scroll_callback(&mut self, callback: ScrollCallback) {
        self.on_scroll = Some(callback);
    }

    fn pump_events(&mut self) {
        // Callbacks run without the state lock held.
        let pending: Vec<_> = {
            let mut state = self.controller.state.lock();
            let pending: Vec<_> = state.pending.drain(..).collect();
            for event in &pending {
                if let PendingEvent::Resize(width, height) = event {
                    state.framebuffer = (*width, *height);
                }
            }
            pending
        };

        for event in pending {
            match event {
                PendingEvent::Resize(width, height) => {
                    if let Some(callback) = &mut self.on_resize {
                        callback(width, height);
                    }
                }
                PendingEvent::Scroll(dx, dy) => {
                    if let Some(callback) = &mut self.on_scroll {
                        callback(dx, dy);
                    }
                }
            }
        }
    }

    fn present(&mut self) {
        self.controller.state.lock().presented += 1;
    }
}

/// Platform handing out one [`HeadlessWindow`]
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    controller: HeadlessController,
}

impl HeadlessPlatform {
    /// Platform whose window starts at the configured size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            controller: HeadlessController::new(width, height),
        }
    }

    /// Closes the window by itself after `frames` presented frames
    pub fn with_frame_limit(self, frames: u64) -> Self {
        self.controller.state.lock().frame_limit = Some(frames);
        self
    }

    /// Scripting handle for the window this platform creates
    pub fn controller(&self) -> HeadlessController {
        self.controller.clone()
    }
}

impl Platform for HeadlessPlatform {
    type Window = HeadlessWindow;

    fn create_window(&mut self, config: &WindowConfig) -> Result<Self::Window, PlatformError> {
        debug!(title = %config.title, "Creating headless window");
        Ok(HeadlessWindow::with_controller(self.controller.clone()))
    }
}

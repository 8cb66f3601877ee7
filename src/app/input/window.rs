//! Window capability required by the input core

use thiserror::Error;

use super::events::PhysicalInput;

/// Called with the new framebuffer size in physical pixels
pub type FramebufferSizeCallback = Box<dyn FnMut(u32, u32) + Send>;

/// Called with a scroll delta in lines (x, y)
pub type ScrollCallback = Box<dyn FnMut(f64, f64) + Send>;

/// Errors reported by a window backend
#[derive(Debug, Error)]
pub enum WindowError {
    #[error("cursor grab is not supported: {0}")]
    CursorGrab(String),
    #[error("window is not available")]
    Unavailable,
}

/// Trait for windows the input core can sample
///
/// Key and cursor queries are synchronous and reflect the state as of the
/// last [`pump_events`](InputWindow::pump_events) call. Resize and scroll
/// notifications are delivered through the registered callbacks, usually
/// nested inside `pump_events`, possibly from another OS thread.
pub trait InputWindow {
    /// Whether the physical input is currently down
    fn is_down(&self, input: PhysicalInput) -> bool;

    /// Cursor position in window pixels, `None` if it cannot be queried
    fn cursor_position(&self) -> Option<[f64; 2]>;

    /// Current framebuffer size in physical pixels
    fn framebuffer_size(&self) -> (u32, u32);

    /// Locks and hides the cursor, or releases it
    fn set_cursor_captured(&mut self, captured: bool) -> Result<(), WindowError>;

    /// Whether the user or the application asked the window to close
    fn should_close(&self) -> bool;

    fn set_should_close(&mut self, value: bool);

    /// Replaces the framebuffer resize callback
    fn set_framebuffer_size_callback(&mut self, callback: FramebufferSizeCallback);

    /// Replaces the scroll callback
    fn set_scroll_callback(&mut self, callback: ScrollCallback);

    /// Processes pending window system events without blocking
    fn pump_events(&mut self);

    /// Presents the frame drawn since the previous call
    fn present(&mut self) {}
}

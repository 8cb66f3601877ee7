//! Window backends
//!
//! A [`Platform`] creates the window on the render thread. Two backends ship
//! with the engine:
//! - [`WinitPlatform`]: a desktop window driven through winit's event pump
//! - [`HeadlessPlatform`]: an in-memory window scripted through a
//!   [`HeadlessController`], for tests and display-less runs

mod desktop;
mod headless;

use thiserror::Error;

use super::config::WindowConfig;
use super::input::InputWindow;

pub use self::desktop::{WinitPlatform, WinitWindow};
pub use self::headless::{HeadlessController, HeadlessPlatform, HeadlessWindow};

/// Errors raised while creating a window
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("failed to create event loop: {0}")]
    EventLoop(String),
    #[error("failed to create window: {0}")]
    Window(String),
    #[error("window was not created after {0} event pumps")]
    WindowTimeout(u32),
}

/// Trait for window system backends
///
/// `create_window` runs on the render thread, so the platform must be
/// movable there; the window it returns never leaves that thread.
pub trait Platform: Send + 'static {
    type Window: InputWindow;

    /// Creates the window described by `config`
    fn create_window(&mut self, config: &WindowConfig) -> Result<Self::Window, PlatformError>;
}

//! Engine application module
//!
//! Handles windowing, input sampling, and the render loop.

pub mod config;
pub mod input;
pub mod platform;
mod runner;
pub mod scene;

pub use config::{AppConfig, CameraConfig, InputConfig, WindowConfig};
pub use runner::{RenderLoop, RenderLoopError, StopHandle};
pub use scene::{FrameContext, Scene};

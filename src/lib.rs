//! Onion Engine
//!
//! Input sampling and render loop core, built on winit.

/// Engine application - windowing, input, and the render loop
pub mod app;

/// Build-time information (timestamp, target, compiler)
pub mod build_info;

/// Camera and camera-driving scene
pub mod sim;

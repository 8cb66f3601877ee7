//! Camera and the scene that drives it from input

pub mod camera;
pub mod fly_camera;

pub use camera::Camera;
pub use fly_camera::{FlyCameraInputs, FlyCameraScene};

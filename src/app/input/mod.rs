//! Input sampling system
//!
//! Turns raw window state into one immutable snapshot per frame:
//!
//! ```text
//! Window (polled keys/cursor + resize/scroll callbacks)
//!     ↓
//! InputSource      raw samples, one-shot notification slots
//!     ↓
//! InputsManager    one KeyRepeatState per registered input
//!     ↓
//! InputsSnapshot   immutable, valid for one frame
//! ```
//!
//! # Usage
//!
//! ```ignore
//! // Setup, on the render thread
//! let mut inputs = InputsManager::new(RepeatConfig::default());
//! inputs.attach(&mut window);
//! let jump = inputs.register_input_default("jump", KeyCode::Space);
//!
//! // Each frame
//! window.pump_events();
//! inputs.poll_inputs(&window);
//! let snapshot = inputs.inputs_snapshot();
//! if snapshot.is_pressed(jump) { /* ... */ }
//! ```

mod events;
mod key_repeat;
mod manager;
mod shared;
mod snapshot;
mod source;
mod window;

// Re-export public API
pub use events::{InputBinding, KeyCode, MouseButton, PhysicalInput};
pub use key_repeat::{KeyRepeatState, KeyState, RepeatConfig};
pub use manager::{InputId, InputsManager};
pub use shared::{FramebufferSample, FramebufferSlot, ScrollSample, ScrollSlot};
pub use snapshot::{FramebufferSnapshot, InputsSnapshot, MouseSnapshot};
pub use source::{InputCallbacks, InputSource};
pub use window::{FramebufferSizeCallback, InputWindow, ScrollCallback, WindowError};
